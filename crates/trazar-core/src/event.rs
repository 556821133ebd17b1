//! Events delivered by the hosting toolkit.

use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

/// Pointer events with position and the viewport size at delivery time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Pointer entered the chart
    Entered {
        /// Pointer position in widget coordinates
        position: Point,
        /// Widget size when the event fired
        viewport: Size,
    },
    /// Pointer moved inside the chart
    Moved {
        /// Pointer position in widget coordinates
        position: Point,
        /// Widget size when the event fired
        viewport: Size,
    },
    /// Pointer left the chart
    Left,
}

/// The widget was resized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// New widget size
    pub size: Size,
}
