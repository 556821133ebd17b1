//! Widget-lifecycle trait implemented by chart renderers.

use crate::draw::DrawCommand;
use crate::event::{PointerEvent, ResizeEvent};
use crate::geometry::Size;

/// The renderer contract a hosting toolkit drives.
///
/// The toolkit asks for the current object list, tells the renderer its
/// allocated size, requests refreshes after mutations, and forwards
/// pointer and resize events. All calls are synchronous and run on the
/// toolkit's event loop.
pub trait Renderer {
    /// Current draw commands, valid since the last [`layout`](Self::layout)
    /// or [`refresh`](Self::refresh).
    fn objects(&self) -> &[DrawCommand];

    /// Recompute all positions for the given pixel size.
    fn layout(&mut self, size: Size);

    /// Recompute positions at the last laid-out size.
    fn refresh(&mut self);

    /// Minimum size the renderer needs to be useful.
    fn min_size(&self) -> Size;

    /// Handle a pointer event (hover tracking, tooltip updates).
    fn pointer_event(&mut self, event: &PointerEvent);

    /// Handle a resize; equivalent to a fresh [`layout`](Self::layout).
    fn resized(&mut self, event: &ResizeEvent) {
        self.layout(event.size);
    }
}
