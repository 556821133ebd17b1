//! Series geometry providers.
//!
//! Every chart type converts its stored data into clipped geometry
//! descriptors — nodes, edges, rectangles — given a visible data-space
//! viewport. The orchestrator never inspects concrete series types; it
//! dispatches through the [`Series`] capability trait.

mod bar;
mod boxplot;
mod candlestick;
mod clip;
mod point;
mod stacked;

pub use bar::BarSeries;
pub use boxplot::{BoxSeries, BoxSummary};
pub use candlestick::{CandlestickSeries, Ohlc};
pub use clip::clip_segment;
pub use point::PointSeries;
pub use stacked::StackedSeries;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::any::Any;
use trazar_core::{ChartError, Color};

use crate::axis::Axis;

/// An independent-axis value in one of the three domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Key {
    /// Numerical
    N(f64),
    /// Temporal
    T(NaiveDateTime),
    /// Categorical
    C(String),
}

impl Key {
    /// A hashable identity for grouping points by key (stack offsets).
    #[must_use]
    pub(crate) fn id(&self) -> KeyId {
        match self {
            Self::N(v) => KeyId::N(v.to_bits()),
            Self::T(t) => KeyId::T(t.and_utc().timestamp()),
            Self::C(c) => KeyId::C(c.clone()),
        }
    }

    /// Convert to the unified numerical coordinate via an axis.
    ///
    /// Returns `NaN` for a category unknown to the axis; geometry skips
    /// non-finite positions.
    #[must_use]
    pub fn to_numerical(&self, axis: &Axis) -> f64 {
        match self {
            Self::N(v) => *v,
            Self::T(t) => axis.temporal_to_numerical(*t),
            Self::C(c) => axis.categorical_to_numerical(c).unwrap_or(f64::NAN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum KeyId {
    N(u64),
    T(i64),
    C(String),
}

/// One data point: an independent value plus a dependent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Independent-axis value
    pub key: Key,
    /// Dependent value
    pub val: f64,
}

impl DataPoint {
    /// Create a data point.
    #[must_use]
    pub const fn new(key: Key, val: f64) -> Self {
        Self { key, val }
    }
}

/// Native (pre-conversion) extent of a series along the independent axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeExtent {
    /// No data
    Empty,
    /// Numerical min/max
    Numeric(f64, f64),
    /// Temporal min/max
    Temporal(NaiveDateTime, NaiveDateTime),
    /// Categorical; the category list comes from `Series::categories`
    Categorical,
}

/// The visible data-space rectangle used to clip geometry.
///
/// For polar charts the fields read as `phi_min`/`phi_max` and
/// `r_min`/`r_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Independent-axis minimum
    pub x_min: f64,
    /// Independent-axis maximum
    pub x_max: f64,
    /// Dependent-axis minimum
    pub y_min: f64,
    /// Dependent-axis maximum
    pub y_max: f64,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Whether an independent coordinate is inside (edges inclusive).
    #[must_use]
    pub fn contains_x(&self, x: f64) -> bool {
        x.is_finite() && x >= self.x_min && x <= self.x_max
    }

    /// Whether a dependent coordinate is inside (edges inclusive).
    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        y.is_finite() && y >= self.y_min && y <= self.y_max
    }

    /// Whether a data-space point is inside.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.contains_x(x) && self.contains_y(y)
    }
}

/// A visible point marker in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Independent coordinate (unified numerical)
    pub x: f64,
    /// Dependent coordinate
    pub y: f64,
}

/// A line segment in data space, already clipped to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Start x
    pub x1: f64,
    /// Start y
    pub y1: f64,
    /// End x
    pub x2: f64,
    /// End y
    pub y2: f64,
}

/// A filled rectangle in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDesc {
    /// Left edge
    pub x_min: f64,
    /// Right edge
    pub x_max: f64,
    /// Bottom edge
    pub y_min: f64,
    /// Top edge
    pub y_max: f64,
}

impl RectDesc {
    /// Whether the rectangle overlaps the viewport at all.
    #[must_use]
    pub fn intersects(&self, vp: &Viewport) -> bool {
        self.x_max >= vp.x_min
            && self.x_min <= vp.x_max
            && self.y_max >= vp.y_min
            && self.y_min <= vp.y_max
    }
}

/// Common capability interface every series type implements.
///
/// The orchestrator applies per-type layout variables (bar widths, base
/// lines, stack offsets) through the capability methods instead of
/// matching on concrete types.
pub trait Series: Any {
    /// Series name, unique within its chart.
    fn name(&self) -> &str;

    /// Current render color.
    fn color(&self) -> Color;

    /// Set a user-chosen color, overriding the palette.
    fn set_color(&mut self, color: Color);

    /// Whether the user overrode the palette color.
    fn has_custom_color(&self) -> bool;

    /// Assign a palette color (ignored once a custom color is set).
    fn assign_color(&mut self, color: Color);

    /// Whether the series is drawn.
    fn visible(&self) -> bool;

    /// Toggle visibility.
    fn set_visible(&mut self, visible: bool);

    /// Whether the series is attached to a chart or stack.
    fn is_bound(&self) -> bool;

    /// Attach the series.
    ///
    /// `forbid_negative` is set for polar charts and stacked containers;
    /// existing negative values make the bind fail.
    ///
    /// # Errors
    ///
    /// `AlreadyBound` when attached elsewhere; `InvalidValue` when
    /// existing data violates the non-negative constraint.
    fn bind(&mut self, forbid_negative: bool) -> Result<(), ChartError>;

    /// Detach the series, clearing bind-time constraints.
    fn release(&mut self);

    /// Whether the series holds no data.
    fn is_empty(&self) -> bool;

    /// Number of stored elements.
    fn len(&self) -> usize;

    /// Native independent-axis extent (before conversion).
    fn native_extent_from(&self) -> NativeExtent;

    /// Categories contributed to a categorical from-axis, in insertion
    /// order.
    fn series_categories(&self) -> Vec<String> {
        Vec::new()
    }

    /// Recompute unified numerical positions through the from-axis.
    fn convert_independent(&mut self, axis: &Axis);

    /// Unified numerical extent along the independent axis.
    fn extent_from(&self) -> Option<(f64, f64)>;

    /// Extent along the dependent axis, honoring per-type rules.
    fn extent_to(&self) -> Option<(f64, f64)>;

    /// Visible point markers, clipped to the viewport.
    fn nodes(&self, viewport: &Viewport) -> Vec<Node>;

    /// Line segments, geometrically clipped against the viewport.
    fn edges(&self, viewport: &Viewport) -> Vec<Edge>;

    /// Filled rectangles; those not overlapping the viewport are omitted.
    fn rects(&self, viewport: &Viewport) -> Vec<RectDesc>;

    /// Whether this series competes for per-category bar width.
    fn is_bar_like(&self) -> bool {
        false
    }

    /// Receive the computed bar width and per-series shift (data units).
    fn apply_bar_width(&mut self, _width: f64, _shift: f64) {}

    /// Whether this series can live inside a stacked container.
    fn is_stackable(&self) -> bool {
        false
    }

    /// Whether this series takes the box-plot width variable.
    fn is_box(&self) -> bool {
        false
    }

    /// Receive the computed box width (data units).
    fn apply_box_width(&mut self, _width: f64) {}

    /// Snap the series base line to the dependent axis origin.
    fn set_base_line(&mut self, _base: f64) {}

    /// Marker radius in pixels.
    fn marker_radius(&self) -> f32 {
        3.0
    }

    /// Stroke width for lines in pixels.
    fn stroke_width(&self) -> f32 {
        1.5
    }

    /// Whether fills resolve through the per-pixel raster overlay.
    fn uses_raster_fill(&self) -> bool {
        false
    }

    /// Whether the series claims a data-space point for the raster fill.
    fn claims(&self, _x: f64, _y: f64) -> bool {
        false
    }

    /// Stacked sub-series, for per-child colors in layout and legend.
    fn stack_children(&self) -> Option<&[BarSeries]> {
        None
    }

    /// Upcast for typed access to concrete series.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed access to concrete series.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// State shared by every concrete series type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SeriesBase {
    pub(crate) name: String,
    pub(crate) color: Color,
    pub(crate) custom_color: bool,
    pub(crate) visible: bool,
    pub(crate) bound: bool,
    pub(crate) forbid_negative: bool,
}

impl SeriesBase {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::BLACK,
            custom_color: false,
            visible: true,
            bound: false,
            forbid_negative: false,
        }
    }

    pub(crate) fn bind(&mut self, forbid_negative: bool) -> Result<(), ChartError> {
        if self.bound {
            return Err(ChartError::AlreadyBound(self.name.clone()));
        }
        self.bound = true;
        self.forbid_negative = forbid_negative;
        Ok(())
    }

    pub(crate) fn release(&mut self) {
        self.bound = false;
        self.forbid_negative = false;
    }

    pub(crate) fn check_value(&self, val: f64) -> Result<(), ChartError> {
        if self.forbid_negative && val < 0.0 {
            return Err(ChartError::InvalidValue(format!(
                "negative value {val} not allowed for series {:?}",
                self.name
            )));
        }
        Ok(())
    }
}

/// Min/max over an iterator of finite values.
pub(crate) fn finite_min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut acc: Option<(f64, f64)> = None;
    for v in values.filter(|v| v.is_finite()) {
        acc = Some(match acc {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    acc
}
