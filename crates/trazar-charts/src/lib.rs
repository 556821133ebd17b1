//! Interactive 2-D chart engine: cartesian and polar.
//!
//! The engine maps between data space (numerical, temporal, or categorical
//! values) and screen space, computes auto-ranges/origins/ticks from the
//! attached series, converts series data into clipped geometry, and lays
//! everything out as [`trazar_core::DrawCommand`]s that a GUI toolkit
//! binding can draw.
//!
//! # Overview
//!
//! - [`coord`] — pure data↔screen transforms for both projections,
//!   including the inverses used for pointer hit-testing.
//! - [`axis`] — the axis model: range, origin, ticks, label, visibility,
//!   and the converters that map temporal/categorical values onto a
//!   unified numerical coordinate.
//! - [`autoscale`] — range aggregation, degeneracy guards, and tick
//!   generation.
//! - [`series`] — geometry providers for every chart type, plus the
//!   stacked container.
//! - [`chart`] — the orchestrator that owns axes, series, legend, and
//!   tooltip state and recomputes them on every mutation.
//! - [`layout`] — pixel-space layout for both projections.
//! - [`render`] — the [`trazar_core::Renderer`] implementation a toolkit
//!   drives.
//!
//! # Example
//!
//! ```
//! use trazar_charts::chart::{Chart, Plane};
//! use trazar_charts::axis::AxisDomain;
//! use trazar_charts::series::{DataPoint, Key, PointSeries};
//! use trazar_core::ChartTheme;
//!
//! let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
//! let mut line = PointSeries::line("load");
//! line.push(DataPoint::new(Key::N(0.0), 1.0)).unwrap();
//! line.push(DataPoint::new(Key::N(1.0), 3.0)).unwrap();
//! chart.add_series(Box::new(line)).unwrap();
//!
//! let (min, max) = chart.to_axis().numeric_range();
//! assert!(min <= 1.0 && max >= 3.0);
//! ```

pub mod autoscale;
pub mod axis;
pub mod chart;
pub mod coord;
pub mod layout;
pub mod legend;
pub mod raster;
pub mod render;
pub mod series;
pub mod tooltip;

pub use axis::{Axis, AxisDomain, Tick};
pub use chart::{Chart, Plane};
pub use coord::{CartesianMapper, PolarMapper};
pub use legend::LegendEntry;
pub use render::ChartRenderer;
pub use series::{
    BarSeries, BoxSeries, BoxSummary, CandlestickSeries, DataPoint, Key, Ohlc, PointSeries,
    Series, StackedSeries, Viewport,
};
pub use tooltip::TooltipState;
