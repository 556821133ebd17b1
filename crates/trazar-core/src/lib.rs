//! Core types for the Trazar charting library.
//!
//! This crate holds everything the chart engine shares with a GUI toolkit
//! binding: pixel-space geometry, colors, draw commands, the [`Canvas`]
//! recording surface, the [`ChartTheme`] style snapshot, pointer/resize
//! events, the [`Renderer`] widget-lifecycle trait, and the [`ChartError`]
//! taxonomy.
//!
//! The engine itself (axes, scales, series geometry, layout) lives in
//! `trazar-charts` and talks to the hosting toolkit exclusively through
//! these types.

pub mod canvas;
pub mod color;
pub mod draw;
pub mod error;
pub mod event;
pub mod geometry;
pub mod theme;
pub mod widget;

pub use canvas::{Canvas, RecordingCanvas};
pub use color::Color;
pub use draw::{DrawCommand, StrokeStyle, TextStyle};
pub use error::ChartError;
pub use event::{PointerEvent, ResizeEvent};
pub use geometry::{Point, Rect, Size};
pub use theme::ChartTheme;
pub use widget::Renderer;
