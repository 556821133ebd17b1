//! Canvas abstraction and a recording implementation.

use crate::draw::{DrawCommand, StrokeStyle, TextStyle};
use crate::{Color, Point, Rect};

/// The drawing surface the chart engine paints onto.
///
/// A toolkit binding implements this to translate primitives into native
/// canvas objects. The engine never talks to a toolkit directly.
pub trait Canvas {
    /// Draw a line between two points.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Fill a circle, optionally outlined.
    fn fill_circle(&mut self, center: Point, radius: f32, fill: Color, stroke: Option<StrokeStyle>);

    /// Draw an open polyline.
    fn draw_path(&mut self, points: &[Point], color: Color, width: f32);

    /// Draw a text label anchored at a point.
    fn draw_text(&mut self, content: &str, position: Point, style: &TextStyle);

    /// Place an RGBA raster buffer over a rectangle.
    fn draw_raster(&mut self, bounds: Rect, width: u32, height: u32, pixels: Vec<u8>);
}

/// A [`Canvas`] that records draw operations as [`DrawCommand`]s.
///
/// Useful for testing (assert on what was painted), for serialization,
/// and as the object list handed to a toolkit binding.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Create an empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the canvas.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Clear all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(DrawCommand::line(from, to, color, width));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect {
            bounds: rect,
            fill: color,
        });
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f32,
        fill: Color,
        stroke: Option<StrokeStyle>,
    ) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    fn draw_path(&mut self, points: &[Point], color: Color, width: f32) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            style: StrokeStyle::new(color, width),
        });
    }

    fn draw_text(&mut self, content: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: content.to_owned(),
            position,
            style: style.clone(),
        });
    }

    fn draw_raster(&mut self, bounds: Rect, width: u32, height: u32, pixels: Vec<u8>) {
        self.commands.push(DrawCommand::Raster {
            bounds,
            width,
            height,
            pixels,
        });
    }
}
