//! Draw commands for chart rendering.
//!
//! All chart output reduces to these primitives; a toolkit binding maps
//! them onto its native canvas objects.

use crate::{Color, Point, Rect};
use serde::{Deserialize, Serialize};

/// Stroke style for lines and paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

impl StrokeStyle {
    /// Create a stroke style.
    #[must_use]
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Text style for labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            color: Color::BLACK,
        }
    }
}

/// A single draw command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Line segment between two points
    Line {
        /// Start point
        from: Point,
        /// End point
        to: Point,
        /// Stroke style
        style: StrokeStyle,
    },
    /// Filled rectangle
    Rect {
        /// Bounds
        bounds: Rect,
        /// Fill color
        fill: Color,
    },
    /// Circle, filled and optionally stroked
    Circle {
        /// Center point
        center: Point,
        /// Radius in pixels
        radius: f32,
        /// Fill color
        fill: Color,
        /// Optional outline
        stroke: Option<StrokeStyle>,
    },
    /// Open polyline through a point list
    Path {
        /// Polyline points
        points: Vec<Point>,
        /// Stroke style
        style: StrokeStyle,
    },
    /// Text label anchored at a point
    Text {
        /// Label content
        content: String,
        /// Anchor position (top-left)
        position: Point,
        /// Text style
        style: TextStyle,
    },
    /// Per-pixel raster image covering a rectangle
    Raster {
        /// Placement bounds
        bounds: Rect,
        /// Pixel width of the buffer
        width: u32,
        /// Pixel height of the buffer
        height: u32,
        /// RGBA pixel data, row-major, `width * height * 4` bytes
        pixels: Vec<u8>,
    },
}

impl DrawCommand {
    /// Shorthand for a line with the given color and width.
    #[must_use]
    pub const fn line(from: Point, to: Point, color: Color, width: f32) -> Self {
        Self::Line {
            from,
            to,
            style: StrokeStyle::new(color, width),
        }
    }

    /// Shorthand for a filled circle without an outline.
    #[must_use]
    pub const fn filled_circle(center: Point, radius: f32, fill: Color) -> Self {
        Self::Circle {
            center,
            radius,
            fill,
            stroke: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_shorthand() {
        let cmd = DrawCommand::line(Point::ORIGIN, Point::new(1.0, 1.0), Color::BLACK, 2.0);
        match cmd {
            DrawCommand::Line { style, .. } => assert_eq!(style.width, 2.0),
            _ => panic!("expected line"),
        }
    }

    #[test]
    fn test_commands_roundtrip_json() {
        let cmds = vec![
            DrawCommand::line(Point::ORIGIN, Point::new(3.0, 4.0), Color::WHITE, 1.0),
            DrawCommand::Rect {
                bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
                fill: Color::BLACK,
            },
            DrawCommand::Text {
                content: "42".into(),
                position: Point::new(5.0, 5.0),
                style: TextStyle::default(),
            },
        ];
        let json = serde_json::to_string(&cmds).unwrap();
        let back: Vec<DrawCommand> = serde_json::from_str(&json).unwrap();
        assert_eq!(cmds, back);
    }
}
