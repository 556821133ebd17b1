//! Chart style snapshot.
//!
//! Styling is an explicit value passed into a chart at construction and
//! refreshed with `refresh_style`; nothing reads a process-wide theme.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// A complete style snapshot for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    /// Axis line and arrow color
    pub axis_color: Color,
    /// Tick mark and grid color
    pub grid_color: Color,
    /// Label text color
    pub text_color: Color,
    /// Chart background
    pub background: Color,
    /// Default colors assigned to series in registration order
    pub series_palette: Vec<Color>,
    /// Label font size in pixels
    pub text_size: f32,
    /// Padding reserved around the plot area for labels, in pixels
    pub padding: f32,
    /// Default dot radius for point markers
    pub dot_size: f32,
    /// Default stroke width for series lines
    pub line_width: f32,
}

impl ChartTheme {
    /// Light theme.
    #[must_use]
    pub fn light() -> Self {
        Self {
            axis_color: Color::rgb(0.3, 0.3, 0.3),
            grid_color: Color::rgb(0.85, 0.85, 0.85),
            text_color: Color::rgb(0.13, 0.13, 0.13),
            background: Color::WHITE,
            series_palette: vec![
                Color::rgb(0.2, 0.47, 0.96),
                Color::rgb(0.93, 0.47, 0.1),
                Color::rgb(0.18, 0.65, 0.34),
                Color::rgb(0.79, 0.2, 0.25),
                Color::rgb(0.55, 0.35, 0.79),
                Color::rgb(0.45, 0.33, 0.28),
            ],
            text_size: 12.0,
            padding: 40.0,
            dot_size: 3.0,
            line_width: 1.5,
        }
    }

    /// Dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            axis_color: Color::rgb(0.75, 0.75, 0.75),
            grid_color: Color::rgb(0.25, 0.25, 0.25),
            text_color: Color::rgb(0.92, 0.92, 0.92),
            background: Color::rgb(0.09, 0.09, 0.09),
            series_palette: vec![
                Color::rgb(0.51, 0.71, 1.0),
                Color::rgb(1.0, 0.66, 0.35),
                Color::rgb(0.51, 0.82, 0.6),
                Color::rgb(0.94, 0.5, 0.54),
                Color::rgb(0.74, 0.62, 0.95),
                Color::rgb(0.72, 0.6, 0.54),
            ],
            text_size: 12.0,
            padding: 40.0,
            dot_size: 3.0,
            line_width: 1.5,
        }
    }

    /// Palette color for the series registered at `index`, wrapping when
    /// the palette is exhausted.
    #[must_use]
    pub fn series_color(&self, index: usize) -> Color {
        if self.series_palette.is_empty() {
            return Color::BLACK;
        }
        self.series_palette[index % self.series_palette.len()]
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::light()
    }
}
