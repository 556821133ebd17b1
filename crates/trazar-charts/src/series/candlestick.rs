//! Candlestick series.

use serde::{Deserialize, Serialize};
use trazar_core::{ChartError, Color};

use super::point::{categories, native_extent};
use super::{
    clip::clip_segment, finite_min_max, Edge, Key, NativeExtent, Node, RectDesc, Series,
    SeriesBase, Viewport,
};
use crate::axis::Axis;

/// One open/high/low/close sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl Ohlc {
    /// Create a validated sample.
    ///
    /// # Errors
    ///
    /// `InvalidValue` unless `low ≤ open, close ≤ high` and all values
    /// are finite.
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Result<Self, ChartError> {
        let all_finite = [open, high, low, close].iter().all(|v| v.is_finite());
        let ordered = low <= open && low <= close && open <= high && close <= high;
        if !all_finite || !ordered {
            return Err(ChartError::InvalidValue(format!(
                "inconsistent ohlc sample o={open} h={high} l={low} c={close}"
            )));
        }
        Ok(Self {
            open,
            high,
            low,
            close,
        })
    }

    /// Opening value.
    #[must_use]
    pub const fn open(&self) -> f64 {
        self.open
    }

    /// Highest value.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Lowest value.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Closing value.
    #[must_use]
    pub const fn close(&self) -> f64 {
        self.close
    }

    fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }

    fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }
}

/// Candlesticks: a body rectangle from open to close plus high/low wicks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickSeries {
    base: SeriesBase,
    samples: Vec<(Key, Ohlc)>,
    xs: Vec<f64>,
    width: f64,
    shift: f64,
}

impl CandlestickSeries {
    /// Create an empty candlestick series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: SeriesBase::new(name),
            samples: Vec::new(),
            xs: Vec::new(),
            width: 0.8,
            shift: 0.0,
        }
    }

    /// Append a sample.
    ///
    /// # Errors
    ///
    /// `InvalidValue` when the low is negative and the series is bound
    /// with the non-negative constraint.
    pub fn push(&mut self, key: Key, sample: Ohlc) -> Result<(), ChartError> {
        self.base.check_value(sample.low)?;
        self.samples.push((key, sample));
        self.xs.push(f64::NAN);
        Ok(())
    }

    /// Delete samples with keys strictly between `min` and `max`.
    /// Returns the number removed.
    pub fn delete_range(&mut self, min: f64, max: f64) -> usize {
        let before = self.samples.len();
        let mut i = 0;
        while i < self.samples.len() {
            let key = match &self.samples[i].0 {
                Key::N(v) => Some(*v),
                Key::T(t) => Some(t.and_utc().timestamp() as f64),
                Key::C(_) => None,
            };
            if key.is_some_and(|k| k > min && k < max) {
                self.samples.remove(i);
                self.xs.remove(i);
            } else {
                i += 1;
            }
        }
        before - self.samples.len()
    }

    /// Delete samples whose key matches one of the categories.
    /// Returns the number removed.
    pub fn delete_categories(&mut self, categories: &[&str]) -> usize {
        let before = self.samples.len();
        let mut i = 0;
        while i < self.samples.len() {
            let matches =
                matches!(&self.samples[i].0, Key::C(c) if categories.contains(&c.as_str()));
            if matches {
                self.samples.remove(i);
                self.xs.remove(i);
            } else {
                i += 1;
            }
        }
        before - self.samples.len()
    }

    /// Stored samples.
    #[must_use]
    pub fn samples(&self) -> &[(Key, Ohlc)] {
        &self.samples
    }

    /// Whether the sample at `index` closed at or above its open.
    #[must_use]
    pub fn is_rising(&self, index: usize) -> bool {
        self.samples
            .get(index)
            .is_some_and(|(_, s)| s.close >= s.open)
    }
}

impl Series for CandlestickSeries {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn color(&self) -> Color {
        self.base.color
    }

    fn set_color(&mut self, color: Color) {
        self.base.color = color;
        self.base.custom_color = true;
    }

    fn has_custom_color(&self) -> bool {
        self.base.custom_color
    }

    fn assign_color(&mut self, color: Color) {
        if !self.base.custom_color {
            self.base.color = color;
        }
    }

    fn visible(&self) -> bool {
        self.base.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.base.visible = visible;
    }

    fn is_bound(&self) -> bool {
        self.base.bound
    }

    fn bind(&mut self, forbid_negative: bool) -> Result<(), ChartError> {
        if forbid_negative {
            for (_, s) in &self.samples {
                if s.low < 0.0 {
                    return Err(ChartError::InvalidValue(format!(
                        "series {:?} holds negative value {}",
                        self.base.name, s.low
                    )));
                }
            }
        }
        self.base.bind(forbid_negative)
    }

    fn release(&mut self) {
        self.base.release();
    }

    fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn native_extent_from(&self) -> NativeExtent {
        native_extent(self.samples.iter().map(|(k, _)| k))
    }

    fn series_categories(&self) -> Vec<String> {
        categories(self.samples.iter().map(|(k, _)| k))
    }

    fn convert_independent(&mut self, axis: &Axis) {
        self.xs = self
            .samples
            .iter()
            .map(|(k, _)| k.to_numerical(axis))
            .collect();
    }

    fn extent_from(&self) -> Option<(f64, f64)> {
        finite_min_max(self.xs.iter().copied())
    }

    fn extent_to(&self) -> Option<(f64, f64)> {
        finite_min_max(self.samples.iter().flat_map(|(_, s)| [s.low, s.high]))
    }

    fn nodes(&self, _viewport: &Viewport) -> Vec<Node> {
        Vec::new()
    }

    fn edges(&self, viewport: &Viewport) -> Vec<Edge> {
        // Wicks: body bottom down to the low, body top up to the high.
        let mut edges = Vec::new();
        for ((_, s), &x) in self.samples.iter().zip(&self.xs) {
            if !x.is_finite() {
                continue;
            }
            let cx = x + self.shift;
            for (y1, y2) in [(s.low, s.body_low()), (s.body_high(), s.high)] {
                if let Some(e) = clip_segment(cx, y1, cx, y2, viewport) {
                    edges.push(e);
                }
            }
        }
        edges
    }

    fn rects(&self, viewport: &Viewport) -> Vec<RectDesc> {
        let half = self.width / 2.0;
        self.samples
            .iter()
            .zip(&self.xs)
            .filter(|(_, x)| x.is_finite())
            .map(|((_, s), &x)| RectDesc {
                x_min: x + self.shift - half,
                x_max: x + self.shift + half,
                y_min: s.body_low(),
                y_max: s.body_high(),
            })
            .filter(|r| r.intersects(viewport))
            .collect()
    }

    fn is_bar_like(&self) -> bool {
        true
    }

    fn apply_bar_width(&mut self, width: f64, shift: f64) {
        self.width = width;
        self.shift = shift;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
