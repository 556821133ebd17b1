//! Box-and-whisker series.

use serde::{Deserialize, Serialize};
use trazar_core::{ChartError, Color};

use super::point::{categories, native_extent};
use super::{
    finite_min_max, Edge, Key, NativeExtent, Node, RectDesc, Series, SeriesBase, Viewport,
};
use crate::axis::Axis;

/// A five-number summary plus outliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    whisker_low: f64,
    q1: f64,
    median: f64,
    q3: f64,
    whisker_high: f64,
    outliers: Vec<f64>,
}

impl BoxSummary {
    /// Create a validated summary.
    ///
    /// # Errors
    ///
    /// `InvalidValue` unless the five numbers are finite and ordered
    /// `whisker_low ≤ q1 ≤ median ≤ q3 ≤ whisker_high`.
    pub fn new(
        whisker_low: f64,
        q1: f64,
        median: f64,
        q3: f64,
        whisker_high: f64,
        outliers: Vec<f64>,
    ) -> Result<Self, ChartError> {
        let values = [whisker_low, q1, median, q3, whisker_high];
        let finite = values.iter().all(|v| v.is_finite());
        let ordered = values.windows(2).all(|w| w[0] <= w[1]);
        if !finite || !ordered {
            return Err(ChartError::InvalidValue(format!(
                "box summary not ordered: {values:?}"
            )));
        }
        Ok(Self {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
            outliers,
        })
    }

    /// Lower whisker.
    #[must_use]
    pub const fn whisker_low(&self) -> f64 {
        self.whisker_low
    }

    /// Upper whisker.
    #[must_use]
    pub const fn whisker_high(&self) -> f64 {
        self.whisker_high
    }

    /// Median.
    #[must_use]
    pub const fn median(&self) -> f64 {
        self.median
    }

    /// Outlier values.
    #[must_use]
    pub fn outliers(&self) -> &[f64] {
        &self.outliers
    }
}

/// Box plots keyed along the independent axis.
///
/// A box is all-or-nothing: it renders only when the whole figure
/// (whiskers included) fits inside the viewport. Outliers are point
/// markers clipped individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSeries {
    base: SeriesBase,
    boxes: Vec<(Key, BoxSummary)>,
    xs: Vec<f64>,
    width: f64,
}

impl BoxSeries {
    /// Create an empty box series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: SeriesBase::new(name),
            boxes: Vec::new(),
            xs: Vec::new(),
            width: 0.5,
        }
    }

    /// Append a box.
    ///
    /// # Errors
    ///
    /// `InvalidValue` when any value is negative and the series is bound
    /// with the non-negative constraint.
    pub fn push(&mut self, key: Key, summary: BoxSummary) -> Result<(), ChartError> {
        self.base.check_value(summary.whisker_low)?;
        for &o in &summary.outliers {
            self.base.check_value(o)?;
        }
        self.boxes.push((key, summary));
        self.xs.push(f64::NAN);
        Ok(())
    }

    /// Delete boxes with keys strictly between `min` and `max`.
    /// Returns the number removed.
    pub fn delete_range(&mut self, min: f64, max: f64) -> usize {
        let before = self.boxes.len();
        let mut i = 0;
        while i < self.boxes.len() {
            let key = match &self.boxes[i].0 {
                Key::N(v) => Some(*v),
                Key::T(t) => Some(t.and_utc().timestamp() as f64),
                Key::C(_) => None,
            };
            if key.is_some_and(|k| k > min && k < max) {
                self.boxes.remove(i);
                self.xs.remove(i);
            } else {
                i += 1;
            }
        }
        before - self.boxes.len()
    }

    /// Delete boxes whose key matches one of the categories.
    /// Returns the number removed.
    pub fn delete_categories(&mut self, categories: &[&str]) -> usize {
        let before = self.boxes.len();
        let mut i = 0;
        while i < self.boxes.len() {
            let matches =
                matches!(&self.boxes[i].0, Key::C(c) if categories.contains(&c.as_str()));
            if matches {
                self.boxes.remove(i);
                self.xs.remove(i);
            } else {
                i += 1;
            }
        }
        before - self.boxes.len()
    }

    /// Stored boxes.
    #[must_use]
    pub fn boxes(&self) -> &[(Key, BoxSummary)] {
        &self.boxes
    }

    /// Current box width in data units.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    fn min_value(&self, summary: &BoxSummary) -> f64 {
        summary
            .outliers
            .iter()
            .fold(summary.whisker_low, |acc, &o| acc.min(o))
    }

    fn box_fits(&self, x: f64, summary: &BoxSummary, vp: &Viewport) -> bool {
        let half = self.width / 2.0;
        x - half >= vp.x_min
            && x + half <= vp.x_max
            && summary.whisker_low >= vp.y_min
            && summary.whisker_high <= vp.y_max
    }
}

impl Series for BoxSeries {
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
            for (_, s) in &self.boxes {
                let min = self.min_value(s);
                if min < 0.0 {
                    return Err(ChartError::InvalidValue(format!(
                        "series {:?} holds negative value {min}",
                        self.base.name
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
        self.boxes.is_empty()
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn native_extent_from(&self) -> NativeExtent {
        native_extent(self.boxes.iter().map(|(k, _)| k))
    }

    fn series_categories(&self) -> Vec<String> {
        categories(self.boxes.iter().map(|(k, _)| k))
    }

    fn convert_independent(&mut self, axis: &Axis) {
        self.xs = self
            .boxes
            .iter()
            .map(|(k, _)| k.to_numerical(axis))
            .collect();
    }

    fn extent_from(&self) -> Option<(f64, f64)> {
        finite_min_max(self.xs.iter().copied())
    }

    fn extent_to(&self) -> Option<(f64, f64)> {
        // Whiskers and outliers both count toward the extent.
        finite_min_max(self.boxes.iter().flat_map(|(_, s)| {
            let mut values = vec![s.whisker_low, s.whisker_high];
            values.extend_from_slice(&s.outliers);
            values
        }))
    }

    fn nodes(&self, viewport: &Viewport) -> Vec<Node> {
        let mut nodes = Vec::new();
        for ((_, s), &x) in self.boxes.iter().zip(&self.xs) {
            for &o in &s.outliers {
                if viewport.contains(x, o) {
                    nodes.push(Node { x, y: o });
                }
            }
        }
        nodes
    }

    fn edges(&self, viewport: &Viewport) -> Vec<Edge> {
        let half = self.width / 2.0;
        let mut edges = Vec::new();
        for ((_, s), &x) in self.boxes.iter().zip(&self.xs) {
            if !x.is_finite() || !self.box_fits(x, s, viewport) {
                continue;
            }
            let vertical = |y1: f64, y2: f64| Edge { x1: x, y1, x2: x, y2 };
            let horizontal = |y: f64| Edge {
                x1: x - half,
                y1: y,
                x2: x + half,
                y2: y,
            };
            // Two stems, two caps, and the median line.
            edges.push(vertical(s.whisker_low, s.q1));
            edges.push(vertical(s.q3, s.whisker_high));
            edges.push(horizontal(s.whisker_low));
            edges.push(horizontal(s.whisker_high));
            edges.push(horizontal(s.median));
        }
        edges
    }

    fn rects(&self, viewport: &Viewport) -> Vec<RectDesc> {
        let half = self.width / 2.0;
        self.boxes
            .iter()
            .zip(&self.xs)
            .filter(|((_, s), &x)| x.is_finite() && self.box_fits(x, s, viewport))
            .map(|((_, s), &x)| RectDesc {
                x_min: x - half,
                x_max: x + half,
                y_min: s.q1,
                y_max: s.q3,
            })
            .collect()
    }

    fn is_box(&self) -> bool {
        true
    }

    fn apply_box_width(&mut self, width: f64) {
        self.width = width;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisDomain;

    fn summary() -> BoxSummary {
        BoxSummary::new(-1.0, -0.5, 0.0, 0.5, 1.0, vec![-2.0, 2.0]).unwrap()
    }

    fn converted(x: f64, s: BoxSummary) -> BoxSeries {
        let mut series = BoxSeries::new("spread");
        series.push(Key::N(x), s).unwrap();
        series.convert_independent(&Axis::new(AxisDomain::Numerical));
        series
    }

    #[test]
    fn test_summary_validation() {
        assert!(BoxSummary::new(0.0, 1.0, 2.0, 3.0, 4.0, vec![]).is_ok());
        // Median below q1.
        assert!(matches!(
            BoxSummary::new(0.0, 2.0, 1.0, 3.0, 4.0, vec![]),
            Err(ChartError::InvalidValue(_))
        ));
        assert!(BoxSummary::new(0.0, 1.0, f64::NAN, 3.0, 4.0, vec![]).is_err());
    }

    #[test]
    fn test_box_fully_visible_yields_five_edges() {
        let mut s = converted(0.0, summary());
        s.apply_box_width(0.5);
        let vp = Viewport::new(-1.0, 1.0, -1.0, 1.0);

        let edges = s.edges(&vp);
        assert_eq!(edges.len(), 5);
        let rects = s.rects(&vp);
        assert_eq!(rects.len(), 1);
        assert_eq!((rects[0].y_min, rects[0].y_max), (-0.5, 0.5));
        // Outliers at plus/minus 2 lie outside the viewport.
        assert!(s.nodes(&vp).is_empty());
    }

    #[test]
    fn test_partially_visible_box_is_omitted_entirely() {
        let mut s = converted(0.0, summary());
        s.apply_box_width(0.5);
        // Viewport cuts off the lower whisker.
        let vp = Viewport::new(-1.0, 1.0, -0.5, 2.0);
        assert!(s.edges(&vp).is_empty());
        assert!(s.rects(&vp).is_empty());
        // The upper outlier is now visible.
        assert_eq!(s.nodes(&vp).len(), 1);
    }

    #[test]
    fn test_box_clipped_horizontally_is_omitted() {
        let mut s = converted(0.9, summary());
        s.apply_box_width(0.5);
        let vp = Viewport::new(-1.0, 1.0, -3.0, 3.0);
        assert!(s.edges(&vp).is_empty());
    }

    #[test]
    fn test_extent_includes_outliers() {
        let s = converted(0.0, summary());
        assert_eq!(s.extent_to(), Some((-2.0, 2.0)));
    }

    #[test]
    fn test_delete_range_strict_interior() {
        let mut s = BoxSeries::new("spread");
        for x in [0.0, 1.0, 2.0] {
            s.push(Key::N(x), summary()).unwrap();
        }
        // Bounds are exclusive: the boxes at 0 and 2 stay.
        assert_eq!(s.delete_range(0.0, 2.0), 1);
        assert_eq!(s.boxes().len(), 2);
        assert_eq!(s.delete_range(0.0, 2.0), 0);
    }

    #[test]
    fn test_delete_categories() {
        let mut s = BoxSeries::new("spread");
        for cat in ["a", "b", "c"] {
            s.push(Key::C(cat.into()), summary()).unwrap();
        }
        assert_eq!(s.delete_categories(&["a", "c"]), 2);
        assert_eq!(s.boxes().len(), 1);
        assert!(matches!(&s.boxes()[0].0, Key::C(c) if c == "b"));
    }

    #[test]
    fn test_bind_rejects_negative_outlier() {
        let mut s = BoxSeries::new("spread");
        s.push(
            Key::N(0.0),
            BoxSummary::new(0.0, 1.0, 2.0, 3.0, 4.0, vec![-1.0]).unwrap(),
        )
        .unwrap();
        assert!(s.bind(true).is_err());
    }
}
