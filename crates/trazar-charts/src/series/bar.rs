//! Bar series.

use serde::{Deserialize, Serialize};
use trazar_core::{ChartError, Color};

use super::point::{categories, native_extent};
use super::{
    finite_min_max, DataPoint, Edge, Key, NativeExtent, Node, RectDesc, Series, SeriesBase,
    Viewport,
};
use crate::axis::Axis;

/// Vertical bars from a base line to each value.
///
/// Bar width and per-series shift are layout variables owned by the
/// chart: with several bar-like series sharing an axis, each gets an
/// equal slice of the per-key slot, centered as a group on the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    base: SeriesBase,
    points: Vec<DataPoint>,
    xs: Vec<f64>,
    /// Per-point bar base, equal to `base_line` unless stacked
    bases: Vec<f64>,
    base_line: f64,
    width: f64,
    shift: f64,
    raster_fill: bool,
}

impl BarSeries {
    /// Create an empty bar series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: SeriesBase::new(name),
            points: Vec::new(),
            xs: Vec::new(),
            bases: Vec::new(),
            base_line: 0.0,
            width: 0.8,
            shift: 0.0,
            raster_fill: false,
        }
    }

    /// Append a data point.
    ///
    /// # Errors
    ///
    /// `InvalidValue` when the value is negative and the series is bound
    /// to a polar chart or stacked container.
    pub fn push(&mut self, point: DataPoint) -> Result<(), ChartError> {
        self.base.check_value(point.val)?;
        self.points.push(point);
        self.xs.push(f64::NAN);
        self.bases.push(self.base_line);
        Ok(())
    }

    /// Append several points; all are validated before any is stored.
    ///
    /// # Errors
    ///
    /// `InvalidValue` as for [`push`](Self::push).
    pub fn extend(&mut self, points: Vec<DataPoint>) -> Result<(), ChartError> {
        for p in &points {
            self.base.check_value(p.val)?;
        }
        for p in points {
            self.points.push(p);
            self.xs.push(f64::NAN);
            self.bases.push(self.base_line);
        }
        Ok(())
    }

    /// Delete points with keys strictly between `min` and `max`.
    /// Returns the number removed.
    pub fn delete_range(&mut self, min: f64, max: f64) -> usize {
        let before = self.points.len();
        let mut i = 0;
        while i < self.points.len() {
            let key = match &self.points[i].key {
                Key::N(v) => Some(*v),
                Key::T(t) => Some(t.and_utc().timestamp() as f64),
                Key::C(_) => None,
            };
            if key.is_some_and(|k| k > min && k < max) {
                self.points.remove(i);
                self.xs.remove(i);
                self.bases.remove(i);
            } else {
                i += 1;
            }
        }
        before - self.points.len()
    }

    /// Delete points keyed by one of the categories. Returns the number
    /// removed.
    pub fn delete_categories(&mut self, cats: &[&str]) -> usize {
        let before = self.points.len();
        let mut i = 0;
        while i < self.points.len() {
            let matches =
                matches!(&self.points[i].key, Key::C(c) if cats.contains(&c.as_str()));
            if matches {
                self.points.remove(i);
                self.xs.remove(i);
                self.bases.remove(i);
            } else {
                i += 1;
            }
        }
        before - self.points.len()
    }

    /// Stored points.
    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Current bar width in data units.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Resolve fills through the raster overlay instead of vector rects.
    pub fn set_raster_fill(&mut self, raster: bool) {
        self.raster_fill = raster;
    }

    /// Move the base of point `index` (stack offsets).
    pub(crate) fn set_point_base(&mut self, index: usize, base: f64) {
        if let Some(b) = self.bases.get_mut(index) {
            *b = base;
        }
    }

    pub(crate) fn point_base(&self, index: usize) -> f64 {
        self.bases.get(index).copied().unwrap_or(self.base_line)
    }

    fn bar_rect(&self, index: usize) -> Option<RectDesc> {
        let x = *self.xs.get(index)?;
        if !x.is_finite() {
            return None;
        }
        let base = self.bases[index];
        let top = base + self.points[index].val;
        let center = x + self.shift;
        let half = self.width / 2.0;
        Some(RectDesc {
            x_min: center - half,
            x_max: center + half,
            y_min: base.min(top),
            y_max: base.max(top),
        })
    }
}

impl Series for BarSeries {
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
            for p in &self.points {
                if p.val < 0.0 {
                    return Err(ChartError::InvalidValue(format!(
                        "series {:?} holds negative value {}",
                        self.base.name, p.val
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
        self.points.is_empty()
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn native_extent_from(&self) -> NativeExtent {
        native_extent(self.points.iter().map(|p| &p.key))
    }

    fn series_categories(&self) -> Vec<String> {
        categories(self.points.iter().map(|p| &p.key))
    }

    fn convert_independent(&mut self, axis: &Axis) {
        self.xs = self.points.iter().map(|p| p.key.to_numerical(axis)).collect();
    }

    fn extent_from(&self) -> Option<(f64, f64)> {
        finite_min_max(self.xs.iter().copied())
    }

    fn extent_to(&self) -> Option<(f64, f64)> {
        // Bars span from their base to their value; both ends count.
        finite_min_max(self.points.iter().enumerate().flat_map(|(i, p)| {
            let base = self.bases[i];
            let top = base + p.val;
            [base.min(top), base.max(top)]
        }))
    }

    fn nodes(&self, _viewport: &Viewport) -> Vec<Node> {
        Vec::new()
    }

    fn edges(&self, _viewport: &Viewport) -> Vec<Edge> {
        Vec::new()
    }

    fn rects(&self, viewport: &Viewport) -> Vec<RectDesc> {
        if self.raster_fill {
            return Vec::new();
        }
        (0..self.points.len())
            .filter_map(|i| self.bar_rect(i))
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

    fn is_stackable(&self) -> bool {
        true
    }

    fn set_base_line(&mut self, base: f64) {
        // Points without a stack offset follow the base line.
        for (b, old) in self.bases.iter_mut().zip(std::iter::repeat(self.base_line)) {
            if (*b - old).abs() < f64::EPSILON {
                *b = base;
            }
        }
        self.base_line = base;
    }

    fn uses_raster_fill(&self) -> bool {
        self.raster_fill
    }

    fn claims(&self, x: f64, y: f64) -> bool {
        if !self.raster_fill {
            return false;
        }
        (0..self.points.len()).any(|i| {
            self.bar_rect(i).is_some_and(|r| {
                x >= r.x_min && x < r.x_max && y >= r.y_min && y < r.y_max
            })
        })
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

    fn converted(points: &[(f64, f64)]) -> BarSeries {
        let mut s = BarSeries::new("bars");
        for &(x, y) in points {
            s.push(DataPoint::new(Key::N(x), y)).unwrap();
        }
        s.convert_independent(&Axis::new(AxisDomain::Numerical));
        s
    }

    #[test]
    fn test_extent_to_spans_base_to_value() {
        let s = converted(&[(0.0, 5.0), (1.0, -3.0)]);
        // Both bars reach down or up to the base at 0.
        assert_eq!(s.extent_to(), Some((-3.0, 5.0)));
    }

    #[test]
    fn test_rects_centered_with_width() {
        let mut s = converted(&[(4.0, 6.0)]);
        s.apply_bar_width(1.0, 0.0);
        let vp = Viewport::new(0.0, 10.0, 0.0, 10.0);
        let rects = s.rects(&vp);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].x_min, 3.5);
        assert_eq!(rects[0].x_max, 4.5);
        assert_eq!((rects[0].y_min, rects[0].y_max), (0.0, 6.0));
    }

    #[test]
    fn test_shift_moves_group_slot() {
        let mut s = converted(&[(4.0, 6.0)]);
        s.apply_bar_width(0.4, -0.2);
        let vp = Viewport::new(0.0, 10.0, 0.0, 10.0);
        let r = &s.rects(&vp)[0];
        assert!((r.x_min - 3.6).abs() < 1e-12);
        assert!((r.x_max - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_partially_visible_rect_kept() {
        let mut s = converted(&[(0.0, 20.0)]);
        s.apply_bar_width(1.0, 0.0);
        let vp = Viewport::new(0.0, 10.0, 0.0, 10.0);
        // The bar pokes out of the viewport top but still overlaps it.
        assert_eq!(s.rects(&vp).len(), 1);
    }

    #[test]
    fn test_fully_outside_rect_omitted() {
        let mut s = converted(&[(20.0, 5.0)]);
        s.apply_bar_width(1.0, 0.0);
        let vp = Viewport::new(0.0, 10.0, 0.0, 10.0);
        assert!(s.rects(&vp).is_empty());
    }

    #[test]
    fn test_negative_bar_rect_is_normalized() {
        let mut s = converted(&[(5.0, -4.0)]);
        s.apply_bar_width(1.0, 0.0);
        let vp = Viewport::new(0.0, 10.0, -10.0, 10.0);
        let r = &s.rects(&vp)[0];
        assert_eq!((r.y_min, r.y_max), (-4.0, 0.0));
    }

    #[test]
    fn test_base_line_moves_unstacked_points() {
        let mut s = converted(&[(0.0, 5.0)]);
        s.set_base_line(2.0);
        assert_eq!(s.extent_to(), Some((2.0, 7.0)));
    }

    #[test]
    fn test_stacked_point_base_survives_base_line_snap() {
        let mut s = converted(&[(0.0, 5.0), (1.0, 3.0)]);
        s.set_point_base(1, 7.0);
        s.set_base_line(0.0);
        assert_eq!(s.point_base(0), 0.0);
        assert_eq!(s.point_base(1), 7.0);
    }

    #[test]
    fn test_raster_claims_half_open() {
        let mut s = converted(&[(4.0, 6.0)]);
        s.apply_bar_width(1.0, 0.0);
        s.set_raster_fill(true);
        assert!(s.uses_raster_fill());
        assert!(s.claims(4.0, 3.0));
        assert!(s.claims(3.5, 0.0));
        assert!(!s.claims(4.5, 3.0));
        assert!(!s.claims(4.0, 6.0));
        // Rects are suppressed while the raster overlay owns the fill.
        assert!(s.rects(&Viewport::new(0.0, 10.0, 0.0, 10.0)).is_empty());
    }

    #[test]
    fn test_delete_range_strict_interior() {
        let mut s = converted(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(s.delete_range(1.0, 3.0), 1);
        assert_eq!(s.len(), 2);
    }
}
