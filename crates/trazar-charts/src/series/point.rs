//! Point-based series: line, area, scatter, lollipop.
//!
//! One storage type covers the four chart types through render flags:
//! `connect` draws the polyline, `show_dot` the markers, `show_base_line`
//! the relationship to the dependent-axis origin (area fill or lollipop
//! drop lines), `sorted` whether geometry walks points in x order.

use serde::{Deserialize, Serialize};
use trazar_core::{ChartError, Color};

use super::{
    clip::clip_segment, finite_min_max, DataPoint, Edge, Key, NativeExtent, Node, RectDesc,
    Series, SeriesBase, Viewport,
};
use crate::axis::Axis;

/// A series of `(key, value)` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSeries {
    base: SeriesBase,
    points: Vec<DataPoint>,
    /// Unified numerical positions, parallel to `points`
    xs: Vec<f64>,
    /// Indices into `points` in drawing order; rebuilt on conversion
    order: Vec<usize>,
    connect: bool,
    show_dot: bool,
    show_base_line: bool,
    sorted: bool,
    base_line: f64,
    dot_size: f64,
    line_width: f64,
}

impl PointSeries {
    fn with_flags(
        name: impl Into<String>,
        connect: bool,
        show_dot: bool,
        show_base_line: bool,
        sorted: bool,
    ) -> Self {
        Self {
            base: SeriesBase::new(name),
            points: Vec::new(),
            xs: Vec::new(),
            order: Vec::new(),
            connect,
            show_dot,
            show_base_line,
            sorted,
            base_line: 0.0,
            dot_size: 3.0,
            line_width: 1.5,
        }
    }

    /// A connected line with point markers.
    #[must_use]
    pub fn line(name: impl Into<String>) -> Self {
        Self::with_flags(name, true, true, false, true)
    }

    /// A connected line with the region down to the base line filled.
    #[must_use]
    pub fn area(name: impl Into<String>) -> Self {
        Self::with_flags(name, true, false, true, true)
    }

    /// Unconnected point markers.
    #[must_use]
    pub fn scatter(name: impl Into<String>) -> Self {
        Self::with_flags(name, false, true, false, false)
    }

    /// Markers with drop lines to the base line.
    #[must_use]
    pub fn lollipop(name: impl Into<String>) -> Self {
        Self::with_flags(name, false, true, true, true)
    }

    /// Append a data point.
    ///
    /// # Errors
    ///
    /// `InvalidValue` when the value is negative and the series is bound
    /// to a polar chart or stacked container. Nothing is stored on error.
    pub fn push(&mut self, point: DataPoint) -> Result<(), ChartError> {
        self.base.check_value(point.val)?;
        self.points.push(point);
        self.xs.push(f64::NAN);
        Ok(())
    }

    /// Append several data points; all values are validated before any
    /// is stored.
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
        }
        Ok(())
    }

    /// Delete every point whose numerical/temporal key lies strictly
    /// between `min` and `max`. Returns the number removed.
    pub fn delete_range(&mut self, min: f64, max: f64) -> usize {
        let before = self.points.len();
        let mut keep = Vec::with_capacity(before);
        let mut kept_xs = Vec::with_capacity(before);
        for (p, &x) in self.points.iter().zip(&self.xs) {
            let key = match &p.key {
                Key::N(v) => Some(*v),
                Key::T(t) => Some(t.and_utc().timestamp() as f64),
                Key::C(_) => None,
            };
            let inside = key.is_some_and(|k| k > min && k < max);
            if !inside {
                keep.push(p.clone());
                kept_xs.push(x);
            }
        }
        self.points = keep;
        self.xs = kept_xs;
        self.rebuild_order();
        before - self.points.len()
    }

    /// Delete every point whose key matches one of the categories.
    /// Returns the number removed.
    pub fn delete_categories(&mut self, categories: &[&str]) -> usize {
        let before = self.points.len();
        let mut keep = Vec::with_capacity(before);
        let mut kept_xs = Vec::with_capacity(before);
        for (p, &x) in self.points.iter().zip(&self.xs) {
            let matches = matches!(&p.key, Key::C(c) if categories.contains(&c.as_str()));
            if !matches {
                keep.push(p.clone());
                kept_xs.push(x);
            }
        }
        self.points = keep;
        self.xs = kept_xs;
        self.rebuild_order();
        before - self.points.len()
    }

    /// Stored points.
    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Current base line position.
    #[must_use]
    pub const fn base_line(&self) -> f64 {
        self.base_line
    }

    /// Set the marker radius.
    ///
    /// # Errors
    ///
    /// `InvalidWidth` for a negative size.
    pub fn set_dot_size(&mut self, size: f64) -> Result<(), ChartError> {
        if size < 0.0 {
            return Err(ChartError::InvalidWidth(size));
        }
        self.dot_size = size;
        Ok(())
    }

    /// Set the line stroke width.
    ///
    /// # Errors
    ///
    /// `InvalidWidth` for a negative width.
    pub fn set_line_width(&mut self, width: f64) -> Result<(), ChartError> {
        if width < 0.0 {
            return Err(ChartError::InvalidWidth(width));
        }
        self.line_width = width;
        Ok(())
    }

    /// Marker radius.
    #[must_use]
    pub const fn dot_size(&self) -> f64 {
        self.dot_size
    }

    /// Line stroke width.
    #[must_use]
    pub const fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Rebuild the drawing order (x-sorted when the series is ordered).
    /// Valid until the next data mutation; conversion runs after every
    /// mutation, so geometry always sees a fresh order.
    fn rebuild_order(&mut self) {
        self.order = (0..self.points.len()).collect();
        if self.sorted {
            self.order.sort_by(|&a, &b| {
                self.xs[a]
                    .partial_cmp(&self.xs[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    /// Interpolated value at `x` between the bracketing pair of points,
    /// or `None` outside the data extent.
    fn value_at(&self, x: f64) -> Option<f64> {
        for pair in self.order.windows(2) {
            let (x1, x2) = (self.xs[pair[0]], self.xs[pair[1]]);
            if !x1.is_finite() || !x2.is_finite() {
                continue;
            }
            if x >= x1 && x < x2 {
                let t = if (x2 - x1).abs() < f64::EPSILON {
                    0.0
                } else {
                    (x - x1) / (x2 - x1)
                };
                let (v1, v2) = (self.points[pair[0]].val, self.points[pair[1]].val);
                return Some((v2 - v1).mul_add(t, v1));
            }
        }
        None
    }
}

impl Series for PointSeries {
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
        self.rebuild_order();
    }

    fn extent_from(&self) -> Option<(f64, f64)> {
        finite_min_max(self.xs.iter().copied())
    }

    fn extent_to(&self) -> Option<(f64, f64)> {
        if self.show_base_line {
            finite_min_max(
                self.points
                    .iter()
                    .flat_map(|p| [p.val.min(self.base_line), p.val.max(self.base_line)]),
            )
        } else {
            finite_min_max(self.points.iter().map(|p| p.val))
        }
    }

    fn nodes(&self, viewport: &Viewport) -> Vec<Node> {
        if !self.show_dot {
            return Vec::new();
        }
        self.points
            .iter()
            .zip(&self.xs)
            .filter(|(p, &x)| viewport.contains(x, p.val))
            .map(|(p, &x)| Node { x, y: p.val })
            .collect()
    }

    fn edges(&self, viewport: &Viewport) -> Vec<Edge> {
        let mut edges = Vec::new();
        if self.connect {
            for pair in self.order.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if let Some(e) = clip_segment(
                    self.xs[a],
                    self.points[a].val,
                    self.xs[b],
                    self.points[b].val,
                    viewport,
                ) {
                    edges.push(e);
                }
            }
        }
        if self.show_base_line && !self.connect {
            // Lollipop drop lines from the base line up to each value.
            for &i in &self.order {
                if let Some(e) = clip_segment(
                    self.xs[i],
                    self.base_line,
                    self.xs[i],
                    self.points[i].val,
                    viewport,
                ) {
                    edges.push(e);
                }
            }
        }
        edges
    }

    fn rects(&self, _viewport: &Viewport) -> Vec<RectDesc> {
        Vec::new()
    }

    fn set_base_line(&mut self, base: f64) {
        self.base_line = base;
    }

    fn marker_radius(&self) -> f32 {
        self.dot_size as f32
    }

    fn stroke_width(&self) -> f32 {
        self.line_width as f32
    }

    fn uses_raster_fill(&self) -> bool {
        self.connect && self.show_base_line
    }

    fn claims(&self, x: f64, y: f64) -> bool {
        if !self.uses_raster_fill() {
            return false;
        }
        self.value_at(x).is_some_and(|v| {
            let lo = v.min(self.base_line);
            let hi = v.max(self.base_line);
            y >= lo && y < hi
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Native extent over a key iterator, shared by the series types.
pub(crate) fn native_extent<'a>(keys: impl Iterator<Item = &'a Key>) -> NativeExtent {
    let mut numeric: Option<(f64, f64)> = None;
    let mut temporal: Option<(chrono::NaiveDateTime, chrono::NaiveDateTime)> = None;
    let mut categorical = false;
    for key in keys {
        match key {
            Key::N(v) => {
                numeric = Some(match numeric {
                    Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                    None => (*v, *v),
                });
            }
            Key::T(t) => {
                temporal = Some(match temporal {
                    Some((lo, hi)) => (lo.min(*t), hi.max(*t)),
                    None => (*t, *t),
                });
            }
            Key::C(_) => categorical = true,
        }
    }
    if let Some((lo, hi)) = numeric {
        NativeExtent::Numeric(lo, hi)
    } else if let Some((lo, hi)) = temporal {
        NativeExtent::Temporal(lo, hi)
    } else if categorical {
        NativeExtent::Categorical
    } else {
        NativeExtent::Empty
    }
}

/// Categories over a key iterator, first appearance order.
pub(crate) fn categories<'a>(keys: impl Iterator<Item = &'a Key>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for key in keys {
        if let Key::C(c) = key {
            if !out.contains(c) {
                out.push(c.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisDomain;

    fn numeric_axis() -> Axis {
        Axis::new(AxisDomain::Numerical)
    }

    fn vp() -> Viewport {
        Viewport::new(0.0, 10.0, 0.0, 10.0)
    }

    fn filled(points: &[(f64, f64)]) -> PointSeries {
        let mut s = PointSeries::line("s");
        for &(x, y) in points {
            s.push(DataPoint::new(Key::N(x), y)).unwrap();
        }
        s.convert_independent(&numeric_axis());
        s
    }

    // =========================================================================
    // Mutation and validation
    // =========================================================================

    #[test]
    fn test_negative_rejected_when_forbidden() {
        let mut s = PointSeries::line("radius");
        s.bind(true).unwrap();
        let err = s.push(DataPoint::new(Key::N(0.0), -2.0)).unwrap_err();
        assert!(matches!(err, ChartError::InvalidValue(_)));
        assert!(s.is_empty());
        s.push(DataPoint::new(Key::N(0.0), 2.0)).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_bind_scans_existing_data() {
        let mut s = PointSeries::line("radius");
        s.push(DataPoint::new(Key::N(0.0), -1.0)).unwrap();
        assert!(s.bind(true).is_err());
        assert!(!s.is_bound());
        assert!(s.bind(false).is_ok());
    }

    #[test]
    fn test_double_bind_rejected() {
        let mut s = PointSeries::line("s");
        s.bind(false).unwrap();
        assert!(matches!(s.bind(false), Err(ChartError::AlreadyBound(_))));
        s.release();
        assert!(s.bind(false).is_ok());
    }

    #[test]
    fn test_delete_range_strict_interior() {
        let mut s = filled(&[(-1000.0, -1000.0), (0.0, 0.0), (1000.0, 1000.0)]);
        let removed = s.delete_range(-1000.000_001, 0.0);
        assert_eq!(removed, 1);
        assert_eq!(s.len(), 2);
        // Endpoints are exclusive: 0 stays.
        assert!(s.points().iter().any(|p| p.key == Key::N(0.0)));
    }

    #[test]
    fn test_delete_categories() {
        let mut s = PointSeries::line("s");
        for c in ["a", "b", "c"] {
            s.push(DataPoint::new(Key::C(c.into()), 1.0)).unwrap();
        }
        assert_eq!(s.delete_categories(&["a", "c"]), 2);
        assert_eq!(s.series_categories(), vec!["b"]);
    }

    #[test]
    fn test_invalid_width() {
        let mut s = PointSeries::line("s");
        assert!(matches!(
            s.set_dot_size(-1.0),
            Err(ChartError::InvalidWidth(_))
        ));
        assert!(matches!(
            s.set_line_width(-0.5),
            Err(ChartError::InvalidWidth(_))
        ));
        assert!(s.set_line_width(2.0).is_ok());
    }

    // =========================================================================
    // Extents
    // =========================================================================

    #[test]
    fn test_extents_plain() {
        let s = filled(&[(1.0, -3.0), (2.0, 5.0)]);
        assert_eq!(s.extent_from(), Some((1.0, 2.0)));
        assert_eq!(s.extent_to(), Some((-3.0, 5.0)));
    }

    #[test]
    fn test_extent_to_includes_base_line() {
        let mut s = PointSeries::area("a");
        s.push(DataPoint::new(Key::N(0.0), 5.0)).unwrap();
        s.push(DataPoint::new(Key::N(1.0), 7.0)).unwrap();
        s.convert_independent(&numeric_axis());
        // Base line at 0 pulls the extent down to it.
        assert_eq!(s.extent_to(), Some((0.0, 7.0)));
    }

    #[test]
    fn test_empty_extent() {
        let s = PointSeries::line("s");
        assert_eq!(s.extent_from(), None);
        assert_eq!(s.extent_to(), None);
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn test_nodes_outside_omitted() {
        let s = filled(&[(5.0, 5.0), (20.0, 5.0), (5.0, -3.0)]);
        let nodes = s.nodes(&vp());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0], Node { x: 5.0, y: 5.0 });
    }

    #[test]
    fn test_edges_clipped_not_omitted() {
        let s = filled(&[(5.0, 5.0), (15.0, 5.0)]);
        let edges = s.edges(&vp());
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].x1, edges[0].y1), (5.0, 5.0));
        assert_eq!((edges[0].x2, edges[0].y2), (10.0, 5.0));
    }

    #[test]
    fn test_unsorted_scatter_has_no_edges() {
        let mut s = PointSeries::scatter("s");
        s.push(DataPoint::new(Key::N(1.0), 1.0)).unwrap();
        s.push(DataPoint::new(Key::N(2.0), 2.0)).unwrap();
        s.convert_independent(&numeric_axis());
        assert!(s.edges(&vp()).is_empty());
        assert_eq!(s.nodes(&vp()).len(), 2);
    }

    #[test]
    fn test_lollipop_drop_lines() {
        let mut s = PointSeries::lollipop("s");
        s.push(DataPoint::new(Key::N(3.0), 8.0)).unwrap();
        s.convert_independent(&numeric_axis());
        s.set_base_line(0.0);
        let edges = s.edges(&vp());
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].x1, edges[0].y1, edges[0].x2, edges[0].y2), (3.0, 0.0, 3.0, 8.0));
    }

    #[test]
    fn test_line_connects_in_x_order() {
        // Points pushed out of order still connect left to right.
        let s = filled(&[(8.0, 2.0), (2.0, 2.0), (5.0, 2.0)]);
        let edges = s.edges(&vp());
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].x1, 2.0);
        assert_eq!(edges[1].x2, 8.0);
    }

    // =========================================================================
    // Raster claims
    // =========================================================================

    #[test]
    fn test_area_claims_between_base_and_value() {
        let mut s = PointSeries::area("a");
        s.push(DataPoint::new(Key::N(0.0), 4.0)).unwrap();
        s.push(DataPoint::new(Key::N(10.0), 4.0)).unwrap();
        s.convert_independent(&numeric_axis());
        s.set_base_line(0.0);
        assert!(s.uses_raster_fill());
        assert!(s.claims(5.0, 2.0));
        assert!(s.claims(5.0, 0.0));
        // Half-open at the top boundary.
        assert!(!s.claims(5.0, 4.0));
        assert!(!s.claims(5.0, 5.0));
        assert!(!s.claims(-1.0, 2.0));
    }

    #[test]
    fn test_line_never_claims() {
        let s = filled(&[(0.0, 4.0), (10.0, 4.0)]);
        assert!(!s.uses_raster_fill());
        assert!(!s.claims(5.0, 2.0));
    }
}
