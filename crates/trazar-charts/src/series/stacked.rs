//! Stacked bar container.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trazar_core::{ChartError, Color};

use super::{
    BarSeries, Edge, KeyId, NativeExtent, Node, RectDesc, Series, SeriesBase, Viewport,
};
use crate::autoscale;
use crate::axis::Axis;

/// Bars stacked on top of each other per key.
///
/// Children keep their own data and colors; the container owns the
/// per-key offsets and recomputes them from zero on every data change,
/// so repeated recomputation never drifts. Stacked values must be
/// non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedSeries {
    base: SeriesBase,
    children: Vec<BarSeries>,
    base_line: f64,
}

impl StackedSeries {
    /// Create an empty stack.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: SeriesBase::new(name),
            children: Vec::new(),
            base_line: 0.0,
        }
    }

    /// Add a child series to the top of the stack.
    ///
    /// # Errors
    ///
    /// `DuplicateSeriesName` when a child of that name exists,
    /// `AlreadyBound` when the child is attached elsewhere, and
    /// `InvalidValue` when it holds negative values.
    pub fn add(&mut self, mut child: BarSeries) -> Result<(), ChartError> {
        if self.children.iter().any(|c| c.name() == child.name()) {
            return Err(ChartError::DuplicateSeriesName(child.name().to_owned()));
        }
        child.bind(true)?;
        self.children.push(child);
        Ok(())
    }

    /// Remove and release a child by name.
    pub fn remove(&mut self, name: &str) -> Option<BarSeries> {
        let index = self.children.iter().position(|c| c.name() == name)?;
        let mut child = self.children.remove(index);
        child.release();
        Some(child)
    }

    /// Child series, bottom of the stack first.
    #[must_use]
    pub fn children(&self) -> &[BarSeries] {
        &self.children
    }

    /// Mutable access to a child by name. The chart recomputes offsets
    /// on the next data-change notification.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut BarSeries> {
        self.children.iter_mut().find(|c| c.name() == name)
    }

    pub(crate) fn children_mut(&mut self) -> &mut [BarSeries] {
        &mut self.children
    }

    /// Rebuild every per-point base from zero: for each key, each child
    /// starts where the previous child's value ended.
    pub(crate) fn update_offsets(&mut self) {
        let mut cumulative: HashMap<KeyId, f64> = HashMap::new();
        for child in &mut self.children {
            for i in 0..child.points().len() {
                let point = &child.points()[i];
                let id = point.key.id();
                let val = point.val;
                let base = cumulative.entry(id).or_insert(self.base_line);
                child.set_point_base(i, *base);
                *base += val;
            }
        }
    }
}

impl Series for StackedSeries {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn color(&self) -> Color {
        self.children
            .first()
            .map_or(self.base.color, super::Series::color)
    }

    fn set_color(&mut self, color: Color) {
        self.base.color = color;
        self.base.custom_color = true;
    }

    fn has_custom_color(&self) -> bool {
        self.base.custom_color
    }

    fn assign_color(&mut self, _color: Color) {
        // Children carry their own palette colors.
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
        // Children already enforce non-negativity from their own bind.
        let _ = forbid_negative;
        self.base.bind(true)
    }

    fn release(&mut self) {
        self.base.release();
    }

    fn is_empty(&self) -> bool {
        self.children.iter().all(super::Series::is_empty)
    }

    fn len(&self) -> usize {
        self.children.iter().map(super::Series::len).sum()
    }

    fn native_extent_from(&self) -> NativeExtent {
        // First non-empty child decides the domain; extents merge below.
        let mut acc = NativeExtent::Empty;
        for child in &self.children {
            match (acc, child.native_extent_from()) {
                (NativeExtent::Empty, e) => acc = e,
                (NativeExtent::Numeric(lo, hi), NativeExtent::Numeric(l, h)) => {
                    acc = NativeExtent::Numeric(lo.min(l), hi.max(h));
                }
                (NativeExtent::Temporal(lo, hi), NativeExtent::Temporal(l, h)) => {
                    acc = NativeExtent::Temporal(lo.min(l), hi.max(h));
                }
                _ => {}
            }
        }
        acc
    }

    fn series_categories(&self) -> Vec<String> {
        let sets: Vec<Vec<String>> = self
            .children
            .iter()
            .map(super::Series::series_categories)
            .collect();
        autoscale::aggregate_categories(sets.iter().map(Vec::as_slice))
    }

    fn convert_independent(&mut self, axis: &Axis) {
        for child in &mut self.children {
            child.convert_independent(axis);
        }
    }

    fn extent_from(&self) -> Option<(f64, f64)> {
        let extents: Vec<(f64, f64)> = self
            .children
            .iter()
            .filter_map(super::Series::extent_from)
            .collect();
        if extents.is_empty() {
            None
        } else {
            Some(extents.into_iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), (l, h)| (lo.min(l), hi.max(h)),
            ))
        }
    }

    fn extent_to(&self) -> Option<(f64, f64)> {
        let extents: Vec<(f64, f64)> = self
            .children
            .iter()
            .filter_map(super::Series::extent_to)
            .collect();
        if extents.is_empty() {
            None
        } else {
            Some(extents.into_iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), (l, h)| (lo.min(l), hi.max(h)),
            ))
        }
    }

    fn nodes(&self, _viewport: &Viewport) -> Vec<Node> {
        Vec::new()
    }

    fn edges(&self, _viewport: &Viewport) -> Vec<Edge> {
        Vec::new()
    }

    fn rects(&self, viewport: &Viewport) -> Vec<RectDesc> {
        self.children
            .iter()
            .filter(|c| c.visible())
            .flat_map(|c| c.rects(viewport))
            .collect()
    }

    fn is_bar_like(&self) -> bool {
        true
    }

    fn apply_bar_width(&mut self, width: f64, shift: f64) {
        // The stack occupies one slot; every child shares it.
        for child in &mut self.children {
            child.apply_bar_width(width, shift);
        }
    }

    fn set_base_line(&mut self, base: f64) {
        self.base_line = base;
    }

    fn stack_children(&self) -> Option<&[BarSeries]> {
        Some(&self.children)
    }

    fn claims(&self, x: f64, y: f64) -> bool {
        self.children.iter().any(|c| c.claims(x, y))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
