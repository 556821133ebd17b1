//! The chart orchestrator.
//!
//! A `Chart` owns two axes, the attached series, and the style, and runs
//! the auto engine after every mutation: independent-axis aggregation,
//! domain conversion, stack offsets, base-line snapping, dependent-axis
//! aggregation, origin resolution, tick regeneration, and per-type
//! layout variables (bar and box widths). The pipeline is a fixed point:
//! running it again without a data change leaves every output unchanged.

use trazar_core::{ChartError, ChartTheme};

use crate::autoscale;
use crate::axis::{Axis, AxisDomain};
use crate::legend::{self, LegendEntry};
use crate::series::{NativeExtent, Series, StackedSeries, Viewport};

/// Fraction of a key slot occupied by the bar group.
const BAR_SLOT_FILL: f64 = 0.8;

/// The coordinate plane a chart draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plane {
    /// Orthogonal x/y axes
    #[default]
    Cartesian,
    /// Angle/radius axes around a center
    Polar,
}

/// An interactive two-dimensional chart.
pub struct Chart {
    plane: Plane,
    from_axis: Axis,
    to_axis: Axis,
    series: Vec<Box<dyn Series>>,
    title: String,
    theme: ChartTheme,
    transpose: bool,
    rotation: f64,
    clockwise: bool,
}

impl Chart {
    /// Create an empty chart.
    ///
    /// The independent (from) axis takes the given domain; the dependent
    /// (to) axis is always numerical.
    #[must_use]
    pub fn new(plane: Plane, from_domain: AxisDomain, theme: ChartTheme) -> Self {
        let mut chart = Self {
            plane,
            from_axis: Axis::new(from_domain),
            to_axis: Axis::new(AxisDomain::Numerical),
            series: Vec::new(),
            title: String::new(),
            theme,
            transpose: false,
            rotation: 0.0,
            clockwise: false,
        };
        chart.recompute();
        chart
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The coordinate plane.
    #[must_use]
    pub const fn plane(&self) -> Plane {
        self.plane
    }

    /// The independent axis.
    #[must_use]
    pub const fn from_axis(&self) -> &Axis {
        &self.from_axis
    }

    /// The dependent axis.
    #[must_use]
    pub const fn to_axis(&self) -> &Axis {
        &self.to_axis
    }

    /// Chart title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the chart title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Current theme.
    #[must_use]
    pub const fn theme(&self) -> &ChartTheme {
        &self.theme
    }

    /// Whether a cartesian chart swaps the axes' screen directions.
    #[must_use]
    pub const fn transpose(&self) -> bool {
        self.transpose
    }

    /// Swap the screen directions of a cartesian chart's axes.
    pub fn set_transpose(&mut self, transpose: bool) {
        self.transpose = transpose;
    }

    /// Angular offset of a polar chart, radians.
    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotate a polar chart's zero angle.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    /// Whether a polar chart's angles grow clockwise.
    #[must_use]
    pub const fn clockwise(&self) -> bool {
        self.clockwise
    }

    /// Flip a polar chart's angular direction.
    pub fn set_clockwise(&mut self, clockwise: bool) {
        self.clockwise = clockwise;
    }

    /// Attached series in registration order.
    #[must_use]
    pub fn series(&self) -> &[Box<dyn Series>] {
        &self.series
    }

    /// Look up a series by name.
    #[must_use]
    pub fn series_by_name(&self, name: &str) -> Option<&dyn Series> {
        self.series
            .iter()
            .find(|s| s.name() == name)
            .map(AsRef::as_ref)
    }

    /// The visible data-space window, for geometry queries.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        let (x_min, x_max) = self.from_axis.numeric_range();
        let (y_min, y_max) = self.to_axis.numeric_range();
        Viewport::new(x_min, x_max, y_min, y_max)
    }

    /// Legend rows for the current series set.
    #[must_use]
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        legend::build_entries(&self.series)
    }

    // =========================================================================
    // Series management
    // =========================================================================

    /// Attach a series and rerun the auto engine.
    ///
    /// Polar charts bind with the non-negative constraint, so a series
    /// holding negative values is rejected up front.
    ///
    /// # Errors
    ///
    /// `DuplicateSeriesName`, `AlreadyBound`, or `InvalidValue` from the
    /// bind. The chart is unchanged on error.
    pub fn add_series(&mut self, mut series: Box<dyn Series>) -> Result<(), ChartError> {
        if self.series.iter().any(|s| s.name() == series.name()) {
            return Err(ChartError::DuplicateSeriesName(series.name().to_owned()));
        }
        self.check_domain(series.as_ref())?;
        series.bind(matches!(self.plane, Plane::Polar))?;
        self.series.push(series);
        self.assign_palette();
        self.recompute();
        Ok(())
    }

    fn check_domain(&self, series: &dyn Series) -> Result<(), ChartError> {
        let ok = match series.native_extent_from() {
            NativeExtent::Empty => true,
            NativeExtent::Numeric(..) => self.from_axis.domain() == AxisDomain::Numerical,
            NativeExtent::Temporal(..) => self.from_axis.domain() == AxisDomain::Temporal,
            NativeExtent::Categorical => self.from_axis.domain() == AxisDomain::Categorical,
        };
        if ok {
            Ok(())
        } else {
            Err(ChartError::InvalidValue(format!(
                "series '{}' keys do not match the {:?} axis",
                series.name(),
                self.from_axis.domain()
            )))
        }
    }

    /// Detach and release a series by name.
    pub fn remove_series(&mut self, name: &str) -> Option<Box<dyn Series>> {
        let index = self.series.iter().position(|s| s.name() == name)?;
        let mut series = self.series.remove(index);
        series.release();
        self.recompute();
        Some(series)
    }

    /// Mutate a series in place with typed access, then rerun the auto
    /// engine. Returns `None` when no series of that name and type is
    /// attached.
    pub fn update_series<T, R>(&mut self, name: &str, f: impl FnOnce(&mut T) -> R) -> Option<R>
    where
        T: Series + 'static,
    {
        let series = self.series.iter_mut().find(|s| s.name() == name)?;
        let typed = series.as_any_mut().downcast_mut::<T>()?;
        let result = f(typed);
        self.recompute();
        Some(result)
    }

    /// Toggle a series's visibility by name.
    pub fn set_series_visible(&mut self, name: &str, visible: bool) {
        if let Some(series) = self.series.iter_mut().find(|s| s.name() == name) {
            series.set_visible(visible);
            self.recompute();
        }
    }

    // =========================================================================
    // Axis editing
    // =========================================================================

    /// Edit the independent axis, then rerun the auto engine.
    pub fn edit_from_axis<R>(&mut self, f: impl FnOnce(&mut Axis) -> R) -> R {
        let result = f(&mut self.from_axis);
        self.recompute();
        result
    }

    /// Edit the dependent axis, then rerun the auto engine.
    pub fn edit_to_axis<R>(&mut self, f: impl FnOnce(&mut Axis) -> R) -> R {
        let result = f(&mut self.to_axis);
        self.recompute();
        result
    }

    // =========================================================================
    // Style
    // =========================================================================

    /// Swap the theme and restyle series that kept their palette colors.
    pub fn refresh_style(&mut self, theme: ChartTheme) {
        self.theme = theme;
        self.assign_palette();
    }

    fn assign_palette(&mut self) {
        let theme = &self.theme;
        let mut slot = 0;
        for series in &mut self.series {
            if let Some(stack) = series.as_any_mut().downcast_mut::<StackedSeries>() {
                for child in stack.children_mut() {
                    child.assign_color(theme.series_color(slot));
                    slot += 1;
                }
            } else {
                series.assign_color(theme.series_color(slot));
                slot += 1;
            }
        }
    }

    // =========================================================================
    // Auto engine
    // =========================================================================

    /// Rerun the full derivation pipeline.
    ///
    /// Pinned axis aspects are left alone; everything on auto is
    /// rederived from the attached data. Safe to call repeatedly.
    pub fn recompute(&mut self) {
        self.recompute_from_axis();
        for series in &mut self.series {
            series.convert_independent(&self.from_axis);
        }
        // The dependent range depends on base lines, which depend on the
        // origin, which depends on the range. Two rounds reach the fixed
        // point: the first settles the range, the second re-snaps bases
        // against the final origin.
        for _ in 0..2 {
            self.snap_bases();
            self.recompute_to_range();
            let (min, max) = self.to_axis.numeric_range();
            self.to_axis
                .apply_auto_origin(autoscale::auto_origin(min, max));
        }
        self.from_axis.regenerate_ticks();
        self.to_axis.regenerate_ticks();
        self.apply_bar_layout();
        self.apply_box_layout();
    }

    fn recompute_from_axis(&mut self) {
        match self.from_axis.domain() {
            AxisDomain::Numerical => {
                let extents: Vec<(f64, f64)> = self
                    .series
                    .iter()
                    .filter_map(|s| match s.native_extent_from() {
                        NativeExtent::Numeric(lo, hi) => Some((lo, hi)),
                        _ => None,
                    })
                    .collect();
                let (min, max) = autoscale::aggregate_range(extents, None);
                self.from_axis.apply_auto_range(min, max);
            }
            AxisDomain::Temporal => {
                let mut acc: Option<(chrono::NaiveDateTime, chrono::NaiveDateTime)> = None;
                for series in &self.series {
                    if let NativeExtent::Temporal(lo, hi) = series.native_extent_from() {
                        acc = Some(match acc {
                            Some((min, max)) => (min.min(lo), max.max(hi)),
                            None => (lo, hi),
                        });
                    }
                }
                if let Some((min, max)) = acc {
                    self.from_axis.apply_auto_temporal(min, max);
                }
            }
            AxisDomain::Categorical => {
                let sets: Vec<Vec<String>> = self
                    .series
                    .iter()
                    .map(|s| s.series_categories())
                    .collect();
                let merged = autoscale::aggregate_categories(sets.iter().map(Vec::as_slice));
                self.from_axis.apply_auto_categories(merged);
            }
        }

        let (min, max) = self.from_axis.numeric_range();
        self.from_axis
            .apply_auto_origin(autoscale::auto_origin(min, max));
    }

    fn snap_bases(&mut self) {
        let origin = self.to_axis.origin();
        for series in &mut self.series {
            series.set_base_line(origin);
            if let Some(stack) = series.as_any_mut().downcast_mut::<StackedSeries>() {
                stack.update_offsets();
            }
        }
    }

    fn recompute_to_range(&mut self) {
        let extents: Vec<(f64, f64)> = self
            .series
            .iter()
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.extent_to())
            .collect();
        let (min, max) = if extents.is_empty() {
            let pinned = (!self.to_axis.is_auto_origin()).then(|| self.to_axis.origin());
            autoscale::aggregate_range(Vec::new(), pinned)
        } else {
            let union = extents
                .into_iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (l, h)| {
                    (lo.min(l), hi.max(h))
                });
            // A polar radius never reaches below zero.
            let lo = if matches!(self.plane, Plane::Polar) {
                union.0.max(0.0)
            } else {
                union.0
            };
            autoscale::widen_degenerate(lo, union.1)
        };
        self.to_axis.apply_auto_range(min, max);
    }

    fn apply_bar_layout(&mut self) {
        let bar_like: Vec<usize> = self
            .series
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_bar_like() && s.visible())
            .map(|(i, _)| i)
            .collect();
        let n = bar_like.len();
        if n == 0 {
            return;
        }
        let width = BAR_SLOT_FILL / n as f64;
        for (group, &index) in bar_like.iter().enumerate() {
            let shift = (group as f64 - (n as f64 - 1.0) / 2.0) * width;
            self.series[index].apply_bar_width(width, shift);
        }
    }

    fn apply_box_layout(&mut self) {
        let max_count = self
            .series
            .iter()
            .filter(|s| s.is_box())
            .map(|s| s.len())
            .max()
            .unwrap_or(0);
        if max_count == 0 {
            return;
        }
        let (min, max) = self.from_axis.numeric_range();
        let width = ((max - min) / max_count as f64) * 0.5;
        for series in &mut self.series {
            if series.is_box() {
                series.apply_box_width(width);
            }
        }
    }
}
