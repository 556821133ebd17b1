//! The axis model: value range, origin, ticks, label, visibility.
//!
//! An axis owns one of three value domains. Temporal and categorical
//! values are mirrored onto a unified numerical coordinate through the
//! axis's converters, so the coordinate transform and tick generator only
//! ever see `f64` positions.
//!
//! Setting a range, origin, or tick set manually suspends the auto engine
//! for that aspect until the matching `reset_*` call re-enables it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use trazar_core::ChartError;

use crate::autoscale;

/// The value domain an axis operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisDomain {
    /// Plain `f64` values
    #[default]
    Numerical,
    /// Timestamps, mirrored to seconds relative to the axis origin
    Temporal,
    /// Ordered category labels, mirrored to their indices
    Categorical,
}

/// A renderable tick: a unified numerical position plus its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Position on the unified numerical coordinate
    pub position: f64,
    /// Label text
    pub label: String,
}

/// One chart axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    domain: AxisDomain,
    label: String,
    visible: bool,
    min: f64,
    max: f64,
    origin: f64,
    temporal_origin: Option<NaiveDateTime>,
    categories: Vec<String>,
    auto_range: bool,
    auto_origin: bool,
    auto_ticks: bool,
    ticks: Vec<Tick>,
}

impl Axis {
    /// Create an empty axis for the given domain.
    #[must_use]
    pub fn new(domain: AxisDomain) -> Self {
        Self {
            domain,
            label: String::new(),
            visible: true,
            min: -1.0,
            max: 1.0,
            origin: 0.0,
            temporal_origin: None,
            categories: Vec::new(),
            auto_range: true,
            auto_origin: true,
            auto_ticks: true,
            ticks: Vec::new(),
        }
    }

    /// The axis's value domain.
    #[must_use]
    pub const fn domain(&self) -> AxisDomain {
        self.domain
    }

    /// Current range on the unified numerical coordinate.
    #[must_use]
    pub const fn numeric_range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Current origin position.
    #[must_use]
    pub const fn origin(&self) -> f64 {
        self.origin
    }

    /// Current tick set.
    #[must_use]
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Category list of a categorical axis (empty otherwise).
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Axis label text.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the axis label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Whether the axis is drawn.
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.visible
    }

    /// Toggle axis visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Reference timestamp of a temporal axis.
    #[must_use]
    pub const fn temporal_origin(&self) -> Option<NaiveDateTime> {
        self.temporal_origin
    }

    // =========================================================================
    // Manual overrides
    // =========================================================================

    /// Pin the numerical range, suspending auto-range for this axis.
    ///
    /// # Errors
    ///
    /// `InvalidRange` when `min > max`; `OriginOutOfRange` when a
    /// manually pinned origin would fall outside the new range. No state
    /// changes on error.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<(), ChartError> {
        if min > max {
            return Err(ChartError::InvalidRange { min, max });
        }
        if !self.auto_origin && (self.origin < min || self.origin > max) {
            return Err(ChartError::OriginOutOfRange {
                origin: self.origin,
                min,
                max,
            });
        }
        self.min = min;
        self.max = max;
        self.auto_range = false;
        Ok(())
    }

    /// Pin the range of a temporal axis, suspending auto-range.
    ///
    /// The earlier timestamp becomes the temporal origin; the numerical
    /// mirror runs from 0 to the span in seconds.
    ///
    /// # Errors
    ///
    /// `InvalidRange` when `min` is after `max`.
    pub fn set_temporal_range(
        &mut self,
        min: NaiveDateTime,
        max: NaiveDateTime,
    ) -> Result<(), ChartError> {
        if min > max {
            return Err(ChartError::InvalidRange {
                min: min.and_utc().timestamp() as f64,
                max: max.and_utc().timestamp() as f64,
            });
        }
        self.temporal_origin = Some(min);
        let span = (max - min).num_seconds() as f64;
        self.set_range(0.0, span)
    }

    /// Pin the category list, suspending auto-range.
    ///
    /// Categories sit at integer positions; the numerical mirror extends
    /// half a slot past each end so every category owns a unit of width.
    pub fn set_category_range(&mut self, categories: Vec<String>) {
        self.apply_category_mirror(&categories);
        self.categories = categories;
        self.auto_range = false;
    }

    /// Pin the origin, suspending auto-origin.
    ///
    /// # Errors
    ///
    /// `OriginOutOfRange` when the range is pinned and the origin falls
    /// outside it.
    pub fn set_origin(&mut self, origin: f64) -> Result<(), ChartError> {
        if !self.auto_range && (origin < self.min || origin > self.max) {
            return Err(ChartError::OriginOutOfRange {
                origin,
                min: self.min,
                max: self.max,
            });
        }
        self.origin = origin;
        self.auto_origin = false;
        Ok(())
    }

    /// Supply ticks verbatim, suspending auto-ticks.
    ///
    /// Labels are formatted with the magnitude order derived from the
    /// current range span.
    pub fn set_ticks(&mut self, positions: &[f64]) {
        let order = autoscale::magnitude_order(self.max - self.min);
        self.ticks = positions
            .iter()
            .map(|&p| Tick {
                position: p,
                label: autoscale::format_value(p, order / 1000.0),
            })
            .collect();
        self.auto_ticks = false;
    }

    /// Re-enable auto-range.
    pub fn reset_range(&mut self) {
        self.auto_range = true;
    }

    /// Re-enable auto-origin.
    pub fn reset_origin(&mut self) {
        self.auto_origin = true;
    }

    /// Re-enable auto-ticks.
    pub fn reset_ticks(&mut self) {
        self.auto_ticks = true;
    }

    /// Whether auto-range is active.
    #[must_use]
    pub const fn is_auto_range(&self) -> bool {
        self.auto_range
    }

    /// Whether auto-origin is active.
    #[must_use]
    pub const fn is_auto_origin(&self) -> bool {
        self.auto_origin
    }

    /// Whether auto-ticks is active.
    #[must_use]
    pub const fn is_auto_ticks(&self) -> bool {
        self.auto_ticks
    }

    // =========================================================================
    // Domain converters
    // =========================================================================

    /// Position of a category on the unified numerical coordinate.
    #[must_use]
    pub fn categorical_to_numerical(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| i as f64)
    }

    /// Position of a timestamp on the unified numerical coordinate:
    /// seconds relative to the temporal origin.
    #[must_use]
    pub fn temporal_to_numerical(&self, t: NaiveDateTime) -> f64 {
        match self.temporal_origin {
            Some(origin) => (t - origin).num_seconds() as f64,
            None => t.and_utc().timestamp() as f64,
        }
    }

    // =========================================================================
    // Auto-engine entry points (no effect on pinned aspects)
    // =========================================================================

    pub(crate) fn apply_auto_range(&mut self, min: f64, max: f64) {
        if self.auto_range {
            self.min = min;
            self.max = max;
        }
    }

    pub(crate) fn apply_auto_temporal(&mut self, min: NaiveDateTime, max: NaiveDateTime) {
        if self.auto_range {
            self.temporal_origin = Some(min);
            self.min = 0.0;
            self.max = (max - min).num_seconds() as f64;
        }
    }

    pub(crate) fn apply_auto_categories(&mut self, categories: Vec<String>) {
        if self.auto_range {
            self.apply_category_mirror(&categories);
            self.categories = categories;
        }
    }

    pub(crate) fn apply_auto_origin(&mut self, origin: f64) {
        if self.auto_origin {
            self.origin = origin;
        }
    }

    pub(crate) fn apply_auto_ticks(&mut self, ticks: Vec<Tick>) {
        if self.auto_ticks {
            self.ticks = ticks;
        }
    }

    fn apply_category_mirror(&mut self, categories: &[String]) {
        if categories.is_empty() {
            self.min = -1.0;
            self.max = 1.0;
        } else {
            self.min = -0.5;
            self.max = categories.len() as f64 - 0.5;
        }
    }

    /// Regenerate auto ticks for the current range.
    pub(crate) fn regenerate_ticks(&mut self) {
        if !self.auto_ticks {
            return;
        }
        self.ticks = match self.domain {
            AxisDomain::Numerical => {
                let (step, positions) = autoscale::nice_ticks(self.min, self.max, 6);
                positions
                    .into_iter()
                    .map(|position| Tick {
                        position,
                        label: autoscale::format_value(position, step),
                    })
                    .collect()
            }
            AxisDomain::Temporal => {
                let origin = self.temporal_origin;
                let (_, positions) = autoscale::nice_ticks(self.min, self.max, 6);
                positions
                    .into_iter()
                    .map(|position| Tick {
                        position,
                        label: origin.map_or_else(
                            || format!("{position}"),
                            |o| {
                                (o + chrono::Duration::seconds(position as i64))
                                    .format("%m-%d %H:%M")
                                    .to_string()
                            },
                        ),
                    })
                    .collect()
            }
            AxisDomain::Categorical => self
                .categories
                .iter()
                .enumerate()
                .map(|(i, c)| Tick {
                    position: i as f64,
                    label: c.clone(),
                })
                .collect(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    // =========================================================================
    // Manual overrides and pinning
    // =========================================================================

    #[test]
    fn test_set_range_rejects_inverted() {
        let mut axis = Axis::new(AxisDomain::Numerical);
        let err = axis.set_range(5.0, 1.0).unwrap_err();
        assert!(matches!(err, ChartError::InvalidRange { .. }));
        // No partial mutation
        assert_eq!(axis.numeric_range(), (-1.0, 1.0));
        assert!(axis.is_auto_range());
    }

    #[test]
    fn test_set_range_suspends_auto() {
        let mut axis = Axis::new(AxisDomain::Numerical);
        axis.set_range(0.0, 10.0).unwrap();
        assert!(!axis.is_auto_range());
        axis.apply_auto_range(-100.0, 100.0);
        assert_eq!(axis.numeric_range(), (0.0, 10.0));
        axis.reset_range();
        axis.apply_auto_range(-100.0, 100.0);
        assert_eq!(axis.numeric_range(), (-100.0, 100.0));
    }

    #[test]
    fn test_pinned_origin_blocks_conflicting_range() {
        let mut axis = Axis::new(AxisDomain::Numerical);
        axis.set_range(0.0, 10.0).unwrap();
        axis.set_origin(5.0).unwrap();
        let err = axis.set_range(6.0, 10.0).unwrap_err();
        assert!(matches!(err, ChartError::OriginOutOfRange { .. }));
        assert_eq!(axis.numeric_range(), (0.0, 10.0));
    }

    #[test]
    fn test_origin_outside_pinned_range_rejected() {
        let mut axis = Axis::new(AxisDomain::Numerical);
        axis.set_range(0.0, 10.0).unwrap();
        assert!(axis.set_origin(20.0).is_err());
        assert!(axis.is_auto_origin());
        assert!(axis.set_origin(10.0).is_ok());
    }

    #[test]
    fn test_manual_ticks_verbatim() {
        let mut axis = Axis::new(AxisDomain::Numerical);
        axis.set_range(0.0, 100.0).unwrap();
        axis.set_ticks(&[0.0, 25.0, 50.0, 75.0]);
        assert!(!axis.is_auto_ticks());
        let positions: Vec<f64> = axis.ticks().iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0.0, 25.0, 50.0, 75.0]);
        axis.apply_auto_ticks(vec![]);
        assert_eq!(axis.ticks().len(), 4);
    }

    // =========================================================================
    // Converters
    // =========================================================================

    #[test]
    fn test_categorical_converter() {
        let mut axis = Axis::new(AxisDomain::Categorical);
        axis.apply_auto_categories(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(axis.categorical_to_numerical("b"), Some(1.0));
        assert_eq!(axis.categorical_to_numerical("z"), None);
        assert_eq!(axis.numeric_range(), (-0.5, 2.5));
    }

    #[test]
    fn test_single_category_keeps_unit_span() {
        let mut axis = Axis::new(AxisDomain::Categorical);
        axis.apply_auto_categories(vec!["only".into()]);
        let (min, max) = axis.numeric_range();
        assert_eq!(max - min, 1.0);
    }

    #[test]
    fn test_temporal_converter() {
        let mut axis = Axis::new(AxisDomain::Temporal);
        axis.apply_auto_temporal(ts(0), ts(2));
        assert_eq!(axis.numeric_range(), (0.0, 7200.0));
        assert_eq!(axis.temporal_to_numerical(ts(1)), 3600.0);
    }

    #[test]
    fn test_temporal_range_rejects_reversed() {
        let mut axis = Axis::new(AxisDomain::Temporal);
        assert!(axis.set_temporal_range(ts(2), ts(0)).is_err());
    }

    // =========================================================================
    // Auto ticks
    // =========================================================================

    #[test]
    fn test_auto_ticks_cover_range() {
        let mut axis = Axis::new(AxisDomain::Numerical);
        axis.apply_auto_range(0.0, 10.0);
        axis.regenerate_ticks();
        assert!(axis.ticks().len() >= 3);
        for t in axis.ticks() {
            assert!(t.position >= 0.0 && t.position <= 10.0);
        }
    }

    #[test]
    fn test_categorical_ticks_use_labels() {
        let mut axis = Axis::new(AxisDomain::Categorical);
        axis.apply_auto_categories(vec!["mon".into(), "tue".into()]);
        axis.regenerate_ticks();
        assert_eq!(axis.ticks().len(), 2);
        assert_eq!(axis.ticks()[0].label, "mon");
        assert_eq!(axis.ticks()[1].position, 1.0);
    }
}
