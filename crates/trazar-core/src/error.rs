//! Error taxonomy for chart mutations.
//!
//! Every mutating entry point validates fully before committing any
//! state, so a returned error implies the chart is unchanged.

use thiserror::Error;

/// Errors returned by chart, axis, and series mutators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// `min > max` supplied to a range setter.
    #[error("invalid range: min {min} exceeds max {max}")]
    InvalidRange {
        /// Requested minimum
        min: f64,
        /// Requested maximum
        max: f64,
    },

    /// A pinned origin would fall outside a newly requested range.
    #[error("origin {origin} lies outside range [{min}, {max}]")]
    OriginOutOfRange {
        /// Pinned origin
        origin: f64,
        /// Range minimum
        min: f64,
        /// Range maximum
        max: f64,
    },

    /// A series with this name already exists in the chart or stack.
    #[error("duplicate series name: {0:?}")]
    DuplicateSeriesName(String),

    /// The series is already attached to another chart or stack.
    #[error("series {0:?} is already bound")]
    AlreadyBound(String),

    /// A value violates a domain constraint (negative polar radius,
    /// negative stacked height, or a malformed box summary).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Negative bar/line width or dot size.
    #[error("invalid width: {0}")]
    InvalidWidth(f64),
}
