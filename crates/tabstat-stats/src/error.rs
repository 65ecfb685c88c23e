//! Input validation errors.
//!
//! Every check runs before any statistic is computed, so a caller never pays
//! for resampling on input that was going to be rejected.

use thiserror::Error;

/// Input rejected by a statistics entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("sample is empty")]
    EmptySample,

    #[error("sample value at index {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },

    #[error("sample value at index {index} is missing")]
    MissingValue { index: usize },

    #[error("unsupported dtype for a numeric sample: {dtype}")]
    UnsupportedDtype { dtype: String },

    #[error("{statistic} needs at least {required} observations, got {actual}")]
    TooFewObservations {
        statistic: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("confidence level must be strictly between 0 and 1, got {level}")]
    InvalidConfidenceLevel { level: f64 },

    #[error("number of resamples must be at least 1, got {count}")]
    InvalidResampleCount { count: usize },
}

pub type Result<T> = std::result::Result<T, InvalidInputError>;
