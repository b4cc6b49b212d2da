//! Error types for pixel buffer access and filter parameters.

use thiserror::Error;

/// Error type for buffer construction, access and transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Coordinate outside the buffer extent.
    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Sample count does not match the declared dimensions.
    #[error("shape mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Reject NaN and infinities in a user supplied parameter.
pub(crate) fn ensure_finite(name: &str, value: f64) -> FilterResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FilterError::InvalidParameter(format!(
            "{name} must be finite, got {value}"
        )))
    }
}
