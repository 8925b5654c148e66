//! Error types for the Prism color clustering engine.

use thiserror::Error;

/// The main error type for Prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// A parameter or input list is not usable for building or training a map.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An input vector does not have the dimensionality of the prototypes.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The prototype dimension.
        expected: usize,
        /// The dimension that was supplied.
        actual: usize,
    },

    /// A raw color component is outside the accepted range.
    #[error("Value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// The offending component.
        value: i64,
        /// Lowest accepted value.
        min: i64,
        /// Highest accepted value.
        max: i64,
    },

    /// Malformed textual input (color lists on the command line or in files).
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding error.
    #[error("Image error: {0}")]
    Image(String),
}

/// Result type alias for Prism operations.
pub type Result<T> = std::result::Result<T, PrismError>;

impl From<image::ImageError> for PrismError {
    fn from(err: image::ImageError) -> Self {
        PrismError::Image(err.to_string())
    }
}
