//! Engine error types

use thiserror::Error;

/// Result type for engine operations
pub type HrvResult<T> = Result<T, HrvError>;

/// Errors raised by the analysis pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HrvError {
    /// Too few intervals for successive differences
    #[error("insufficient data: need at least 2 intervals, got {len}")]
    InsufficientData { len: usize },

    /// Window power normalizer evaluated to zero
    #[error("degenerate window: window power is zero")]
    DegenerateWindow,

    /// NaN or infinite values reached a pipeline stage
    #[error("non-finite values in {stage}")]
    NonFinite { stage: &'static str },

    /// Rejected engine configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// FFT backend rejected the buffers
    #[error("transform failed: {0}")]
    Transform(String),
}
