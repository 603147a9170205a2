//! Shared error type across sterno crates.

use thiserror::Error;

/// Stable error codes (used in logs and asserted by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Declared metric type is not supported.
    UnsupportedType,
    /// Random bounds are empty or inverted.
    InvalidRange,
    /// Two declarations resolve to the same identity.
    DuplicateMetric,
    /// Name component is empty or not a legal metric name.
    InvalidName,
    /// OS entropy source failed.
    EntropyUnavailable,
    /// Configuration could not be read, parsed or validated.
    BadConfig,
    /// Internal failure.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnsupportedType => "UNSUPPORTED_TYPE",
            ErrorCode::InvalidRange => "INVALID_RANGE",
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::InvalidName => "INVALID_NAME",
            ErrorCode::EntropyUnavailable => "ENTROPY_UNAVAILABLE",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SternoError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum SternoError {
    #[error("type {0:?} is not supported")]
    UnsupportedType(String),
    #[error("invalid random range: max ({max}) must be greater than min ({min})")]
    InvalidRange { min: u64, max: u64 },
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
    #[error("invalid metric name: {0}")]
    InvalidName(String),
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SternoError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SternoError::UnsupportedType(_) => ErrorCode::UnsupportedType,
            SternoError::InvalidRange { .. } => ErrorCode::InvalidRange,
            SternoError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            SternoError::InvalidName(_) => ErrorCode::InvalidName,
            SternoError::EntropyUnavailable(_) => ErrorCode::EntropyUnavailable,
            SternoError::BadConfig(_) => ErrorCode::BadConfig,
            SternoError::Internal(_) => ErrorCode::Internal,
        }
    }
}
