//! Error types for filmic operations.
//!
//! Only structural problems surface here. Black pixels, zero norms and
//! degenerate dynamic ranges are clamped by the kernels and never reach the
//! caller as errors.

use thiserror::Error;

/// Error type for filmic operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Input does not carry RGB plus alpha.
    #[error("invalid channel count: expected {expected}, got {got}")]
    InvalidChannels {
        /// Required channel count.
        expected: usize,
        /// Channel count supplied by the caller.
        got: usize,
    },

    /// Buffers or region descriptor have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// The host raised the cancellation flag between stages.
    #[error("render cancelled")]
    Cancelled,

    /// Buffer construction or allocation failed.
    #[error(transparent)]
    Core(#[from] filmic_core::Error),
}

impl OpsError {
    /// Returns `true` if this error comes from a refused allocation.
    ///
    /// The render path treats these as recoverable and falls back to the
    /// unreconstructed buffer.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_allocation_error())
    }
}

/// Result type for filmic operations.
pub type OpsResult<T> = Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_detection() {
        let err: OpsError = filmic_core::Error::allocation_failed(64, "oom").into();
        assert!(err.is_allocation_error());
        assert!(!OpsError::Cancelled.is_allocation_error());
    }

    #[test]
    fn test_messages() {
        let err = OpsError::InvalidChannels { expected: 4, got: 3 };
        assert_eq!(err.to_string(), "invalid channel count: expected 4, got 3");
        assert_eq!(OpsError::Cancelled.to_string(), "render cancelled");
    }
}
