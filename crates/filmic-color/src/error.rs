//! Error types for color setup.
//!
//! Per-pixel color math never fails; only building a profile or a LUT from
//! host-supplied data can.

use thiserror::Error;

/// Color setup error.
#[derive(Debug, Error)]
pub enum ColorError {
    /// LUT data is unusable (empty, mismatched channels, non-finite).
    #[error("invalid LUT: {0}")]
    InvalidLut(String),

    /// Matrix contains NaN or infinite entries.
    #[error("matrix error: {0}")]
    MatrixError(String),
}

/// Result type for color setup.
pub type ColorResult<T> = Result<T, ColorError>;
