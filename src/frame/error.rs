//! Frame- and vector-specific error types.

use thiserror::Error;

/// Errors raised when building or mutating frames, fields and vectors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Vector length mismatch: left has {left} values, right has {right}")]
    VectorLengthMismatch { left: usize, right: usize },

    #[error("Field '{field}' has {actual} values but the frame has {expected} rows")]
    FieldLengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Index {index} out of bounds for vector of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Field not found: {0}")]
    FieldNotFound(String),
}

pub type FrameResult<T> = std::result::Result<T, FrameError>;
