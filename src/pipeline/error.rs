//! Pipeline-specific error types.

use crate::frame::FrameError;
use crate::matchers::MatcherError;
use thiserror::Error;

/// Errors raised while preparing or running a transformer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Unknown transformer: {0}")]
    UnknownTransformer(String),

    #[error("Invalid options for transformer '{id}': {message}")]
    InvalidOptions { id: String, message: String },

    #[error("Matcher error in transformer '{id}': {source}")]
    Matcher {
        id: String,
        #[source]
        source: MatcherError,
    },

    #[error("Unknown reducer: {0}")]
    UnknownReducer(String),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Step {index} ({id}) failed: {source}")]
    StepFailed {
        index: usize,
        id: String,
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    pub(crate) fn matcher(id: &str, source: MatcherError) -> Self {
        TransformError::Matcher {
            id: id.to_string(),
            source,
        }
    }
}

pub type TransformResult<T> = std::result::Result<T, TransformError>;
