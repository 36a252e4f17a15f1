//! Matcher-specific error types.

use thiserror::Error;

/// Errors raised while resolving a matcher config into a predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatcherError {
    #[error("Unknown matcher: {0}")]
    UnknownMatcher(String),

    #[error("Invalid options for matcher '{id}': {message}")]
    InvalidOptions { id: String, message: String },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

pub type MatcherResult<T> = std::result::Result<T, MatcherError>;
