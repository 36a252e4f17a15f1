//! Error handling for frameflow
//!
//! Each module has its own error enum; this module defines the crate-wide
//! error that wraps them all, plus a Result alias for callers that mix
//! several modules.

use crate::config::ConfigError;
use crate::frame::FrameError;
use crate::matchers::MatcherError;
use crate::pipeline::TransformError;
use crate::registry::RegistryError;
use thiserror::Error;

/// Main error type for frameflow operations
#[derive(Error, Debug)]
pub enum FrameflowError {
    /// Errors building or reshaping frames and vectors
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Errors resolving or configuring matchers
    #[error("Matcher error: {0}")]
    Matcher(#[from] MatcherError),

    /// Errors preparing or running transformers
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Errors from registries and plugin contributions
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Errors loading, saving or validating configs
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FrameflowError>,
    },
}

impl FrameflowError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FrameflowError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for frameflow operations
pub type Result<T> = std::result::Result<T, FrameflowError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<FrameflowError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
