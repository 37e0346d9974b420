//! Shared error types for funcore.
//!
//! Ambiguity is not an error: units left `Unsure` at convergence and a run
//! hitting its round bound are reported through [`crate::diagnostics`]. The
//! variants here cover caller contract violations, engine bugs and the I/O
//! around configuration and graph files.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for funcore operations
#[derive(Debug, Error)]
pub enum Error {
    /// A unit was queried that was never submitted nor referenced
    #[error("Code unit not registered: {unit}")]
    NotRegistered { unit: String },

    /// The engine reached a state its own rules exclude
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Graph documents that cannot be read as a program graph
    #[error("Invalid program graph {path}: {message}")]
    InvalidGraph { path: PathBuf, message: String },

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn not_registered(unit: impl Into<String>) -> Self {
        Self::NotRegistered { unit: unit.into() }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariantViolation(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Whether the caller can recover by fixing its own input.
    ///
    /// Invariant violations are engine bugs and must surface as failures.
    pub fn is_caller_fixable(&self) -> bool {
        !matches!(self, Self::InternalInvariantViolation(_))
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
