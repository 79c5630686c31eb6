//! Error types for analysis runs.
//!
//! Recoverable problems (missing paths, analysis findings) never surface here:
//! they travel as [`crate::diagnostics::Diagnostic`] values into the result.
//! A `RunnerError` always aborts the run and bypasses the formatter.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors of an analysis run
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The caller supplied no paths at all
    #[error("No files to analyse: at least one path must be given")]
    NoPaths,

    /// A collaborator produced something outside its contract
    #[error("Internal contract violation: {0}")]
    ContractViolation(String),

    /// The analysis engine could not run
    #[error("Analysis engine failed: {message}")]
    Engine {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl RunnerError {
    /// Create an engine error wrapping the IO failure that caused it
    pub fn engine_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Engine {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a configuration error for the given file
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error signals a bug in a collaborator rather than bad input
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation(_))
    }
}

/// Result type alias using RunnerError
pub type Result<T> = std::result::Result<T, RunnerError>;
