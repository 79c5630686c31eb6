//! Diagnostics produced during a run and their classification.
//!
//! Engines hand back [`EngineDiagnostic`] values. Engines that live in-process
//! only ever build the `Message` and `File` variants; engines whose output is
//! decoded from another process can also yield `Unrecognized`, which aborts the
//! run during [`classify`].

use crate::errors::{Result, RunnerError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// An error attributable to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileError {
    pub message: String,
    pub file: PathBuf,
    #[serde(default)]
    pub line: Option<usize>,
    /// `false` for path-resolution failures, `true` for real analysis findings
    #[serde(default = "default_semantic")]
    pub semantic: bool,
}

fn default_semantic() -> bool {
    true
}

impl FileError {
    pub fn new(message: impl Into<String>, file: impl Into<PathBuf>, line: Option<usize>) -> Self {
        Self {
            message: message.into(),
            file: file.into(),
            line,
            semantic: true,
        }
    }

    /// Error recorded for an input path that is not on disk.
    pub fn missing_path(path: &Path) -> Self {
        Self {
            message: format!("Path {} does not exist", path.display()),
            file: path.to_path_buf(),
            line: None,
            semantic: false,
        }
    }
}

/// A classified diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Advisory text not tied to any file
    Global(String),
    File(FileError),
}

impl From<FileError> for Diagnostic {
    fn from(error: FileError) -> Self {
        Self::File(error)
    }
}

/// A diagnostic as reported by an analysis engine, before classification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EngineDiagnostic {
    Message(String),
    File(FileError),
    /// Anything that decoded but has neither shape
    Unrecognized(serde_json::Value),
}

impl From<FileError> for EngineDiagnostic {
    fn from(error: FileError) -> Self {
        Self::File(error)
    }
}

impl From<&str> for EngineDiagnostic {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for EngineDiagnostic {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl EngineDiagnostic {
    /// Decode one line of engine output.
    ///
    /// Lines that are not JSON at all are treated as global messages.
    pub fn from_json_line(line: &str) -> Self {
        serde_json::from_str(line).unwrap_or_else(|_| Self::Message(line.to_string()))
    }
}

/// Diagnostics split by scope, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedDiagnostics {
    pub file_errors: Vec<FileError>,
    pub global_messages: Vec<String>,
}

impl ClassifiedDiagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::Global(message) => self.global_messages.push(message),
            Diagnostic::File(error) => self.file_errors.push(error),
        }
    }
}

/// Classify pre-analysis diagnostics followed by engine diagnostics.
///
/// The first unrecognized engine item aborts classification with
/// [`RunnerError::ContractViolation`].
pub fn classify(
    pre_analysis: Vec<Diagnostic>,
    engine: Vec<EngineDiagnostic>,
) -> Result<ClassifiedDiagnostics> {
    let mut classified = ClassifiedDiagnostics::default();
    for diagnostic in pre_analysis {
        classified.push(diagnostic);
    }

    for (index, item) in engine.into_iter().enumerate() {
        let diagnostic = match item {
            EngineDiagnostic::Message(message) => Diagnostic::Global(message),
            EngineDiagnostic::File(error) => Diagnostic::File(error),
            EngineDiagnostic::Unrecognized(value) => {
                return Err(RunnerError::ContractViolation(format!(
                    "engine diagnostic #{} is neither a message nor a file error: {}",
                    index, value
                )));
            }
        };
        classified.push(diagnostic);
    }

    Ok(classified)
}
