use crate::diagnostics::{ClassifiedDiagnostics, FileError};
use std::path::{Path, PathBuf};

/// Outcome of one analysis run, handed to the formatter exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    file_errors: Vec<FileError>,
    global_messages: Vec<String>,
    default_level_used: bool,
    current_directory: PathBuf,
}

impl AnalysisResult {
    pub fn new(
        classified: ClassifiedDiagnostics,
        default_level_used: bool,
        current_directory: PathBuf,
    ) -> Self {
        Self {
            file_errors: classified.file_errors,
            global_messages: classified.global_messages,
            default_level_used,
            current_directory,
        }
    }

    pub fn file_errors(&self) -> &[FileError] {
        &self.file_errors
    }

    pub fn global_messages(&self) -> &[String] {
        &self.global_messages
    }

    /// Whether no explicit strictness level was chosen for this run
    pub fn default_level_used(&self) -> bool {
        self.default_level_used
    }

    /// Base directory that formatters show paths relative to
    pub fn current_directory(&self) -> &Path {
        &self.current_directory
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors_count() > 0
    }

    pub fn total_errors_count(&self) -> usize {
        self.file_errors.len() + self.global_messages.len()
    }

    /// File errors grouped by file, files in first-seen order.
    pub fn errors_by_file(&self) -> Vec<(&Path, Vec<&FileError>)> {
        let mut groups: Vec<(&Path, Vec<&FileError>)> = Vec::new();
        for error in &self.file_errors {
            match groups.iter_mut().find(|(file, _)| *file == error.file.as_path()) {
                Some((_, errors)) => errors.push(error),
                None => groups.push((error.file.as_path(), vec![error])),
            }
        }
        groups
    }
}
