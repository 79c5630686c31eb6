//! The analysis engine seam.
//!
//! An engine consumes the resolved file list and reports diagnostics. The
//! runner observes its progress through [`FileHooks`], which carries exactly
//! one per-file callback depending on the run mode.

pub mod process;

pub use process::ProcessEngine;

use crate::diagnostics::EngineDiagnostic;
use crate::errors::Result;
use std::path::{Path, PathBuf};

/// Per-file callbacks for one run.
pub enum FileHooks<'a> {
    /// Called after each file is analysed
    Batch { after_file: Box<dyn FnMut() + 'a> },
    /// Called before each file is analysed
    Debug {
        before_file: Box<dyn FnMut(&Path) -> Result<()> + 'a>,
    },
}

impl<'a> FileHooks<'a> {
    pub fn batch(after_file: impl FnMut() + 'a) -> Self {
        Self::Batch {
            after_file: Box::new(after_file),
        }
    }

    pub fn debug(before_file: impl FnMut(&Path) -> Result<()> + 'a) -> Self {
        Self::Debug {
            before_file: Box::new(before_file),
        }
    }

    /// Engines call this right before analysing `file`.
    pub fn before_file(&mut self, file: &Path) -> Result<()> {
        match self {
            Self::Debug { before_file } => before_file(file),
            Self::Batch { .. } => Ok(()),
        }
    }

    /// Engines call this right after analysing a file.
    pub fn after_file(&mut self) {
        if let Self::Batch { after_file } = self {
            after_file();
        }
    }
}

pub trait AnalysisEngine {
    /// Analyse `files` in order.
    ///
    /// `only_files` tells the engine the list holds only explicitly named
    /// files rather than the product of a directory walk.
    fn analyse(
        &mut self,
        files: &[PathBuf],
        only_files: bool,
        hooks: &mut FileHooks<'_>,
        debug: bool,
    ) -> Result<Vec<EngineDiagnostic>>;
}
