// Shared helpers for analyse-runner integration tests
#![allow(dead_code)]

use analyse_runner::engine::{AnalysisEngine, FileHooks};
use analyse_runner::errors::Result;
use analyse_runner::output::{ErrorFormatter, Output};
use analyse_runner::{AnalysisResult, EngineDiagnostic};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// What the engine was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCall {
    pub files: Vec<PathBuf>,
    pub only_files: bool,
    pub debug: bool,
}

/// Engine that visits every file through the hooks and returns a fixed list
/// of diagnostics.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    diagnostics: Vec<EngineDiagnostic>,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl ScriptedEngine {
    pub fn new(diagnostics: Vec<EngineDiagnostic>) -> Self {
        Self {
            diagnostics,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> EngineCall {
        self.calls().pop().expect("engine was never called")
    }
}

impl AnalysisEngine for ScriptedEngine {
    fn analyse(
        &mut self,
        files: &[PathBuf],
        only_files: bool,
        hooks: &mut FileHooks<'_>,
        debug: bool,
    ) -> Result<Vec<EngineDiagnostic>> {
        for file in files {
            hooks.before_file(file)?;
            hooks.after_file();
        }
        self.calls.lock().unwrap().push(EngineCall {
            files: files.to_vec(),
            only_files,
            debug,
        });
        Ok(self.diagnostics.clone())
    }
}

/// Formatter that remembers what it was given and returns a fixed code.
pub struct CapturingFormatter {
    exit_code: i32,
    calls: Cell<usize>,
    last: RefCell<Option<AnalysisResult>>,
}

impl CapturingFormatter {
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: Cell::new(0),
            last: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn result(&self) -> AnalysisResult {
        self.last.borrow().clone().expect("formatter was never called")
    }
}

impl ErrorFormatter for CapturingFormatter {
    fn format_errors(&self, result: &AnalysisResult, _output: &mut Output) -> Result<i32> {
        self.calls.set(self.calls.get() + 1);
        *self.last.borrow_mut() = Some(result.clone());
        Ok(self.exit_code)
    }
}

/// Create `relative` under `root` with placeholder contents
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, "<?php\n").unwrap();
    path
}

pub fn sorted(mut files: Vec<PathBuf>) -> Vec<PathBuf> {
    files.sort();
    files
}
