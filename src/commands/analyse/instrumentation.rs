//! Progress and watchdog wiring around the engine call.
//!
//! Batch mode starts a progress sink before the engine runs, advances it from
//! the after-file hook and samples memory every `watchdog_interval` files.
//! Debug mode echoes each file to the output before it is analysed.

use crate::diagnostics::EngineDiagnostic;
use crate::engine::{AnalysisEngine, FileHooks};
use crate::errors::Result;
use crate::output::Output;
use crate::progress::ProgressSink;
use crate::watchdog::MemoryWatchdog;
use std::path::PathBuf;

/// Progress state for one batch-mode run.
pub struct BatchProgress<'a> {
    sink: &'a dyn ProgressSink,
    watchdog: &'a MemoryWatchdog,
    total: usize,
    interval: usize,
    processed: usize,
    started: bool,
}

impl<'a> BatchProgress<'a> {
    pub fn new(
        sink: &'a dyn ProgressSink,
        watchdog: &'a MemoryWatchdog,
        total: usize,
        interval: usize,
    ) -> Self {
        Self {
            sink,
            watchdog,
            total,
            interval: interval.max(1),
            processed: 0,
            started: false,
        }
    }

    /// Start the indicator. Does nothing when there is nothing to analyse or
    /// it is already running.
    pub fn start(&mut self) {
        if self.total > 0 && !self.started {
            self.sink.start(self.total);
            self.started = true;
        }
    }

    /// One file was analysed.
    pub fn file_done(&mut self) {
        self.start();
        self.sink.advance(1);
        self.processed += 1;
        if self.processed % self.interval == 0 {
            self.watchdog.record();
        }
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Finish the indicator if it was ever started.
    pub fn finish(self) {
        if self.started {
            self.sink.finish();
        }
    }
}

pub struct Instrumentation<'a> {
    pub progress: &'a dyn ProgressSink,
    pub watchdog: &'a MemoryWatchdog,
    pub watchdog_interval: usize,
}

impl Instrumentation<'_> {
    /// Run `engine` over `files` with the hooks for the selected mode.
    pub fn run(
        &self,
        engine: &mut dyn AnalysisEngine,
        files: &[PathBuf],
        only_files: bool,
        debug: bool,
        output: &mut Output,
    ) -> Result<Vec<EngineDiagnostic>> {
        if debug {
            let mut hooks = FileHooks::debug(|file| output.write_line(file.display().to_string()));
            return engine.analyse(files, only_files, &mut hooks, true);
        }

        let mut batch = BatchProgress::new(
            self.progress,
            self.watchdog,
            files.len(),
            self.watchdog_interval,
        );
        batch.start();
        let diagnostics = {
            let mut hooks = FileHooks::batch(|| batch.file_done());
            engine.analyse(files, only_files, &mut hooks, false)
        };
        log::debug!("Engine reported back on {} files", batch.processed());
        batch.finish();
        diagnostics
    }
}
