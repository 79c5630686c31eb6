//! The analysis pipeline: resolve, scan, filter, analyse, report.

use super::instrumentation::Instrumentation;
use crate::diagnostics::classify;
use crate::engine::AnalysisEngine;
use crate::errors::{Result, RunnerError};
use crate::exclude::{filter_excluded, ExclusionPredicate, NoExclusions};
use crate::output::{ErrorFormatter, Output};
use crate::paths::{base_directory, PathResolver};
use crate::progress::{ProgressSink, SilentProgressSink};
use crate::result::AnalysisResult;
use crate::scanner::{collect_files, DirectoryScanner};
use crate::watchdog::MemoryWatchdog;
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_WATCHDOG_INTERVAL: usize = 100;

/// Per-run switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// No strictness level was chosen explicitly
    pub default_level_used: bool,
    /// Echo files instead of drawing progress
    pub debug: bool,
    pub enable_cache: bool,
    pub clear_cache: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            default_level_used: true,
            debug: false,
            enable_cache: true,
            clear_cache: false,
        }
    }
}

/// Owns the collaborators of an analysis run.
pub struct Analyser {
    resolver: PathResolver,
    scanner: DirectoryScanner,
    engine: Box<dyn AnalysisEngine>,
    exclusion: Box<dyn ExclusionPredicate>,
    watchdog: MemoryWatchdog,
    progress: Box<dyn ProgressSink>,
    watchdog_interval: usize,
}

impl Analyser {
    pub fn new(
        resolver: PathResolver,
        scanner: DirectoryScanner,
        engine: impl AnalysisEngine + 'static,
    ) -> Self {
        Self {
            resolver,
            scanner,
            engine: Box::new(engine),
            exclusion: Box::new(NoExclusions),
            watchdog: MemoryWatchdog::disabled(),
            progress: Box::new(SilentProgressSink),
            watchdog_interval: DEFAULT_WATCHDOG_INTERVAL,
        }
    }

    pub fn with_exclusion(mut self, exclusion: impl ExclusionPredicate + 'static) -> Self {
        self.exclusion = Box::new(exclusion);
        self
    }

    pub fn with_watchdog(mut self, watchdog: MemoryWatchdog) -> Self {
        self.watchdog = watchdog;
        self
    }

    pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn with_watchdog_interval(mut self, interval: usize) -> Self {
        self.watchdog_interval = interval;
        self
    }

    /// Analyse `paths` and return the formatter's exit code.
    ///
    /// Fatal conditions (no paths, engine failure, a diagnostic of unknown
    /// shape) are returned as errors and the formatter is not called.
    pub fn run<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        output: &mut Output,
        formatter: &dyn ErrorFormatter,
        options: RunOptions,
    ) -> Result<i32> {
        if paths.is_empty() {
            return Err(RunnerError::NoPaths);
        }

        self.watchdog.record();

        let phase = Instant::now();
        let inputs = self.resolver.resolve(paths)?;
        log::debug!("Resolved {} input paths in {:?}", inputs.len(), phase.elapsed());

        let phase = Instant::now();
        let collected = collect_files(
            &inputs,
            &self.scanner,
            options.enable_cache,
            options.clear_cache,
            output,
        )?;
        log::debug!("Scanned inputs in {:?}", phase.elapsed());

        let before = collected.files.len();
        let files = filter_excluded(collected.files, self.exclusion.as_ref());
        log::info!(
            "{} files to analyse ({} excluded, {} missing paths)",
            files.len(),
            before - files.len(),
            collected.missing.len()
        );

        self.watchdog.record();

        let phase = Instant::now();
        let instrumentation = Instrumentation {
            progress: self.progress.as_ref(),
            watchdog: &self.watchdog,
            watchdog_interval: self.watchdog_interval,
        };
        let diagnostics = instrumentation.run(
            self.engine.as_mut(),
            &files,
            collected.only_files,
            options.debug,
            output,
        )?;
        log::debug!(
            "Engine returned {} diagnostics in {:?}",
            diagnostics.len(),
            phase.elapsed()
        );

        let classified = classify(collected.missing, diagnostics)?;
        let current_directory = base_directory(&inputs[0].path);
        let result = AnalysisResult::new(classified, options.default_level_used, current_directory);
        log::info!(
            "{} file errors, {} global messages",
            result.file_errors().len(),
            result.global_messages().len()
        );

        let phase = Instant::now();
        let exit_code = formatter.format_errors(&result, output)?;
        output.flush()?;
        log::debug!("Reported results in {:?}", phase.elapsed());

        Ok(exit_code)
    }
}
