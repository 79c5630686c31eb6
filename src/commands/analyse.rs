//! The `analyse` command.

pub mod config;
pub mod instrumentation;
pub mod orchestrator;

pub use config::AnalyseConfig;
pub use orchestrator::{Analyser, RunOptions, DEFAULT_WATCHDOG_INTERVAL};

use super::{load_runner_config, open_cache_store};
use crate::config::{RunnerConfig, CONFIG_FILE_NAME};
use crate::engine::ProcessEngine;
use crate::errors::RunnerError;
use crate::exclude::GlobExclusion;
use crate::formatting::FormattingConfig;
use crate::output::{create_formatter, Output};
use crate::paths::PathResolver;
use crate::progress::{BarProgressSink, ProgressConfig, ProgressManager};
use crate::scanner::DirectoryScanner;
use crate::watchdog::{MemoryWatchdog, SignalDispatch};
use anyhow::{Context, Result};
use std::path::PathBuf;

fn engine_from(runner_config: &RunnerConfig, level: Option<String>) -> Result<ProcessEngine> {
    let command = runner_config.engine.command.clone().ok_or_else(|| {
        let path = runner_config
            .config_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        RunnerError::config(path, "`engine.command` is not set")
    })?;
    Ok(ProcessEngine::new(command, runner_config.engine.args.clone()).with_level(level))
}

/// Build the pipeline from configuration and run it. Returns the exit code.
pub fn handle_analyse(config: AnalyseConfig, signals: impl SignalDispatch + 'static) -> Result<i32> {
    // Nothing may be read or created for an empty run, not even the config.
    if config.paths.is_empty() {
        return Err(RunnerError::NoPaths.into());
    }

    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let runner_config = load_runner_config(config.config.as_deref(), &cwd)?;
    let engine = engine_from(&runner_config, config.level.clone())?;

    let decorated = FormattingConfig::from_env(config.no_color).apply();
    let mut output = Output::stdout(config.debug, decorated);

    let enable_cache = runner_config.cache.enabled && !config.no_cache;
    let store = open_cache_store(&runner_config, config.cache_dir.as_deref(), enable_cache);
    let scanner = DirectoryScanner::new(store, runner_config.extensions.clone())
        .with_entry_validation(runner_config.cache.validate_entries);

    let exclusion = GlobExclusion::new(&runner_config.excludes, &runner_config.anchor_dir(&cwd))?;

    let memory_file = config
        .memory_file
        .clone()
        .unwrap_or_else(|| runner_config.memory_file());
    let watchdog = MemoryWatchdog::new(memory_file).with_signals(signals);

    let progress = BarProgressSink::new(ProgressManager::new(ProgressConfig::from_env(
        config.quiet,
    )));

    let mut analyser = Analyser::new(PathResolver::new(cwd), scanner, engine)
        .with_exclusion(exclusion)
        .with_watchdog(watchdog)
        .with_progress(progress)
        .with_watchdog_interval(runner_config.progress.watchdog_interval);

    let options = RunOptions {
        default_level_used: config.default_level_used(),
        debug: config.debug,
        enable_cache,
        clear_cache: config.clear_cache,
    };
    let formatter = create_formatter(config.error_format);

    Ok(analyser.run(&config.paths, &mut output, formatter.as_ref(), options)?)
}
