//! Run configuration read from `.analyse-runner.toml`.

mod loader;

pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// File name suffixes picked up when scanning directories (case-sensitive)
    pub extensions: Vec<String>,

    /// Glob patterns for paths dropped from analysis
    pub excludes: Vec<String>,

    /// File the memory watchdog overwrites with the peak usage
    pub memory_file: Option<PathBuf>,

    pub progress: ProgressSettings,

    pub cache: CacheSettings,

    pub engine: EngineSettings,

    /// Directory the configuration was loaded from; relative exclude
    /// patterns are anchored here
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excludes: Vec::new(),
            memory_file: None,
            progress: ProgressSettings::default(),
            cache: CacheSettings::default(),
            engine: EngineSettings::default(),
            config_dir: None,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string()]
}

impl RunnerConfig {
    /// The watchdog file, falling back to a well-known temp location
    pub fn memory_file(&self) -> PathBuf {
        self.memory_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("analyse-runner-memory"))
    }

    /// Base for anchoring relative patterns
    pub fn anchor_dir(&self, fallback: &Path) -> PathBuf {
        self.config_dir
            .clone()
            .unwrap_or_else(|| fallback.to_path_buf())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.extensions.is_empty() {
            return Err("`extensions` must list at least one suffix".to_string());
        }
        if self.extensions.iter().any(|ext| ext.is_empty()) {
            return Err("`extensions` must not contain empty suffixes".to_string());
        }
        if let Some(ext) = self.extensions.iter().find(|ext| ext.starts_with('.')) {
            return Err(format!(
                "`extensions` entries are given without the dot: use \"{}\" instead of \"{}\"",
                ext.trim_start_matches('.'),
                ext
            ));
        }
        if self.progress.watchdog_interval == 0 {
            return Err("`progress.watchdog_interval` must be greater than 0".to_string());
        }
        if self.engine.command.as_deref().is_some_and(str::is_empty) {
            return Err("`engine.command` must not be empty".to_string());
        }
        Ok(())
    }
}

/// Progress and watchdog cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// Files between two watchdog samples in batch mode
    pub watchdog_interval: usize,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            watchdog_interval: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub dir: Option<PathBuf>,
    /// Treat a hit as a miss when a listed file no longer exists
    pub validate_entries: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            validate_entries: false,
        }
    }
}

/// External analyser invoked once per file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub command: Option<String>,
    pub args: Vec<String>,
}
