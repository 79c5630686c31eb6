use crate::output::ErrorFormat;
use std::path::PathBuf;

/// Settings for one `analyse` invocation, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct AnalyseConfig {
    pub paths: Vec<PathBuf>,
    pub debug: bool,
    pub no_cache: bool,
    pub clear_cache: bool,
    /// Explicit strictness level, passed through to the engine
    pub level: Option<String>,
    pub error_format: ErrorFormat,
    pub memory_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub quiet: bool,
    pub no_color: bool,
}

impl AnalyseConfig {
    pub fn default_level_used(&self) -> bool {
        self.level.is_none()
    }
}
