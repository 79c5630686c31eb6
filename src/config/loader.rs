use std::fs;
use std::path::{Path, PathBuf};

use super::RunnerConfig;
use crate::errors::{Result, RunnerError};

pub const CONFIG_FILE_NAME: &str = ".analyse-runner.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<RunnerConfig, String> {
    let config = toml::from_str::<RunnerConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;
    config.validate()?;
    Ok(config)
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load an explicitly named configuration file; any failure is an error.
pub fn load_config_from(path: &Path) -> Result<RunnerConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| RunnerError::config(path, format!("cannot read file: {}", e)))?;
    let mut config =
        parse_and_validate_config(&contents).map_err(|message| RunnerError::config(path, message))?;
    config.config_dir = path.parent().map(Path::to_path_buf);
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading config from a specific path; problems are logged, not raised
fn try_load_config_from_path(config_path: &Path) -> Option<RunnerConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(mut config) => {
            log::debug!("Loaded config from {}", config_path.display());
            config.config_dir = config_path.parent().map(Path::to_path_buf);
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Search `start` and its ancestors for a configuration file.
pub fn load_config(start: &Path) -> RunnerConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            RunnerConfig::default()
        })
}
