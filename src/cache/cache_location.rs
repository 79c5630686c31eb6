use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const CACHE_DIR_ENV: &str = "ANALYSE_RUNNER_CACHE_DIR";
const CACHE_DIR_NAME: &str = "analyse-runner";

/// Strategy for cache storage location
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStrategy {
    /// Store cache in XDG-compliant shared directory (default)
    Shared,
    /// Store cache in user-specified location
    Custom(PathBuf),
}

/// Where scan entries are persisted
#[derive(Debug, Clone)]
pub struct CacheLocation {
    pub strategy: CacheStrategy,
    pub base_path: PathBuf,
}

impl CacheLocation {
    /// Resolve the cache location.
    ///
    /// An explicit directory wins over `ANALYSE_RUNNER_CACHE_DIR`, which wins
    /// over the shared per-user cache directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let strategy = match explicit {
            Some(dir) => CacheStrategy::Custom(dir.to_path_buf()),
            None => match std::env::var_os(CACHE_DIR_ENV) {
                Some(dir) if !dir.is_empty() => CacheStrategy::Custom(PathBuf::from(dir)),
                _ => CacheStrategy::Shared,
            },
        };

        let base_path = match &strategy {
            CacheStrategy::Shared => Self::get_shared_cache_dir(),
            CacheStrategy::Custom(path) => path.clone(),
        };

        Ok(Self {
            strategy,
            base_path,
        })
    }

    /// Get platform-specific shared cache directory
    fn get_shared_cache_dir() -> PathBuf {
        // Try XDG_CACHE_HOME first
        if let Some(xdg_cache) = std::env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(xdg_cache).join(CACHE_DIR_NAME);
        }

        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join(CACHE_DIR_NAME);
        }

        // Fallback to temp directory
        std::env::temp_dir().join("analyse_runner_cache")
    }

    /// Get the full cache path
    pub fn get_cache_path(&self) -> &Path {
        &self.base_path
    }

    /// Create the cache directory
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_path)
            .with_context(|| format!("Failed to create cache directory: {:?}", self.base_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_directory_wins() {
        let temp_dir = TempDir::new().unwrap();
        let location = CacheLocation::resolve(Some(temp_dir.path())).unwrap();
        assert_eq!(
            location.strategy,
            CacheStrategy::Custom(temp_dir.path().to_path_buf())
        );
        assert_eq!(location.get_cache_path(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories_creates_nested_path() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let location = CacheLocation::resolve(Some(&nested)).unwrap();

        location.ensure_directories().unwrap();

        assert!(nested.is_dir());
    }
}
