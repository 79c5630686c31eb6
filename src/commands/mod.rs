//! CLI command implementations.
//!
//! - **analyse**: run the analysis pipeline over a set of paths
//! - **clear-cache** / **cache-stats**: maintain the scan cache

pub mod analyse;
pub mod cache;

pub use analyse::{handle_analyse, AnalyseConfig};
pub use cache::{handle_cache_stats, handle_clear_cache};

use crate::cache::{CacheLocation, CacheStore, FileCacheStore, NoOpCacheStore};
use crate::config::{load_config, load_config_from, RunnerConfig};
use std::path::Path;

/// An explicit config file must load; otherwise search upwards from `cwd`.
pub(crate) fn load_runner_config(
    explicit: Option<&Path>,
    cwd: &Path,
) -> crate::errors::Result<RunnerConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => Ok(load_config(cwd)),
    }
}

pub(crate) fn cache_location(
    runner_config: &RunnerConfig,
    cache_dir: Option<&Path>,
) -> anyhow::Result<CacheLocation> {
    CacheLocation::resolve(cache_dir.or(runner_config.cache.dir.as_deref()))
}

/// The file store when caching is on; an inert store when it is off or the
/// cache directory is unusable.
pub(crate) fn open_cache_store(
    runner_config: &RunnerConfig,
    cache_dir: Option<&Path>,
    enabled: bool,
) -> Box<dyn CacheStore> {
    if !enabled {
        log::debug!("Scan cache disabled");
        return Box::new(NoOpCacheStore);
    }

    match cache_location(runner_config, cache_dir).and_then(|location| FileCacheStore::open(&location)) {
        Ok(store) => {
            log::debug!("Using scan cache at {}", store.root().display());
            Box::new(store)
        }
        Err(e) => {
            log::warn!("Scan cache unavailable, continuing without it: {:#}", e);
            Box::new(NoOpCacheStore)
        }
    }
}
