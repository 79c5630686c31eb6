//! Scan cache maintenance commands.

use super::{cache_location, load_runner_config};
use crate::cache::{CacheStats, FileCacheStore};
use anyhow::{Context, Result};
use std::path::Path;

fn open_store(config: Option<&Path>, cache_dir: Option<&Path>) -> Result<FileCacheStore> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let runner_config = load_runner_config(config, &cwd)?;
    let location = cache_location(&runner_config, cache_dir)?;
    FileCacheStore::open(&location)
}

/// Remove every cached scan. Returns how many entries were removed.
pub fn handle_clear_cache(config: Option<&Path>, cache_dir: Option<&Path>) -> Result<usize> {
    let store = open_store(config, cache_dir)?;
    let removed = store.clear()?;
    log::info!("Removed {} cache entries from {}", removed, store.root().display());
    println!("Removed {} cache entries from {}", removed, store.root().display());
    Ok(removed)
}

pub fn handle_cache_stats(config: Option<&Path>, cache_dir: Option<&Path>) -> Result<CacheStats> {
    let store = open_store(config, cache_dir)?;
    let stats = store.stats()?;
    println!("Cache directory: {}", store.root().display());
    println!("{}", stats);
    Ok(stats)
}
