//! Persistent cache of directory scans.
//!
//! A store maps a string key to the list of files discovered under one
//! directory. Entries are always replaced wholesale.

pub mod cache_location;
pub mod file_store;

pub use cache_location::CacheLocation;
pub use file_store::{CacheStats, FileCacheStore};

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

const KEY_PREFIX: &str = "analyse-files-";

/// Cache key for the scan of `directory`.
pub fn cache_key(directory: &Path) -> String {
    format!("{}{}", KEY_PREFIX, directory.display())
}

/// Key/value persistence for scanned file lists.
pub trait CacheStore: Send + Sync {
    /// Load the entry stored under `key`, `None` when absent.
    fn load(&self, key: &str) -> Result<Option<Vec<PathBuf>>>;

    /// Store `files` under `key`, replacing any previous entry.
    fn save(&self, key: &str, files: &[PathBuf]) -> Result<()>;
}

impl<T: CacheStore + ?Sized> CacheStore for Box<T> {
    fn load(&self, key: &str) -> Result<Option<Vec<PathBuf>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, files: &[PathBuf]) -> Result<()> {
        (**self).save(key, files)
    }
}

impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    fn load(&self, key: &str) -> Result<Option<Vec<PathBuf>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, files: &[PathBuf]) -> Result<()> {
        (**self).save(key, files)
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Vec<PathBuf>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&self, key: &str) -> Result<Option<Vec<PathBuf>>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow::anyhow!("Cache read lock failed: {}", e))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, files: &[PathBuf]) -> Result<()> {
        self.entries
            .write()
            .map_err(|e| anyhow::anyhow!("Cache write lock failed: {}", e))?
            .insert(key.to_string(), files.to_vec());
        Ok(())
    }
}

/// Store used when caching is disabled.
#[derive(Debug, Default, Clone)]
pub struct NoOpCacheStore;

impl CacheStore for NoOpCacheStore {
    fn load(&self, _key: &str) -> Result<Option<Vec<PathBuf>>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _files: &[PathBuf]) -> Result<()> {
        Ok(())
    }
}
