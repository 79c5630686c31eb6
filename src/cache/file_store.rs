use super::{CacheLocation, CacheStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const ENTRY_EXTENSION: &str = "json";

/// On-disk representation of one entry
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    files: Vec<PathBuf>,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size: u64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entries, {} bytes",
            self.entry_count, self.total_size
        )
    }
}

/// One JSON file per key under a cache directory.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    root: PathBuf,
}

impl FileCacheStore {
    /// Open the store at `location`, creating the directory if needed.
    pub fn open(location: &CacheLocation) -> Result<Self> {
        location.ensure_directories()?;
        Ok(Self {
            root: location.get_cache_path().to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        self.root
            .join(format!("{}.{}", &hash[..16], ENTRY_EXTENSION))
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read cache directory: {:?}", self.root))?
        {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Remove every entry, returning how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let files = self.entry_files()?;
        for path in &files {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove cache entry: {:?}", path))?;
        }
        Ok(files.len())
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();
        for path in self.entry_files()? {
            stats.entry_count += 1;
            stats.total_size += fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        }
        Ok(stats)
    }

    /// Write bytes atomically using a temporary file and rename
    fn write_bytes_atomically(target_path: &Path, data: &[u8]) -> Result<()> {
        let temp_path = target_path.with_extension(format!("tmp-{}", std::process::id()));
        fs::write(&temp_path, data)
            .with_context(|| format!("Failed to write temporary file at {:?}", temp_path))?;
        fs::rename(&temp_path, target_path).with_context(|| {
            format!(
                "Failed to rename file atomically: {:?} -> {:?}",
                temp_path, target_path
            )
        })
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self, key: &str) -> Result<Option<Vec<PathBuf>>> {
        let path = self.entry_path(key);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read cache entry: {:?}", path))
            }
        };

        let entry: StoredEntry = serde_json::from_slice(&data)
            .with_context(|| format!("Corrupt cache entry: {:?}", path))?;

        // Different key with the same hash prefix
        if entry.key != key {
            log::debug!("Cache entry {:?} belongs to another key", path);
            return Ok(None);
        }

        Ok(Some(entry.files))
    }

    fn save(&self, key: &str, files: &[PathBuf]) -> Result<()> {
        let entry = StoredEntry {
            key: key.to_string(),
            files: files.to_vec(),
        };
        let data = serde_json::to_vec(&entry)?;
        Self::write_bytes_atomically(&self.entry_path(key), &data)
    }
}
