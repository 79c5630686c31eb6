//! Cache-backed directory scanning and the run-wide file set.

use crate::cache::{cache_key, CacheStore};
use crate::diagnostics::{Diagnostic, FileError};
use crate::errors::Result;
use crate::output::Output;
use crate::paths::{normalize, PathKind, ResolvedInput};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MAX_REPORTED_SKIPS: usize = 10;

/// Files found under one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub files: Vec<PathBuf>,
    /// The list was served from the cache without walking the directory
    pub from_cache: bool,
}

pub struct DirectoryScanner {
    store: Box<dyn CacheStore>,
    extensions: Vec<String>,
    validate_entries: bool,
}

impl DirectoryScanner {
    pub fn new(store: impl CacheStore + 'static, extensions: Vec<String>) -> Self {
        Self {
            store: Box::new(store),
            extensions,
            validate_entries: false,
        }
    }

    /// Count a cache hit as a miss when any listed file is gone.
    pub fn with_entry_validation(mut self, validate: bool) -> Self {
        self.validate_entries = validate;
        self
    }

    /// Files under `directory`, from the cache when allowed, otherwise by
    /// walking it. A fresh walk is stored when caching is enabled, even if
    /// the cache was asked to be cleared.
    pub fn resolve(
        &self,
        directory: &Path,
        cache_enabled: bool,
        clear_cache: bool,
        output: &mut Output,
    ) -> Result<ScanOutcome> {
        let key = cache_key(directory);

        if cache_enabled && !clear_cache {
            if let Some(files) = self.load_cached(&key) {
                log::debug!("{} files loaded from cache for {}", files.len(), directory.display());
                output.write_debug(format!("{} files loaded from cache", files.len()))?;
                return Ok(ScanOutcome {
                    files,
                    from_cache: true,
                });
            }
        }

        let files = self.walk(directory);
        log::debug!("{} files found in {}", files.len(), directory.display());
        output.write_debug(format!("{} files found in {}", files.len(), directory.display()))?;

        if cache_enabled {
            if let Err(e) = self.store.save(&key, &files) {
                log::warn!("Failed to cache file list for {}: {:#}", directory.display(), e);
            }
        }

        Ok(ScanOutcome {
            files,
            from_cache: false,
        })
    }

    fn load_cached(&self, key: &str) -> Option<Vec<PathBuf>> {
        let files = match self.store.load(key) {
            Ok(entry) => entry?,
            Err(e) => {
                log::warn!("Ignoring unreadable cache entry {}: {:#}", key, e);
                return None;
            }
        };

        if self.validate_entries && !files.iter().all(|file| file.is_file()) {
            log::debug!("Cache entry {} lists files that no longer exist", key);
            return None;
        }

        Some(files)
    }

    /// Recursively list regular files with a configured extension, following
    /// symbolic links, in discovery order.
    pub fn walk(&self, directory: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut skipped = 0;

        for entry in WalkDir::new(directory)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    if skipped < MAX_REPORTED_SKIPS {
                        log::warn!("Skipping directory entry: {}", err);
                    }
                    skipped += 1;
                    None
                }
            })
        {
            if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                files.push(normalize(entry.path()));
            }
        }

        if skipped > MAX_REPORTED_SKIPS {
            log::warn!(
                "Skipped {} additional directory entries",
                skipped - MAX_REPORTED_SKIPS
            );
        }

        files
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|ext| {
            name.len() > ext.len()
                && name.ends_with(ext.as_str())
                && name[..name.len() - ext.len()].ends_with('.')
        })
    }
}

/// Ordered set of files with unique membership; the first insertion wins.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the file was new
    pub fn insert(&mut self, file: PathBuf) -> bool {
        if self.seen.contains(&file) {
            return false;
        }
        self.seen.insert(file.clone());
        self.files.push(file);
        true
    }

    pub fn extend(&mut self, files: impl IntoIterator<Item = PathBuf>) {
        for file in files {
            self.insert(file);
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.files
    }
}

/// Everything path collection produced for one run.
#[derive(Debug, Clone)]
pub struct CollectedFiles {
    pub files: Vec<PathBuf>,
    /// One non-semantic file error per missing input
    pub missing: Vec<Diagnostic>,
    /// Whether the set is known to be a flat list of files. Cleared by a fresh
    /// directory walk, left alone by a cache hit.
    pub only_files: bool,
}

/// Turn resolved inputs into the deduplicated file set.
pub fn collect_files(
    inputs: &[ResolvedInput],
    scanner: &DirectoryScanner,
    cache_enabled: bool,
    clear_cache: bool,
    output: &mut Output,
) -> Result<CollectedFiles> {
    let mut set = FileSet::new();
    let mut missing = Vec::new();
    let mut only_files = true;

    for input in inputs {
        match input.kind {
            PathKind::Missing => {
                log::debug!("Input path {} does not exist", input.path.display());
                missing.push(Diagnostic::File(FileError::missing_path(&input.path)));
            }
            PathKind::File => {
                set.insert(input.path.clone());
            }
            PathKind::Directory => {
                let outcome = scanner.resolve(&input.path, cache_enabled, clear_cache, output)?;
                if !outcome.from_cache {
                    only_files = false;
                }
                set.extend(outcome.files);
            }
        }
    }

    Ok(CollectedFiles {
        files: set.into_vec(),
        missing,
        only_files,
    })
}
