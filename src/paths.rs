//! Input path resolution.
//!
//! Caller paths are made absolute against a working directory and lexically
//! normalized, then classified by what is on disk. Nothing here touches the
//! cache or walks directories.

use crate::errors::{Result, RunnerError};
use std::path::{Component, Path, PathBuf};

/// What an input path turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Missing,
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub path: PathBuf,
    pub kind: PathKind,
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. `..` never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let ends_in_normal = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if ends_in_normal {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Join `path` onto `cwd` unless it is already absolute, then normalize.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Directory results are reported relative to: the parent of `path`, or
/// `path` itself when it has none.
pub fn base_directory(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

pub struct PathResolver {
    cwd: PathBuf,
}

impl PathResolver {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: normalize(&cwd.into()),
        }
    }

    /// Normalize without checking the filesystem.
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        absolutize(path, &self.cwd)
    }

    /// Resolve every input path, preserving order.
    ///
    /// Fails with [`RunnerError::NoPaths`] before touching the filesystem when
    /// `paths` is empty.
    pub fn resolve<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<ResolvedInput>> {
        if paths.is_empty() {
            return Err(RunnerError::NoPaths);
        }

        Ok(paths
            .iter()
            .map(|path| {
                let path = self.absolutize(path.as_ref());
                let kind = classify_path(&path);
                ResolvedInput { path, kind }
            })
            .collect())
    }
}

fn classify_path(path: &Path) -> PathKind {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => PathKind::Directory,
        Ok(_) => PathKind::File,
        Err(_) => PathKind::Missing,
    }
}
