//! Dropping excluded files from the resolved set.

use crate::errors::Result;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Decides whether a normalized absolute path is left out of analysis.
pub trait ExclusionPredicate {
    fn is_excluded(&self, path: &Path) -> bool;
}

/// Excludes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExclusions;

impl ExclusionPredicate for NoExclusions {
    fn is_excluded(&self, _path: &Path) -> bool {
        false
    }
}

impl<F> ExclusionPredicate for F
where
    F: Fn(&Path) -> bool,
{
    fn is_excluded(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Glob-based exclusion.
///
/// A path is excluded when it, or any of its ancestors, matches a pattern.
/// Relative patterns are anchored at the directory given on construction.
#[derive(Debug, Clone)]
pub struct GlobExclusion {
    patterns: Vec<Pattern>,
}

impl GlobExclusion {
    pub fn new<S: AsRef<str>>(patterns: &[S], anchor: &Path) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|raw| Pattern::new(&anchor_pattern(raw.as_ref(), anchor)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

fn anchor_pattern(raw: &str, anchor: &Path) -> String {
    if Path::new(raw).is_absolute() {
        return raw.to_string();
    }
    let anchor = Pattern::escape(&anchor.to_string_lossy());
    let relative = raw.trim_start_matches("./");
    format!("{}/{}", anchor.trim_end_matches('/'), relative)
}

impl ExclusionPredicate for GlobExclusion {
    fn is_excluded(&self, path: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        path.ancestors().any(|candidate| {
            self.patterns
                .iter()
                .any(|pattern| pattern.matches_path_with(candidate, options))
        })
    }
}

/// Remove excluded paths, keeping the order of the rest.
pub fn filter_excluded<E>(files: Vec<PathBuf>, predicate: &E) -> Vec<PathBuf>
where
    E: ExclusionPredicate + ?Sized,
{
    files
        .into_iter()
        .filter(|file| !predicate.is_excluded(file))
        .collect()
}
