// Export modules for library usage
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod errors;
pub mod exclude;
pub mod formatting;
pub mod output;
pub mod paths;
pub mod progress;
pub mod result;
pub mod scanner;
pub mod watchdog;

// Re-export commonly used types
pub use crate::cache::{cache_key, CacheStore, FileCacheStore, MemoryCacheStore, NoOpCacheStore};
pub use crate::commands::analyse::{Analyser, RunOptions};
pub use crate::config::RunnerConfig;
pub use crate::diagnostics::{classify, Diagnostic, EngineDiagnostic, FileError};
pub use crate::engine::{AnalysisEngine, FileHooks, ProcessEngine};
pub use crate::errors::RunnerError;
pub use crate::exclude::{ExclusionPredicate, GlobExclusion, NoExclusions};
pub use crate::output::{ErrorFormatter, JsonFormatter, Output, TableFormatter};
pub use crate::paths::PathResolver;
pub use crate::result::AnalysisResult;
pub use crate::scanner::DirectoryScanner;
pub use crate::watchdog::{MemoryWatchdog, NoSignals, PendingSignals, SignalDispatch};
