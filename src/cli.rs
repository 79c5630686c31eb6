use crate::commands::AnalyseConfig;
use crate::output::ErrorFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "analyse-runner")]
#[command(about = "Resolve, cache and analyse source files with an external analyser", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse files and directories
    Analyse {
        /// Files or directories to analyse
        paths: Vec<PathBuf>,

        /// Echo each file instead of showing a progress bar
        #[arg(long)]
        debug: bool,

        /// Neither read nor write the scan cache
        #[arg(long)]
        no_cache: bool,

        /// Rescan directories even when a cached list exists
        #[arg(long)]
        clear_cache: bool,

        /// Strictness level passed to the analyser
        #[arg(short, long)]
        level: Option<String>,

        /// Result format
        #[arg(long, value_enum, default_value = "table")]
        error_format: ErrorFormat,

        /// File receiving peak memory usage
        #[arg(long, env = "ANALYSE_RUNNER_MEMORY_FILE")]
        memory_file: Option<PathBuf>,

        /// Configuration file (defaults to searching for .analyse-runner.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Scan cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Increase log verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Remove all cached directory scans
    ClearCache {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        cache_dir: Option<PathBuf>,

        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Show scan cache statistics
    CacheStats {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        cache_dir: Option<PathBuf>,

        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Self::Analyse { verbosity, .. }
            | Self::ClearCache { verbosity, .. }
            | Self::CacheStats { verbosity, .. } => *verbosity,
        }
    }

    /// Settings for the `analyse` command, `None` for other commands
    pub fn into_analyse_config(self) -> Option<AnalyseConfig> {
        match self {
            Commands::Analyse {
                paths,
                debug,
                no_cache,
                clear_cache,
                level,
                error_format,
                memory_file,
                config,
                cache_dir,
                quiet,
                no_color,
                verbosity: _,
            } => Some(AnalyseConfig {
                paths,
                debug,
                no_cache,
                clear_cache,
                level,
                error_format,
                memory_file,
                config,
                cache_dir,
                quiet,
                no_color,
            }),
            _ => None,
        }
    }
}

/// Default log filter for a `-v` count
pub fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
