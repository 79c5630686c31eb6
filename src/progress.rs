//! Progress feedback for analysis runs.
//!
//! Bars are drawn with `indicatif` on stderr and are hidden when quiet mode is
//! requested (flag or `ANALYSE_RUNNER_QUIET`) or stderr is not a terminal.
//! Instrumentation talks to a [`traits::ProgressSink`] rather than to
//! `indicatif` directly.

pub mod implementations;
pub mod traits;

pub use implementations::{
    BarProgressSink, ProgressEvent, RecordingProgressSink, SilentProgressSink,
};
pub use traits::ProgressSink;

use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_FILE_ANALYSIS: &str = "{msg} {bar:40} {pos}/{len} files ({percent}%) - {eta}";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("ANALYSE_RUNNER_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    /// Determine if progress bars should be displayed
    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

#[derive(Debug, Clone)]
pub struct ProgressManager {
    config: ProgressConfig,
}

impl ProgressManager {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config }
    }

    /// Create a progress bar with the given length and template
    ///
    /// Returns a hidden progress bar if progress should not be shown
    pub fn create_bar(&self, len: u64, template: &str) -> ProgressBar {
        if !self.config.should_show_progress() {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|e| {
                log::debug!("Invalid progress template {:?}: {}", template, e);
                ProgressStyle::default_bar()
            })
            .progress_chars("█▓▒░  ");
        ProgressBar::new(len).with_style(style)
    }
}
