//! Progress sink implementations.
//!
//! - [`SilentProgressSink`]: no-op
//! - [`BarProgressSink`]: an `indicatif` bar created lazily on `start`
//! - [`RecordingProgressSink`]: captures events for tests
//!
//! ```rust
//! use analyse_runner::progress::{ProgressEvent, ProgressSink, RecordingProgressSink};
//!
//! let recorder = RecordingProgressSink::new();
//! recorder.start(2);
//! recorder.advance(1);
//! recorder.advance(1);
//! recorder.finish();
//!
//! assert_eq!(recorder.starts(), 1);
//! assert_eq!(recorder.events()[0], ProgressEvent::Start { total: 2 });
//! ```

use super::traits::ProgressSink;
use super::{ProgressManager, TEMPLATE_FILE_ANALYSIS};
use indicatif::ProgressBar;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Copy, Debug, Default)]
pub struct SilentProgressSink;

impl ProgressSink for SilentProgressSink {
    #[inline]
    fn start(&self, _total: usize) {}

    #[inline]
    fn advance(&self, _step: usize) {}

    #[inline]
    fn finish(&self) {}
}

/// Terminal progress bar.
pub struct BarProgressSink {
    manager: ProgressManager,
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgressSink {
    pub fn new(manager: ProgressManager) -> Self {
        Self {
            manager,
            bar: Mutex::new(None),
        }
    }

    fn bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        // A poisoned lock only means a panic elsewhere; the bar is still usable
        self.bar.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProgressSink for BarProgressSink {
    fn start(&self, total: usize) {
        let bar = self.manager.create_bar(total as u64, TEMPLATE_FILE_ANALYSIS);
        bar.set_message("Analysing");
        *self.bar() = Some(bar);
    }

    fn advance(&self, step: usize) {
        if let Some(bar) = self.bar().as_ref() {
            bar.inc(step as u64);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar().take() {
            bar.finish_and_clear();
        }
    }
}

/// Progress event recorded by [`RecordingProgressSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Start { total: usize },
    Advance { step: usize },
    Finish,
}

/// Recording progress sink - captures events for testing.
///
/// Clones share the same event log, so a test can keep one handle while the
/// other is moved into the instrumentation.
#[derive(Clone, Debug, Default)]
pub struct RecordingProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<ProgressEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get all recorded events.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.log().clone()
    }

    pub fn starts(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Start { .. }))
    }

    pub fn finishes(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Finish))
    }

    /// Sum of all advance steps
    pub fn advanced(&self) -> usize {
        self.log()
            .iter()
            .map(|e| match e {
                ProgressEvent::Advance { step } => *step,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, predicate: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.log().iter().filter(|e| predicate(e)).count()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn start(&self, total: usize) {
        self.log().push(ProgressEvent::Start { total });
    }

    fn advance(&self, step: usize) {
        self.log().push(ProgressEvent::Advance { step });
    }

    fn finish(&self) {
        self.log().push(ProgressEvent::Finish);
    }
}
