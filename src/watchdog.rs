//! Memory watchdog and cooperative cancellation point.
//!
//! [`MemoryWatchdog::record`] writes the peak resident memory of the process to
//! a well-known file, where an outer supervisor can pick it up, and then runs
//! one signal dispatch cycle. That dispatch is the only place where an
//! interrupt requested from outside can take effect during a run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Set from the SIGINT handler
static SIGINT_RECEIVED: AtomicBool = AtomicBool::new(false);

/// A dispatch point for pending asynchronous signals.
pub trait SignalDispatch: Send + Sync {
    /// Run handlers for signals that arrived since the last cycle.
    fn dispatch(&self);
}

/// Nothing is ever pending
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignals;

impl SignalDispatch for NoSignals {
    fn dispatch(&self) {}
}

/// Runs `handler` once per dispatch cycle in which `flag` was raised.
pub struct PendingSignals {
    flag: &'static AtomicBool,
    handler: Box<dyn Fn() + Send + Sync>,
}

impl PendingSignals {
    /// Dispatcher for SIGINT. Call [`PendingSignals::install`] to hook the
    /// process signal.
    pub fn sigint(handler: impl Fn() + Send + Sync + 'static) -> Self {
        Self::with_flag(&SIGINT_RECEIVED, handler)
    }

    pub fn with_flag(flag: &'static AtomicBool, handler: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            flag,
            handler: Box::new(handler),
        }
    }

    /// Install the SIGINT handler that raises the flag.
    #[cfg(unix)]
    pub fn install(&self) -> std::io::Result<()> {
        extern "C" fn on_sigint(_signal: libc::c_int) {
            SIGINT_RECEIVED.store(true, Ordering::SeqCst);
        }

        let handler = on_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t;
        // SAFETY: the handler only performs an atomic store.
        let previous = unsafe { libc::signal(libc::SIGINT, handler) };
        if previous == libc::SIG_ERR {
            return Err(std::io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn install(&self) -> std::io::Result<()> {
        log::debug!("Signal dispatch is not supported on this platform");
        Ok(())
    }

    /// Mark the signal as pending.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl SignalDispatch for PendingSignals {
    fn dispatch(&self) {
        if self.flag.swap(false, Ordering::SeqCst) {
            (self.handler)();
        }
    }
}

/// Peak resident set size of this process in bytes.
#[cfg(unix)]
pub fn peak_memory_bytes() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage fills the struct when it returns 0.
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: checked the return code above.
    let usage = unsafe { usage.assume_init() };
    let max_rss = u64::try_from(usage.ru_maxrss).ok()?;

    // ru_maxrss is in bytes on Apple platforms, kilobytes elsewhere
    let unit = if cfg!(any(target_os = "macos", target_os = "ios")) {
        1
    } else {
        1024
    };
    Some(max_rss.saturating_mul(unit))
}

#[cfg(not(unix))]
pub fn peak_memory_bytes() -> Option<u64> {
    None
}

/// Whole megabytes, rounded up.
pub fn to_megabytes(bytes: u64) -> u64 {
    bytes.div_ceil(BYTES_PER_MB)
}

/// Records peak memory and gives pending signals a chance to run.
pub struct MemoryWatchdog {
    memory_file: Option<PathBuf>,
    signals: Box<dyn SignalDispatch>,
    sampler: fn() -> Option<u64>,
}

impl MemoryWatchdog {
    pub fn new(memory_file: impl Into<PathBuf>) -> Self {
        Self {
            memory_file: Some(memory_file.into()),
            signals: Box::new(NoSignals),
            sampler: peak_memory_bytes,
        }
    }

    /// A watchdog that writes nothing; signal dispatch still happens.
    pub fn disabled() -> Self {
        Self {
            memory_file: None,
            signals: Box::new(NoSignals),
            sampler: peak_memory_bytes,
        }
    }

    pub fn with_signals(mut self, signals: impl SignalDispatch + 'static) -> Self {
        self.signals = Box::new(signals);
        self
    }

    /// Replace the memory sampler, e.g. with a fixed value
    pub fn with_sampler(mut self, sampler: fn() -> Option<u64>) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn memory_file(&self) -> Option<&Path> {
        self.memory_file.as_deref()
    }

    /// Overwrite the memory file with `"<N> MB"` and run one dispatch cycle.
    ///
    /// Never fails: write problems are logged and ignored.
    pub fn record(&self) {
        if let Some(file) = &self.memory_file {
            match (self.sampler)() {
                Some(bytes) => {
                    let contents = format!("{} MB", to_megabytes(bytes));
                    if let Err(e) = std::fs::write(file, &contents) {
                        log::warn!(
                            "Failed to write memory usage to {}: {}",
                            file.display(),
                            e
                        );
                    }
                }
                None => log::debug!("Peak memory usage is not available on this platform"),
            }
        }

        self.signals.dispatch();
    }
}
