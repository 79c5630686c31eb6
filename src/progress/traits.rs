//! Progress sink abstraction.
//!
//! The instrumentation layer drives a sink through a fixed lifecycle: at most
//! one `start`, any number of `advance` calls, and one `finish` if and only if
//! `start` happened. Sinks take `&self` and use interior mutability so one sink
//! can be shared with the hooks handed to the engine.

/// Receives progress updates for one run.
pub trait ProgressSink: Send + Sync {
    /// Begin reporting over `total` files.
    fn start(&self, total: usize);

    /// `step` more files are done.
    fn advance(&self, step: usize);

    /// Reporting is over.
    fn finish(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_progress_sink_is_object_safe() {
        fn _takes_trait_object(_sink: Arc<dyn ProgressSink>) {}
    }
}
