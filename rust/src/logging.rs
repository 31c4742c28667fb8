//! Logging macros for the scheduler with verbosity level control.
//!
//! Each run carries a verbosity level; the macros are skipped entirely below
//! their level and otherwise emit `tracing` events, so the host decides where
//! output goes. The library never installs a subscriber.
//! - 0: SILENT (only errors)
//! - 1: CHANGES (worker allocations, task assignments) -> `info`
//! - 2: CHECKS (per-task candidate checks) -> `debug`
//! - 3: DEBUG (queue and pass internals) -> `trace`

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: new workers, task assignments, run summaries.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: worker reuse checks, per-task timing.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: ready-queue pops, backward pass internals.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::trace!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{span, Event, Level, Metadata, Subscriber};

    /// Counts events per level; spans are ignored.
    #[derive(Default)]
    struct EventCounter {
        info: AtomicUsize,
        debug: AtomicUsize,
        trace: AtomicUsize,
    }

    struct CountingSubscriber(Arc<EventCounter>);

    impl Subscriber for CountingSubscriber {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }

        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

        fn event(&self, event: &Event<'_>) {
            let counter = match *event.metadata().level() {
                Level::INFO => &self.0.info,
                Level::DEBUG => &self.0.debug,
                Level::TRACE => &self.0.trace,
                _ => return,
            };
            counter.fetch_add(1, Ordering::SeqCst);
        }

        fn enter(&self, _: &span::Id) {}

        fn exit(&self, _: &span::Id) {}
    }

    /// Emit one message through each macro at `verbosity`, returning
    /// the (info, debug, trace) event counts.
    fn emitted_at(verbosity: u8) -> (usize, usize, usize) {
        let counter = Arc::new(EventCounter::default());
        tracing::subscriber::with_default(CountingSubscriber(Arc::clone(&counter)), || {
            log_changes!(verbosity, "worker {} opened", 1);
            log_checks!(verbosity, "task {} checked", 2);
            log_debug!(verbosity, "queue holds {}", 3);
        });
        (
            counter.info.load(Ordering::SeqCst),
            counter.debug.load(Ordering::SeqCst),
            counter.trace.load(Ordering::SeqCst),
        )
    }

    #[test]
    fn test_macros_gate_on_verbosity() {
        assert_eq!(emitted_at(VERBOSITY_SILENT), (0, 0, 0));
        assert_eq!(emitted_at(VERBOSITY_CHANGES), (1, 0, 0));
        assert_eq!(emitted_at(VERBOSITY_CHECKS), (1, 1, 0));
        assert_eq!(emitted_at(VERBOSITY_DEBUG), (1, 1, 1));
    }

    #[test]
    fn test_levels_above_debug_still_emit_everything() {
        assert_eq!(emitted_at(u8::MAX), (1, 1, 1));
    }
}
