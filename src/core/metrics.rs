//! Logger metrics for observability
//!
//! Counters for monitoring pipeline health: records delivered, records no
//! handler wanted, and per-handler failures that were isolated.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use channel_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_handled();
/// metrics.record_sink_failure();
///
/// assert_eq!(metrics.records_handled(), 1);
/// assert_eq!(metrics.sink_failures(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records passed to at least one handler
    records_handled: AtomicU64,

    /// Records no attached handler accepted
    records_ignored: AtomicU64,

    /// Handler calls that returned an error
    sink_failures: AtomicU64,

    /// Handler calls that panicked
    handler_panics: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_handled: AtomicU64::new(0),
            records_ignored: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            handler_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_handled(&self) -> u64 {
        self.records_handled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_ignored(&self) -> u64 {
        self.records_ignored.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_panics(&self) -> u64 {
        self.handler_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handled(&self) -> u64 {
        self.records_handled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_ignored(&self) -> u64 {
        self.records_ignored.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_panic(&self) -> u64 {
        self.handler_panics.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed handler calls per handled record, as a percentage
    ///
    /// Returns 0.0 if nothing has been handled yet.
    pub fn failure_rate(&self) -> f64 {
        let handled = self.records_handled();
        if handled == 0 {
            return 0.0;
        }
        let failed = self.sink_failures() + self.handler_panics();
        (failed as f64 / handled as f64) * 100.0
    }

    pub fn reset(&self) {
        self.records_handled.store(0, Ordering::Relaxed);
        self.records_ignored.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.handler_panics.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = LoggerMetrics::new();
        metrics.record_handled();
        metrics.record_handled();
        metrics.record_ignored();
        metrics.record_handler_panic();

        assert_eq!(metrics.records_handled(), 2);
        assert_eq!(metrics.records_ignored(), 1);
        assert_eq!(metrics.handler_panics(), 1);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..10 {
            metrics.record_handled();
        }
        metrics.record_sink_failure();

        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);

        metrics.reset();
        assert_eq!(metrics.records_handled(), 0);
    }
}
