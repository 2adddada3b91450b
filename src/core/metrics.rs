//! Logger metrics for observability
//!
//! Counters for records written to the sink, sink write failures, and level
//! refreshes performed by the background controller.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by a logger and every logger derived from it
///
/// # Example
///
/// ```
/// use rust_log_facade::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records successfully written to the sink
    records_written: AtomicU64,

    /// Records lost because the sink returned an error
    write_failures: AtomicU64,

    /// Successful level provider calls
    level_refreshes: AtomicU64,

    /// Level provider calls that failed or panicked
    level_refresh_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            level_refreshes: AtomicU64::new(0),
            level_refresh_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn level_refreshes(&self) -> u64 {
        self.level_refreshes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn level_refresh_failures(&self) -> u64 {
        self.level_refresh_failures.load(Ordering::Relaxed)
    }

    /// Record a written record, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_level_refresh(&self) -> u64 {
        self.level_refreshes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_level_refresh_failure(&self) -> u64 {
        self.level_refresh_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Get write failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            write_failures: AtomicU64::new(self.write_failures()),
            level_refreshes: AtomicU64::new(self.level_refreshes()),
            level_refresh_failures: AtomicU64::new(self.level_refresh_failures()),
        }
    }
}
