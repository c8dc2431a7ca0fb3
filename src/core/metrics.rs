//! Writer metrics for observability
//!
//! Counts successful and failed inserts. `Logger::log` discards write
//! errors, so these counters are the only place such failures show up
//! when no error observer is installed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Insert counters shared by every logger built on one writer
///
/// # Example
///
/// ```
/// use clickhouse_logger::WriterMetrics;
///
/// let metrics = WriterMetrics::new();
///
/// metrics.record_written();
/// metrics.record_failed();
///
/// assert_eq!(metrics.total_written(), 1);
/// assert_eq!(metrics.failed_writes(), 1);
/// assert_eq!(metrics.failure_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct WriterMetrics {
    /// Rows inserted successfully
    total_written: AtomicU64,

    /// Inserts that returned an error
    failed_writes: AtomicU64,
}

impl WriterMetrics {
    pub const fn new() -> Self {
        Self {
            total_written: AtomicU64::new(0),
            failed_writes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_written(&self) -> u64 {
        self.total_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Record a successful insert, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.total_written.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed insert, returning the previous count
    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed_writes.fetch_add(1, Ordering::Relaxed)
    }

    /// Failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_writes() as f64;
        let total = self.total_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for WriterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WriterMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            total_written: AtomicU64::new(self.total_written()),
            failed_writes: AtomicU64::new(self.failed_writes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = WriterMetrics::new();
        assert_eq!(metrics.total_written(), 0);
        assert_eq!(metrics.failed_writes(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = WriterMetrics::new();
        assert_eq!(metrics.record_failed(), 0);
        assert_eq!(metrics.record_failed(), 1);
        assert_eq!(metrics.failed_writes(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = WriterMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_failed();
        }

        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let metrics = WriterMetrics::new();
        metrics.record_written();

        let snapshot = metrics.clone();
        metrics.record_written();

        assert_eq!(snapshot.total_written(), 1);
        assert_eq!(metrics.total_written(), 2);
    }
}
