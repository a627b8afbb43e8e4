//! Progress tracking utilities
//!
//! Logs a line each time the number of processed items crosses a multiple of the interval.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Progress tracker for logging progress at regular intervals.
///
/// # Example
/// ```
/// use fgreduce_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Processed records").with_interval(100);
///
/// for _ in 0..250 {
///     tracker.log_if_needed(1);  // Logs at 100, 200
/// }
/// tracker.log_final();  // Logs "Processed records 250 (complete)"
/// ```
pub struct ProgressTracker {
    /// The logging interval - progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    /// Internal count of items processed.
    count: AtomicU64,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message and an interval of 10,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 10_000, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Set the logging interval. A zero interval is treated as 1.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Add to the count and log once for each interval boundary crossed.
    ///
    /// Returns `true` if the new count is exactly a multiple of the interval.
    ///
    /// # Example
    /// ```
    /// use fgreduce_lib::progress::ProgressTracker;
    ///
    /// let tracker = ProgressTracker::new("Items").with_interval(100);
    /// tracker.log_if_needed(50);   // count=50, returns false, no log
    /// tracker.log_if_needed(60);   // count=110, returns false, logs "Items 100"
    /// tracker.log_if_needed(90);   // count=200, returns true, logs "Items 200"
    /// ```
    pub fn log_if_needed(&self, additional: u64) -> bool {
        if additional == 0 {
            let count = self.count.load(Ordering::Relaxed);
            return count > 0 && count.is_multiple_of(self.interval);
        }

        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        for i in (prev / self.interval + 1)..=(new_count / self.interval) {
            info!("{} {}", self.message, i * self.interval);
        }

        new_count.is_multiple_of(self.interval)
    }

    /// Log the final count unless the last call to [`Self::log_if_needed`] already did.
    pub fn log_final(&self) {
        if !self.log_if_needed(0) {
            let count = self.count.load(Ordering::Relaxed);
            if count > 0 {
                info!("{} {} (complete)", self.message, count);
            }
        }
    }

    /// The current count of items processed.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
