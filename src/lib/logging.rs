//! Logging utilities for formatted output.
//!
//! Helpers for consistent formatting of percentages, durations and rates, a summary of
//! reduction metrics, and an [`OperationTimer`] that reports elapsed time on completion.

use std::time::{Duration, Instant};

use crate::metrics::{ProcessingMetrics, ReductionMetrics, format_count};

/// Formats a fraction (0.0-1.0) as a percentage with `decimals` decimal places.
///
/// # Examples
///
/// ```
/// use fgreduce_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form (e.g., "2m 15s", "1h 30m", "45s").
///
/// # Examples
///
/// ```
/// use fgreduce_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a rate of `count` items over `duration`.
///
/// # Examples
///
/// ```
/// use fgreduce_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 items/s");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} items/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} items/s", format_count(rate as u64))
    } else {
        let items_per_min = count as f64 / (secs / 60.0);
        format!("{items_per_min:.1} items/min")
    }
}

/// Logs a summary of reduction metrics.
///
/// ```no_run
/// use fgreduce_lib::logging::log_reduction_summary;
/// use fgreduce_lib::metrics::ReductionMetrics;
///
/// let mut metrics = ReductionMetrics::new("all");
/// metrics.input_reads = 10_000;
/// metrics.consensus_reads = 120;
/// metrics.variable_reads = 900;
/// metrics.finalize();
///
/// log_reduction_summary(&metrics);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn log_reduction_summary(metrics: &ReductionMetrics) {
    log::info!("Reduction Summary:");
    log::info!("  Input reads: {}", format_count(metrics.total_input()));
    log::info!("  Filtered reads: {}", format_count(metrics.total_filtered()));
    log::info!(
        "  Consensus reads: {} from {} conserved spans",
        format_count(metrics.consensus_reads),
        format_count(metrics.conserved_spans)
    );
    log::info!(
        "  Variable-span reads: {} from {} variable spans",
        format_count(metrics.variable_reads),
        format_count(metrics.variable_spans)
    );
    if metrics.short_clipped_reads > 0 || metrics.downsampled_reads > 0 {
        log::info!(
            "  Dropped from variable spans: {} too short, {} downsampled",
            format_count(metrics.short_clipped_reads),
            format_count(metrics.downsampled_reads)
        );
    }
    if metrics.input_reads > 0 {
        log::info!("  Output/input: {}", format_percent(metrics.reduction_ratio, 2));
    }
}

/// Operation timing and summary helper.
///
/// ```no_run
/// use fgreduce_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Reducing reads");
/// // ... do work ...
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
