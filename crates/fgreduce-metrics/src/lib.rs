#![deny(unsafe_code)]

//! Structured metric types and TSV writer for fgreduce operations.
//!
//! This crate provides:
//! - [`Metric`] and [`ProcessingMetrics`] traits for metric types
//! - [`reduction`]: per-sample read-reduction metrics
//! - [`writer`]: TSV file output

pub mod reduction;
pub mod writer;

use serde::{Deserialize, Serialize};

/// Formats a count with thousands separators.
///
/// # Example
/// ```
/// use fgreduce_metrics::format_count;
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// assert_eq!(format_count(12), "12");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    s.as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages and logging.
    fn metric_name() -> &'static str;
}

/// Common interface for metrics that track processing pipeline counts.
pub trait ProcessingMetrics {
    /// Total number of input records processed.
    fn total_input(&self) -> u64;

    /// Total number of output records produced.
    fn total_output(&self) -> u64;

    /// Total number of input records filtered out before processing.
    fn total_filtered(&self) -> u64;
}

pub use reduction::ReductionMetrics;
pub use writer::{write_metrics, write_metrics_auto};
