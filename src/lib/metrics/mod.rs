//! Metrics collection and reporting for fgreduce operations.
//!
//! - [`reduction`] - Per-sample read-reduction metrics
//! - [`writer`] - Metrics file I/O utilities

pub use fgreduce_metrics::{Metric, ProcessingMetrics, format_count, reduction, writer};

pub use reduction::{ALL_SAMPLES, ReductionMetrics};
pub use writer::{write_metrics, write_metrics_auto};
