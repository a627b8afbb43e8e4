//! Metrics for read reduction.
//!
//! One [`ReductionMetrics`] row is produced per sample, and rows can be merged into a
//! summary row covering every sample.

use serde::{Deserialize, Serialize};

use crate::{Metric, ProcessingMetrics};

/// Sample name used for the row summarising all samples.
pub const ALL_SAMPLES: &str = "all";

/// Counts describing how one sample's reads were reduced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReductionMetrics {
    /// The sample these metrics describe
    pub sample: String,
    /// Reads offered to the reducer
    pub input_reads: u64,
    /// Duplicate, secondary, supplementary or unmapped reads dropped on entry
    pub filtered_reads: u64,
    /// Synthetic consensus reads emitted for conserved spans
    pub consensus_reads: u64,
    /// Clipped original reads emitted for variable spans
    pub variable_reads: u64,
    /// Clipped reads dropped for being shorter than the minimum length
    pub short_clipped_reads: u64,
    /// Clipped reads dropped by downsampling
    pub downsampled_reads: u64,
    /// Conserved spans finalized
    pub conserved_spans: u64,
    /// Variable spans finalized
    pub variable_spans: u64,
    /// Emitted reads divided by input reads
    pub reduction_ratio: f64,
}

impl ReductionMetrics {
    /// Creates empty metrics for `sample`.
    #[must_use]
    pub fn new(sample: impl Into<String>) -> Self {
        Self { sample: sample.into(), ..Self::default() }
    }

    /// Adds the counts from `other` into this row. The ratio is recomputed by [`Self::finalize`].
    pub fn merge(&mut self, other: &ReductionMetrics) {
        self.input_reads += other.input_reads;
        self.filtered_reads += other.filtered_reads;
        self.consensus_reads += other.consensus_reads;
        self.variable_reads += other.variable_reads;
        self.short_clipped_reads += other.short_clipped_reads;
        self.downsampled_reads += other.downsampled_reads;
        self.conserved_spans += other.conserved_spans;
        self.variable_spans += other.variable_spans;
    }

    /// Computes derived fields.
    #[allow(clippy::cast_precision_loss)]
    pub fn finalize(&mut self) {
        self.reduction_ratio = if self.input_reads == 0 {
            0.0
        } else {
            self.total_output() as f64 / self.input_reads as f64
        };
    }

    /// Builds a summary row over `rows`, named [`ALL_SAMPLES`].
    #[must_use]
    pub fn summarize<'a>(rows: impl IntoIterator<Item = &'a ReductionMetrics>) -> Self {
        let mut all = Self::new(ALL_SAMPLES);
        for row in rows {
            all.merge(row);
        }
        all.finalize();
        all
    }
}

impl Metric for ReductionMetrics {
    fn metric_name() -> &'static str {
        "reduction"
    }
}

impl ProcessingMetrics for ReductionMetrics {
    fn total_input(&self) -> u64 {
        self.input_reads
    }

    fn total_output(&self) -> u64 {
        self.consensus_reads + self.variable_reads
    }

    fn total_filtered(&self) -> u64 {
        self.filtered_reads
    }
}
