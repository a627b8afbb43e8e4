//! Tunable parameters for read reduction.

use fgreduce_dna::MAX_PHRED;

use crate::errors::{ReduceError, Result};

/// Default number of sites marked variable on each side of a disagreeing site.
pub const DEFAULT_CONTEXT_SIZE: usize = 10;
/// Default buffered width (in reference bases) required before a flush is attempted.
pub const DEFAULT_MIN_BUFFERED_WIDTH: usize = 250;
/// Default fraction of disagreeing observations at which a site stops being conserved.
pub const DEFAULT_MAX_DISAGREEING_FRACTION: f64 = 0.1;
/// Default minimum length of a clipped read kept in a variable span.
pub const DEFAULT_MIN_CLIPPED_READ_LENGTH: usize = 10;
/// Default maximum number of reads kept per variable span.
pub const DEFAULT_MAX_READS_PER_VARIABLE_SPAN: usize = 50;
/// Default ceiling on the quality of consensus bases.
pub const DEFAULT_MAX_CONSENSUS_QUALITY: u8 = 64;
/// Default mapping quality of consensus reads.
pub const DEFAULT_CONSENSUS_MAPPING_QUALITY: u8 = 60;
/// Default number of reads to accept without retrying a flush after a failed attempt.
pub const DEFAULT_RETRY_CYCLES: usize = 10;
/// Default suffix appended to a sample name to name its consensus read group.
pub const DEFAULT_REDUCED_SUFFIX: &str = ".reduced";
/// Default random seed for downsampling.
pub const DEFAULT_SEED: u64 = 42;

/// Options controlling how reads are reduced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReduceOptions {
    /// Sites within this distance of a disagreeing site are also variable.
    pub context_size: usize,
    /// A flush is attempted once the buffer spans more than this many reference bases.
    pub min_buffered_width: usize,
    /// A site is strongly conserved when its disagreeing fraction is below this value.
    pub max_disagreeing_fraction: f64,
    /// Clipped reads shorter than this are dropped from variable spans.
    pub min_clipped_read_length: usize,
    /// Variable spans with more reads than this are downsampled.
    pub max_reads_per_variable_span: usize,
    /// Consensus base qualities are capped at this value.
    pub max_consensus_quality: u8,
    /// Mapping quality assigned to consensus reads.
    pub consensus_mapping_quality: u8,
    /// Number of reads accepted without a flush attempt after a flush finds nothing to emit.
    pub retry_cycles: usize,
    /// Suffix appended to a sample name to form the consensus read group and sample.
    pub reduced_suffix: String,
    /// Seed for the per-sample downsampling random number generator.
    pub seed: u64,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            context_size: DEFAULT_CONTEXT_SIZE,
            min_buffered_width: DEFAULT_MIN_BUFFERED_WIDTH,
            max_disagreeing_fraction: DEFAULT_MAX_DISAGREEING_FRACTION,
            min_clipped_read_length: DEFAULT_MIN_CLIPPED_READ_LENGTH,
            max_reads_per_variable_span: DEFAULT_MAX_READS_PER_VARIABLE_SPAN,
            max_consensus_quality: DEFAULT_MAX_CONSENSUS_QUALITY,
            consensus_mapping_quality: DEFAULT_CONSENSUS_MAPPING_QUALITY,
            retry_cycles: DEFAULT_RETRY_CYCLES,
            reduced_suffix: DEFAULT_REDUCED_SUFFIX.to_string(),
            seed: DEFAULT_SEED,
        }
    }
}

impl ReduceOptions {
    /// Checks every option against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::InvalidOption`] for the first option out of range.
    pub fn validate(&self) -> Result<()> {
        fn invalid(option: &'static str, reason: String) -> Result<()> {
            Err(ReduceError::InvalidOption { option, reason })
        }

        if self.min_buffered_width == 0 {
            return invalid("min_buffered_width", "must be at least 1".to_string());
        }
        if !(self.max_disagreeing_fraction > 0.0 && self.max_disagreeing_fraction <= 1.0) {
            return invalid(
                "max_disagreeing_fraction",
                format!("must be in (0, 1], got {}", self.max_disagreeing_fraction),
            );
        }
        if self.min_clipped_read_length == 0 {
            return invalid("min_clipped_read_length", "must be at least 1".to_string());
        }
        if self.max_reads_per_variable_span == 0 {
            return invalid("max_reads_per_variable_span", "must be at least 1".to_string());
        }
        if self.max_consensus_quality == 0 || self.max_consensus_quality > MAX_PHRED {
            return invalid(
                "max_consensus_quality",
                format!("must be between 1 and {MAX_PHRED}, got {}", self.max_consensus_quality),
            );
        }
        if self.consensus_mapping_quality == u8::MAX {
            return invalid(
                "consensus_mapping_quality",
                "255 means unavailable and cannot be assigned".to_string(),
            );
        }
        if self.reduced_suffix.is_empty() {
            return invalid("reduced_suffix", "must not be empty".to_string());
        }
        Ok(())
    }

    /// Name of the sample and read group carried by consensus reads built for `sample`.
    #[must_use]
    pub fn reduced_sample_name(&self, sample: &str) -> String {
        format!("{sample}{}", self.reduced_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ReduceOptions::default().validate().is_ok());
    }

    #[rstest]
    #[case(ReduceOptions { min_buffered_width: 0, ..Default::default() }, "min_buffered_width")]
    #[case(ReduceOptions { max_disagreeing_fraction: 0.0, ..Default::default() }, "max_disagreeing_fraction")]
    #[case(ReduceOptions { max_disagreeing_fraction: 1.5, ..Default::default() }, "max_disagreeing_fraction")]
    #[case(ReduceOptions { max_disagreeing_fraction: f64::NAN, ..Default::default() }, "max_disagreeing_fraction")]
    #[case(ReduceOptions { min_clipped_read_length: 0, ..Default::default() }, "min_clipped_read_length")]
    #[case(ReduceOptions { max_reads_per_variable_span: 0, ..Default::default() }, "max_reads_per_variable_span")]
    #[case(ReduceOptions { max_consensus_quality: 0, ..Default::default() }, "max_consensus_quality")]
    #[case(ReduceOptions { max_consensus_quality: 94, ..Default::default() }, "max_consensus_quality")]
    #[case(ReduceOptions { consensus_mapping_quality: 255, ..Default::default() }, "consensus_mapping_quality")]
    #[case(ReduceOptions { reduced_suffix: String::new(), ..Default::default() }, "reduced_suffix")]
    fn test_invalid_options(#[case] options: ReduceOptions, #[case] expected_option: &str) {
        match options.validate() {
            Err(ReduceError::InvalidOption { option, .. }) => assert_eq!(option, expected_option),
            other => panic!("expected invalid {expected_option}, got {other:?}"),
        }
    }

    #[test]
    fn test_reduced_sample_name() {
        let options = ReduceOptions::default();
        assert_eq!(options.reduced_sample_name("NA12878"), "NA12878.reduced");
    }
}
