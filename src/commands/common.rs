//! Common CLI options shared across commands.
//!
//! Argument structures composed into command structs with `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use fgreduce_lib::consensus::ReduceOptions;
use fgreduce_lib::consensus::options::{
    DEFAULT_CONSENSUS_MAPPING_QUALITY, DEFAULT_CONTEXT_SIZE, DEFAULT_MAX_CONSENSUS_QUALITY,
    DEFAULT_MAX_DISAGREEING_FRACTION, DEFAULT_MAX_READS_PER_VARIABLE_SPAN,
    DEFAULT_MIN_BUFFERED_WIDTH, DEFAULT_MIN_CLIPPED_READ_LENGTH, DEFAULT_REDUCED_SUFFIX,
    DEFAULT_RETRY_CYCLES, DEFAULT_SEED,
};
use fgreduce_lib::validation::{validate_distinct_paths, validate_file_exists, validate_positive};

/// Common input/output options for commands that read a BAM and write a BAM.
#[derive(Debug, Clone, Args)]
pub struct BamIoOptions {
    /// Input BAM file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output BAM file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

impl BamIoOptions {
    /// Validates that the input file exists and differs from the output.
    ///
    /// # Errors
    ///
    /// Returns an error if the input file does not exist or is also the output.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_file_exists(&self.input, "Input BAM")?;
        validate_distinct_paths(&self.input, &self.output, "output")?;
        Ok(())
    }
}

/// Options for BGZF threading.
#[derive(Debug, Clone, Args)]
pub struct ThreadingOptions {
    /// Number of threads used for BAM decompression and compression.
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    pub threads: usize,
}

impl ThreadingOptions {
    /// Validates that at least one thread is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if `threads` is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_positive(self.threads, "threads")?;
        Ok(())
    }
}

/// Options controlling how reads are reduced.
#[derive(Debug, Clone, Args)]
pub struct ReductionOptions {
    /// Sites within this many bases of a disagreeing site are kept as original reads.
    #[arg(short = 'c', long = "context-size", default_value_t = DEFAULT_CONTEXT_SIZE)]
    pub context_size: usize,

    /// Buffered width, in reference bases, required before spans are emitted.
    #[arg(short = 'w', long = "min-buffered-width", default_value_t = DEFAULT_MIN_BUFFERED_WIDTH)]
    pub min_buffered_width: usize,

    /// A site is conserved when the fraction of reads disagreeing with the majority is below this.
    #[arg(
        short = 'f',
        long = "max-disagreeing-fraction",
        default_value_t = DEFAULT_MAX_DISAGREEING_FRACTION
    )]
    pub max_disagreeing_fraction: f64,

    /// Clipped reads shorter than this are dropped from variable spans.
    #[arg(
        short = 'l',
        long = "min-clipped-read-length",
        default_value_t = DEFAULT_MIN_CLIPPED_READ_LENGTH
    )]
    pub min_clipped_read_length: usize,

    /// Maximum number of reads kept per variable span; extra reads are downsampled.
    #[arg(
        short = 'm',
        long = "max-reads-per-variable-span",
        default_value_t = DEFAULT_MAX_READS_PER_VARIABLE_SPAN
    )]
    pub max_reads_per_variable_span: usize,

    /// Ceiling on consensus base qualities.
    #[arg(long = "max-consensus-quality", default_value_t = DEFAULT_MAX_CONSENSUS_QUALITY)]
    pub max_consensus_quality: u8,

    /// Mapping quality assigned to consensus reads.
    #[arg(long = "consensus-mapping-quality", default_value_t = DEFAULT_CONSENSUS_MAPPING_QUALITY)]
    pub consensus_mapping_quality: u8,

    /// Reads accepted without a flush attempt after a flush finds no finished span.
    #[arg(long = "retry-cycles", default_value_t = DEFAULT_RETRY_CYCLES)]
    pub retry_cycles: usize,

    /// Suffix appended to each sample name to name its consensus read group.
    #[arg(long = "reduced-suffix", default_value = DEFAULT_REDUCED_SUFFIX)]
    pub reduced_suffix: String,

    /// Random seed for downsampling variable spans.
    #[arg(long = "seed", default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl Default for ReductionOptions {
    fn default() -> Self {
        Self::from(&ReduceOptions::default())
    }
}

impl From<&ReduceOptions> for ReductionOptions {
    fn from(options: &ReduceOptions) -> Self {
        Self {
            context_size: options.context_size,
            min_buffered_width: options.min_buffered_width,
            max_disagreeing_fraction: options.max_disagreeing_fraction,
            min_clipped_read_length: options.min_clipped_read_length,
            max_reads_per_variable_span: options.max_reads_per_variable_span,
            max_consensus_quality: options.max_consensus_quality,
            consensus_mapping_quality: options.consensus_mapping_quality,
            retry_cycles: options.retry_cycles,
            reduced_suffix: options.reduced_suffix.clone(),
            seed: options.seed,
        }
    }
}

impl ReductionOptions {
    /// Converts the arguments into validated engine options.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first option out of range.
    pub fn to_reduce_options(&self) -> anyhow::Result<ReduceOptions> {
        let options = ReduceOptions {
            context_size: self.context_size,
            min_buffered_width: self.min_buffered_width,
            max_disagreeing_fraction: self.max_disagreeing_fraction,
            min_clipped_read_length: self.min_clipped_read_length,
            max_reads_per_variable_span: self.max_reads_per_variable_span,
            max_consensus_quality: self.max_consensus_quality,
            consensus_mapping_quality: self.consensus_mapping_quality,
            retry_cycles: self.retry_cycles,
            reduced_suffix: self.reduced_suffix.clone(),
            seed: self.seed,
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reduction_options_round_trip() {
        let options = ReductionOptions::default().to_reduce_options().unwrap();
        assert_eq!(options, ReduceOptions::default());
    }

    #[test]
    fn test_invalid_reduction_options() {
        let args = ReductionOptions { max_consensus_quality: 0, ..ReductionOptions::default() };
        let msg = args.to_reduce_options().unwrap_err().to_string();
        assert!(msg.contains("max_consensus_quality"));
    }

    #[test]
    fn test_bam_io_rejects_missing_input() {
        let io = BamIoOptions {
            input: PathBuf::from("/nonexistent/in.bam"),
            output: PathBuf::from("/tmp/out.bam"),
        };
        assert!(io.validate().is_err());
    }

    #[test]
    fn test_threading_rejects_zero_threads() {
        let msg = ThreadingOptions { threads: 0 }.validate().unwrap_err().to_string();
        assert!(msg.contains("Invalid parameter 'threads'"));
        assert!(ThreadingOptions { threads: 4 }.validate().is_ok());
    }
}
