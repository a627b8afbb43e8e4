//! Reduce a coordinate-sorted BAM by replacing runs of agreeing reads with consensus reads.
//!
//! Records are streamed one contig at a time through a [`MultiSampleCompressor`]. Wherever
//! every read agrees, a single synthetic consensus read per sample replaces the pileup;
//! wherever any read disagrees, the original reads are clipped to the disagreeing span and
//! (if too deep) downsampled.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use fgreduce_lib::bam_io::{BamWriter, create_bam_reader, create_bam_writer, finish_bam_writer};
use fgreduce_lib::consensus::MultiSampleCompressor;
use fgreduce_lib::header::build_reduced_header;
use fgreduce_lib::logging::{OperationTimer, log_reduction_summary};
use fgreduce_lib::metrics::{ReductionMetrics, write_metrics_auto};
use fgreduce_lib::progress::ProgressTracker;
use fgreduce_lib::sam::{AlignedRead, is_coordinate_sorted};
use fgreduce_lib::samples::SampleResolver;
use log::{debug, info};
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;

use crate::commands::command::Command;
use crate::commands::common::{BamIoOptions, ReductionOptions, ThreadingOptions};

/// Reduce deep pileups to consensus reads.
#[derive(Debug, Parser)]
#[command(
    name = "reduce",
    about = "\x1b[38;5;72m[REDUCTION]\x1b[0m      \x1b[36mReplace agreeing reads with consensus reads\x1b[0m",
    long_about = r#"
Reduce a coordinate-sorted BAM by replacing redundant reads with consensus reads.

Reads are grouped by sample (via the SM field of each read's read group) and processed one
contig at a time. Every reference position is classified as conserved or variable:

  - A position is variable when the fraction of reads disagreeing with the most common
    observation reaches --max-disagreeing-fraction. Positions within --context-size bases
    of a variable position are also variable.
  - Each maximal run of conserved positions is replaced by one consensus read per sample
    carrying the majority base at each position and a quality equal to its read count
    (capped at --max-consensus-quality). Per-base depths are stored in the cd tag.
  - Each maximal run of variable positions keeps the original reads, hard-clipped to the
    run. Clipped reads shorter than --min-clipped-read-length are dropped and runs with
    more than --max-reads-per-variable-span reads are randomly downsampled.

Duplicate, secondary, supplementary and unmapped reads are dropped. Consensus reads are
assigned to a new read group named after their sample with --reduced-suffix appended.

The output is not coordinate sorted; sort it before indexing.

Example usage:
  fgreduce reduce -i aligned.bam -o reduced.bam
  fgreduce reduce -i aligned.bam -o reduced.bam --context-size 5 --metrics reduce.metrics.txt
"#
)]
pub struct Reduce {
    /// Input/output BAM options
    #[command(flatten)]
    pub io: BamIoOptions,

    /// Optional output file for per-sample reduction metrics
    #[arg(long = "metrics")]
    pub metrics: Option<PathBuf>,

    /// Threading options
    #[command(flatten)]
    pub threading: ThreadingOptions,

    /// Reduction options
    #[command(flatten)]
    pub reduction: ReductionOptions,
}

impl Command for Reduce {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.io.validate()?;
        self.threading.validate()?;
        let options = self.reduction.to_reduce_options()?;

        let timer = OperationTimer::new("Reducing reads");

        info!("Starting Reduce");
        info!("Input: {}", self.io.input.display());
        info!("Output: {}", self.io.output.display());
        if let Some(ref metrics) = self.metrics {
            info!("Metrics: {}", metrics.display());
        }
        info!("Threads: {}", self.threading.threads);
        info!("Context size: {}", options.context_size);
        info!("Minimum buffered width: {}", options.min_buffered_width);
        info!("Maximum disagreeing fraction: {}", options.max_disagreeing_fraction);
        info!("Minimum clipped read length: {}", options.min_clipped_read_length);
        info!("Maximum reads per variable span: {}", options.max_reads_per_variable_span);
        info!("Maximum consensus quality: {}", options.max_consensus_quality);
        info!("Retry cycles: {}", options.retry_cycles);
        info!("Random seed: {}", options.seed);

        let (mut reader, header) = create_bam_reader(&self.io.input, self.threading.threads)?;
        if !is_coordinate_sorted(&header) {
            bail!(
                "Input BAM must be coordinate sorted (SO:coordinate).\n\n\
                Sort the input first, e.g. with `samtools sort`."
            );
        }

        let resolver = SampleResolver::from_header(&header);
        let reduced_samples: Vec<String> =
            resolver.samples().iter().map(|s| options.reduced_sample_name(s)).collect();
        info!("Samples: {}", resolver.samples().join(", "));

        let out_header = build_reduced_header(
            &header,
            &reduced_samples,
            crate::version::VERSION.as_str(),
            command_line,
        )?;
        let mut writer = create_bam_writer(&self.io.output, &out_header, self.threading.threads)?;

        let progress = ProgressTracker::new("Processed records").with_interval(1_000_000);
        let mut metrics: BTreeMap<String, ReductionMetrics> = resolver
            .samples()
            .iter()
            .map(|s| (s.clone(), ReductionMetrics::new(s.as_str())))
            .collect();
        let mut finished_contigs: HashSet<usize> = HashSet::new();
        let mut current: Option<MultiSampleCompressor> = None;
        let mut unplaced: u64 = 0;
        let mut written: u64 = 0;

        info!("Processing reads...");

        for result in reader.record_bufs(&header) {
            let record = result.context("Failed to read record from input BAM")?;
            progress.log_if_needed(1);

            let Some(contig) = record.reference_sequence_id() else {
                unplaced += 1;
                continue;
            };

            if current.as_ref().is_none_or(|c| c.contig() != contig) {
                if let Some(mut done) = current.take() {
                    written += finish_contig(&mut done, &out_header, &mut writer, &mut metrics)?;
                    finished_contigs.insert(done.contig());
                }
                if finished_contigs.contains(&contig) {
                    bail!(
                        "Records for contig {} appear after another contig; input is not coordinate sorted",
                        contig_name(&header, contig)
                    );
                }
                current = Some(MultiSampleCompressor::new(resolver.samples(), contig, &options)?);
            }

            let sample = resolver.resolve(&record)?.to_string();
            if let Some(compressor) = current.as_mut() {
                let emitted = compressor.add_alignment(AlignedRead::new(record, sample))?;
                written += write_reads(&out_header, &mut writer, &emitted)?;
            }
        }

        if let Some(mut done) = current.take() {
            written += finish_contig(&mut done, &out_header, &mut writer, &mut metrics)?;
        }

        progress.log_final();
        finish_bam_writer(writer)?;

        let mut rows: Vec<ReductionMetrics> = metrics.into_values().collect();
        for row in &mut rows {
            row.finalize();
        }
        let all = ReductionMetrics::summarize(&rows);

        if let Some(ref path) = self.metrics {
            let mut output = rows.clone();
            output.push(all.clone());
            write_metrics_auto(path, &output)?;
            info!("Wrote metrics to: {}", path.display());
        }

        info!("=== Summary ===");
        if unplaced > 0 {
            info!("Skipped {unplaced} records without a reference sequence");
        }
        log_reduction_summary(&all);
        info!("Records written: {written}");
        info!("Output BAM: {}", self.io.output.display());

        timer.log_completion(progress.count());
        Ok(())
    }
}

/// Closes the compressor for a finished contig, writes what it emits and folds its metrics in.
fn finish_contig(
    compressor: &mut MultiSampleCompressor,
    header: &Header,
    writer: &mut BamWriter,
    metrics: &mut BTreeMap<String, ReductionMetrics>,
) -> Result<u64> {
    let emitted = compressor.close()?;
    let count = write_reads(header, writer, &emitted)?;

    for row in compressor.metrics() {
        metrics
            .entry(row.sample.clone())
            .or_insert_with(|| ReductionMetrics::new(row.sample.as_str()))
            .merge(&row);
    }
    debug!(
        "Finished contig {}: wrote {count} records on close",
        contig_name(header, compressor.contig())
    );
    Ok(count)
}

fn write_reads(header: &Header, writer: &mut BamWriter, reads: &[AlignedRead]) -> Result<u64> {
    for read in reads {
        writer.write_alignment_record(header, read.record())?;
    }
    Ok(reads.len() as u64)
}

fn contig_name(header: &Header, contig: usize) -> String {
    header
        .reference_sequences()
        .get_index(contig)
        .map_or_else(|| contig.to_string(), |(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contig_name_falls_back_to_index() {
        let header = Header::default();
        assert_eq!(contig_name(&header, 3), "3");
    }
}
