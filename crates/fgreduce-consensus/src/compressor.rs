//! The single-sample compressor.
//!
//! A [`SingleSampleCompressor`] buffers the coordinate-sorted reads of one sample on one
//! contig. Once the buffer is wide enough it builds [`ReferenceSite`]s over the buffered
//! window, classifies them into spans and emits:
//!
//! - one synthetic consensus read per conserved span, and
//! - the original reads clipped to each variable span, downsampled to a fixed maximum.
//!
//! The last span of a window is held back because reads not yet seen may still extend it.
//! When holding it back leaves nothing to emit, flush attempts are suppressed for the next
//! [`ReduceOptions::retry_cycles`] reads.

use std::collections::VecDeque;

use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use fgreduce_metrics::ProcessingMetrics;
use fgreduce_metrics::reduction::ReductionMetrics;
use fgreduce_sam::{AlignedRead, clip_to_span};

use crate::consensus::{ConsensusTemplate, build_consensus_read};
use crate::errors::{ReduceError, Result};
use crate::options::ReduceOptions;
use crate::site::{ReferenceSite, SpanType, build_sites};
use crate::span::{Span, classify};

/// Buffers and reduces the reads of one sample on one contig.
#[derive(Debug)]
pub struct SingleSampleCompressor {
    sample: String,
    reduced_sample: String,
    contig: usize,
    options: ReduceOptions,
    reads: VecDeque<AlignedRead>,
    retry_countdown: usize,
    last_processed: Option<usize>,
    consensus_counter: u64,
    rng: StdRng,
    metrics: ReductionMetrics,
}

impl SingleSampleCompressor {
    /// Creates a compressor for `sample` bound to the reference sequence `contig`.
    ///
    /// Options are expected to have been validated by the caller.
    #[must_use]
    pub fn new(sample: &str, contig: usize, options: ReduceOptions) -> Self {
        Self {
            sample: sample.to_string(),
            reduced_sample: options.reduced_sample_name(sample),
            contig,
            rng: StdRng::seed_from_u64(options.seed),
            options,
            reads: VecDeque::new(),
            retry_countdown: 0,
            last_processed: None,
            consensus_counter: 0,
            metrics: ReductionMetrics::new(sample),
        }
    }

    /// The sample this compressor reduces.
    #[must_use]
    pub fn sample(&self) -> &str {
        &self.sample
    }

    /// The sample and read group carried by consensus reads.
    #[must_use]
    pub fn reduced_sample(&self) -> &str {
        &self.reduced_sample
    }

    /// The reference sequence this compressor is bound to.
    #[must_use]
    pub fn contig(&self) -> usize {
        self.contig
    }

    /// Number of reads currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.reads.len()
    }

    /// Counts accumulated so far.
    #[must_use]
    pub fn metrics(&self) -> &ReductionMetrics {
        &self.metrics
    }

    /// Adds the next read and returns any reads emitted by a triggered flush.
    ///
    /// Duplicate, secondary, supplementary and unmapped reads are counted and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::ContigMismatch`] if the read is placed on another contig,
    /// [`ReduceError::OutOfOrder`] if it starts before the first buffered read, or any error
    /// raised while flushing.
    pub fn add_alignment(&mut self, read: AlignedRead) -> Result<Vec<AlignedRead>> {
        if let Some(found) = read.contig()
            && found != self.contig
        {
            return Err(ReduceError::ContigMismatch {
                read_name: read.name(),
                expected: self.contig,
                found: Some(found),
            });
        }

        let head_start = self.head_start();
        if let (Some(start), Some(head_start)) = (read.start(), head_start)
            && start < head_start
        {
            return Err(ReduceError::OutOfOrder { read_name: read.name(), start, head_start });
        }

        self.metrics.input_reads += 1;

        let mut emitted = Vec::new();
        if self.retry_countdown > 0 {
            self.retry_countdown -= 1;
        } else if let (Some(start), Some(head_start)) = (read.start(), head_start)
            && start - head_start > self.options.min_buffered_width
        {
            emitted = self.flush(false)?;
        }

        if read.is_filtered() {
            self.metrics.filtered_reads += 1;
        } else {
            self.reads.push_back(read);
        }

        Ok(emitted)
    }

    /// Flushes every buffered read, including the trailing span, and returns the output.
    ///
    /// # Errors
    ///
    /// Returns any error raised while flushing.
    pub fn close(&mut self) -> Result<Vec<AlignedRead>> {
        let emitted = self.flush(true)?;
        self.metrics.finalize();
        debug!(
            "Closed compressor for sample {} on reference {}: {} reads in, {} reads out",
            self.sample,
            self.contig,
            self.metrics.total_input(),
            self.metrics.total_output()
        );
        Ok(emitted)
    }

    fn head_start(&self) -> Option<usize> {
        self.reads.front().and_then(AlignedRead::start)
    }

    fn flush(&mut self, use_all_remaining_reads: bool) -> Result<Vec<AlignedRead>> {
        let Some(head_start) = self.head_start() else {
            return Ok(Vec::new());
        };
        let window_start = self.last_processed.map_or(head_start, |p| head_start.max(p + 1));
        let window_end = self.reads.iter().filter_map(AlignedRead::end).max().unwrap_or(0);
        if window_end < window_start {
            self.reads.clear();
            return Ok(Vec::new());
        }

        let reads = self.reads.make_contiguous();
        let mut sites = build_sites(reads, window_start, window_end)?;
        let mut spans = classify(
            &mut sites,
            self.options.context_size,
            self.options.max_disagreeing_fraction,
        )?;
        trace!(
            "Window {window_start}-{window_end} of sample {} holds {} reads in {} spans",
            self.sample,
            reads.len(),
            spans.len()
        );

        if !use_all_remaining_reads {
            spans.pop();
            if spans.is_empty() {
                trace!(
                    "No finished span in window {window_start}-{window_end}; waiting {} reads",
                    self.options.retry_cycles
                );
                self.retry_countdown = self.options.retry_cycles;
                return Ok(Vec::new());
            }
        }
        let Some(last) = spans.last() else {
            return Ok(Vec::new());
        };
        self.last_processed = Some(last.stop);

        let mut emitted = Vec::new();
        for span in &spans {
            match span.span_type {
                SpanType::Conserved => {
                    self.metrics.conserved_spans += 1;
                    if let Some(read) = self.consensus_read(span.sites(&sites)) {
                        emitted.push(read);
                    }
                }
                SpanType::Variable => {
                    self.metrics.variable_spans += 1;
                    emitted.extend(self.variable_reads(span, &sites)?);
                }
            }
        }

        let last_processed = last.stop;
        self.reads.retain(|read| read.end().is_some_and(|end| end > last_processed));
        debug!(
            "Flushed {} spans up to {last_processed} for sample {}: {} reads emitted, {} still buffered",
            spans.len(),
            self.sample,
            emitted.len(),
            self.reads.len()
        );

        Ok(emitted)
    }

    fn consensus_read(&mut self, sites: &[ReferenceSite]) -> Option<AlignedRead> {
        let name = format!("{}.{}", self.reduced_sample, self.consensus_counter);
        let template = ConsensusTemplate {
            reduced_sample: &self.reduced_sample,
            contig: self.contig,
            mapping_quality: self.options.consensus_mapping_quality,
            max_quality: self.options.max_consensus_quality,
        };
        let read = build_consensus_read(sites, &name, &template)?;
        self.consensus_counter += 1;
        self.metrics.consensus_reads += 1;
        Some(read)
    }

    /// Clips every read touching `span` to its boundaries, drops short results and
    /// downsamples the rest. Output keeps buffer order.
    fn variable_reads(&mut self, span: &Span, sites: &[ReferenceSite]) -> Result<Vec<AlignedRead>> {
        let mut indices: Vec<usize> = span
            .sites(sites)
            .iter()
            .flat_map(|site| site.pileup().iter().map(|element| element.read_index))
            .collect();
        indices.sort_unstable();
        indices.dedup();

        let mut clipped: Vec<(usize, AlignedRead)> = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(read) = self.reads.get(index) else { continue };
            match clip_to_span(read, span.start, span.stop)? {
                Some(read) if read.len() >= self.options.min_clipped_read_length => {
                    clipped.push((index, read));
                }
                _ => self.metrics.short_clipped_reads += 1,
            }
        }

        let max_reads = self.options.max_reads_per_variable_span;
        if clipped.len() > max_reads {
            self.metrics.downsampled_reads += (clipped.len() - max_reads) as u64;
            clipped.shuffle(&mut self.rng);
            clipped.truncate(max_reads);
            clipped.sort_unstable_by_key(|(index, _)| *index);
        }

        self.metrics.variable_reads += clipped.len() as u64;
        Ok(clipped.into_iter().map(|(_, read)| read).collect())
    }
}
