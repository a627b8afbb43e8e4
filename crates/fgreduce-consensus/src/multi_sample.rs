//! Routing reads of several samples to per-sample compressors.

use ahash::AHashMap;

use fgreduce_metrics::reduction::ReductionMetrics;
use fgreduce_sam::AlignedRead;

use crate::compressor::SingleSampleCompressor;
use crate::errors::{ReduceError, Result};
use crate::options::ReduceOptions;

/// One [`SingleSampleCompressor`] per known sample, all bound to the same contig.
#[derive(Debug)]
pub struct MultiSampleCompressor {
    contig: usize,
    compressors: AHashMap<String, SingleSampleCompressor>,
}

impl MultiSampleCompressor {
    /// Creates a compressor for each of `samples` on `contig`.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::InvalidOption`] if `options` fail validation.
    pub fn new<I, S>(samples: I, contig: usize, options: &ReduceOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        options.validate()?;
        let compressors = samples
            .into_iter()
            .map(|sample| {
                let sample = sample.as_ref();
                (sample.to_string(), SingleSampleCompressor::new(sample, contig, options.clone()))
            })
            .collect();
        Ok(Self { contig, compressors })
    }

    /// The contig every compressor is bound to.
    #[must_use]
    pub fn contig(&self) -> usize {
        self.contig
    }

    /// Routes `read` to its sample's compressor and returns anything it emits.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::UnknownSample`] if the read's sample was not registered, or
    /// any error from the sample's compressor.
    pub fn add_alignment(&mut self, read: AlignedRead) -> Result<Vec<AlignedRead>> {
        let Some(compressor) = self.compressors.get_mut(read.sample()) else {
            return Err(ReduceError::UnknownSample {
                sample: read.sample().to_string(),
                read_name: read.name(),
            });
        };
        compressor.add_alignment(read)
    }

    /// Closes every compressor, in sample name order, and concatenates their output.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a compressor.
    pub fn close(&mut self) -> Result<Vec<AlignedRead>> {
        let mut samples: Vec<&String> = self.compressors.keys().collect();
        samples.sort();
        let samples: Vec<String> = samples.into_iter().cloned().collect();

        let mut emitted = Vec::new();
        for sample in samples {
            if let Some(compressor) = self.compressors.get_mut(&sample) {
                emitted.extend(compressor.close()?);
            }
        }
        Ok(emitted)
    }

    /// Per-sample metrics, sorted by sample name.
    #[must_use]
    pub fn metrics(&self) -> Vec<ReductionMetrics> {
        let mut metrics: Vec<ReductionMetrics> =
            self.compressors.values().map(|c| c.metrics().clone()).collect();
        metrics.sort_by(|a, b| a.sample.cmp(&b.sample));
        metrics
    }
}
