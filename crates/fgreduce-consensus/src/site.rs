//! Reference sites: the per-coordinate aggregation of read observations in a window.
//!
//! Sites are built fresh for every flush of a compressor and dropped once spans have been
//! derived from them. Reads are referenced by their index into the compressor's buffer
//! rather than by pointer, so a window of sites never outlives the buffer it indexes.

use fgreduce_sam::{AlignedRead, walk};

use crate::base_counts::BaseCounts;
use crate::errors::{ReduceError, Result};

/// Classification of a site, and of the spans built from runs of sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanType {
    /// The site and its surroundings agree strongly enough to be replaced by a consensus.
    Conserved,
    /// The site is within the context of a disagreement; original reads are kept.
    Variable,
}

impl SpanType {
    /// Returns the other classification.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Conserved => Self::Variable,
            Self::Variable => Self::Conserved,
        }
    }
}

/// One read base observed at a reference site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PileupElement {
    /// Index of the read in the buffer the window was built from
    pub read_index: usize,
    /// 0-based offset of the base within the read
    pub read_offset: usize,
    /// The observed base
    pub base: u8,
    /// Quality of the observed base
    pub quality: u8,
}

/// Aggregated observations at one reference coordinate.
#[derive(Debug, Clone)]
pub struct ReferenceSite {
    position: usize,
    offset: usize,
    counts: BaseCounts,
    pileup: Vec<PileupElement>,
    classification: Option<SpanType>,
}

impl ReferenceSite {
    /// Creates an empty site at the 1-based `position`, `offset` bases into its window.
    #[must_use]
    pub fn new(position: usize, offset: usize) -> Self {
        Self { position, offset, counts: BaseCounts::new(), pileup: Vec::new(), classification: None }
    }

    /// The 1-based reference coordinate.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Offset of this site within its window.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The base frequency table.
    #[must_use]
    pub fn counts(&self) -> &BaseCounts {
        &self.counts
    }

    /// The read bases observed at this site.
    #[must_use]
    pub fn pileup(&self) -> &[PileupElement] {
        &self.pileup
    }

    /// Records an observation.
    pub fn add_contribution(&mut self, element: PileupElement) {
        self.counts.increment(element.base);
        self.pileup.push(element);
    }

    /// Number of counted base observations.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.counts.total_count()
    }

    /// Returns true if at least one countable base was observed.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        !self.counts.is_empty()
    }

    /// Returns true if the fraction of observations disagreeing with the majority base is
    /// below `max_disagreeing_fraction`.
    ///
    /// The threshold is applied identically at every depth, so a site seen by only one or
    /// two reads flags variability as soon as a single read disagrees. A site without
    /// observations carries no evidence of disagreement and is reported as conserved.
    #[must_use]
    pub fn is_strongly_conserved(&self, max_disagreeing_fraction: f64) -> bool {
        let total = self.counts.total_count();
        if total == 0 {
            return true;
        }
        // Equivalent to `1 - majority / total < fraction` without the rounding of the subtraction.
        let disagreeing = total - self.counts.majority_count();
        f64::from(disagreeing) < max_disagreeing_fraction * f64::from(total)
    }

    /// Returns the majority base and its quality: the number of agreeing observations,
    /// capped at `max_quality`.
    ///
    /// Observations are counted, not reads. Inserted bases are attributed to the preceding
    /// site, so a read carrying an insertion that agrees with the majority base contributes
    /// more than one observation here and to the site's depth.
    #[must_use]
    pub fn consensus(&self, max_quality: u8) -> (u8, u8) {
        let agreeing = self.counts.majority_count();
        let quality = u8::try_from(agreeing).unwrap_or(u8::MAX).min(max_quality);
        (self.counts.majority_base(), quality)
    }

    /// Assigns the site's classification.
    pub fn set_classification(&mut self, classification: SpanType) {
        self.classification = Some(classification);
    }

    /// Returns the site's classification.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::UnsetClassification`] if the site has not been classified.
    pub fn classification(&self) -> Result<SpanType> {
        self.classification.ok_or(ReduceError::UnsetClassification { position: self.position })
    }
}

/// Builds one site per coordinate in `[window_start, window_end]` and attributes every
/// aligned or inserted base of `reads` that falls in the window.
///
/// # Errors
///
/// Returns an error if any read's alignment cannot be walked.
pub fn build_sites(
    reads: &[AlignedRead],
    window_start: usize,
    window_end: usize,
) -> Result<Vec<ReferenceSite>> {
    if window_end < window_start {
        return Ok(Vec::new());
    }

    let len = window_end - window_start + 1;
    let mut sites: Vec<ReferenceSite> =
        (0..len).map(|offset| ReferenceSite::new(window_start + offset, offset)).collect();

    for (read_index, read) in reads.iter().enumerate() {
        let bases = read.record().sequence().as_ref();
        let quals = read.record().quality_scores().as_ref();

        for step in walk(read.record(), window_start)? {
            let Some(read_offset) = step.read_offset else { continue };
            let Ok(site_offset) = usize::try_from(step.reference_offset) else { continue };
            let Some(site) = sites.get_mut(site_offset) else { continue };
            let Some(&base) = bases.get(read_offset) else { continue };
            let quality = quals.get(read_offset).copied().unwrap_or(0);
            site.add_contribution(PileupElement { read_index, read_offset, base, quality });
        }
    }

    Ok(sites)
}
