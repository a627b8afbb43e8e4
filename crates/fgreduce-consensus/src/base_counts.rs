//! Per-position nucleotide frequency table.

use fgreduce_dna::{DNA_BASE_COUNT, DNA_BASES, base_index};

/// Counts of A, C, G and T observed at one reference position.
///
/// Ambiguous and other non-ACGT symbols are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseCounts {
    counts: [u32; DNA_BASE_COUNT],
}

impl BaseCounts {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation of `base`. Returns false if the base was not counted.
    pub fn increment(&mut self, base: u8) -> bool {
        match base_index(base) {
            Some(idx) => {
                self.counts[idx] += 1;
                true
            }
            None => false,
        }
    }

    /// Returns the count for `base`, or zero for bases outside the alphabet.
    #[must_use]
    pub fn count_of(&self, base: u8) -> u32 {
        base_index(base).map_or(0, |idx| self.counts[idx])
    }

    /// Returns the most frequently observed base. Ties resolve to the base listed first in
    /// [`DNA_BASES`]; an empty table reports `A`.
    #[must_use]
    pub fn majority_base(&self) -> u8 {
        DNA_BASES[self.majority_index()]
    }

    /// Returns the count of the majority base.
    #[must_use]
    pub fn majority_count(&self) -> u32 {
        self.counts[self.majority_index()]
    }

    /// Returns the total number of counted observations.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Returns true if nothing has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    fn majority_index(&self) -> usize {
        let mut best = 0;
        for idx in 1..DNA_BASE_COUNT {
            if self.counts[idx] > self.counts[best] {
                best = idx;
            }
        }
        best
    }
}
