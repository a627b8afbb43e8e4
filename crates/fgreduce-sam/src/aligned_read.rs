//! An alignment record bound to the sample it was sequenced from.

use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::cigar::op::Kind;

/// A single aligned read together with its resolved sample identifier.
///
/// The wrapped [`RecordBuf`] carries the read name, reference sequence id (the contig),
/// 1-based alignment start, CIGAR, bases, qualities, flags and tags. Sample resolution
/// happens before a read reaches the reducer, so the sample is stored alongside the record.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRead {
    record: RecordBuf,
    sample: String,
}

impl AlignedRead {
    /// Creates a new aligned read for `sample`.
    #[must_use]
    pub fn new(record: RecordBuf, sample: impl Into<String>) -> Self {
        Self { record, sample: sample.into() }
    }

    /// Returns the underlying record.
    #[must_use]
    pub fn record(&self) -> &RecordBuf {
        &self.record
    }

    /// Returns a mutable reference to the underlying record.
    pub fn record_mut(&mut self) -> &mut RecordBuf {
        &mut self.record
    }

    /// Returns the resolved sample identifier.
    #[must_use]
    pub fn sample(&self) -> &str {
        &self.sample
    }

    /// Returns the read name, or an empty string for unnamed records.
    #[must_use]
    pub fn name(&self) -> String {
        self.record.name().map(|n| n.to_string()).unwrap_or_default()
    }

    /// Returns the reference sequence id the read is aligned to.
    #[must_use]
    pub fn contig(&self) -> Option<usize> {
        self.record.reference_sequence_id()
    }

    /// Returns the 1-based alignment start.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.record.alignment_start().map(usize::from)
    }

    /// Returns the number of reference bases covered by the alignment.
    #[must_use]
    pub fn reference_length(&self) -> usize {
        reference_length(self.record.cigar().as_ref().iter().map(|op| (op.kind(), op.len())))
    }

    /// Returns the 1-based inclusive alignment end.
    ///
    /// A read that consumes no reference bases ends at its start.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        let start = self.start()?;
        Some(start + self.reference_length().saturating_sub(1))
    }

    /// Returns the number of bases in the read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.record.sequence().len()
    }

    /// Returns true if the read has no bases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.sequence().is_empty()
    }

    /// Returns true if the read must not take part in reduction: duplicates, secondary and
    /// supplementary alignments, and unmapped reads (including reads without a start or
    /// without aligned bases).
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        let flags = self.record.flags();
        flags.is_duplicate()
            || flags.is_secondary()
            || flags.is_supplementary()
            || flags.is_unmapped()
            || self.start().is_none()
            || self.contig().is_none()
            || self.reference_length() == 0
    }
}

/// Sums the reference-consuming operations of a CIGAR.
pub(crate) fn reference_length(ops: impl IntoIterator<Item = (Kind, usize)>) -> usize {
    ops.into_iter()
        .filter(|(kind, _)| {
            matches!(
                kind,
                Kind::Match
                    | Kind::SequenceMatch
                    | Kind::SequenceMismatch
                    | Kind::Deletion
                    | Kind::Skip
            )
        })
        .map(|(_, len)| len)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RecordBuilder;

    #[test]
    fn test_end_accounts_for_deletions_and_clips() {
        let read = RecordBuilder::mapped_read()
            .name("r1")
            .sequence("AACCGGTTAA")
            .cigar("2S3M4D5M")
            .alignment_start(100)
            .aligned("s1");

        assert_eq!(read.start(), Some(100));
        assert_eq!(read.reference_length(), 12);
        assert_eq!(read.end(), Some(111));
        assert_eq!(read.name(), "r1");
        assert_eq!(read.sample(), "s1");
        assert_eq!(read.len(), 10);
    }

    #[test]
    fn test_is_filtered() {
        let base = || RecordBuilder::mapped_read().sequence("ACGT").alignment_start(1);

        assert!(!base().aligned("s").is_filtered());
        assert!(base().duplicate(true).aligned("s").is_filtered());
        assert!(base().secondary(true).aligned("s").is_filtered());
        assert!(base().supplementary(true).aligned("s").is_filtered());
        assert!(base().unmapped(true).aligned("s").is_filtered());
        assert!(RecordBuilder::new().sequence("ACGT").aligned("s").is_filtered());
    }
}
