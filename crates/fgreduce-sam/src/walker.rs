//! Walks an alignment's CIGAR, pairing read offsets with reference offsets.
//!
//! The walker is the single place where CIGAR semantics are interpreted for reduction. It
//! is used to attribute read bases to reference sites and to decide where a read is cut
//! when it is clipped to a span.
//!
//! | Operation            | Read offset | Reference offset | Emitted step                    |
//! |----------------------|-------------|------------------|---------------------------------|
//! | `M`, `=`, `X`        | advances    | advances         | [`StepKind::Match`]             |
//! | `I`                  | advances    | -                | [`StepKind::Insertion`] (anchor)|
//! | `D`                  | -           | advances         | [`StepKind::Deletion`] (no base)|
//! | `S`                  | advances    | -                | none                            |
//! | `H`, `P`             | -           | -                | none                            |
//! | `N`                  | unsupported | unsupported      | [`WalkError`]                   |

use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use thiserror::Error;

/// Errors raised when a read cannot be walked against the reference.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The CIGAR contains an operation that reduction cannot represent.
    #[error("Unsupported CIGAR operation {kind:?} in read '{read_name}'")]
    UnsupportedOperation {
        /// Name of the offending read
        read_name: String,
        /// The unsupported operation kind
        kind: Kind,
    },
}

/// The kind of observation produced by one walk step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// An aligned read base over a reference base.
    Match,
    /// An inserted read base, attributed to the preceding reference base.
    Insertion,
    /// A deleted reference base with no read base.
    Deletion,
}

/// One (read offset, reference offset) pair produced by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStep {
    /// 0-based offset into the read's bases; `None` for deletions.
    pub read_offset: Option<usize>,
    /// Offset of the reference coordinate relative to the window start. Negative when the
    /// coordinate lies before the window.
    pub reference_offset: isize,
    /// What this step observes.
    pub kind: StepKind,
}

/// Lazy iterator over the [`WalkStep`]s of one read.
///
/// Created by [`walk`]. The iterator is finite and cannot be restarted.
#[derive(Debug)]
pub struct ReferenceWalker<'a> {
    ops: &'a [Op],
    op_index: usize,
    consumed_in_op: usize,
    read_offset: usize,
    reference_offset: isize,
}

/// Starts walking `record` with reference offsets measured from `window_start` (1-based).
///
/// # Errors
///
/// Returns [`WalkError::UnsupportedOperation`] if the CIGAR contains a skip (`N`).
pub fn walk(record: &RecordBuf, window_start: usize) -> Result<ReferenceWalker<'_>, WalkError> {
    let ops = record.cigar().as_ref();

    if let Some(op) = ops.iter().find(|op| op.kind() == Kind::Skip) {
        return Err(WalkError::UnsupportedOperation {
            read_name: record.name().map(|n| n.to_string()).unwrap_or_default(),
            kind: op.kind(),
        });
    }

    let start = record.alignment_start().map_or(window_start, usize::from);
    #[allow(clippy::cast_possible_wrap)]
    let reference_offset = start as isize - window_start as isize;

    Ok(ReferenceWalker { ops, op_index: 0, consumed_in_op: 0, read_offset: 0, reference_offset })
}

impl Iterator for ReferenceWalker<'_> {
    type Item = WalkStep;

    fn next(&mut self) -> Option<WalkStep> {
        loop {
            let op = self.ops.get(self.op_index)?;
            if self.consumed_in_op >= op.len() {
                self.op_index += 1;
                self.consumed_in_op = 0;
                continue;
            }

            match op.kind() {
                Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                    let step = WalkStep {
                        read_offset: Some(self.read_offset),
                        reference_offset: self.reference_offset,
                        kind: StepKind::Match,
                    };
                    self.read_offset += 1;
                    self.reference_offset += 1;
                    self.consumed_in_op += 1;
                    return Some(step);
                }
                Kind::Insertion => {
                    let step = WalkStep {
                        read_offset: Some(self.read_offset),
                        reference_offset: self.reference_offset - 1,
                        kind: StepKind::Insertion,
                    };
                    self.read_offset += 1;
                    self.consumed_in_op += 1;
                    return Some(step);
                }
                Kind::Deletion => {
                    let step = WalkStep {
                        read_offset: None,
                        reference_offset: self.reference_offset,
                        kind: StepKind::Deletion,
                    };
                    self.reference_offset += 1;
                    self.consumed_in_op += 1;
                    return Some(step);
                }
                Kind::SoftClip => {
                    self.read_offset += op.len() - self.consumed_in_op;
                    self.consumed_in_op = op.len();
                }
                Kind::HardClip | Kind::Pad => {
                    self.consumed_in_op = op.len();
                }
                // Rejected up front by `walk`.
                Kind::Skip => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RecordBuilder;

    fn steps(cigar: &str, start: usize, window_start: usize) -> Vec<WalkStep> {
        let record = RecordBuilder::mapped_read().cigar(cigar).alignment_start(start).build();
        walk(&record, window_start).unwrap().collect()
    }

    fn step(read_offset: Option<usize>, reference_offset: isize, kind: StepKind) -> WalkStep {
        WalkStep { read_offset, reference_offset, kind }
    }

    #[test]
    fn test_walk_simple_match() {
        let s = steps("3M", 10, 10);
        assert_eq!(
            s,
            vec![
                step(Some(0), 0, StepKind::Match),
                step(Some(1), 1, StepKind::Match),
                step(Some(2), 2, StepKind::Match),
            ]
        );
    }

    #[test]
    fn test_walk_offsets_relative_to_window() {
        let s = steps("2M", 8, 10);
        assert_eq!(s[0].reference_offset, -2);
        assert_eq!(s[1].reference_offset, -1);
    }

    #[test]
    fn test_walk_insertion_attributed_to_preceding_site() {
        let s = steps("2M2I1M", 1, 1);
        assert_eq!(
            s,
            vec![
                step(Some(0), 0, StepKind::Match),
                step(Some(1), 1, StepKind::Match),
                step(Some(2), 1, StepKind::Insertion),
                step(Some(3), 1, StepKind::Insertion),
                step(Some(4), 2, StepKind::Match),
            ]
        );
    }

    #[test]
    fn test_walk_deletion_has_no_read_offset() {
        let s = steps("1M2D1M", 1, 1);
        assert_eq!(
            s,
            vec![
                step(Some(0), 0, StepKind::Match),
                step(None, 1, StepKind::Deletion),
                step(None, 2, StepKind::Deletion),
                step(Some(1), 3, StepKind::Match),
            ]
        );
    }

    #[test]
    fn test_walk_soft_and_hard_clips_emit_nothing() {
        let s = steps("3H2S2M1S", 5, 5);
        assert_eq!(
            s,
            vec![step(Some(2), 0, StepKind::Match), step(Some(3), 1, StepKind::Match)]
        );
    }

    #[test]
    fn test_walk_rejects_skip() {
        let record = RecordBuilder::mapped_read()
            .name("spliced")
            .cigar("5M100N5M")
            .alignment_start(1)
            .build();
        let err = walk(&record, 1).unwrap_err();
        assert!(err.to_string().contains("spliced"));
        assert!(matches!(err, WalkError::UnsupportedOperation { kind: Kind::Skip, .. }));
    }
}
