//! Clipping reads to the boundaries of a reference span.
//!
//! Reads kept in a variable span are trimmed so that they only describe the span: bases
//! aligned outside `[start, stop]` are clipped, existing soft clips are removed, and the
//! removed bases are recorded as hard clips. Base qualities, flags, name and tags of the
//! retained portion are untouched.

use noodles::core::Position;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record_buf::{QualityScores, Sequence};

use crate::aligned_read::AlignedRead;
use crate::walker::{StepKind, WalkError, WalkStep, walk};

/// Clips `read` to the 1-based inclusive reference interval `[start, stop]`.
///
/// Insertions are retained when their anchoring reference base lies in the interval.
/// Deletions and insertions left dangling at either end of the retained alignment are
/// dropped. Returns `Ok(None)` when no aligned base of the read falls in the interval.
///
/// # Errors
///
/// Returns a [`WalkError`] if the read's CIGAR cannot be walked.
pub fn clip_to_span(
    read: &AlignedRead,
    start: usize,
    stop: usize,
) -> Result<Option<AlignedRead>, WalkError> {
    if stop < start {
        return Ok(None);
    }
    #[allow(clippy::cast_possible_wrap)]
    let last_offset = (stop - start) as isize;
    let in_span = |offset: isize| (0..=last_offset).contains(&offset);

    let mut kept: Vec<WalkStep> =
        walk(read.record(), start)?.filter(|step| in_span(step.reference_offset)).collect();

    let Some(first) = kept.iter().position(|s| s.kind == StepKind::Match) else {
        return Ok(None);
    };
    let last = kept.iter().rposition(|s| s.kind == StepKind::Match).unwrap_or(first);
    kept.truncate(last + 1);
    kept.drain(..first);

    let first_read_offset = kept.first().and_then(|s| s.read_offset).unwrap_or(0);
    let last_read_offset = kept.last().and_then(|s| s.read_offset).unwrap_or(0);
    #[allow(clippy::cast_sign_loss)]
    let new_start = start + kept.first().map_or(0, |s| s.reference_offset) as usize;
    let Some(new_start) = Position::new(new_start) else {
        return Ok(None);
    };

    let original_ops = read.record().cigar().as_ref();
    let leading_hard: usize =
        original_ops.iter().take_while(|op| op.kind() == Kind::HardClip).map(|op| op.len()).sum();
    let trailing_hard: usize = original_ops
        .iter()
        .rev()
        .take_while(|op| op.kind() == Kind::HardClip)
        .map(|op| op.len())
        .sum();
    let read_len = read.len();

    let mut ops = Vec::with_capacity(kept.len().min(8) + 2);
    let head_clip = leading_hard + first_read_offset;
    if head_clip > 0 {
        ops.push(Op::new(Kind::HardClip, head_clip));
    }
    push_run_length(&mut ops, kept.iter().map(|s| step_kind_to_cigar(s.kind)));
    let tail_clip = trailing_hard + read_len.saturating_sub(last_read_offset + 1);
    if tail_clip > 0 {
        ops.push(Op::new(Kind::HardClip, tail_clip));
    }

    let bases = read.record().sequence().as_ref();
    let quals = read.record().quality_scores().as_ref();
    let range = first_read_offset..=last_read_offset;

    let mut clipped = read.clone();
    let record = clipped.record_mut();
    *record.alignment_start_mut() = Some(new_start);
    *record.cigar_mut() = ops.into_iter().collect();
    *record.sequence_mut() = Sequence::from(bases.get(range.clone()).unwrap_or_default().to_vec());
    // Reads stored without qualities keep an empty quality string.
    *record.quality_scores_mut() =
        QualityScores::from(quals.get(range).map(<[u8]>::to_vec).unwrap_or_default());

    Ok(Some(clipped))
}

fn step_kind_to_cigar(kind: StepKind) -> Kind {
    match kind {
        StepKind::Match => Kind::Match,
        StepKind::Insertion => Kind::Insertion,
        StepKind::Deletion => Kind::Deletion,
    }
}

/// Appends `kinds` to `ops`, merging consecutive identical kinds into single operations.
fn push_run_length(ops: &mut Vec<Op>, kinds: impl Iterator<Item = Kind>) {
    let mut current: Option<(Kind, usize)> = None;
    for kind in kinds {
        current = match current {
            Some((k, n)) if k == kind => Some((k, n + 1)),
            Some((k, n)) => {
                ops.push(Op::new(k, n));
                Some((kind, 1))
            }
            None => Some((kind, 1)),
        };
    }
    if let Some((k, n)) = current {
        ops.push(Op::new(k, n));
    }
}
