//! Synthesis of a single consensus read from a conserved span.

use bstr::BString;
use noodles::core::Position;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::data::field::Value as BufValue;
use noodles::sam::alignment::record_buf::{Cigar, QualityScores, Sequence};

use fgreduce_sam::AlignedRead;

use crate::site::ReferenceSite;
use crate::tags::{MAX_DEPTH, MIN_DEPTH, PER_BASE_DEPTH, depth_array, to_smallest_signed_int};

/// Fixed attributes shared by every consensus read of one sample.
#[derive(Debug, Clone)]
pub struct ConsensusTemplate<'a> {
    /// Sample and read group of the consensus reads
    pub reduced_sample: &'a str,
    /// Reference sequence the reads are placed on
    pub contig: usize,
    /// Mapping quality assigned to each read
    pub mapping_quality: u8,
    /// Ceiling on consensus base qualities
    pub max_quality: u8,
}

/// Builds a consensus read named `name` from `sites`.
///
/// Covered sites contribute their majority base as an aligned base. Uncovered sites between
/// covered ones become deletions and uncovered sites at either end are dropped. Returns
/// `None` if no site is covered.
#[must_use]
pub fn build_consensus_read(
    sites: &[ReferenceSite],
    name: &str,
    template: &ConsensusTemplate<'_>,
) -> Option<AlignedRead> {
    let first = sites.iter().position(ReferenceSite::is_covered)?;
    let last = sites.iter().rposition(ReferenceSite::is_covered)?;
    let sites = &sites[first..=last];
    let start = Position::new(sites[0].position())?;

    let mut bases = Vec::with_capacity(sites.len());
    let mut quals = Vec::with_capacity(sites.len());
    let mut depths = Vec::with_capacity(sites.len());
    let mut ops: Vec<Op> = Vec::new();

    for site in sites {
        let kind = if site.is_covered() {
            let (base, qual) = site.consensus(template.max_quality);
            bases.push(base);
            quals.push(qual);
            depths.push(site.depth());
            Kind::Match
        } else {
            Kind::Deletion
        };
        match ops.last_mut() {
            Some(op) if op.kind() == kind => *op = Op::new(kind, op.len() + 1),
            _ => ops.push(Op::new(kind, 1)),
        }
    }

    let max_depth = depths.iter().copied().max().unwrap_or(0);
    let min_depth = depths.iter().copied().min().unwrap_or(0);

    let mut record = RecordBuf::default();
    *record.name_mut() = Some(BString::from(name));
    *record.flags_mut() = Flags::empty();
    *record.reference_sequence_id_mut() = Some(template.contig);
    *record.alignment_start_mut() = Some(start);
    *record.mapping_quality_mut() = MappingQuality::new(template.mapping_quality);
    *record.cigar_mut() = Cigar::from(ops);
    *record.sequence_mut() = Sequence::from(bases);
    *record.quality_scores_mut() = QualityScores::from(quals);

    let data = record.data_mut();
    data.insert(Tag::READ_GROUP, BufValue::from(template.reduced_sample));
    data.insert(PER_BASE_DEPTH, depth_array(&depths));
    data.insert(MAX_DEPTH, to_smallest_signed_int(i32::try_from(max_depth).unwrap_or(i32::MAX)));
    data.insert(MIN_DEPTH, to_smallest_signed_int(i32::try_from(min_depth).unwrap_or(i32::MAX)));

    Some(AlignedRead::new(record, template.reduced_sample))
}
