//! Utilities for generating test BAM data and running the binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use fgreduce_lib::sam::builder::RecordBuilder;
use noodles::bam;
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record_buf::RecordBuf;

/// Reference bases that test reads are drawn from.
pub const REFERENCE: &str = "ACGTTGCATGTCGCATGATGCATGAGAGCTACGATCGATCGTAGCTAGCTAGGATCGATCGGATCCGATGCTAGCTTAGCGGCGATATCGCGATCGATCGATTTAGCGCGACTAGCTAGCGG";

/// Reference bases for the 1-based, inclusive window starting at `start`.
pub fn reference(start: usize, len: usize) -> String {
    REFERENCE[start - 1..start - 1 + len].to_string()
}

/// A coordinate-sorted header with the given contigs and `(read group, sample)` pairs.
pub fn create_header(contigs: &[&str], read_groups: &[(&str, &str)]) -> Header {
    create_header_with_order("coordinate", contigs, read_groups)
}

/// Like [`create_header`] with an explicit `SO` value.
pub fn create_header_with_order(
    sort_order: &str,
    contigs: &[&str],
    read_groups: &[(&str, &str)],
) -> Header {
    let mut text = format!("@HD\tVN:1.6\tSO:{sort_order}\n");
    for contig in contigs {
        text.push_str(&format!("@SQ\tSN:{contig}\tLN:10000\n"));
    }
    for (id, sample) in read_groups {
        text.push_str(&format!("@RG\tID:{id}\tSM:{sample}\n"));
    }
    text.parse().expect("valid SAM header")
}

/// A read on `contig` matching the reference from `start` for `len` bases.
pub fn matching_read(
    name: &str,
    read_group: &str,
    contig: usize,
    start: usize,
    len: usize,
) -> RecordBuf {
    RecordBuilder::mapped_read()
        .name(name)
        .sequence(&reference(start, len))
        .reference_sequence_id(contig)
        .alignment_start(start)
        .read_group(read_group)
        .build()
}

/// Like [`matching_read`] but with a substitution at the 1-based reference `position`.
pub fn read_with_snp(
    name: &str,
    read_group: &str,
    start: usize,
    len: usize,
    position: usize,
) -> RecordBuf {
    let mut bases = reference(start, len).into_bytes();
    let offset = position - start;
    bases[offset] = if bases[offset] == b'A' { b'C' } else { b'A' };
    RecordBuilder::mapped_read()
        .name(name)
        .sequence(std::str::from_utf8(&bases).expect("ASCII bases"))
        .reference_sequence_id(0)
        .alignment_start(start)
        .read_group(read_group)
        .build()
}

/// Writes `records` to a BAM at `path`.
pub fn write_bam(path: &Path, header: &Header, records: &[RecordBuf]) {
    let mut writer =
        bam::io::Writer::new(fs::File::create(path).expect("Failed to create BAM file"));
    writer.write_header(header).expect("Failed to write header");
    for record in records {
        writer.write_alignment_record(header, record).expect("Failed to write record");
    }
    writer.finish(header).expect("Failed to finish BAM");
}

/// Reads the header and records of the BAM at `path`.
pub fn read_bam(path: &Path) -> (Header, Vec<RecordBuf>) {
    let mut reader = bam::io::reader::Builder.build_from_path(path).expect("Failed to open BAM");
    let header = reader.read_header().expect("Failed to read header");
    let records = reader.record_bufs(&header).map(|r| r.expect("Failed to read record")).collect();
    (header, records)
}

/// Runs `fgreduce reduce -i input -o output` with `extra` arguments.
pub fn run_reduce(input: &Path, output: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fgreduce"))
        .arg("reduce")
        .arg("-i")
        .arg(input)
        .arg("-o")
        .arg(output)
        .args(extra)
        .output()
        .expect("Failed to run reduce command")
}
