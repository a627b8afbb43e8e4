//! Integration tests for the reduce command.

use std::fs;

use fgreduce_lib::sam::builder::{RecordBuilder, format_cigar};
use fgreduce_lib::sam::is_sorted;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::header::record::value::map::header::sort_order::UNSORTED;
use tempfile::TempDir;

use crate::helpers::{
    create_header, matching_read, read_bam, read_with_snp, reference, run_reduce, write_bam,
};

fn read_group(record: &RecordBuf) -> Option<String> {
    match record.data().get(&Tag::READ_GROUP) {
        Some(Value::String(rg)) => Some(rg.to_string()),
        _ => None,
    }
}

fn name(record: &RecordBuf) -> String {
    record.name().map(ToString::to_string).unwrap_or_default()
}

fn start(record: &RecordBuf) -> Option<usize> {
    record.alignment_start().map(usize::from)
}

#[test]
fn test_identical_reads_reduce_to_one_consensus_read() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");

    let header = create_header(&["chr1"], &[("rg1", "s1")]);
    let records: Vec<RecordBuf> =
        ["a", "b", "c"].iter().map(|n| matching_read(n, "rg1", 0, 5, 20)).collect();
    write_bam(&input, &header, &records);

    let result = run_reduce(&input, &output, &[]);
    assert!(result.status.success(), "reduce failed: {}", String::from_utf8_lossy(&result.stderr));

    let (out_header, out) = read_bam(&output);
    assert_eq!(out.len(), 1);
    let consensus = &out[0];
    assert_eq!(name(consensus), "s1.reduced.0");
    assert_eq!(read_group(consensus).as_deref(), Some("s1.reduced"));
    assert_eq!(consensus.reference_sequence_id(), Some(0));
    assert_eq!(start(consensus), Some(5));
    assert_eq!(consensus.sequence().as_ref(), reference(5, 20).as_bytes());
    assert!(consensus.quality_scores().as_ref().iter().all(|&q| q == 3));
    assert_eq!(format_cigar(consensus), "20M");

    assert!(out_header.read_groups().contains_key(b"rg1".as_slice()));
    assert!(out_header.read_groups().contains_key(b"s1.reduced".as_slice()));
    assert!(out_header.programs().as_ref().contains_key(b"fgreduce".as_slice()));
    assert!(is_sorted(&out_header, UNSORTED));
}

#[test]
fn test_disagreement_keeps_clipped_original_reads() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");

    let header = create_header(&["chr1"], &[("rg1", "s1")]);
    let records = vec![
        matching_read("a", "rg1", 0, 1, 61),
        read_with_snp("b", "rg1", 1, 61, 31),
        matching_read("c", "rg1", 0, 1, 61),
    ];
    write_bam(&input, &header, &records);

    let result = run_reduce(&input, &output, &[]);
    assert!(result.status.success(), "reduce failed: {}", String::from_utf8_lossy(&result.stderr));

    let (_, out) = read_bam(&output);
    assert_eq!(out.len(), 5);

    let names: Vec<String> = out.iter().map(name).collect();
    assert_eq!(names, vec!["s1.reduced.0", "a", "b", "c", "s1.reduced.1"]);

    for original in &out[1..4] {
        assert_eq!(read_group(original).as_deref(), Some("rg1"));
        assert_eq!(start(original), Some(21));
        assert_eq!(format_cigar(original), "20H21M20H");
    }
    assert_eq!(start(&out[4]), Some(42));
}

#[test]
fn test_metrics_are_written_per_sample() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");
    let metrics = dir.path().join("reduce.metrics.txt");

    let header = create_header(&["chr1"], &[("rg1", "s1"), ("rg2", "s2")]);
    let mut records = Vec::new();
    for i in 0..3 {
        records.push(matching_read(&format!("x{i}"), "rg1", 0, 5, 20));
        records.push(matching_read(&format!("y{i}"), "rg2", 0, 5, 20));
    }
    write_bam(&input, &header, &records);

    let result = run_reduce(&input, &output, &["--metrics", metrics.to_str().unwrap()]);
    assert!(result.status.success(), "reduce failed: {}", String::from_utf8_lossy(&result.stderr));

    let text = fs::read_to_string(&metrics).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("sample\tinput_reads\tfiltered_reads\tconsensus_reads"));
    assert!(lines[1].starts_with("s1\t3\t0\t1\t0\t"));
    assert!(lines[2].starts_with("s2\t3\t0\t1\t0\t"));
    assert!(lines[3].starts_with("all\t6\t0\t2\t0\t"));

    let (out_header, out) = read_bam(&output);
    let groups: Vec<Option<String>> = out.iter().map(read_group).collect();
    assert_eq!(groups, vec![Some("s1.reduced".to_string()), Some("s2.reduced".to_string())]);
    assert!(out_header.read_groups().contains_key(b"s2.reduced".as_slice()));
}

#[test]
fn test_each_contig_is_reduced_separately() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");

    let header = create_header(&["chr1", "chr2"], &[("rg1", "s1")]);
    let mut records: Vec<RecordBuf> =
        (0..3).map(|i| matching_read(&format!("a{i}"), "rg1", 0, 5, 20)).collect();
    records.extend((0..3).map(|i| matching_read(&format!("b{i}"), "rg1", 1, 30, 25)));
    write_bam(&input, &header, &records);

    let result = run_reduce(&input, &output, &["--threads", "2"]);
    assert!(result.status.success(), "reduce failed: {}", String::from_utf8_lossy(&result.stderr));

    let (_, out) = read_bam(&output);
    assert_eq!(out.len(), 2);
    assert_eq!((out[0].reference_sequence_id(), start(&out[0])), (Some(0), Some(5)));
    assert_eq!((out[1].reference_sequence_id(), start(&out[1])), (Some(1), Some(30)));
    assert_eq!(out[1].sequence().len(), 25);
}

#[test]
fn test_duplicates_and_unplaced_reads_are_dropped() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");
    let metrics = dir.path().join("reduce.metrics.txt");

    let header = create_header(&["chr1"], &[("rg1", "s1")]);
    let mut records: Vec<RecordBuf> =
        ["a", "b", "c"].iter().map(|n| matching_read(n, "rg1", 0, 1, 61)).collect();
    for n in ["d1", "d2"] {
        let mut dup = read_with_snp(n, "rg1", 1, 61, 31);
        dup.flags_mut().set(Flags::DUPLICATE, true);
        records.push(dup);
    }
    records.push(
        RecordBuilder::new().name("u").sequence("ACGTACGT").unmapped(true).read_group("rg1").build(),
    );
    write_bam(&input, &header, &records);

    let result = run_reduce(&input, &output, &["--metrics", metrics.to_str().unwrap()]);
    assert!(result.status.success(), "reduce failed: {}", String::from_utf8_lossy(&result.stderr));

    let (_, out) = read_bam(&output);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].sequence().len(), 61);
    assert!(out[0].quality_scores().as_ref().iter().all(|&q| q == 3));

    let text = fs::read_to_string(&metrics).unwrap();
    assert!(text.lines().nth(1).unwrap().starts_with("s1\t5\t2\t1\t0\t"));
}

#[test]
fn test_headers_without_read_groups_use_unknown_sample() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");

    let header = create_header(&["chr1"], &[]);
    let records: Vec<RecordBuf> = ["a", "b"]
        .iter()
        .map(|n| {
            RecordBuilder::mapped_read()
                .name(n)
                .sequence(&reference(10, 30))
                .alignment_start(10)
                .build()
        })
        .collect();
    write_bam(&input, &header, &records);

    let result =
        run_reduce(&input, &output, &["--reduced-suffix", "-cons", "--max-consensus-quality", "1"]);
    assert!(result.status.success(), "reduce failed: {}", String::from_utf8_lossy(&result.stderr));

    let (out_header, out) = read_bam(&output);
    assert_eq!(out.len(), 1);
    assert_eq!(name(&out[0]), "unknown-cons.0");
    assert_eq!(read_group(&out[0]).as_deref(), Some("unknown-cons"));
    assert!(out[0].quality_scores().as_ref().iter().all(|&q| q == 1));
    assert!(out_header.read_groups().contains_key(b"unknown-cons".as_slice()));
}
