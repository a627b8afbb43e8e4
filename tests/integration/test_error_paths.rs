//! Error path integration tests.
//!
//! Each case runs the binary on invalid input or parameters and expects a non-zero exit.

use noodles::sam::alignment::record_buf::RecordBuf;
use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{
    create_header, create_header_with_order, matching_read, run_reduce, write_bam,
};

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let result = run_reduce(&dir.path().join("missing.bam"), &dir.path().join("out.bam"), &[]);
    assert!(!result.status.success());
    assert!(stderr(&result).contains("does not exist"));
}

#[test]
fn test_output_same_as_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    write_bam(&input, &create_header(&["chr1"], &[("rg1", "s1")]), &[]);

    let result = run_reduce(&input, &input, &[]);
    assert!(!result.status.success());
}

#[test]
fn test_unsorted_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");
    let header = create_header_with_order("queryname", &["chr1"], &[("rg1", "s1")]);
    write_bam(&input, &header, &[matching_read("a", "rg1", 0, 5, 20)]);

    let result = run_reduce(&input, &output, &[]);
    assert!(!result.status.success());
    assert!(stderr(&result).contains("coordinate sorted"));
}

#[test]
fn test_undeclared_read_group_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");
    let header = create_header(&["chr1"], &[("rg1", "s1")]);
    write_bam(&input, &header, &[matching_read("a", "rgX", 0, 5, 20)]);

    let result = run_reduce(&input, &output, &[]);
    assert!(!result.status.success());
    assert!(stderr(&result).contains("rgX"));
}

#[test]
fn test_out_of_order_reads_fail() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");
    let header = create_header(&["chr1"], &[("rg1", "s1")]);
    let records = vec![matching_read("a", "rg1", 0, 50, 20), matching_read("b", "rg1", 0, 10, 20)];
    write_bam(&input, &header, &records);

    let result = run_reduce(&input, &output, &[]);
    assert!(!result.status.success());
}

#[test]
fn test_revisited_contig_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");
    let header = create_header(&["chr1", "chr2"], &[("rg1", "s1")]);
    let records: Vec<RecordBuf> = vec![
        matching_read("a", "rg1", 0, 5, 20),
        matching_read("b", "rg1", 1, 5, 20),
        matching_read("c", "rg1", 0, 50, 20),
    ];
    write_bam(&input, &header, &records);

    let result = run_reduce(&input, &output, &[]);
    assert!(!result.status.success());
    assert!(stderr(&result).contains("chr1"));
}

#[rstest]
#[case::zero_fraction(&["--max-disagreeing-fraction", "0"])]
#[case::fraction_above_one(&["--max-disagreeing-fraction", "1.5"])]
#[case::zero_buffered_width(&["--min-buffered-width", "0"])]
#[case::zero_clipped_length(&["--min-clipped-read-length", "0"])]
#[case::zero_reads_per_span(&["--max-reads-per-variable-span", "0"])]
#[case::quality_too_high(&["--max-consensus-quality", "94"])]
#[case::unassignable_mapq(&["--consensus-mapping-quality", "255"])]
#[case::empty_suffix(&["--reduced-suffix", ""])]
#[case::zero_threads(&["--threads", "0"])]
fn test_invalid_options_fail(#[case] args: &[&str]) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let output = dir.path().join("output.bam");
    let header = create_header(&["chr1"], &[("rg1", "s1")]);
    write_bam(&input, &header, &[matching_read("a", "rg1", 0, 5, 20)]);

    let result = run_reduce(&input, &output, args);
    assert!(!result.status.success());
}
