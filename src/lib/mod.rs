#![deny(unsafe_code)]
// Clippy lint configuration for CI
// - cast_*: counts and coordinates are converted between integer widths deliberately
// - missing_*_doc: documentation improvements tracked separately
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::module_name_repetitions
)]

//! # fgreduce - consensus-based reduction of aligned reads
//!
//! Deep sequencing produces pileups where most reads agree with each other at most
//! positions. This library shrinks such data by replacing runs of agreement with synthetic
//! consensus reads, while keeping (clipped, downsampled) original reads wherever any read
//! disagrees.
//!
//! ## Modules
//!
//! - **[`consensus`]** - The reduction engine: base counts, reference sites, span
//!   classification, the single-sample compressor and the multi-sample dispatcher
//! - **[`sam`]** - Aligned-read model, CIGAR walker, span clipping and header checks
//! - **[`samples`]** - Resolving each record's sample from its read group
//! - **[`header`]** - Output header construction and `@PG` chaining
//! - **[`bam_io`]** - BAM readers and writers
//! - **[`metrics`]** - Reduction metrics and TSV output
//! - **[`validation`]**, **[`progress`]**, **[`logging`]** - Command support utilities
//!
//! ## Quick Start
//!
//! ```no_run
//! use fgreduce_lib::bam_io::{create_bam_reader, create_bam_writer};
//! use fgreduce_lib::consensus::{MultiSampleCompressor, ReduceOptions};
//! use fgreduce_lib::sam::AlignedRead;
//! use noodles::sam::alignment::io::Write as _;
//!
//! # fn main() -> anyhow::Result<()> {
//! let (mut reader, header) = create_bam_reader("input.bam", 1)?;
//! let mut writer = create_bam_writer("output.bam", &header, 1)?;
//! let mut reducer = MultiSampleCompressor::new(["sample1"], 0, &ReduceOptions::default())?;
//!
//! for result in reader.record_bufs(&header) {
//!     for read in reducer.add_alignment(AlignedRead::new(result?, "sample1"))? {
//!         writer.write_alignment_record(&header, read.record())?;
//!     }
//! }
//! for read in reducer.close()? {
//!     writer.write_alignment_record(&header, read.record())?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod bam_io;
pub mod consensus;
pub mod errors;
pub mod header;
pub mod logging;
pub mod metrics;
pub mod progress;
pub mod sam;
pub mod samples;
pub mod validation;

pub use fgreduce_dna as dna;
