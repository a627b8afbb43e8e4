#![deny(unsafe_code)]

//! Consensus-based compression of deeply redundant read alignments.
//!
//! Reads from one contig are streamed, in coordinate order, into a [`MultiSampleCompressor`]
//! which routes each read to the [`SingleSampleCompressor`] of its sample. Each compressor
//! buffers a window of reads and partitions it into spans:
//!
//! - **Conserved** spans, where every read agrees with the majority base at each site, are
//!   replaced by one synthetic consensus read carrying the majority bases, capped agreement
//!   counts as base qualities, and per-base depth tags.
//! - **Variable** spans, within [`ReduceOptions::context_size`] of any disagreeing site, keep
//!   the original reads clipped to the span, downsampled to
//!   [`ReduceOptions::max_reads_per_variable_span`].
//!
//! ```rust
//! use fgreduce_consensus::{MultiSampleCompressor, ReduceOptions};
//! use fgreduce_sam::builder::RecordBuilder;
//!
//! let mut reducer = MultiSampleCompressor::new(["s1"], 0, &ReduceOptions::default()).unwrap();
//! for name in ["a", "b", "c"] {
//!     let read = RecordBuilder::mapped_read()
//!         .name(name)
//!         .sequence("ACGTACGTACGTACGTACGT")
//!         .alignment_start(100)
//!         .aligned("s1");
//!     reducer.add_alignment(read).unwrap();
//! }
//! let reduced = reducer.close().unwrap();
//! assert_eq!(reduced.len(), 1);
//! assert_eq!(reduced[0].sample(), "s1.reduced");
//! ```

pub mod base_counts;
pub mod compressor;
pub mod consensus;
pub mod errors;
pub mod multi_sample;
pub mod options;
pub mod site;
pub mod span;
pub mod tags;

pub use base_counts::BaseCounts;
pub use compressor::SingleSampleCompressor;
pub use errors::{ReduceError, Result};
pub use multi_sample::MultiSampleCompressor;
pub use options::ReduceOptions;
pub use site::{PileupElement, ReferenceSite, SpanType};
pub use span::Span;
