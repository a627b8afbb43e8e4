//! Consensus-based read reduction.
//!
//! The reduction engine lives in the `fgreduce-consensus` crate and is re-exported here.

pub use fgreduce_consensus::{
    BaseCounts, MultiSampleCompressor, PileupElement, ReduceError, ReduceOptions, ReferenceSite,
    SingleSampleCompressor, Span, SpanType, base_counts, compressor, consensus, errors,
    multi_sample, options, site, span, tags,
};
