#![deny(unsafe_code)]

//! SAM/BAM record utilities for read reduction.
//!
//! This crate provides:
//! - [`AlignedRead`]: a `noodles` record paired with its resolved sample identifier
//! - [`walker`]: conversion of a read's CIGAR into (read offset, reference offset) steps
//! - [`clipper`]: clipping reads to the boundaries of a reference span
//! - [`builder`]: a fluent builder for constructing records in tests

pub mod aligned_read;
pub mod builder;
pub mod clipper;
pub mod walker;

pub use aligned_read::AlignedRead;
pub use clipper::clip_to_span;
pub use walker::{ReferenceWalker, StepKind, WalkError, WalkStep, walk};
