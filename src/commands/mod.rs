//! CLI command implementations for fgreduce.
//!
//! - [`reduce`] - Replace agreeing reads with consensus reads

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod command;
pub mod common;
pub mod reduce;
