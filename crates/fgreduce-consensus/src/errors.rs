//! Error types for read reduction.
//!
//! Every variant describes a broken contract (caller input or internal invariant). None of
//! them is retried: callers are expected to abort processing when one is returned.

use fgreduce_sam::WalkError;
use thiserror::Error;

/// Result type alias for reduction operations.
pub type Result<T> = std::result::Result<T, ReduceError>;

/// Error type for read reduction.
#[derive(Error, Debug)]
pub enum ReduceError {
    /// A read was aligned to a different contig than the one the reducer is bound to.
    #[error(
        "Contig mismatch: read '{read_name}' is on reference {found:?} but this reducer is bound to reference {expected}"
    )]
    ContigMismatch {
        /// Name of the offending read
        read_name: String,
        /// The contig the reducer is bound to
        expected: usize,
        /// The contig of the read, if any
        found: Option<usize>,
    },

    /// A read started before the first buffered read.
    #[error(
        "Reads out of order: read '{read_name}' starts at {start} which is before the buffered read starting at {head_start}"
    )]
    OutOfOrder {
        /// Name of the offending read
        read_name: String,
        /// Start of the offending read
        start: usize,
        /// Start of the read at the head of the buffer
        head_start: usize,
    },

    /// A read was routed for a sample that the dispatcher was not created with.
    #[error("Unknown sample '{sample}' on read '{read_name}'")]
    UnknownSample {
        /// The unrecognized sample
        sample: String,
        /// Name of the offending read
        read_name: String,
    },

    /// A site's classification was read before it was assigned.
    #[error("Classification of reference position {position} was read before it was assigned")]
    UnsetClassification {
        /// The 1-based reference position of the site
        position: usize,
    },

    /// An option value is outside its allowed range.
    #[error("Invalid option '{option}': {reason}")]
    InvalidOption {
        /// Name of the option
        option: &'static str,
        /// Explanation of why it is invalid
        reason: String,
    },

    /// A read's alignment could not be walked against the reference.
    #[error(transparent)]
    Walk(#[from] WalkError),
}
