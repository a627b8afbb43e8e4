//! Custom error types for fgreduce operations.

use thiserror::Error;

/// Result type alias for fgreduce operations
pub type Result<T> = std::result::Result<T, FgreduceError>;

/// Error type for fgreduce operations
#[derive(Error, Debug)]
pub enum FgreduceError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "BAM", "metrics")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Required read group not found in the header
    #[error("Read group '{read_group}' on read '{read_name}' is not declared in the header")]
    ReadGroupNotFound {
        /// The read group identifier
        read_group: String,
        /// Name of the read carrying it
        read_name: String,
    },
}
