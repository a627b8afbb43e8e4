//! Input validation utilities
//!
//! This module provides common validation functions for command-line parameters and file
//! paths with consistent error messages, reported through the structured error types in
//! [`crate::errors`].

use crate::errors::{FgreduceError, Result};
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Input BAM")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use fgreduce_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/file.bam", "Input BAM");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(FgreduceError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that an output path does not overwrite an input path
///
/// # Errors
/// Returns an error if both paths name the same file
///
/// # Example
/// ```
/// use fgreduce_lib::validation::validate_distinct_paths;
///
/// validate_distinct_paths("in.bam", "out.bam", "output").unwrap();
/// assert!(validate_distinct_paths("in.bam", "in.bam", "output").is_err());
/// ```
pub fn validate_distinct_paths<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    name: &str,
) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(FgreduceError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must differ from the input {}", input.display()),
        });
    }
    Ok(())
}

/// Validate that a value is positive (> 0)
///
/// # Errors
/// Returns an error if the value is not positive
///
/// # Example
/// ```
/// use fgreduce_lib::validation::validate_positive;
///
/// validate_positive(10, "threads").unwrap();
///
/// let result = validate_positive(0, "threads");
/// assert!(result.is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(FgreduceError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be positive (> 0), got: {value}"),
        });
    }
    Ok(())
}
