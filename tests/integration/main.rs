//! Integration tests for the fgreduce binary.
//!
//! Each test writes a small coordinate-sorted BAM, runs `fgreduce reduce` on it and inspects
//! the output BAM, header and metrics.

mod helpers;
mod test_error_paths;
mod test_reduce_command;
