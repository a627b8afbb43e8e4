//! SAM/BAM record and header utilities.
//!
//! Record-level functionality lives in the `fgreduce-sam` crate and is re-exported here.

pub use fgreduce_sam::{
    AlignedRead, ReferenceWalker, StepKind, WalkError, WalkStep, aligned_read, builder, clip_to_span,
    clipper, walk, walker,
};

use noodles::sam::Header;
use noodles::sam::header::record::value::map::header::sort_order::COORDINATE;

/// Checks if the header declares the given sort order (e.g., `COORDINATE`) in its `SO` tag.
///
/// # Examples
///
/// ```rust
/// use fgreduce_lib::sam::is_sorted;
/// use noodles::sam::header::record::value::map::header::sort_order::COORDINATE;
///
/// let header: noodles::sam::Header = "@HD\tVN:1.6\tSO:coordinate\n".parse().unwrap();
/// assert!(is_sorted(&header, COORDINATE));
/// ```
#[must_use]
pub fn is_sorted(header: &Header, sort_order: &[u8]) -> bool {
    header.header().is_some_and(|hdr_map| {
        hdr_map
            .other_fields()
            .get(b"SO")
            .is_some_and(|so| <_ as AsRef<[u8]>>::as_ref(so) == sort_order)
    })
}

/// Checks if the header declares `SO:coordinate`.
#[must_use]
pub fn is_coordinate_sorted(header: &Header) -> bool {
    is_sorted(header, COORDINATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodles::sam::header::record::value::map::header::sort_order::QUERY_NAME;

    fn create_header_with_so(sort_order: &str) -> Header {
        format!("@HD\tVN:1.6\tSO:{sort_order}\n").parse().unwrap()
    }

    #[test]
    fn test_is_sorted() {
        assert!(is_sorted(&create_header_with_so("queryname"), QUERY_NAME));
        assert!(!is_sorted(&create_header_with_so("queryname"), COORDINATE));
    }

    #[test]
    fn test_is_coordinate_sorted() {
        assert!(is_coordinate_sorted(&create_header_with_so("coordinate")));
        assert!(!is_coordinate_sorted(&create_header_with_so("unsorted")));
        assert!(!is_coordinate_sorted(&"@HD\tVN:1.6\n".parse().unwrap()));
        assert!(!is_coordinate_sorted(&Header::default()));
    }
}
