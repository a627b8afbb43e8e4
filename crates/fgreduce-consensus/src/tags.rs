//! SAM tags written on consensus reads.

use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value as BufValue;

/// Per-base depth of a consensus read (`Array<i16>`).
pub const PER_BASE_DEPTH: Tag = Tag::new(b'c', b'd');
/// Maximum depth across the bases of a consensus read.
pub const MAX_DEPTH: Tag = Tag::new(b'c', b'D');
/// Minimum depth across the bases of a consensus read.
pub const MIN_DEPTH: Tag = Tag::new(b'c', b'M');

/// Converts an integer to the smallest signed SAM integer type that holds it.
#[must_use]
pub fn to_smallest_signed_int(value: i32) -> BufValue {
    if let Ok(v) = i8::try_from(value) {
        BufValue::Int8(v)
    } else if let Ok(v) = i16::try_from(value) {
        BufValue::Int16(v)
    } else {
        BufValue::Int32(value)
    }
}

/// Clamps per-site depths into the `i16` range used by [`PER_BASE_DEPTH`].
#[must_use]
pub fn depth_array(depths: &[u32]) -> BufValue {
    let values: Vec<i16> = depths.iter().map(|&d| i16::try_from(d).unwrap_or(i16::MAX)).collect();
    BufValue::from(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, BufValue::Int8(0))]
    #[case(127, BufValue::Int8(127))]
    #[case(128, BufValue::Int16(128))]
    #[case(-129, BufValue::Int16(-129))]
    #[case(40_000, BufValue::Int32(40_000))]
    fn test_to_smallest_signed_int(#[case] value: i32, #[case] expected: BufValue) {
        assert_eq!(to_smallest_signed_int(value), expected);
    }

    #[test]
    fn test_depth_array_saturates() {
        assert_eq!(depth_array(&[1, 70_000]), BufValue::from(vec![1i16, i16::MAX]));
    }
}
