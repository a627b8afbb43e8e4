#![deny(unsafe_code)]

//! Nucleotide alphabet utilities and constants.
//!
//! This crate provides the fixed four-symbol alphabet used when counting base observations,
//! along with a lookup table for mapping ASCII bases to alphabet indices.

/// The four DNA bases in enumeration order. Ties between equally observed bases are broken
/// in favour of the base that appears first in this array.
pub const DNA_BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Number of symbols in the counted alphabet.
pub const DNA_BASE_COUNT: usize = DNA_BASES.len();

/// Maximum Phred score expressible in SAM/BAM.
pub const MAX_PHRED: u8 = 93;

/// Sentinel used in [`BASE_TO_INDEX`] for bases outside the counted alphabet.
const INVALID_INDEX: u8 = u8::MAX;

/// Lookup table for converting an ASCII base to its index in [`DNA_BASES`].
const BASE_TO_INDEX: [u8; 256] = {
    let mut table = [INVALID_INDEX; 256];
    table[b'A' as usize] = 0;
    table[b'a' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'g' as usize] = 2;
    table[b'T' as usize] = 3;
    table[b't' as usize] = 3;
    table
};

/// Returns the index of `base` within [`DNA_BASES`], or `None` for ambiguous and other symbols.
///
/// Lower-case bases map to the same index as their upper-case counterpart.
///
/// # Examples
///
/// ```
/// use fgreduce_dna::base_index;
///
/// assert_eq!(base_index(b'A'), Some(0));
/// assert_eq!(base_index(b't'), Some(3));
/// assert_eq!(base_index(b'N'), None);
/// ```
#[inline]
#[must_use]
pub fn base_index(base: u8) -> Option<usize> {
    match BASE_TO_INDEX[base as usize] {
        INVALID_INDEX => None,
        idx => Some(idx as usize),
    }
}
