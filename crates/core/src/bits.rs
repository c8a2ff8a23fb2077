//! Packed bit sequences.
//!
//! `BitSequence` is the container every codeword and every encoded message
//! lives in. Bits are stored MSB-first, eight to a byte, with an exact bit
//! length alongside.
//!
//! # Padding Rules
//! - The unused low bits of the final byte are always zero
//! - Equality therefore compares content and length, never padding
//!
//! # Example
//! ```
//! use prefix_code_core::bits::BitSequence;
//!
//! let mut seq: BitSequence = "10".parse().unwrap();
//! seq.append(&"11".parse().unwrap());
//! assert_eq!(seq.to_string(), "1011");
//! assert_eq!(seq.as_bytes(), &[0b1011_0000]);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{BitSeqError, Error};

/// An ordered, finite sequence of bits.
///
/// # Invariants
/// - `bytes.len() == ceil(bit_len / 8)`
/// - bits past `bit_len` in the last byte are zero
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSequence {
    /// Packed bits, MSB-first
    bytes: Vec<u8>,
    /// Number of valid bits
    bit_len: usize,
}

impl BitSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_len: 0,
        }
    }

    /// Create an empty sequence with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_len: 0,
        }
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            // A byte was pushed above whenever offset == 0, so last exists.
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }

    /// Append every bit of `other`, in order.
    ///
    /// When `self` is byte-aligned the bytes are copied directly; otherwise
    /// each of `other`'s bytes is split across two output bytes.
    pub fn append(&mut self, other: &BitSequence) {
        if other.bit_len == 0 {
            return;
        }

        let offset = self.bit_len % 8;
        if offset == 0 {
            self.bytes.extend_from_slice(&other.bytes);
        } else {
            for &byte in &other.bytes {
                // Top (8 - offset) bits complete the current partial byte
                if let Some(last) = self.bytes.last_mut() {
                    *last |= byte >> offset;
                }
                self.bytes.push(byte << (8 - offset));
            }
        }

        self.bit_len += other.bit_len;
        self.bytes.truncate(self.bit_len.div_ceil(8));
    }

    /// Shorten the sequence to its first `len` bits.
    ///
    /// Has no effect if `len` is not less than the current length.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.bit_len {
            return;
        }
        self.bit_len = len;
        self.bytes.truncate(len.div_ceil(8));
        let offset = len % 8;
        if offset != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFF << (8 - offset);
            }
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bit_len
    }

    /// True if the sequence holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Iterate the bits in insertion order.
    ///
    /// The sequence is not consumed, so iteration can be restarted at will.
    pub fn iter(&self) -> Bits<'_> {
        Bits {
            seq: self,
            position: 0,
        }
    }

    /// The packed bytes, MSB-first, final byte zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSequence({self})")
    }
}

/// Parse a string of `0` and `1`. Whitespace and `_` are ignored, so
/// `"0 10 11"` and `"0_10_11"` both parse to `01011`.
impl FromStr for BitSequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut seq = BitSequence::with_capacity(s.len());
        for (position, digit) in s.chars().enumerate() {
            match digit {
                '0' => seq.push(false),
                '1' => seq.push(true),
                '_' => {}
                c if c.is_whitespace() => {}
                _ => return Err(BitSeqError::InvalidDigit { digit, position }.into()),
            }
        }
        Ok(seq)
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut seq = BitSequence::new();
        seq.extend(iter);
        seq
    }
}

impl Extend<bool> for BitSequence {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl<'a> IntoIterator for &'a BitSequence {
    type Item = bool;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over the bits of a [`BitSequence`].
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    seq: &'a BitSequence,
    /// Index of the next bit to yield
    position: usize,
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.seq.get(self.position)?;
        self.position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.seq.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitSequence {
        s.parse().unwrap()
    }

    #[test]
    fn test_push_packs_msb_first() {
        let seq: BitSequence = [true, false, true, true, false, false, true, false]
            .into_iter()
            .collect();
        assert_eq!(seq.as_bytes(), &[0b10110010]);
        assert_eq!(seq.len(), 8);
    }

    #[test]
    fn test_padding_is_zero() {
        let seq = bits("1");
        assert_eq!(seq.as_bytes(), &[0b10000000]);
    }

    #[test]
    fn test_empty() {
        let seq = BitSequence::new();
        assert!(seq.is_empty());
        assert_eq!(seq.iter().count(), 0);
        assert_eq!(seq.to_string(), "");
        assert_eq!(seq, bits(""));
    }

    #[test]
    fn test_append_aligned() {
        let mut seq = bits("10101011");
        seq.append(&bits("1111"));
        assert_eq!(seq.to_string(), "101010111111");
        assert_eq!(seq.as_bytes(), &[0b10101011, 0b11110000]);
    }

    #[test]
    fn test_append_unaligned() {
        let mut seq = bits("0");
        seq.append(&bits("10"));
        seq.append(&bits("11"));
        assert_eq!(seq, bits("01011"));
        assert_eq!(seq.as_bytes(), &[0b01011000]);
    }

    #[test]
    fn test_append_across_byte_boundary() {
        let mut seq = bits("101");
        seq.append(&bits("1100110011"));
        assert_eq!(seq.to_string(), "1011100110011");
        assert_eq!(seq.len(), 13);
        assert_eq!(seq.as_bytes().len(), 2);
    }

    #[test]
    fn test_append_empty() {
        let mut seq = bits("011");
        seq.append(&BitSequence::new());
        assert_eq!(seq, bits("011"));
    }

    #[test]
    fn test_equality_includes_length() {
        // Same packed byte, different lengths
        assert_ne!(bits("1"), bits("10"));
        assert_ne!(bits("0"), BitSequence::new());
    }

    #[test]
    fn test_truncate_clears_padding() {
        let mut seq = bits("1011 0111 11");
        seq.truncate(3);
        assert_eq!(seq, bits("101"));
        assert_eq!(seq.as_bytes(), &[0b1010_0000]);

        seq.truncate(8);
        assert_eq!(seq.len(), 3);

        seq.truncate(0);
        assert!(seq.is_empty());
        assert!(seq.as_bytes().is_empty());
    }

    #[test]
    fn test_get() {
        let seq = bits("0110");
        assert_eq!(seq.get(0), Some(false));
        assert_eq!(seq.get(1), Some(true));
        assert_eq!(seq.get(3), Some(false));
        assert_eq!(seq.get(4), None);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let seq = bits("1101");
        let first: Vec<bool> = seq.iter().collect();
        let second: Vec<bool> = (&seq).into_iter().collect();
        assert_eq!(first, vec![true, true, false, true]);
        assert_eq!(first, second);
        assert_eq!(seq.iter().len(), 4);
    }

    #[test]
    fn test_parse_ignores_separators() {
        assert_eq!(bits("0 10 11"), bits("01011"));
        assert_eq!(bits("0_10_11"), bits("01011"));
    }

    #[test]
    fn test_parse_invalid_digit() {
        let result = "01x1".parse::<BitSequence>();
        assert_eq!(
            result,
            Err(Error::BitSeq(BitSeqError::InvalidDigit {
                digit: 'x',
                position: 2
            }))
        );
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", bits("101")), "BitSequence(101)");
    }
}
