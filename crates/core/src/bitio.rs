//! Bit sequences for the compressed wire format.
//!
//! The compressed form is a plain sequence of bits with no framing, no length
//! prefix and no end marker. Its textual rendering is a string of `0`/`1`
//! characters. Literal escapes are exactly 8 bits, MSB-first.
//!
//! - [`BitString`]: owned, append-only bit accumulator (the encoder's output)
//! - [`BitCursor`]: read position over a [`BitString`] (the decoder's input)
//!
//! # Example
//! ```
//! use adaptive_huffman_core::bitio::{BitCursor, BitString};
//!
//! let mut bits = BitString::new();
//! bits.push(false);
//! bits.push_literal(b'a');
//! assert_eq!(bits.to_string(), "001100001");
//!
//! let mut cursor = BitCursor::new(&bits);
//! assert!(!cursor.read_bit().unwrap());
//! assert_eq!(cursor.read_literal().unwrap(), b'a');
//! assert!(cursor.is_empty());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{BitIoError, Error, Result};

/// Width of a literal escape in bits.
pub const LITERAL_BITS: usize = 8;

/// An owned sequence of bits, `false` = `0`, `true` = `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    /// Create an empty bit string.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append `value` as an 8-bit literal, most significant bit first.
    pub fn push_literal(&mut self, value: u8) {
        for shift in (0..LITERAL_BITS).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }

    /// Append every bit of `other`.
    pub fn append(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Reverse in place. Paths are collected leaf-to-root and flipped once.
    pub(crate) fn reverse(&mut self) {
        self.bits.reverse();
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl Extend<bool> for BitString {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        self.bits.extend(iter);
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = Error;

    /// Parse a `0`/`1` string. Any other character is rejected with
    /// [`Error::InvalidSymbol`]; the position is a character index.
    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .enumerate()
            .map(|(position, found)| match found {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::InvalidSymbol { position, found }),
            })
            .collect()
    }
}

/// Reads bits in order from a [`BitString`].
///
/// # Invariants
/// - `position` never exceeds `bits.len()`
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    /// Source bits
    bits: &'a [bool],
    /// Index of the next bit to read
    position: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(bits: &'a BitString) -> Self {
        Self {
            bits: bits.as_slice(),
            position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` if the cursor is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        let bit = *self
            .bits
            .get(self.position)
            .ok_or(BitIoError::UnexpectedEof)?;
        self.position += 1;
        Ok(bit)
    }

    /// Read exactly [`LITERAL_BITS`] bits as an MSB-first byte.
    ///
    /// Nothing is consumed when fewer than 8 bits remain.
    ///
    /// # Errors
    /// `BitIoError::InsufficientBits` with the number of bits left.
    pub fn read_literal(&mut self) -> Result<u8> {
        let available = self.bits_remaining();
        if available < LITERAL_BITS {
            return Err(BitIoError::InsufficientBits {
                requested: LITERAL_BITS,
                available,
            }
            .into());
        }

        let end = self.position + LITERAL_BITS;
        let value = self.bits[self.position..end]
            .iter()
            .fold(0u8, |acc, &bit| (acc << 1) | bit as u8);
        self.position = end;
        Ok(value)
    }

    /// Number of unread bits.
    pub fn bits_remaining(&self) -> usize {
        self.bits.len() - self.position
    }

    /// Index of the next bit to read.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.bits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn test_literal_is_msb_first() {
        let mut out = BitString::new();
        out.push_literal(0b1010_0001);
        assert_eq!(out.to_string(), "10100001");

        out.push_literal(0);
        assert_eq!(out.len(), 16);
        assert_eq!(out.to_string(), "1010000100000000");
    }

    #[test]
    fn test_parse_and_display() {
        let parsed = bits("0110");
        assert_eq!(parsed.as_slice(), &[false, true, true, false]);
        assert_eq!(parsed.to_string(), "0110");

        let empty = bits("");
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "");
    }

    #[test]
    fn test_parse_rejects_non_binary() {
        let err = "0102".parse::<BitString>().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSymbol {
                position: 2,
                found: '2'
            }
        ));

        let err = "01 1".parse::<BitString>().unwrap_err();
        assert!(matches!(err, Error::InvalidSymbol { position: 2, found: ' ' }));
    }

    #[test]
    fn test_append() {
        let mut a = bits("01");
        a.append(&bits("110"));
        assert_eq!(a.to_string(), "01110");
    }

    #[test]
    fn test_cursor_reads_in_order() {
        let source = bits("1011000010");
        let mut cursor = BitCursor::new(&source);

        assert!(cursor.read_bit().unwrap());
        assert!(!cursor.read_bit().unwrap());
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.read_literal().unwrap(), 0b1100_0010);
        assert!(cursor.is_empty());
        assert!(matches!(
            cursor.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_short_literal_consumes_nothing() {
        let source = bits("10101");
        let mut cursor = BitCursor::new(&source);
        cursor.read_bit().unwrap();

        let err = cursor.read_literal().unwrap_err();
        assert!(matches!(
            err,
            Error::BitIo(BitIoError::InsufficientBits {
                requested: 8,
                available: 4
            })
        ));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.bits_remaining(), 4);
    }
}
