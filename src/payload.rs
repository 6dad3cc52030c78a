//! Message framing.
//!
//! A message is carried as one byte per character, expanded to bits
//! most-significant first, followed by a single all-zero terminator byte.
//! There is no length prefix: extraction stops at the first byte-aligned zero.

use crate::error::{Error, Result};

/// In-band end-of-message marker.
pub const TERMINATOR: u8 = 0;

/// Number of bits in the framed form of a message of `byte_len` bytes.
///
/// Always `8 * (byte_len + 1)`: the message bytes plus the terminator.
#[must_use]
pub const fn framed_bit_len(byte_len: usize) -> usize {
    8 * (byte_len + 1)
}

/// Map each character of `text` to the byte with the same code point.
///
/// # Errors
///
/// Returns [`Error::UnencodableChar`] for the first character above `U+00FF`.
pub fn encode_text(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| {
            u8::try_from(u32::from(ch)).map_err(|_| Error::UnencodableChar { ch, position })
        })
        .collect()
}

/// Map each byte back to the character with the same code point.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Expand `bytes` plus the terminator into a sequence of single bits (0 or 1).
#[must_use]
pub fn frame_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(framed_bit_len(bytes.len()));
    for &byte in bytes.iter().chain(std::iter::once(&TERMINATOR)) {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Packs single bits back into bytes, most-significant bit first.
#[derive(Debug, Default)]
pub struct ByteAssembler {
    current: u8,
    filled: u8,
}

impl ByteAssembler {
    /// Create an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one bit; returns the byte once eight bits have been collected.
    pub fn push(&mut self, bit: u8) -> Option<u8> {
        self.current = (self.current << 1) | (bit & 1);
        self.filled += 1;
        if self.filled == 8 {
            let byte = self.current;
            self.current = 0;
            self.filled = 0;
            Some(byte)
        } else {
            None
        }
    }
}
