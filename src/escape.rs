//! Byte stuffing that keeps the frame delimiters out of framed payloads.
//!
//! | Raw byte      | On the wire   |
//! |---------------|---------------|
//! | [`STX`] 0x02  | `0x1B 0xE7`   |
//! | [`ETX`] 0x03  | `0x1B 0xE8`   |
//! | [`ESC`] 0x1B  | `0x1B 0x00`   |
//!
//! Every other byte is written unchanged.

use alloc::vec::Vec;
use log::trace;

use crate::{ESC, ETX, STX, encode::Encode};

/// Second byte of an escaped [`STX`].
pub const ESCAPED_STX: u8 = 0xE7;
/// Second byte of an escaped [`ETX`].
pub const ESCAPED_ETX: u8 = 0xE8;
/// Second byte of an escaped [`ESC`].
pub const ESCAPED_ESC: u8 = 0x00;

const fn escape_pair(byte: u8) -> Option<[u8; 2]> {
    match byte {
        STX => Some([ESC, ESCAPED_STX]),
        ETX => Some([ESC, ESCAPED_ETX]),
        ESC => Some([ESC, ESCAPED_ESC]),
        _ => None,
    }
}

/// Returns the length of `bytes` once escaped.
pub fn escaped_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .map(|&byte| if escape_pair(byte).is_some() { 2 } else { 1 })
        .sum()
}

/// Escapes `bytes` into a new buffer.
pub fn escape(bytes: &[u8]) -> Vec<u8> {
    Escaped(bytes).to_bytes()
}

/// Reverses [`escape`].
///
/// Decoding is permissive. An escape byte followed by anything other than a
/// known escape code yields that following byte unchanged, and an escape byte
/// at the very end of the input is dropped.
pub fn unescape(bytes: &[u8]) -> Vec<u8> {
    let mut unescaped = Vec::with_capacity(bytes.len());
    let mut bytes = bytes.iter().copied();

    while let Some(byte) = bytes.next() {
        if byte != ESC {
            unescaped.push(byte);
            continue;
        }

        match bytes.next() {
            Some(ESCAPED_STX) => unescaped.push(STX),
            Some(ESCAPED_ETX) => unescaped.push(ETX),
            Some(ESCAPED_ESC) => unescaped.push(ESC),
            Some(other) => {
                trace!("Unknown escape sequence 1b {:02x}, keeping {:02x} as-is.", other, other);
                unescaped.push(other);
            }
            None => {
                trace!("Dropping truncated escape byte at end of frame.");
                break;
            }
        }
    }

    unescaped
}

/// Escaped view over a byte slice.
///
/// Encoding writes the stuffed form of the wrapped bytes, so it can be placed
/// directly into a [`MessageEncoder`](crate::MessageEncoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escaped<'a>(pub &'a [u8]);

impl Encode for Escaped<'_> {
    fn size(&self) -> usize {
        escaped_len(self.0)
    }

    fn encode(&self, data: &mut [u8]) {
        let mut i = 0;
        for &byte in self.0 {
            match escape_pair(byte) {
                Some(pair) => {
                    data[i..i + 2].copy_from_slice(&pair);
                    i += 2;
                }
                None => {
                    data[i] = byte;
                    i += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{escape, escaped_len, unescape};

    #[test]
    fn escapes_reserved_bytes() {
        let raw = [0x01, 0x02, 0x03, 0x1B, 0x04];
        let escaped = escape(&raw);

        assert_eq!(escaped, [0x01, 0x1B, 0xE7, 0x1B, 0xE8, 0x1B, 0x00, 0x04]);
        assert_eq!(escaped_len(&raw), escaped.len());
    }

    #[test]
    fn plain_bytes_pass_through() {
        let raw = [0x00, 0x10, 0xE7, 0xE8, 0xFF];
        assert_eq!(escape(&raw), raw);
        assert_eq!(unescape(&raw), raw);
    }

    #[test]
    fn unescape_reverses_escape() {
        let raw: Vec<u8> = (0..=u8::MAX).collect();
        assert_eq!(unescape(&escape(&raw)), raw);
    }

    #[test]
    fn unknown_escape_keeps_following_byte() {
        assert_eq!(unescape(&[0x10, 0x1B, 0x55, 0x20]), [0x10, 0x55, 0x20]);
        // An escaped escape code is not re-interpreted.
        assert_eq!(unescape(&[0x1B, 0x1B, 0xE7]), [0x1B, 0xE7]);
    }

    #[test]
    fn trailing_escape_is_dropped() {
        assert_eq!(unescape(&[0x10, 0x20, 0x1B]), [0x10, 0x20]);
        assert_eq!(unescape(&[0x1B]), Vec::<u8>::new());
    }
}
