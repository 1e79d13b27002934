//! Delimiter scanning over raw byte buffers.

use alloc::vec::Vec;
use core::iter::FusedIterator;
use log::trace;

use crate::{ETX, STX};

/// Iterator over the still-escaped payloads of every `STX … ETX` frame in a buffer.
///
/// Scanning follows these rules:
///
/// - Bytes outside a frame are skipped.
/// - An `STX` always starts a new frame, abandoning any frame that was still open.
/// - An `ETX` closes the open frame. Empty frames are dropped.
/// - A frame with no closing `ETX` is dropped.
///
/// Payload bytes are yielded verbatim; unescaping is left to the caller.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    remaining: &'a [u8],
}

impl<'a> Frames<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { remaining: data }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(end) = self.remaining.iter().position(|&byte| byte == ETX) else {
                if let Some(start) = self.remaining.iter().rposition(|&byte| byte == STX) {
                    trace!(
                        "Abandoning unterminated frame of {} bytes.",
                        self.remaining.len() - start - 1
                    );
                }
                self.remaining = &[];
                return None;
            };

            let chunk = &self.remaining[..end];
            self.remaining = &self.remaining[end + 1..];

            let Some(start) = chunk.iter().rposition(|&byte| byte == STX) else {
                // ETX with no open frame.
                continue;
            };

            if chunk[..start].contains(&STX) {
                trace!("Frame restarted by STX before ETX, dropping the earlier bytes.");
            }

            let payload = &chunk[start + 1..];
            if payload.is_empty() {
                trace!("Dropping empty frame.");
                continue;
            }

            return Some(payload);
        }
    }
}

impl FusedIterator for Frames<'_> {}

/// Collects every framed payload in `data`, in wire order.
pub fn extract_frames(data: &[u8]) -> Vec<&[u8]> {
    Frames::new(data).collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{Frames, extract_frames};

    #[test]
    fn single_frame() {
        let data = [0x02, 0x10, 0x20, 0x03];
        assert_eq!(extract_frames(&data), vec![&[0x10u8, 0x20][..]]);
    }

    #[test]
    fn skips_noise_between_frames() {
        let data = [0xFF, 0x02, 0x10, 0x03, 0x55, 0x66, 0x02, 0x20, 0x21, 0x03, 0x77];
        assert_eq!(
            extract_frames(&data),
            vec![&[0x10u8][..], &[0x20u8, 0x21][..]]
        );
    }

    #[test]
    fn stx_restarts_frame() {
        let data = [0x02, 0x10, 0x11, 0x02, 0x20, 0x03];
        assert_eq!(extract_frames(&data), vec![&[0x20u8][..]]);
    }

    #[test]
    fn drops_empty_and_unterminated_frames() {
        assert!(extract_frames(&[0x02, 0x03]).is_empty());
        assert!(extract_frames(&[0x02, 0x10, 0x20, 0x30]).is_empty());
        assert!(extract_frames(&[0x10, 0x03, 0x20]).is_empty());

        let data = [0x02, 0x03, 0x02, 0x40, 0x03, 0x02, 0x50];
        assert_eq!(extract_frames(&data), vec![&[0x40u8][..]]);
    }

    #[test]
    fn escapes_are_not_interpreted() {
        let data = [0x02, 0x1B, 0xE7, 0x03];
        assert_eq!(extract_frames(&data), vec![&[0x1Bu8, 0xE7][..]]);
    }

    #[test]
    fn exhausted_iterator_stays_empty() {
        let data = [0x02, 0x10, 0x03];
        let mut frames = Frames::new(&data);

        assert_eq!(frames.next(), Some(&[0x10u8][..]));
        assert_eq!(frames.next(), None);
        assert_eq!(frames.next(), None);
    }
}
