use crc::Crc;

/// [CRC16 error-detecting algorithm](https://en.wikipedia.org/wiki/Cyclic_redundancy_check)
/// binding a datagram header to its body.
pub const AIRHOME_CRC16: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_XMODEM);

/// Computes the body checksum carried in [`MessageHead::crc`](crate::MessageHead::crc).
#[inline]
pub fn checksum(bytes: &[u8]) -> u16 {
    AIRHOME_CRC16.checksum(bytes)
}
