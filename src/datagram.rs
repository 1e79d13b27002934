//! Datagram header, body, and the framed wire form.

use alloc::{string::String, vec::Vec};
use core::fmt;
use log::debug;

use crate::{
    ETX, HEADER_SIZE, MIN_DATAGRAM_SIZE, STX,
    codes::{MessageId, MessageType},
    crc::checksum,
    decode::{Decode, DecodeError, DecodeErrorKind},
    encode::{Encode, MessageEncoder},
    escape::{Escaped, escaped_len, unescape},
    frame::Frames,
    parameter::{Parameter, decode_parameters},
};

/// Fixed 12-byte datagram header.
///
/// # Encoding
///
/// | Field        | Size | Description |
/// |--------------|------|-------------|
/// | `type`       | 1    | [`MessageType`] code. |
/// | `length`     | 2    | Declared body length. |
/// | `seq_number` | 4    | Correlation number chosen by the sender. |
/// | `reserved`   | 3    | Always written as zero. |
/// | `crc`        | 2    | [`checksum`] of the serialized body. |
///
/// All multi-byte fields are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageHead {
    pub message_type: MessageType,
    pub length: u16,
    pub seq_number: u32,
    /// Value read from the wire. Only the low 24 bits are ever populated, and
    /// it is not carried through on encode.
    pub reserved: u32,
    pub crc: u16,
}

impl MessageHead {
    pub const fn new(message_type: MessageType) -> Self {
        Self::with_fields(message_type, 0, 0, 0)
    }

    /// Creates a [`MessageType::ServerToDevice`] header.
    pub const fn server_to_device(length: u16, seq_number: u32, crc: u16) -> Self {
        Self::with_fields(MessageType::ServerToDevice, length, seq_number, crc)
    }

    pub const fn with_fields(
        message_type: MessageType,
        length: u16,
        seq_number: u32,
        crc: u16,
    ) -> Self {
        Self {
            message_type,
            length,
            seq_number,
            reserved: 0,
            crc,
        }
    }
}

impl Encode for MessageHead {
    fn size(&self) -> usize {
        HEADER_SIZE
    }

    fn encode(&self, data: &mut [u8]) {
        let mut enc = MessageEncoder::new(data);

        enc.write(&self.message_type);
        enc.write(&self.length);
        enc.write(&self.seq_number);
        enc.write(&[0u8; 3]);
        enc.write(&self.crc);
    }
}

impl Decode for MessageHead {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let message_type = MessageType::decode(data)?;
        let length = u16::decode(data)?;
        let seq_number = u32::decode(data)?;
        let [r0, r1, r2] = <[u8; 3]>::decode(data)?;
        let crc = u16::decode(data)?;

        Ok(Self {
            message_type,
            length,
            seq_number,
            reserved: u32::from_be_bytes([0, r0, r1, r2]),
            crc,
        })
    }
}

/// Datagram body: operation, target device, and parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageBody {
    pub msg_id: MessageId,
    /// Target device, or [`BROADCAST_DEVICE_ID`](crate::BROADCAST_DEVICE_ID) for all devices.
    pub dev_id: u64,
    /// Parameters in wire order.
    pub parameters: Vec<Parameter>,
}

impl MessageBody {
    /// Creates a body broadcast to every device.
    pub fn new(msg_id: MessageId) -> Self {
        Self::with_parameters(msg_id, crate::BROADCAST_DEVICE_ID, Vec::new())
    }

    /// Creates a [`MessageId::Multifunction`] body addressed to `dev_id`.
    pub fn for_device(dev_id: u64) -> Self {
        Self::with_parameters(MessageId::Multifunction, dev_id, Vec::new())
    }

    pub fn with_parameters(msg_id: MessageId, dev_id: u64, parameters: Vec<Parameter>) -> Self {
        Self {
            msg_id,
            dev_id,
            parameters,
        }
    }

    /// Appends a parameter, returning `self` for chaining.
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Checksum of the serialized body, as stored in [`MessageHead::crc`].
    pub fn checksum(&self) -> u16 {
        checksum(&self.to_bytes())
    }
}

impl Encode for MessageBody {
    fn size(&self) -> usize {
        10 + self.parameters.iter().map(Encode::size).sum::<usize>()
    }

    fn encode(&self, data: &mut [u8]) {
        let mut enc = MessageEncoder::new(data);

        enc.write(&self.msg_id);
        enc.write(&self.dev_id);
        for parameter in &self.parameters {
            enc.write(parameter);
        }
    }
}

impl Decode for MessageBody {
    /// Decodes a body, consuming the rest of `data` as the parameter list.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let msg_id = MessageId::decode(data)?;
        let dev_id = u64::decode(data)?;
        let parameters = decode_parameters(*data)?;
        *data = &[];

        Ok(Self {
            msg_id,
            dev_id,
            parameters,
        })
    }
}

/// One complete protocol message.
///
/// # Encoding
///
/// | Field  | Size | Description |
/// |--------|------|-------------|
/// | `stx`  | 1    | [`STX`], never escaped. |
/// | `head` | 12+  | [Escaped](crate::escape) [`MessageHead`]. |
/// | `body` | 14+  | [Escaped](crate::escape) [`MessageBody`]. |
/// | `etx`  | 1    | [`ETX`], never escaped. |
///
/// The [`Encode`] implementation produces this framed form, while the
/// [`Decode`] implementation reads a single frame that has already been
/// extracted and unescaped. Use [`Datagram::decode_all`] for raw input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Datagram {
    pub head: MessageHead,
    pub body: MessageBody,
}

impl Datagram {
    pub fn new(head: MessageHead, body: MessageBody) -> Self {
        Self { head, body }
    }

    /// Builds a datagram whose header `length` and `crc` describe `body`.
    pub fn from_body(message_type: MessageType, seq_number: u32, body: MessageBody) -> Self {
        let encoded_body = body.to_bytes();
        let head = MessageHead::with_fields(
            message_type,
            encoded_body.len() as u16,
            seq_number,
            checksum(&encoded_body),
        );

        Self { head, body }
    }

    pub const fn start(&self) -> u8 {
        STX
    }

    pub const fn end(&self) -> u8 {
        ETX
    }

    /// Decodes every framed datagram in `raw`, in wire order.
    ///
    /// Bytes outside frames, empty frames and unterminated frames are skipped.
    ///
    /// # Errors
    ///
    /// Fails on the first frame that does not decode; no datagrams are
    /// returned in that case. Inputs shorter than [`MIN_DATAGRAM_SIZE`] fail
    /// with [`DecodeErrorKind::CommandFormat`] before any frame is examined.
    pub fn decode_all(raw: &[u8]) -> Result<Vec<Self>, DecodeError> {
        if raw.len() < MIN_DATAGRAM_SIZE {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::CommandFormat {
                len: raw.len(),
            }));
        }

        let mut datagrams = Vec::new();
        for frame in Frames::new(raw) {
            let frame = unescape(frame);
            datagrams.push(Self::decode(&mut frame.as_slice())?);
        }

        debug!(
            "Decoded {} datagrams from {} bytes.",
            datagrams.len(),
            raw.len()
        );

        Ok(datagrams)
    }
}

impl Datagram {
    /// Unescaped header followed by the body.
    fn unframed(&self) -> Vec<u8> {
        let mut data = alloc::vec![0; HEADER_SIZE + self.body.size()];
        let mut enc = MessageEncoder::new(&mut data);

        enc.write(&self.head);
        enc.write(&self.body);
        data
    }

    fn frame(unframed: &[u8], data: &mut [u8]) {
        let mut enc = MessageEncoder::new(data);

        enc.write(&STX);
        enc.write(&Escaped(unframed));
        enc.write(&ETX);
    }
}

impl Encode for Datagram {
    fn size(&self) -> usize {
        2 + escaped_len(&self.unframed())
    }

    fn encode(&self, data: &mut [u8]) {
        Self::frame(&self.unframed(), data);
    }

    fn to_bytes(&self) -> Vec<u8> {
        let unframed = self.unframed();
        let mut data = alloc::vec![0; 2 + escaped_len(&unframed)];
        Self::frame(&unframed, &mut data);
        data
    }
}

impl Decode for Datagram {
    /// Decodes one unescaped frame payload.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        // The type byte is judged before the frame length.
        if let Some(&code) = data.first() {
            MessageType::try_from(code)?;
        }

        if data.len() < MIN_DATAGRAM_SIZE {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::CommandFormat {
                len: data.len(),
            }));
        }

        let head = MessageHead::decode(data)?;
        let body = MessageBody::decode(data)?;

        if body.parameters.is_empty() {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::ParameterFormat));
        }

        // Computed over the re-encoded body, not the received bytes.
        let expected = body.checksum();
        if head.crc != expected {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::Checksum {
                value: head.crc,
                expected,
            }));
        }

        Ok(Self { head, body })
    }
}

// Text views read the encoded bytes as UTF-8, replacing invalid sequences.

impl fmt::Display for MessageHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}

impl fmt::Display for Datagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}

#[cfg(feature = "hex")]
fn hex_string(bytes: &[u8], separator: &str) -> String {
    bytes
        .chunks(1)
        .map(hex::encode_upper)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(feature = "hex")]
impl MessageHead {
    /// Renders the encoded header as upper-case hex, one byte per group.
    pub fn to_hex_string(&self, separator: &str) -> String {
        hex_string(&self.to_bytes(), separator)
    }
}

#[cfg(feature = "hex")]
impl MessageBody {
    /// Renders the encoded body as upper-case hex, one byte per group.
    pub fn to_hex_string(&self, separator: &str) -> String {
        hex_string(&self.to_bytes(), separator)
    }
}

#[cfg(feature = "hex")]
impl Datagram {
    /// Renders the framed datagram as upper-case hex, one byte per group.
    pub fn to_hex_string(&self, separator: &str) -> String {
        hex_string(&self.to_bytes(), separator)
    }
}
