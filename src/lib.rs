//! Implementation of the AirHome device datagram protocol in Rust.
//!
//! A datagram travels between a server and a field device as
//!
//! ```text
//! STX | escape(header ++ body) | ETX
//! ```
//!
//! where the 12-byte [`MessageHead`] carries a CRC16 of the [`MessageBody`],
//! and the body ends in a list of type-length-value [`Parameter`]s.
//!
//! This crate is structured around two traits: [`Encode`] and [`Decode`].
//! Raw input from a transport, possibly holding several frames and unrelated
//! bytes, is handled by [`Datagram::decode_all`].

#![no_std]

extern crate alloc;

pub mod codes;
pub mod escape;
pub mod frame;

mod crc;
mod datagram;
mod decode;
mod encode;
mod parameter;

pub use codes::{MessageId, MessageType, ParameterType};
pub use crc::{AIRHOME_CRC16, checksum};
pub use datagram::{Datagram, MessageBody, MessageHead};
pub use decode::{Decode, DecodeError, DecodeErrorKind};
pub use encode::{Encode, MessageEncoder};
pub use escape::{Escaped, escape, unescape};
pub use frame::{Frames, extract_frames};
pub use parameter::{
    MAX_VALUE_SIZE, PARAMETER_HEADER_SIZE, Parameter, ParameterSizeError, decode_parameters,
};

/// Start-of-frame delimiter. Never escaped.
pub const STX: u8 = 0x02;

/// End-of-frame delimiter. Never escaped.
pub const ETX: u8 = 0x03;

/// Escape byte introducing a two-byte escape sequence.
pub const ESC: u8 = 0x1B;

/// Size of an unescaped [`MessageHead`].
pub const HEADER_SIZE: usize = 12;

/// Smallest unescaped datagram: header, message id and device id.
pub const MIN_DATAGRAM_SIZE: usize = HEADER_SIZE + 10;

/// Device id addressing every device.
pub const BROADCAST_DEVICE_ID: u64 = 0;
