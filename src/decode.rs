use thiserror::Error;

/// Error returned when a byte sequence cannot be decoded into a datagram.
///
/// Every structural violation is terminal: decoding stops at the first one and
/// no partially decoded datagrams are returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    type_name: &'static str,
}

impl DecodeError {
    pub fn new<T>(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            type_name: core::any::type_name::<T>(),
        }
    }

    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Failed to decode {}: {}", self.type_name, self.kind)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The input is shorter than the smallest possible datagram.
    #[error("Command format error. Got {len} bytes, need at least 22.")]
    CommandFormat { len: usize },

    #[error("Unsupported message type {value:#04x}.")]
    UnsupportedType { value: u8 },

    #[error("Unsupported operation {value:#06x}.")]
    UnsupportedOperation { value: u16 },

    /// The message body carried no parameters.
    #[error("Parameter format error. The message body has no parameters.")]
    ParameterFormat,

    #[error("CRC16 checksum mismatch. Found {value:#06x}, expected {expected:#06x}.")]
    Checksum { value: u16, expected: u16 },

    #[error("Parameter declares {declared} value bytes but only {remaining} remain.")]
    TruncatedParameter { declared: u8, remaining: usize },

    #[error("Packet was too short.")]
    UnexpectedEnd,
}

/// A type that can be reconstructed (decoded) from a raw sequence of bytes.
///
/// The input slice is advanced by the number of bytes consumed.
pub trait Decode {
    /// Attempts to decode `Self` from the beginning of the provided byte slice.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is malformed or too short.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError>
    where
        Self: Sized;
}

macro_rules! impl_decode_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Decode for $t {
                fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
                    let (bytes, rest) = data
                        .split_first_chunk::<{ size_of::<$t>() }>()
                        .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd))?;
                    *data = rest;
                    Ok(Self::from_be_bytes(*bytes))
                }
            }
        )*
    };
}

impl_decode_for_primitive!(u8, u16, u32, u64);

impl<const N: usize> Decode for [u8; N] {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let (bytes, rest) = data
            .split_first_chunk::<N>()
            .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd))?;
        *data = rest;
        Ok(*bytes)
    }
}
