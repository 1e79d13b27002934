//! Type-length-value parameters carried at the end of a message body.
//!
//! # Encoding
//!
//! | Field    | Size | Description |
//! |----------|------|-------------|
//! | `type`   | 2    | [`ParameterType`] code, big-endian. |
//! | `length` | 1    | Declared number of value bytes. |
//! | `value`  | n    | Value bytes. An empty value is written as a single `0x00`. |

use alloc::vec::Vec;
use core::fmt;
use log::trace;

use crate::{
    codes::ParameterType,
    decode::{Decode, DecodeError, DecodeErrorKind},
    encode::{Encode, MessageEncoder},
};

/// Size of the `type` and `length` fields preceding every value.
pub const PARAMETER_HEADER_SIZE: usize = 3;

/// Largest value a single parameter can declare.
pub const MAX_VALUE_SIZE: usize = u8::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub parameter_type: ParameterType,
    /// Declared value length. Normally `value.len()`.
    pub length: u8,
    pub value: Vec<u8>,
}

impl Parameter {
    /// Creates a parameter holding a single byte.
    pub fn from_byte(parameter_type: ParameterType, value: u8) -> Self {
        Self {
            parameter_type,
            length: 1,
            value: alloc::vec![value],
        }
    }

    /// Creates a parameter from raw value bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterSizeError`] if `value` is longer than [`MAX_VALUE_SIZE`].
    pub fn new(
        parameter_type: ParameterType,
        value: impl Into<Vec<u8>>,
    ) -> Result<Self, ParameterSizeError> {
        let value = value.into();
        let length = u8::try_from(value.len()).map_err(|_| ParameterSizeError {
            size: value.len(),
        })?;

        Ok(Self {
            parameter_type,
            length,
            value,
        })
    }

    /// Creates a parameter holding the UTF-8 bytes of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterSizeError`] if `text` is longer than [`MAX_VALUE_SIZE`] bytes.
    pub fn from_text(
        parameter_type: ParameterType,
        text: &str,
    ) -> Result<Self, ParameterSizeError> {
        Self::new(parameter_type, text.as_bytes())
    }

    /// Creates a parameter without checking `length` against `value`.
    pub fn from_raw(parameter_type: ParameterType, length: u8, value: Vec<u8>) -> Self {
        Self {
            parameter_type,
            length,
            value,
        }
    }
}

impl Encode for Parameter {
    fn size(&self) -> usize {
        PARAMETER_HEADER_SIZE + self.value.len().max(1)
    }

    fn encode(&self, data: &mut [u8]) {
        let mut enc = MessageEncoder::new(data);

        enc.write(&self.parameter_type);
        enc.write(&self.length);

        // An empty value still occupies one byte on the wire. `length` is left
        // at zero, so the declared and written sizes differ by one.
        if self.value.is_empty() {
            enc.write(&0u8);
        } else {
            enc.write(&self.value);
        }
    }
}

impl Decode for Parameter {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let parameter_type = ParameterType::decode(data)?;
        let length = u8::decode(data)?;

        let Some((value, rest)) = data.split_at_checked(length as usize) else {
            return Err(DecodeError::new::<Self>(
                DecodeErrorKind::TruncatedParameter {
                    declared: length,
                    remaining: data.len(),
                },
            ));
        };
        *data = rest;

        Ok(Self {
            parameter_type,
            length,
            value: value.to_vec(),
        })
    }
}

/// Decodes parameters until fewer than [`PARAMETER_HEADER_SIZE`] bytes remain.
///
/// Trailing bytes too short to hold another parameter are ignored. Parameter
/// type codes are passed through without validation.
///
/// # Errors
///
/// Fails with [`DecodeErrorKind::TruncatedParameter`] if a parameter declares
/// more value bytes than remain.
pub fn decode_parameters(mut data: &[u8]) -> Result<Vec<Parameter>, DecodeError> {
    let mut parameters = Vec::new();

    while data.len() >= PARAMETER_HEADER_SIZE {
        parameters.push(Parameter::decode(&mut data)?);
    }

    if !data.is_empty() {
        trace!("Ignoring {} trailing bytes after parameter list.", data.len());
    }

    Ok(parameters)
}

/// Returned when a parameter value does not fit in a one-byte length.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParameterSizeError {
    pub size: usize,
}

impl fmt::Display for ParameterSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter value of {} bytes exceeds the maximum of {} bytes",
            self.size, MAX_VALUE_SIZE
        )
    }
}

impl core::error::Error for ParameterSizeError {}
