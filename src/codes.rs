//! Closed code sets carried in the header, the body and the parameter list.

use core::hash::{Hash, Hasher};

use crate::decode::{Decode, DecodeError, DecodeErrorKind};
use crate::encode::Encode;

/// Direction of a datagram, carried in the first header byte.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    ServerToDevice = 0x01,
    DeviceToServer = 0x02,
    ClientToServer = 0x03,
    ServerToClient = 0x04,
}

impl MessageType {
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::ServerToDevice),
            0x02 => Some(Self::DeviceToServer),
            0x03 => Some(Self::ClientToServer),
            0x04 => Some(Self::ServerToClient),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for MessageType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value)
            .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::UnsupportedType { value }))
    }
}

impl Encode for MessageType {
    fn size(&self) -> usize {
        1
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = self.code();
    }
}

impl Decode for MessageType {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        Self::try_from(u8::decode(data)?)
    }
}

/// Operation requested or reported by a datagram body.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum MessageId {
    /// A body carrying several unrelated functions at once.
    Multifunction = 0x0000,
    Login = 0x0001,
    Heartbeat = 0x0002,
    Query = 0x0003,
    Control = 0x0004,
    Report = 0x0005,
}

impl MessageId {
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0000 => Some(Self::Multifunction),
            0x0001 => Some(Self::Login),
            0x0002 => Some(Self::Heartbeat),
            0x0003 => Some(Self::Query),
            0x0004 => Some(Self::Control),
            0x0005 => Some(Self::Report),
            _ => None,
        }
    }

    pub const fn code(self) -> u16 {
        self as u16
    }
}

impl From<MessageId> for u16 {
    fn from(value: MessageId) -> Self {
        value.code()
    }
}

impl TryFrom<u16> for MessageId {
    type Error = DecodeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or_else(|| {
            DecodeError::new::<Self>(DecodeErrorKind::UnsupportedOperation { value })
        })
    }
}

impl Encode for MessageId {
    fn size(&self) -> usize {
        2
    }

    fn encode(&self, data: &mut [u8]) {
        self.code().encode(data);
    }
}

impl Decode for MessageId {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        Self::try_from(u16::decode(data)?)
    }
}

/// Meaning of a parameter value.
///
/// Unlike [`MessageType`] and [`MessageId`], parameter codes are not
/// validated: codes without a name here decode to [`ParameterType::Other`] and
/// are written back unchanged.
///
/// Equality and hashing go by the wire code, so `Other(0x0001)` and
/// [`ParameterType::PowerSwitch`] are the same value.
#[derive(Debug, Clone, Copy, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterType {
    PowerSwitch,
    Mode,
    FanSpeed,
    Temperature,
    Humidity,
    Pm25,
    DeviceName,
    Other(u16),
}

impl ParameterType {
    pub const fn code(self) -> u16 {
        match self {
            Self::PowerSwitch => 0x0001,
            Self::Mode => 0x0002,
            Self::FanSpeed => 0x0003,
            Self::Temperature => 0x0004,
            Self::Humidity => 0x0005,
            Self::Pm25 => 0x0006,
            Self::DeviceName => 0x0007,
            Self::Other(code) => code,
        }
    }

    pub const fn from_code(code: u16) -> Self {
        match code {
            0x0001 => Self::PowerSwitch,
            0x0002 => Self::Mode,
            0x0003 => Self::FanSpeed,
            0x0004 => Self::Temperature,
            0x0005 => Self::Humidity,
            0x0006 => Self::Pm25,
            0x0007 => Self::DeviceName,
            code => Self::Other(code),
        }
    }

    /// Returns `true` if this code has a name in this crate.
    pub const fn is_known(self) -> bool {
        !matches!(Self::from_code(self.code()), Self::Other(_))
    }
}

impl PartialEq for ParameterType {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Hash for ParameterType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl From<u16> for ParameterType {
    fn from(value: u16) -> Self {
        Self::from_code(value)
    }
}

impl From<ParameterType> for u16 {
    fn from(value: ParameterType) -> Self {
        value.code()
    }
}

impl Encode for ParameterType {
    fn size(&self) -> usize {
        2
    }

    fn encode(&self, data: &mut [u8]) {
        self.code().encode(data);
    }
}

impl Decode for ParameterType {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Self::from_code(u16::decode(data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageId, MessageType, ParameterType};
    use crate::decode::{Decode, DecodeErrorKind};

    #[test]
    fn message_type_rejects_unknown_codes() {
        assert_eq!(
            MessageType::decode(&mut [0x01u8].as_slice()).unwrap(),
            MessageType::ServerToDevice
        );

        let err = MessageType::decode(&mut [0x7Fu8].as_slice()).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::UnsupportedType { value: 0x7F });
    }

    #[test]
    fn message_id_rejects_unknown_codes() {
        assert_eq!(
            MessageId::decode(&mut [0x00u8, 0x02].as_slice()).unwrap(),
            MessageId::Heartbeat
        );

        let err = MessageId::decode(&mut [0x12u8, 0x34].as_slice()).unwrap_err();
        assert_eq!(
            err.kind(),
            DecodeErrorKind::UnsupportedOperation { value: 0x1234 }
        );
    }

    #[test]
    fn parameter_type_accepts_any_code() {
        let ty = ParameterType::decode(&mut [0xBEu8, 0xEF].as_slice()).unwrap();

        assert_eq!(ty, ParameterType::Other(0xBEEF));
        assert!(!ty.is_known());
        assert_eq!(u16::from(ty), 0xBEEF);

        assert_eq!(ParameterType::from(0x0001u16), ParameterType::PowerSwitch);
        assert!(ParameterType::PowerSwitch.is_known());
    }

    #[test]
    fn parameter_type_equality_follows_code() {
        assert_eq!(ParameterType::Other(0x0001), ParameterType::PowerSwitch);
        assert!(ParameterType::Other(0x0006).is_known());
        assert_ne!(ParameterType::Other(0x0008), ParameterType::DeviceName);
    }
}
