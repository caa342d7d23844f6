//! The canonical 20-byte address of the execution environment and its textual form.

use std::{
    array::TryFromSliceError,
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

#[cfg(feature = "datasize")]
use datasize::DataSize;
use hex_fmt::HexFmt;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::bytesrepr::{self, FromBytes, ToBytes};

/// The number of bytes in an [`EvmAddress`].
pub const EVM_ADDRESS_LENGTH: usize = 20;
/// The prefix of the textual form of an [`EvmAddress`].
pub const EVM_ADDRESS_PREFIX: &str = "0x";

const EVM_ADDRESS_HEX_LENGTH: usize = EVM_ADDRESS_LENGTH * 2;

/// Error returned when decoding an [`EvmAddress`] from its textual form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FromStrError {
    /// The text does not start with `0x`.
    #[error("must start with 0x")]
    MissingPrefix,
    /// The hex portion has the wrong length.
    #[error("must be {} hex characters (20 bytes), got {0}", EVM_ADDRESS_HEX_LENGTH)]
    InvalidLength(usize),
    /// The hex portion contains an uppercase hex digit.
    #[error("must be lowercase")]
    NotLowercase,
    /// The hex portion is not valid hex.
    #[error("failed to decode hex: {0}")]
    Hex(base16::DecodeError),
}

impl From<base16::DecodeError> for FromStrError {
    fn from(error: base16::DecodeError) -> Self {
        FromStrError::Hex(error)
    }
}

/// A 20-byte address in the execution environment.
///
/// Native accounts share the same 20 bytes, so this type is also the key of the native account
/// store.
#[derive(Default, PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct EvmAddress([u8; EVM_ADDRESS_LENGTH]);

impl EvmAddress {
    /// The all-zero address, reserved and never valid for a contract record.
    pub const NIL: EvmAddress = EvmAddress([0; EVM_ADDRESS_LENGTH]);

    /// Constructs a new `EvmAddress` instance from the raw bytes.
    pub const fn new(value: [u8; EVM_ADDRESS_LENGTH]) -> EvmAddress {
        EvmAddress(value)
    }

    /// Returns the raw bytes of the address as an array.
    pub fn value(&self) -> [u8; EVM_ADDRESS_LENGTH] {
        self.0
    }

    /// Returns the raw bytes of the address as a `slice`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns `true` if all 20 bytes are zero.
    pub fn is_nil(&self) -> bool {
        self.0 == [0; EVM_ADDRESS_LENGTH]
    }

    /// Parses the textual form of an address.
    ///
    /// The `0x` prefix is optional, empty input decodes to the nil address, and the remaining
    /// characters must be exactly 40 lowercase hex digits.
    pub fn from_hex(input: &str) -> Result<EvmAddress, FromStrError> {
        if input.is_empty() {
            return Ok(EvmAddress::NIL);
        }
        let hex = input.strip_prefix(EVM_ADDRESS_PREFIX).unwrap_or(input);
        Self::decode_hex(hex)
    }

    /// Parses the canonical textual form of an address, which must carry the `0x` prefix.
    pub fn from_canonical_str(input: &str) -> Result<EvmAddress, FromStrError> {
        let hex = input
            .strip_prefix(EVM_ADDRESS_PREFIX)
            .ok_or(FromStrError::MissingPrefix)?;
        Self::decode_hex(hex)
    }

    /// Returns the canonical textual form: `0x` followed by 40 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("{}{}", EVM_ADDRESS_PREFIX, base16::encode_lower(&self.0))
    }

    fn decode_hex(hex: &str) -> Result<EvmAddress, FromStrError> {
        if hex.len() != EVM_ADDRESS_HEX_LENGTH {
            return Err(FromStrError::InvalidLength(hex.len()));
        }
        if hex.bytes().any(|byte| matches!(byte, b'A'..=b'F')) {
            return Err(FromStrError::NotLowercase);
        }
        let mut result = [0u8; EVM_ADDRESS_LENGTH];
        base16::decode_slice(hex, &mut result)?;
        Ok(EvmAddress(result))
    }
}

impl Display for EvmAddress {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for EvmAddress {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "EvmAddress({})", HexFmt(&self.0))
    }
}

impl FromStr for EvmAddress {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EvmAddress::from_hex(s)
    }
}

impl From<[u8; EVM_ADDRESS_LENGTH]> for EvmAddress {
    fn from(value: [u8; EVM_ADDRESS_LENGTH]) -> Self {
        EvmAddress(value)
    }
}

impl TryFrom<&[u8]> for EvmAddress {
    type Error = TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        <[u8; EVM_ADDRESS_LENGTH]>::try_from(slice).map(EvmAddress)
    }
}

impl AsRef<[u8]> for EvmAddress {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl ToBytes for EvmAddress {
    #[inline(always)]
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    #[inline(always)]
    fn serialized_length(&self) -> usize {
        EVM_ADDRESS_LENGTH
    }

    #[inline(always)]
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.extend_from_slice(&self.0);
        Ok(())
    }
}

impl FromBytes for EvmAddress {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (value, remainder) = <[u8; EVM_ADDRESS_LENGTH]>::from_bytes(bytes)?;
        Ok((EvmAddress(value), remainder))
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_hex().serialize(serializer)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            EvmAddress::from_hex(&text).map_err(SerdeError::custom)
        } else {
            let bytes = <[u8; EVM_ADDRESS_LENGTH]>::deserialize(deserializer)?;
            Ok(EvmAddress(bytes))
        }
    }
}

impl Distribution<EvmAddress> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EvmAddress {
        EvmAddress(rng.gen())
    }
}
