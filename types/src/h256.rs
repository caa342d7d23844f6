use std::{
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

/// The number of bytes in an [`H256`].
pub const H256_LENGTH: usize = 32;

/// A 32-byte word: a code hash, or a storage slot key or value.
#[derive(Default, PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct H256([u8; H256_LENGTH]);

/// Error returned when decoding an [`H256`] from a hex string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FromHexError {
    /// The hex string does not decode to 32 bytes.
    #[error("expected {} hex characters, got {0}", H256_LENGTH * 2)]
    InvalidLength(usize),
    /// The string is not valid hex.
    #[error("failed to decode hex: {0}")]
    Hex(base16::DecodeError),
}

impl H256 {
    /// The all-zero word.
    pub const ZERO: H256 = H256([0; H256_LENGTH]);

    /// Constructs a new `H256` from its raw bytes.
    pub const fn new(value: [u8; H256_LENGTH]) -> H256 {
        H256(value)
    }

    /// Returns the raw bytes of the word as an array.
    pub fn value(&self) -> [u8; H256_LENGTH] {
        self.0
    }

    /// Returns the raw bytes of the word as a `slice`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns `true` if all 32 bytes are zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; H256_LENGTH]
    }

    /// Decodes a hex string with an optional `0x` prefix. Both cases are accepted.
    pub fn from_hex(input: &str) -> Result<H256, FromHexError> {
        let hex = input.strip_prefix("0x").unwrap_or(input);
        if hex.len() != H256_LENGTH * 2 {
            return Err(FromHexError::InvalidLength(hex.len()));
        }
        let mut result = [0u8; H256_LENGTH];
        base16::decode_slice(hex, &mut result).map_err(FromHexError::Hex)?;
        Ok(H256(result))
    }
}

impl Display for H256 {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", base16::encode_lower(&self.0))
    }
}

impl Debug for H256 {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "H256({})", HexFmt(&self.0))
    }
}

impl FromStr for H256 {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        H256::from_hex(s)
    }
}

impl From<[u8; H256_LENGTH]> for H256 {
    fn from(value: [u8; H256_LENGTH]) -> Self {
        H256(value)
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl ToBytes for H256 {
    #[inline(always)]
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    #[inline(always)]
    fn serialized_length(&self) -> usize {
        H256_LENGTH
    }

    #[inline(always)]
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.extend_from_slice(&self.0);
        Ok(())
    }
}

impl FromBytes for H256 {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (value, remainder) = <[u8; H256_LENGTH]>::from_bytes(bytes)?;
        Ok((H256(value), remainder))
    }
}

impl Serialize for H256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_string().serialize(serializer)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for H256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let hex_string = String::deserialize(deserializer)?;
            H256::from_hex(&hex_string).map_err(SerdeError::custom)
        } else {
            let bytes = <[u8; H256_LENGTH]>::deserialize(deserializer)?;
            Ok(H256(bytes))
        }
    }
}

impl Distribution<H256> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> H256 {
        H256(rng.gen())
    }
}
