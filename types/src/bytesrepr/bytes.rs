use std::{fmt, iter::FromIterator, ops::Deref};

use hex_fmt::HexFmt;
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use super::{Error, FromBytes, ToBytes};

/// An opaque byte payload: contract code, call input and output, or an encoded metadata blob.
///
/// In JSON the payload is a lowercase hex string. A `0x` prefix is accepted on input but never
/// emitted.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    /// Returns an empty payload.
    pub fn new() -> Bytes {
        Bytes::default()
    }

    /// Returns the payload as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Decodes a hex string, with or without a `0x` prefix. Either letter case is accepted.
    pub fn from_hex<T: AsRef<[u8]>>(input: T) -> Result<Bytes, base16::DecodeError> {
        let input = input.as_ref();
        let digits = input.strip_prefix(b"0x").unwrap_or(input);
        base16::decode(digits).map(Bytes)
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes({})", HexFmt(&self.0))
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(payload: Vec<u8>) -> Self {
        Bytes(payload)
    }
}

impl From<&[u8]> for Bytes {
    fn from(payload: &[u8]) -> Self {
        Bytes(payload.to_vec())
    }
}

impl FromIterator<u8> for Bytes {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Bytes {
        Bytes(iter.into_iter().collect())
    }
}

impl ToBytes for Bytes {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        super::u8_slice_to_bytes(&self.0)
    }

    fn serialized_length(&self) -> usize {
        super::u8_slice_serialized_length(&self.0)
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        super::write_u8_slice(&self.0, writer)
    }
}

impl FromBytes for Bytes {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (length, remainder) = u32::from_bytes(bytes)?;
        let (payload, remainder) = super::safe_split_at(remainder, length as usize)?;
        Ok((Bytes::from(payload), remainder))
    }
}

#[cfg(feature = "datasize")]
impl datasize::DataSize for Bytes {
    const IS_DYNAMIC: bool = true;

    const STATIC_HEAP_SIZE: usize = 0;

    fn estimate_heap_size(&self) -> usize {
        self.0.capacity()
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            base16::encode_lower(&self.0).serialize(serializer)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let hex = String::deserialize(deserializer)?;
            Bytes::from_hex(hex).map_err(SerdeError::custom)
        } else {
            Vec::<u8>::deserialize(deserializer).map(Bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use serde_test::{assert_tokens, Configure, Token};

    use super::*;
    use crate::bytesrepr::{self, U32_SERIALIZED_LENGTH};

    const CODE: &[u8] = &[0x60, 0x80, 0x60, 0x40];

    #[test]
    fn should_encode_code_with_length_prefix() {
        let code = Bytes::from(CODE);
        let encoded = code.to_bytes().unwrap();
        assert_eq!(&encoded[..U32_SERIALIZED_LENGTH], &4u32.to_le_bytes());
        assert_eq!(&encoded[U32_SERIALIZED_LENGTH..], CODE);
        bytesrepr::test_serialization_roundtrip(&code);
    }

    #[test]
    fn should_reject_truncated_payload() {
        let mut encoded = Bytes::from(CODE).to_bytes().unwrap();
        encoded.pop();
        assert_eq!(
            Bytes::from_bytes(&encoded).unwrap_err(),
            Error::EarlyEndOfStream
        );
        assert!(Bytes::from_bytes(&encoded[..U32_SERIALIZED_LENGTH - 1]).is_err());
    }

    #[test]
    fn should_render_lowercase_hex_in_json() {
        let json = serde_json::to_value(Bytes::from(CODE)).unwrap();
        assert_eq!(json, json!("60806040"));
        assert_eq!(serde_json::from_value::<Bytes>(json).unwrap(), Bytes::from(CODE));
    }

    #[test]
    fn should_accept_prefixed_mixed_case_hex() {
        let code: Bytes = serde_json::from_value(json!("0x6080aBcD")).unwrap();
        assert_eq!(code.as_slice(), &[0x60, 0x80, 0xab, 0xcd]);
        assert!(serde_json::from_value::<Bytes>(json!("")).unwrap().is_empty());
        assert!(serde_json::from_value::<Bytes>(json!("0x608")).is_err());
    }

    #[test]
    fn should_serialize_as_sequence_in_binary_formats() {
        let code = Bytes::from(&CODE[..2]);
        assert_tokens(&code.clone().readable(), &[Token::Str("6080")]);
        assert_tokens(
            &code.compact(),
            &[
                Token::Seq { len: Some(2) },
                Token::U8(0x60),
                Token::U8(0x80),
                Token::SeqEnd,
            ],
        );
    }
}
