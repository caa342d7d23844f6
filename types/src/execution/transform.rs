#[cfg(feature = "datasize")]
use datasize::DataSize;
use serde::{Deserialize, Serialize};

use crate::{
    bytesrepr::{self, FromBytes, ToBytes, U8_SERIALIZED_LENGTH},
    Key, StoredValue,
};

const WRITE_TAG: u8 = 0;
const PRUNE_TAG: u8 = 1;

/// A change to a single entry of the global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct Transform {
    key: Key,
    kind: TransformKind,
}

impl Transform {
    /// Constructs a new `Transform`.
    pub fn new(key: Key, kind: TransformKind) -> Self {
        Transform { key, kind }
    }

    /// Returns the key whose value was changed.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the transformation kind.
    pub fn kind(&self) -> &TransformKind {
        &self.kind
    }

    /// Consumes the `Transform`, returning its constituent parts.
    pub fn destructure(self) -> (Key, TransformKind) {
        (self.key, self.kind)
    }
}

/// Representation of a single transformation occurring during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub enum TransformKind {
    /// Writes a new value in the global state.
    Write(StoredValue),
    /// Removes the entry from the global state.
    Prune,
}

impl ToBytes for Transform {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.key.serialized_length()
            + U8_SERIALIZED_LENGTH
            + match &self.kind {
                TransformKind::Write(value) => value.serialized_length(),
                TransformKind::Prune => 0,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.key.write_bytes(writer)?;
        match &self.kind {
            TransformKind::Write(value) => {
                writer.push(WRITE_TAG);
                value.write_bytes(writer)
            }
            TransformKind::Prune => {
                writer.push(PRUNE_TAG);
                Ok(())
            }
        }
    }
}

impl FromBytes for Transform {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (key, remainder) = Key::from_bytes(bytes)?;
        let (tag, remainder) = u8::from_bytes(remainder)?;
        match tag {
            WRITE_TAG => {
                let (value, remainder) = StoredValue::from_bytes(remainder)?;
                Ok((Transform::new(key, TransformKind::Write(value)), remainder))
            }
            PRUNE_TAG => Ok((Transform::new(key, TransformKind::Prune), remainder)),
            _ => Err(bytesrepr::Error::Formatting),
        }
    }
}
