#[cfg(feature = "datasize")]
use datasize::DataSize;
use serde::{Deserialize, Serialize};

use super::{Transform, TransformKind};
use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    Key,
};

/// A log of all transforms produced during execution, in the order they were made.
#[derive(Debug, Clone, Eq, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct Effects(Vec<Transform>);

impl Effects {
    /// Constructs a new, empty `Effects`.
    pub const fn new() -> Self {
        Effects(vec![])
    }

    /// Returns a reference to the transforms.
    pub fn transforms(&self) -> &[Transform] {
        &self.0
    }

    /// Appends a transform.
    pub fn push(&mut self, transform: Transform) {
        self.0.push(transform)
    }

    /// Moves all elements from `other` into `self`.
    pub fn append(&mut self, mut other: Self) {
        self.0.append(&mut other.0);
    }

    /// Returns `true` if there are no transforms recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of transforms recorded.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if any transform touches `key`.
    pub fn touches(&self, key: &Key) -> bool {
        self.0.iter().any(|transform| transform.key() == key)
    }

    /// Returns the number of write transforms recorded.
    pub fn write_count(&self) -> usize {
        self.0
            .iter()
            .filter(|transform| matches!(transform.kind(), TransformKind::Write(_)))
            .count()
    }

    /// Consumes `self`, returning the wrapped vec.
    pub fn value(self) -> Vec<Transform> {
        self.0
    }
}

impl ToBytes for Effects {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }
}

impl FromBytes for Effects {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (transforms, remainder) = Vec::<Transform>::from_bytes(bytes)?;
        Ok((Effects(transforms), remainder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EvmAddress, StoredValue, U256};

    #[test]
    fn bytesrepr_roundtrip() {
        let address = EvmAddress::new([1; 20]);
        let mut effects = Effects::new();
        effects.push(Transform::new(
            Key::Balance(address, "aphoton".to_string()),
            TransformKind::Write(StoredValue::Balance(U256::from(5))),
        ));
        effects.push(Transform::new(Key::Account(address), TransformKind::Prune));
        bytesrepr::test_serialization_roundtrip(&effects);
        assert_eq!(effects.write_count(), 1);
        assert!(effects.touches(&Key::Account(address)));
    }
}
