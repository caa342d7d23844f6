//! Definition of a chain kind flag that is used to determine the operating mode of a chain.
#[cfg(feature = "datasize")]
use datasize::DataSize;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use rand::{distributions::Standard, prelude::*};
use serde::{Deserialize, Serialize};

use frontier_types::bytesrepr::{Error, FromBytes, ToBytes, U8_SERIALIZED_LENGTH};

/// Flag representing a mode of operation of a chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, FromPrimitive)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    /// Public (default) mode.
    Public,
    /// Development chain mode. The native denomination gets a bank contract at genesis.
    Development,
    /// Restricted chain mode. Contract creation may not be enabled at genesis.
    Restricted,
}

impl ChainKind {
    /// Returns `true` if the chain kind is [`Public`].
    ///
    /// [`Public`]: ChainKind::Public
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// Returns `true` if the chain kind is [`Development`].
    ///
    /// [`Development`]: ChainKind::Development
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Returns `true` if the chain kind is [`Restricted`].
    ///
    /// [`Restricted`]: ChainKind::Restricted
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Restricted)
    }
}

impl ToBytes for ChainKind {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let chain_kind_value = *self as u8;
        chain_kind_value.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
    }
}

impl FromBytes for ChainKind {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (chain_kind_value, remainder) = u8::from_bytes(bytes)?;
        let chain_kind = ChainKind::from_u8(chain_kind_value).ok_or(Error::Formatting)?;
        Ok((chain_kind, remainder))
    }
}

impl Default for ChainKind {
    fn default() -> Self {
        Self::Public
    }
}

impl Distribution<ChainKind> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ChainKind {
        match rng.gen_range(0..3) {
            0 => ChainKind::Public,
            1 => ChainKind::Development,
            _ => ChainKind::Restricted,
        }
    }
}

#[cfg(test)]
mod tests {
    use frontier_types::bytesrepr;

    use super::*;

    #[test]
    fn bytesrepr_roundtrip() {
        for chain_kind in [
            ChainKind::Public,
            ChainKind::Development,
            ChainKind::Restricted,
        ] {
            bytesrepr::test_serialization_roundtrip(&chain_kind);
        }
    }

    #[test]
    fn should_reject_unknown_discriminant() {
        assert_eq!(
            bytesrepr::deserialize_from_slice::<_, ChainKind>([3u8]),
            Err(Error::Formatting)
        );
    }

    #[test]
    fn should_deserialize_lowercase_names() {
        let chain_kind: ChainKind = serde_json::from_str("\"development\"").unwrap();
        assert!(chain_kind.is_development());
        assert!(ChainKind::default().is_public());
    }
}
