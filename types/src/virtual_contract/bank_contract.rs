//! The bank contract: a virtual ERC-20 token backed by a native denomination.

use std::fmt::{self, Display, Formatter};

#[cfg(feature = "datasize")]
use datasize::DataSize;
use serde::{Deserialize, Serialize};

use super::MetadataError;
use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    DenomMetadata,
};

/// The number of bytes of a method selector.
pub const SELECTOR_LENGTH: usize = 4;

/// A 4-byte method selector: the first bytes of the Keccak-256 hash of a method signature.
pub type Selector = [u8; SELECTOR_LENGTH];

/// Metadata of a bank contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct BankContractMetadata {
    /// The native denomination the contract is backed by.
    pub min_denom: String,
    /// Decimals reported by the contract.
    pub exponent: u32,
    /// Name and symbol reported by the contract.
    pub display_name: String,
}

impl BankContractMetadata {
    /// Constructs new bank contract metadata.
    pub fn new(
        min_denom: impl Into<String>,
        exponent: u32,
        display_name: impl Into<String>,
    ) -> Self {
        BankContractMetadata {
            min_denom: min_denom.into(),
            exponent,
            display_name: display_name.into(),
        }
    }

    /// Derives the metadata of the bank contract of a native denomination from the
    /// denomination's presentation metadata.
    ///
    /// Returns `None` when the presentation metadata has no base, no base unit at exponent 0,
    /// no listed display unit, or no display name.
    pub fn from_denom_metadata(metadata: &DenomMetadata) -> Option<Self> {
        if metadata.base.is_empty() {
            return None;
        }
        if metadata.unit(&metadata.base)?.exponent != 0 {
            return None;
        }
        let exponent = metadata.display_exponent()?;
        let display_name = if metadata.symbol.is_empty() {
            metadata.display.clone()
        } else {
            metadata.symbol.clone()
        };
        if display_name.is_empty() {
            return None;
        }
        Some(BankContractMetadata {
            min_denom: metadata.base.clone(),
            exponent,
            display_name,
        })
    }

    /// Checks the metadata for consistency.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.min_denom.is_empty() {
            return Err(MetadataError::EmptyMinDenom);
        }
        Ok(())
    }
}

impl ToBytes for BankContractMetadata {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.min_denom.serialized_length()
            + self.exponent.serialized_length()
            + self.display_name.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.min_denom.write_bytes(writer)?;
        self.exponent.write_bytes(writer)?;
        self.display_name.write_bytes(writer)
    }
}

impl FromBytes for BankContractMetadata {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (min_denom, remainder) = String::from_bytes(bytes)?;
        let (exponent, remainder) = u32::from_bytes(remainder)?;
        let (display_name, remainder) = String::from_bytes(remainder)?;
        Ok((
            BankContractMetadata {
                min_denom,
                exponent,
                display_name,
            },
            remainder,
        ))
    }
}

const NAME_SELECTOR: Selector = [0x06, 0xfd, 0xde, 0x03];
const SYMBOL_SELECTOR: Selector = [0x95, 0xd8, 0x9b, 0x41];
const DECIMALS_SELECTOR: Selector = [0x31, 0x3c, 0xe5, 0x67];
const TOTAL_SUPPLY_SELECTOR: Selector = [0x18, 0x16, 0x0d, 0xdd];
const BALANCE_OF_SELECTOR: Selector = [0x70, 0xa0, 0x82, 0x31];
const TRANSFER_SELECTOR: Selector = [0xa9, 0x05, 0x9c, 0xbb];

/// A method of the bank contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BankContractMethod {
    /// The call data does not select a known method.
    Unknown,
    /// `name()`
    Name,
    /// `symbol()`
    Symbol,
    /// `decimals()`
    Decimals,
    /// `totalSupply()`
    TotalSupply,
    /// `balanceOf(address)`
    BalanceOf,
    /// `transfer(address,uint256)`
    Transfer,
}

impl BankContractMethod {
    /// All methods the bank contract responds to.
    pub const ALL: [BankContractMethod; 6] = [
        BankContractMethod::Name,
        BankContractMethod::Symbol,
        BankContractMethod::Decimals,
        BankContractMethod::TotalSupply,
        BankContractMethod::BalanceOf,
        BankContractMethod::Transfer,
    ];

    /// Resolves the method selected by the first four bytes of `input`.
    ///
    /// Returns `(Unknown, false)` when `input` is shorter than four bytes or the selector is not
    /// one of the bank contract's.
    pub fn resolve(input: &[u8]) -> (BankContractMethod, bool) {
        match Self::from_call_data(input) {
            Some(method) => (method, true),
            None => (BankContractMethod::Unknown, false),
        }
    }

    /// Returns the method selected by the first four bytes of `input`, if any.
    pub fn from_call_data(input: &[u8]) -> Option<BankContractMethod> {
        let selector = input.get(..SELECTOR_LENGTH)?;
        Self::ALL
            .iter()
            .copied()
            .find(|method| method.selector().as_slice() == selector)
    }

    /// Returns the 4-byte selector of the method, or zeroes for [`BankContractMethod::Unknown`].
    pub fn selector(&self) -> Selector {
        match self {
            BankContractMethod::Unknown => [0; SELECTOR_LENGTH],
            BankContractMethod::Name => NAME_SELECTOR,
            BankContractMethod::Symbol => SYMBOL_SELECTOR,
            BankContractMethod::Decimals => DECIMALS_SELECTOR,
            BankContractMethod::TotalSupply => TOTAL_SUPPLY_SELECTOR,
            BankContractMethod::BalanceOf => BALANCE_OF_SELECTOR,
            BankContractMethod::Transfer => TRANSFER_SELECTOR,
        }
    }

    /// Returns the ABI signature of the method.
    pub fn signature(&self) -> &'static str {
        match self {
            BankContractMethod::Unknown => "",
            BankContractMethod::Name => "name()",
            BankContractMethod::Symbol => "symbol()",
            BankContractMethod::Decimals => "decimals()",
            BankContractMethod::TotalSupply => "totalSupply()",
            BankContractMethod::BalanceOf => "balanceOf(address)",
            BankContractMethod::Transfer => "transfer(address,uint256)",
        }
    }
}

impl Display for BankContractMethod {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BankContractMethod::Unknown => write!(f, "unknown"),
            method => write!(f, "{}", method.signature()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{crypto, DenomUnit};

    #[test]
    fn selectors_should_match_signature_hashes() {
        for method in BankContractMethod::ALL {
            let hash = crypto::keccak256(method.signature());
            assert_eq!(
                &hash.as_bytes()[..SELECTOR_LENGTH],
                method.selector().as_slice(),
                "{}",
                method
            );
        }
    }

    #[test]
    fn should_resolve_each_method() {
        for method in BankContractMethod::ALL {
            let mut input = method.selector().to_vec();
            input.extend_from_slice(&[0; 32]);
            assert_eq!(BankContractMethod::resolve(&input), (method, true));
            assert_eq!(
                BankContractMethod::resolve(&method.selector()),
                (method, true)
            );
        }
    }

    #[test]
    fn should_not_resolve_short_input() {
        assert_eq!(
            BankContractMethod::resolve(&[]),
            (BankContractMethod::Unknown, false)
        );
        assert_eq!(
            BankContractMethod::resolve(&[0x06, 0xfd, 0xde]),
            (BankContractMethod::Unknown, false)
        );
    }

    #[test]
    fn should_not_resolve_unknown_selector() {
        assert_eq!(
            BankContractMethod::resolve(&[0xde, 0xad, 0xbe, 0xef]),
            (BankContractMethod::Unknown, false)
        );
        // approve(address,uint256)
        assert_eq!(
            BankContractMethod::from_call_data(&[0x09, 0x5e, 0xa7, 0xb3]),
            None
        );
    }

    #[test]
    fn should_derive_metadata_from_denom_metadata() {
        let denom_metadata = DenomMetadata::default_for_native("aphoton").unwrap();
        let metadata = BankContractMetadata::from_denom_metadata(&denom_metadata).unwrap();
        assert_eq!(metadata, BankContractMetadata::new("aphoton", 18, "PHOTON"));
    }

    #[test]
    fn should_not_derive_metadata_without_display_unit() {
        let mut denom_metadata = DenomMetadata::default_for_native("uatom").unwrap();
        denom_metadata.denom_units.truncate(1);
        assert!(BankContractMetadata::from_denom_metadata(&denom_metadata).is_none());

        let mut denom_metadata = DenomMetadata::default_for_native("uatom").unwrap();
        denom_metadata.denom_units[0] = DenomUnit::new("uatom", 3);
        assert!(BankContractMetadata::from_denom_metadata(&denom_metadata).is_none());

        assert!(BankContractMetadata::from_denom_metadata(&DenomMetadata::default()).is_none());
    }

    #[test]
    fn bytesrepr_roundtrip() {
        bytesrepr::test_serialization_roundtrip(&BankContractMetadata::new("wei", 18, "ETH"));
    }
}
