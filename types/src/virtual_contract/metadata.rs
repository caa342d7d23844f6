//! Decoding and validation of the per-type metadata carried by virtual contract records.

use super::{BankContractMetadata, ContractType, MetadataError};
use crate::bytesrepr::{self, ToBytes};

/// The decoded metadata of a virtual contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualContractMetadata {
    /// Metadata of a bank contract.
    BankContract(BankContractMetadata),
}

impl VirtualContractMetadata {
    /// Decodes and validates `raw` as the metadata of a contract of `contract_type`.
    ///
    /// The type is checked before any bytes are looked at, and every byte of `raw` must be
    /// consumed.
    pub fn decode(contract_type: u32, raw: &[u8]) -> Result<Self, MetadataError> {
        match ContractType::from_raw(contract_type) {
            Some(ContractType::BankContract) => {
                let metadata: BankContractMetadata = bytesrepr::deserialize_from_slice(raw)?;
                metadata.validate()?;
                Ok(VirtualContractMetadata::BankContract(metadata))
            }
            Some(ContractType::Unknown) | None => {
                Err(MetadataError::UnsupportedContractType(contract_type))
            }
        }
    }

    /// Returns the contract type this metadata belongs to.
    pub fn contract_type(&self) -> ContractType {
        match self {
            VirtualContractMetadata::BankContract(_) => ContractType::BankContract,
        }
    }

    /// Encodes the metadata into the bytes stored in a record.
    pub fn to_raw(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        match self {
            VirtualContractMetadata::BankContract(metadata) => metadata.to_bytes(),
        }
    }

    /// Returns the bank contract metadata, if this is a bank contract.
    pub fn as_bank_contract(&self) -> Option<&BankContractMetadata> {
        match self {
            VirtualContractMetadata::BankContract(metadata) => Some(metadata),
        }
    }
}

/// Checks that `raw` decodes and validates as the metadata of a contract of `contract_type`.
pub fn validate(contract_type: u32, raw: &[u8]) -> Result<(), MetadataError> {
    VirtualContractMetadata::decode(contract_type, raw).map(|_| ())
}
