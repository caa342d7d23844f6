//! Virtual contracts: addresses the execution environment treats as deployed contracts, whose
//! calls are dispatched onto native modules.

mod bank_contract;
mod error;
pub mod metadata;

#[cfg(feature = "datasize")]
use datasize::DataSize;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

pub use bank_contract::{BankContractMetadata, BankContractMethod, Selector, SELECTOR_LENGTH};
pub use error::{MetadataError, ValidationError};
pub use metadata::VirtualContractMetadata;

use crate::{
    bytesrepr::{self, Bytes, FromBytes, ToBytes},
    evm_address::FromStrError,
    EvmAddress, EVM_ADDRESS_PREFIX,
};

/// The kind of a virtual contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive)]
#[repr(u32)]
pub enum ContractType {
    /// Unset. Never valid for a persisted record.
    Unknown = 0,
    /// An ERC-20 view of a native denomination.
    BankContract = 1,
}

impl ContractType {
    /// Returns the contract type with the given raw value, if registered.
    pub fn from_raw(raw: u32) -> Option<ContractType> {
        ContractType::from_u32(raw)
    }
}

/// A virtual contract record, as persisted and as carried in genesis snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct VirtualContract {
    /// The contract address in textual form.
    pub address: String,
    /// Whether calls to the contract are served.
    pub active: bool,
    /// The raw [`ContractType`].
    #[serde(rename = "type")]
    pub contract_type: u32,
    /// The encoded per-type metadata.
    pub metadata: Bytes,
}

impl VirtualContract {
    /// Constructs a record for `address` in canonical textual form.
    pub fn new(
        address: EvmAddress,
        active: bool,
        contract_type: ContractType,
        metadata: Bytes,
    ) -> Self {
        VirtualContract {
            address: address.to_hex(),
            active,
            contract_type: contract_type as u32,
            metadata,
        }
    }

    /// Decodes the address leniently: the `0x` prefix is optional, hex digits of either case are
    /// accepted and empty text yields the nil address. Text that does not decode at all also
    /// yields the nil address; records which pass [`validate_basic`](Self::validate_basic) always
    /// decode.
    pub fn contract_address(&self) -> EvmAddress {
        self.decode_address().unwrap_or(EvmAddress::NIL)
    }

    fn decode_address(&self) -> Result<EvmAddress, FromStrError> {
        let hex = self
            .address
            .strip_prefix(EVM_ADDRESS_PREFIX)
            .unwrap_or(&self.address);
        EvmAddress::from_hex(&hex.to_ascii_lowercase())
    }

    /// Returns the contract type, if the raw value is registered.
    pub fn contract_type(&self) -> Option<ContractType> {
        ContractType::from_raw(self.contract_type)
    }

    /// Returns `true` if this is a bank contract.
    pub fn is_bank_contract(&self) -> bool {
        self.contract_type() == Some(ContractType::BankContract)
    }

    /// Decodes and validates the metadata of the record.
    pub fn decoded_metadata(&self) -> Result<VirtualContractMetadata, MetadataError> {
        VirtualContractMetadata::decode(self.contract_type, &self.metadata)
    }

    /// Returns the bank contract metadata, if this is a bank contract with valid metadata.
    pub fn bank_contract_metadata(&self) -> Option<BankContractMetadata> {
        if !self.is_bank_contract() {
            return None;
        }
        match self.decoded_metadata() {
            Ok(VirtualContractMetadata::BankContract(metadata)) => Some(metadata),
            Err(_) => None,
        }
    }

    /// Checks the record before it is trusted.
    ///
    /// The address must be canonical (`0x` followed by 40 lowercase hex digits) and not nil, the
    /// type must be registered and the metadata must decode and validate for that type.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        let decodes_to_nil = matches!(self.decode_address(), Ok(address) if address.is_nil());
        if !self.address.is_empty() && decodes_to_nil {
            return Err(ValidationError::NilAddress);
        }
        if let Err(reason) = EvmAddress::from_canonical_str(&self.address) {
            return Err(ValidationError::MalformedAddress {
                address: self.address.clone(),
                reason,
            });
        }
        match self.contract_type() {
            None | Some(ContractType::Unknown) => return Err(ValidationError::TypeNotSpecified),
            Some(ContractType::BankContract) => {}
        }
        metadata::validate(self.contract_type, &self.metadata)
            .map_err(ValidationError::MetadataInvalid)
    }
}

impl ToBytes for VirtualContract {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.address.serialized_length()
            + self.active.serialized_length()
            + self.contract_type.serialized_length()
            + self.metadata.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.address.write_bytes(writer)?;
        self.active.write_bytes(writer)?;
        self.contract_type.write_bytes(writer)?;
        self.metadata.write_bytes(writer)
    }
}

impl FromBytes for VirtualContract {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (address, remainder) = String::from_bytes(bytes)?;
        let (active, remainder) = bool::from_bytes(remainder)?;
        let (contract_type, remainder) = u32::from_bytes(remainder)?;
        let (metadata, remainder) = Bytes::from_bytes(remainder)?;
        Ok((
            VirtualContract {
                address,
                active,
                contract_type,
                metadata,
            },
            remainder,
        ))
    }
}
