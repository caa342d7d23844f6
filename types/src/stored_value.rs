//! Values of the global state.

mod type_mismatch;

use std::convert::TryFrom;

#[cfg(feature = "datasize")]
use datasize::DataSize;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

pub use type_mismatch::TypeMismatch;

use crate::{
    bytesrepr::{self, Bytes, FromBytes, ToBytes, U8_SERIALIZED_LENGTH},
    Account, DenomMetadata, EvmAddress, Params, VirtualContract, H256, U256,
};

#[derive(Debug, PartialEq, FromPrimitive)]
#[repr(u8)]
enum Tag {
    Account = 0,
    Balance = 1,
    DenomMetadata = 2,
    Code = 3,
    StorageValue = 4,
    Params = 5,
    VirtualContract = 6,
    VirtualContractOrdinal = 7,
    Address = 8,
}

/// A value stored in the global state.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub enum StoredValue {
    /// A native account.
    Account(Account),
    /// A balance or a total supply.
    Balance(U256),
    /// Metadata of a denomination.
    DenomMetadata(DenomMetadata),
    /// Contract code.
    Code(Bytes),
    /// The value of a contract storage slot.
    StorageValue(H256),
    /// The module parameters.
    Params(Params),
    /// A virtual contract record.
    VirtualContract(VirtualContract),
    /// The insertion ordinal of a virtual contract.
    VirtualContractOrdinal(u64),
    /// An address, used by indices.
    Address(EvmAddress),
}

impl StoredValue {
    /// Returns the type name of the [`StoredValue`] enum variant.
    pub fn type_name(&self) -> String {
        match self {
            StoredValue::Account(_) => "Account".to_string(),
            StoredValue::Balance(_) => "Balance".to_string(),
            StoredValue::DenomMetadata(_) => "DenomMetadata".to_string(),
            StoredValue::Code(_) => "Code".to_string(),
            StoredValue::StorageValue(_) => "StorageValue".to_string(),
            StoredValue::Params(_) => "Params".to_string(),
            StoredValue::VirtualContract(_) => "VirtualContract".to_string(),
            StoredValue::VirtualContractOrdinal(_) => "VirtualContractOrdinal".to_string(),
            StoredValue::Address(_) => "Address".to_string(),
        }
    }

    fn tag(&self) -> Tag {
        match self {
            StoredValue::Account(_) => Tag::Account,
            StoredValue::Balance(_) => Tag::Balance,
            StoredValue::DenomMetadata(_) => Tag::DenomMetadata,
            StoredValue::Code(_) => Tag::Code,
            StoredValue::StorageValue(_) => Tag::StorageValue,
            StoredValue::Params(_) => Tag::Params,
            StoredValue::VirtualContract(_) => Tag::VirtualContract,
            StoredValue::VirtualContractOrdinal(_) => Tag::VirtualContractOrdinal,
            StoredValue::Address(_) => Tag::Address,
        }
    }
}

macro_rules! impl_try_from_stored_value {
    ($target:ty, $variant:ident) => {
        impl TryFrom<StoredValue> for $target {
            type Error = TypeMismatch;

            fn try_from(stored_value: StoredValue) -> Result<Self, Self::Error> {
                match stored_value {
                    StoredValue::$variant(value) => Ok(value),
                    _ => Err(TypeMismatch::new(
                        stringify!($variant).to_string(),
                        stored_value.type_name(),
                    )),
                }
            }
        }
    };
}

impl_try_from_stored_value!(Account, Account);
impl_try_from_stored_value!(U256, Balance);
impl_try_from_stored_value!(DenomMetadata, DenomMetadata);
impl_try_from_stored_value!(Bytes, Code);
impl_try_from_stored_value!(H256, StorageValue);
impl_try_from_stored_value!(Params, Params);
impl_try_from_stored_value!(VirtualContract, VirtualContract);
impl_try_from_stored_value!(u64, VirtualContractOrdinal);
impl_try_from_stored_value!(EvmAddress, Address);

impl ToBytes for StoredValue {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
            + match self {
                StoredValue::Account(account) => account.serialized_length(),
                StoredValue::Balance(_) => crate::U256_BYTES_LENGTH,
                StoredValue::DenomMetadata(metadata) => metadata.serialized_length(),
                StoredValue::Code(code) => code.serialized_length(),
                StoredValue::StorageValue(value) => value.serialized_length(),
                StoredValue::Params(params) => params.serialized_length(),
                StoredValue::VirtualContract(contract) => contract.serialized_length(),
                StoredValue::VirtualContractOrdinal(ordinal) => ordinal.serialized_length(),
                StoredValue::Address(address) => address.serialized_length(),
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.tag() as u8);
        match self {
            StoredValue::Account(account) => account.write_bytes(writer),
            StoredValue::Balance(amount) => {
                writer.extend_from_slice(&amount.to_be_word());
                Ok(())
            }
            StoredValue::DenomMetadata(metadata) => metadata.write_bytes(writer),
            StoredValue::Code(code) => code.write_bytes(writer),
            StoredValue::StorageValue(value) => value.write_bytes(writer),
            StoredValue::Params(params) => params.write_bytes(writer),
            StoredValue::VirtualContract(contract) => contract.write_bytes(writer),
            StoredValue::VirtualContractOrdinal(ordinal) => ordinal.write_bytes(writer),
            StoredValue::Address(address) => address.write_bytes(writer),
        }
    }
}

impl FromBytes for StoredValue {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        match Tag::from_u8(tag).ok_or(bytesrepr::Error::Formatting)? {
            Tag::Account => Account::from_bytes(remainder)
                .map(|(account, remainder)| (StoredValue::Account(account), remainder)),
            Tag::Balance => {
                let (word, remainder) = <[u8; crate::U256_BYTES_LENGTH]>::from_bytes(remainder)?;
                Ok((StoredValue::Balance(U256::from_be_word(&word)), remainder))
            }
            Tag::DenomMetadata => DenomMetadata::from_bytes(remainder)
                .map(|(metadata, remainder)| (StoredValue::DenomMetadata(metadata), remainder)),
            Tag::Code => Bytes::from_bytes(remainder)
                .map(|(code, remainder)| (StoredValue::Code(code), remainder)),
            Tag::StorageValue => H256::from_bytes(remainder)
                .map(|(value, remainder)| (StoredValue::StorageValue(value), remainder)),
            Tag::Params => Params::from_bytes(remainder)
                .map(|(params, remainder)| (StoredValue::Params(params), remainder)),
            Tag::VirtualContract => VirtualContract::from_bytes(remainder)
                .map(|(contract, remainder)| (StoredValue::VirtualContract(contract), remainder)),
            Tag::VirtualContractOrdinal => u64::from_bytes(remainder).map(|(ordinal, remainder)| {
                (StoredValue::VirtualContractOrdinal(ordinal), remainder)
            }),
            Tag::Address => EvmAddress::from_bytes(remainder)
                .map(|(address, remainder)| (StoredValue::Address(address), remainder)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_matching_variant() {
        let value = StoredValue::Balance(U256::from(10));
        assert_eq!(U256::try_from(value).unwrap(), U256::from(10));
    }

    #[test]
    fn should_report_type_mismatch() {
        let value = StoredValue::StorageValue(H256::new([1; 32]));
        let error = Account::try_from(value).unwrap_err();
        assert_eq!(error, TypeMismatch::new("Account".into(), "StorageValue".into()));
    }

    #[test]
    fn bytesrepr_roundtrip() {
        let values = vec![
            StoredValue::Account(Account::new_module("evm")),
            StoredValue::Balance(U256::MAX),
            StoredValue::Code(Bytes::from(vec![0x60, 0x80])),
            StoredValue::StorageValue(H256::new([2; 32])),
            StoredValue::Params(Params::default()),
            StoredValue::VirtualContractOrdinal(3),
            StoredValue::Address(EvmAddress::new([4; 20])),
        ];
        for value in values {
            bytesrepr::test_serialization_roundtrip(&value);
        }
    }
}
