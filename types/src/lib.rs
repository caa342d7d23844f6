//! Types shared by the frontier virtual contract engine: the binary codec, addresses and hashes,
//! native accounts and denominations, virtual contract records and the genesis document.

#![doc(test(attr(forbid(warnings))))]
#![warn(missing_docs)]

pub mod abi;
pub mod account;
pub mod bytesrepr;
pub mod crypto;
mod denom_metadata;
pub mod evm_address;
pub mod execution;
mod genesis;
mod h256;
mod key;
mod params;
mod stored_value;
mod uint;
pub mod virtual_contract;

pub use account::{
    module_address, Account, AccountKind, EvmAccount, EVM_ACCOUNT_CAPABILITY,
    MODULE_ACCOUNT_CAPABILITY,
};
pub use crypto::{keccak256, EMPTY_CODE_HASH};
pub use denom_metadata::{DenomMetadata, DenomUnit, DEFAULT_DISPLAY_EXPONENT};
#[doc(inline)]
pub use evm_address::{EvmAddress, EVM_ADDRESS_LENGTH, EVM_ADDRESS_PREFIX};
pub use genesis::{GenesisAccount, GenesisState, StorageEntry};
pub use h256::{FromHexError, H256, H256_LENGTH};
pub use key::{Key, KeyTag};
pub use params::{Params, ParamsError, DEFAULT_EVM_DENOM};
pub use stored_value::{StoredValue, TypeMismatch as StoredValueTypeMismatch};
pub use uint::{U256, U256_BYTES_LENGTH};
pub use virtual_contract::{
    BankContractMetadata, BankContractMethod, ContractType, MetadataError, ValidationError,
    VirtualContract, VirtualContractMetadata,
};
