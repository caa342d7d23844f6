//! Execution of calls to virtual bank contracts: an ERC-20 view of a native denomination.

use thiserror::Error;
use tracing::debug;

use frontier_types::{
    abi::{self, AbiError},
    bytesrepr::Bytes,
    virtual_contract::SELECTOR_LENGTH,
    BankContractMethod, EvmAddress, Key, MetadataError, StoredValue, VirtualContract, U256,
};

use crate::{
    global_state::{error::Error as GlobalStateError, StateReader},
    system::registry::RegistryError,
    tracking_copy::{TrackingCopy, TrackingCopyBankExt, TrackingCopyError},
};

/// Errors raised by a call to a virtual contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VirtualContractCallError {
    /// The contract is deactivated.
    #[error("virtual frontier contract {0} is not active")]
    Inactive(String),
    /// The contract is not a bank contract.
    #[error("virtual frontier contract {0} is not a bank contract")]
    NotABankContract(String),
    /// The call data does not select a known method.
    #[error("unknown method selector {0:02x?}")]
    UnknownMethod(Vec<u8>),
    /// The exponent does not fit the `uint8` returned by `decimals()`.
    #[error("exponent {0} does not fit in uint8")]
    ExponentOverflow(u32),
    /// The call arguments are malformed.
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] AbiError),
    /// The caller holds less than the transferred amount.
    #[error("insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance {
        /// The caller's balance.
        available: U256,
        /// The amount requested.
        requested: U256,
    },
    /// The contract metadata does not decode.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// The registry could not be read.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Error reading or writing the state.
    #[error(transparent)]
    TrackingCopy(#[from] TrackingCopyError),
}

/// Executes `input` against the bank contract `contract` on behalf of `caller`, returning the
/// ABI-encoded output.
pub fn call_bank_contract<R>(
    tc: &mut TrackingCopy<R>,
    contract: &VirtualContract,
    caller: EvmAddress,
    input: &[u8],
) -> Result<Bytes, VirtualContractCallError>
where
    R: StateReader<Key, StoredValue, Error = GlobalStateError>,
{
    if !contract.active {
        return Err(VirtualContractCallError::Inactive(contract.address.clone()));
    }
    if !contract.is_bank_contract() {
        return Err(VirtualContractCallError::NotABankContract(
            contract.address.clone(),
        ));
    }
    let metadata = contract.decoded_metadata()?;
    let metadata = metadata.as_bank_contract().ok_or_else(|| {
        VirtualContractCallError::NotABankContract(contract.address.clone())
    })?;

    let (method, found) = BankContractMethod::resolve(input);
    if !found {
        let selector = input.iter().take(SELECTOR_LENGTH).copied().collect();
        return Err(VirtualContractCallError::UnknownMethod(selector));
    }
    let arguments = &input[SELECTOR_LENGTH..];
    debug!(address = %contract.address, %method, "virtual bank contract call");

    let output = match method {
        BankContractMethod::Name | BankContractMethod::Symbol => {
            abi::encode_string(&metadata.display_name)
        }
        BankContractMethod::Decimals => {
            let decimals = u8::try_from(metadata.exponent)
                .map_err(|_| VirtualContractCallError::ExponentOverflow(metadata.exponent))?;
            abi::encode_uint8(decimals).to_vec()
        }
        BankContractMethod::TotalSupply => {
            abi::encode_uint256(tc.total_supply(&metadata.min_denom)?).to_vec()
        }
        BankContractMethod::BalanceOf => {
            let owner = abi::decode_address(arguments, 0)?;
            abi::encode_uint256(tc.balance(owner, &metadata.min_denom)?).to_vec()
        }
        BankContractMethod::Transfer => {
            let recipient = abi::decode_address(arguments, 0)?;
            let amount = abi::decode_uint256(arguments, 1)?;
            tc.transfer(caller, recipient, &metadata.min_denom, amount)
                .map_err(|error| match error {
                    TrackingCopyError::InsufficientFunds {
                        available,
                        requested,
                        ..
                    } => VirtualContractCallError::InsufficientBalance {
                        available,
                        requested,
                    },
                    other => other.into(),
                })?;
            abi::encode_bool(true).to_vec()
        }
        BankContractMethod::Unknown => {
            return Err(VirtualContractCallError::UnknownMethod(
                method.selector().to_vec(),
            ))
        }
    };
    Ok(Bytes::from(output))
}
