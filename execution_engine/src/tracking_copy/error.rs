use thiserror::Error;

use frontier_types::{bytesrepr, EvmAddress, Key, StoredValueTypeMismatch, U256};

use crate::global_state::error::Error as GlobalStateError;

/// Possible tracking copy errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Storage error.
    #[error("Storage error: {}", _0)]
    Storage(#[from] GlobalStateError),
    /// Failed to (de)serialize bytes.
    #[error("Serialization error: {}", _0)]
    BytesRepr(#[from] bytesrepr::Error),
    /// Unable to find a key.
    #[error("Key {} not found", _0)]
    KeyNotFound(Key),
    /// Unable to find an account.
    #[error("Account {} not found", _0)]
    AccountNotFound(EvmAddress),
    /// Type mismatch error.
    #[error("{}", _0)]
    TypeMismatch(#[from] StoredValueTypeMismatch),
    /// A balance is too low for a transfer.
    #[error("insufficient funds: {address} holds {available}{denom}, {requested}{denom} requested")]
    InsufficientFunds {
        /// The debited address.
        address: EvmAddress,
        /// The denomination.
        denom: String,
        /// The balance held.
        available: U256,
        /// The amount requested.
        requested: U256,
    },
    /// A balance or supply would exceed the 256-bit range.
    #[error("arithmetic overflow of {0}")]
    Overflow(Key),
}
