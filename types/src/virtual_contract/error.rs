use thiserror::Error;

use crate::{bytesrepr, evm_address::FromStrError};

/// Error returned when a virtual contract's metadata fails to decode or validate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetadataError {
    /// The contract type has no registered metadata format.
    #[error("unsupported contract type {0}")]
    UnsupportedContractType(u32),
    /// The metadata bytes do not decode into the format of the contract type.
    #[error("failed to decode metadata: {0}")]
    Decode(bytesrepr::Error),
    /// The reference denomination of a bank contract is empty.
    #[error("min denom cannot be empty")]
    EmptyMinDenom,
}

impl From<bytesrepr::Error> for MetadataError {
    fn from(error: bytesrepr::Error) -> Self {
        MetadataError::Decode(error)
    }
}

/// Error returned by [`VirtualContract::validate_basic`](super::VirtualContract::validate_basic).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// The address decodes to the all-zero address.
    #[error("nil address")]
    NilAddress,
    /// The address is not in canonical form.
    #[error("malformed address {address:?}: {reason}")]
    MalformedAddress {
        /// The offending text.
        address: String,
        /// Why the text was rejected.
        reason: FromStrError,
    },
    /// The contract type is unset or unknown.
    #[error("type must be specified")]
    TypeNotSpecified,
    /// The metadata does not decode or validate for the contract type.
    #[error("metadata does not pass validation: {0}")]
    MetadataInvalid(MetadataError),
}
