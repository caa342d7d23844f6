//! Parameters of the execution environment module.

#[cfg(feature = "datasize")]
use datasize::DataSize;
use rand::{
    distributions::{Alphanumeric, Distribution, Standard},
    Rng,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bytesrepr::{self, FromBytes, ToBytes};

/// The default denomination used for gas and native value transfers.
pub const DEFAULT_EVM_DENOM: &str = "aphoton";

/// Error returned by [`Params::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// The EVM denomination is empty or has no display part after its unit prefix.
    #[error("invalid evm denom {0:?}: must be at least 2 characters")]
    InvalidEvmDenom(String),
    /// The EVM denomination contains whitespace.
    #[error("invalid evm denom {0:?}: must not contain whitespace")]
    WhitespaceInEvmDenom(String),
}

/// Parameters of the execution environment module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct Params {
    /// Denomination used for gas and for native value transfers.
    pub evm_denom: String,
    /// Whether contract creation is allowed.
    pub enable_create: bool,
    /// Whether contract calls are allowed.
    pub enable_call: bool,
    /// Whether transactions without replay protection are accepted.
    pub allow_unprotected_txs: bool,
}

impl Params {
    /// Checks the parameters for consistency.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.evm_denom.chars().count() < 2 {
            return Err(ParamsError::InvalidEvmDenom(self.evm_denom.clone()));
        }
        if self.evm_denom.chars().any(char::is_whitespace) {
            return Err(ParamsError::WhitespaceInEvmDenom(self.evm_denom.clone()));
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Params {
            evm_denom: DEFAULT_EVM_DENOM.to_string(),
            enable_create: true,
            enable_call: true,
            allow_unprotected_txs: false,
        }
    }
}

impl ToBytes for Params {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.evm_denom.serialized_length()
            + self.enable_create.serialized_length()
            + self.enable_call.serialized_length()
            + self.allow_unprotected_txs.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.evm_denom.write_bytes(writer)?;
        self.enable_create.write_bytes(writer)?;
        self.enable_call.write_bytes(writer)?;
        self.allow_unprotected_txs.write_bytes(writer)
    }
}

impl FromBytes for Params {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (evm_denom, remainder) = String::from_bytes(bytes)?;
        let (enable_create, remainder) = bool::from_bytes(remainder)?;
        let (enable_call, remainder) = bool::from_bytes(remainder)?;
        let (allow_unprotected_txs, remainder) = bool::from_bytes(remainder)?;
        Ok((
            Params {
                evm_denom,
                enable_create,
                enable_call,
                allow_unprotected_txs,
            },
            remainder,
        ))
    }
}

impl Distribution<Params> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Params {
        let suffix: String = rng
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        Params {
            evm_denom: format!("a{}", suffix.to_lowercase()),
            enable_create: rng.gen(),
            enable_call: rng.gen(),
            allow_unprotected_txs: rng.gen(),
        }
    }
}
