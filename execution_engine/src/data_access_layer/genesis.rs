use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{Deserialize, Serialize};

use frontier_types::{bytesrepr::Bytes, execution::Effects, GenesisState, Params};

use crate::{engine_state::EngineConfig, system::genesis::GenesisError};

/// Represents a configuration of a genesis process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisRequest {
    config: EngineConfig,
    genesis_state: GenesisState,
}

impl GenesisRequest {
    /// Creates a new genesis request.
    pub fn new(config: EngineConfig, genesis_state: GenesisState) -> Self {
        GenesisRequest {
            config,
            genesis_state,
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the genesis state to import.
    pub fn genesis_state(&self) -> &GenesisState {
        &self.genesis_state
    }

    /// Consumes the request, returning its parts.
    pub fn take(self) -> (EngineConfig, GenesisState) {
        (self.config, self.genesis_state)
    }
}

impl Distribution<GenesisRequest> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GenesisRequest {
        let mut params: Params = rng.gen();
        params.enable_create = true;
        let accounts = (0..rng.gen_range(0..4)).map(|_| rng.gen()).collect();
        GenesisRequest::new(
            EngineConfig::default(),
            GenesisState::new(params, accounts, Vec::new()),
        )
    }
}

/// A change to the validator set requested by a module at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorUpdate {
    /// The validator's public key.
    pub public_key: Bytes,
    /// The validator's new voting power.
    pub power: u64,
}

/// Represents a result of a `genesis` request.
#[derive(Debug, Clone)]
pub enum GenesisResult {
    /// Genesis failed; nothing was committed.
    Failure(GenesisError),
    /// Genesis succeeded and its effects were committed.
    Success {
        /// Effects of genesis.
        effects: Effects,
        /// Validator set changes requested by the module.
        validator_updates: Vec<ValidatorUpdate>,
    },
}

impl GenesisResult {
    /// Is success.
    pub fn is_success(&self) -> bool {
        matches!(self, GenesisResult::Success { .. })
    }

    /// Returns a Result matching the installer's own API.
    pub fn as_legacy(self) -> Result<Effects, Box<GenesisError>> {
        match self {
            GenesisResult::Failure(err) => Err(Box::new(err)),
            GenesisResult::Success { effects, .. } => Ok(effects),
        }
    }
}
