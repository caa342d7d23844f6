//! Global state.

/// Errors of the global state.
pub mod error;
/// In-memory implementation of global state.
pub mod in_memory;

use std::{cell::RefCell, rc::Rc};

use tracing::{debug, error};

use frontier_types::{execution::Effects, GenesisState, Key, StoredValue};

use crate::{
    data_access_layer::{
        GenesisRequest, GenesisResult, VirtualContractCallRequest, VirtualContractCallResult,
    },
    global_state::error::Error as GlobalStateError,
    system::{
        bank_contract,
        genesis::{self, GenesisError, GenesisInstaller},
        registry::VirtualContractRegistry,
    },
    tracking_copy::{TrackingCopy, TrackingCopyError},
};

/// A trait expressing the reading of state. This trait is used to abstract the underlying store.
pub trait StateReader<K, V> {
    /// An error which occurs when reading state
    type Error;

    /// Returns the state value from the corresponding key
    fn read(&self, key: &K) -> Result<Option<V>, Self::Error>;

    /// Returns the keys in the store whose serialized form starts with `prefix`, in key order.
    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<K>, Self::Error>;
}

/// A trait expressing operations over the global state.
pub trait StateProvider {
    /// Associated reader type for `StateProvider`.
    type Reader: StateReader<Key, StoredValue, Error = GlobalStateError>;

    /// Returns a tracking copy over the current state.
    fn tracking_copy(&self) -> Result<TrackingCopy<Self::Reader>, GlobalStateError>;

    /// Exports the genesis state of the execution environment module.
    fn export_genesis(&self) -> Result<GenesisState, GenesisError> {
        let mut tc = self
            .tracking_copy()
            .map_err(|err| GenesisError::TrackingCopy(TrackingCopyError::Storage(err)))?;
        genesis::export_genesis(&mut tc)
    }
}

/// Provides `commit` method.
pub trait CommitProvider: StateProvider {
    /// Applies the effects to the state.
    fn commit(&self, effects: Effects) -> Result<(), GlobalStateError>;

    /// Runs genesis against the current state, committing its effects only on success.
    fn genesis(&self, request: GenesisRequest) -> GenesisResult {
        let tc = match self.tracking_copy() {
            Ok(tc) => Rc::new(RefCell::new(tc)),
            Err(err) => {
                return GenesisResult::Failure(GenesisError::TrackingCopy(
                    TrackingCopyError::Storage(err),
                ))
            }
        };

        let (config, genesis_state) = request.take();
        let mut genesis_installer: GenesisInstaller<Self> = GenesisInstaller::new(config, tc);

        let validator_updates = match genesis_installer.install(genesis_state) {
            Ok(validator_updates) => validator_updates,
            Err(gen_err) => {
                error!(%gen_err, "genesis failed");
                return GenesisResult::Failure(*gen_err);
            }
        };

        let effects = genesis_installer.finalize();
        match self.commit(effects.clone()) {
            Ok(()) => GenesisResult::Success {
                effects,
                validator_updates,
            },
            Err(err) => {
                GenesisResult::Failure(GenesisError::TrackingCopy(TrackingCopyError::Storage(err)))
            }
        }
    }

    /// Calls a virtual contract, committing the effects of the call on success.
    fn call_virtual_contract(
        &self,
        request: VirtualContractCallRequest,
    ) -> VirtualContractCallResult {
        let mut tc = match self.tracking_copy() {
            Ok(tc) => tc,
            Err(err) => {
                return VirtualContractCallResult::Failure(TrackingCopyError::Storage(err).into())
            }
        };

        let contract = match tc.virtual_contract(request.address()) {
            Ok(Some(contract)) => contract,
            Ok(None) => return VirtualContractCallResult::NotFound(request.address()),
            Err(err) => return VirtualContractCallResult::Failure(err.into()),
        };

        let output = match bank_contract::call_bank_contract(
            &mut tc,
            &contract,
            request.caller(),
            request.input(),
        ) {
            Ok(output) => output,
            Err(err) => return VirtualContractCallResult::Failure(err),
        };

        let effects = tc.effects();
        debug!(address = %request.address(), transforms = effects.len(), "virtual contract call");
        match self.commit(effects.clone()) {
            Ok(()) => VirtualContractCallResult::Success { output, effects },
            Err(err) => VirtualContractCallResult::Failure(TrackingCopyError::Storage(err).into()),
        }
    }
}
