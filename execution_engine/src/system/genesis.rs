//! Support for a genesis process: importing and exporting the state of the execution environment
//! module, including its virtual contracts.

use std::{cell::RefCell, rc::Rc};

use thiserror::Error;
use tracing::{debug, info};

use frontier_types::{
    execution::Effects, keccak256, BankContractMetadata, DenomMetadata, EvmAddress,
    GenesisAccount, GenesisState, Key, Params, ParamsError, StoredValue, VirtualContract,
    EVM_ACCOUNT_CAPABILITY, H256,
};

use crate::{
    data_access_layer::ValidatorUpdate,
    engine_state::EngineConfig,
    global_state::{error::Error as GlobalStateError, StateProvider, StateReader},
    system::{
        deployer::{DeployError, Deployer},
        registry::{RegistryError, VirtualContractRegistry},
        DEPLOYER_MODULE_NAME, EVM_MODULE_NAME,
    },
    tracking_copy::{
        TrackingCopy, TrackingCopyAccountExt, TrackingCopyBankExt, TrackingCopyError,
        TrackingCopyEvmExt,
    },
};

/// Error returned as a result of a failed genesis process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenesisError {
    /// Contract creation is enabled on a chain which forbids it.
    #[error("enable create is not allowed on restricted chains")]
    EnableCreateNotAllowed,
    /// The module parameters are invalid.
    #[error("invalid params: {0}")]
    InvalidParams(#[from] ParamsError),
    /// A required module account is missing.
    #[error("the {0} module account has not been set")]
    MissingModuleAccount(String),
    /// A genesis account has no native account.
    #[error("account not found for address {0}")]
    AccountNotFound(EvmAddress),
    /// A genesis account's native account lacks the EVM capability.
    #[error("account {0} must be an EVM account")]
    NotAnEvmAccount(EvmAddress),
    /// The code of a genesis account does not hash to the account's code hash.
    #[error(
        "the evm state code doesn't match with the codehash: account {address}, \
         evm state codehash {actual}, account codehash {expected}"
    )]
    CodeHashMismatch {
        /// The account.
        address: EvmAddress,
        /// The code hash recorded on the account.
        expected: H256,
        /// The hash of the code in the genesis state.
        actual: H256,
    },
    /// Bank contract metadata cannot be derived for the native denomination.
    #[error("prepared bank denom metadata for native asset {0} is invalid")]
    InvalidDenomMetadata(String),
    /// Deploying the bank contract of the native denomination failed.
    #[error("failed to deploy virtual frontier bank contract: {0}")]
    Deploy(DeployError),
    /// Importing a snapshot virtual contract failed.
    #[error("failed to import virtual frontier contract: {0}")]
    VirtualContract(RegistryError),
    /// The number of virtual contracts and the deployer sequence disagree.
    #[error(
        "invalid sequence number for deployer account, expect sequence {expected} but got {actual}"
    )]
    DeployerSequenceMismatch {
        /// The number of virtual contracts.
        expected: u64,
        /// The deployer account's sequence.
        actual: u64,
    },
    /// Reading the registry failed.
    #[error("registry error: {0}")]
    Registry(RegistryError),
    /// Reading or writing the state failed.
    #[error("tracking copy error: {0}")]
    TrackingCopy(#[from] TrackingCopyError),
}

/// Installs a genesis state into the state behind a tracking copy.
pub struct GenesisInstaller<S>
where
    S: StateProvider + ?Sized,
{
    config: EngineConfig,
    tracking_copy: Rc<RefCell<TrackingCopy<<S as StateProvider>::Reader>>>,
}

impl<S> GenesisInstaller<S>
where
    S: StateProvider + ?Sized,
{
    /// Creates a new installer.
    pub fn new(
        config: EngineConfig,
        tracking_copy: Rc<RefCell<TrackingCopy<<S as StateProvider>::Reader>>>,
    ) -> Self {
        GenesisInstaller {
            config,
            tracking_copy,
        }
    }

    /// Returns the effects accumulated by the installer.
    pub fn finalize(self) -> Effects {
        self.tracking_copy.borrow().effects()
    }

    /// Imports `genesis_state`. Every error is fatal: the caller must discard the tracking copy.
    pub fn install(
        &mut self,
        genesis_state: GenesisState,
    ) -> Result<Vec<ValidatorUpdate>, Box<GenesisError>> {
        let GenesisState {
            params,
            accounts,
            virtual_frontier_contracts,
        } = genesis_state;
        info!(
            chain_kind = ?self.config.chain_kind(),
            accounts = accounts.len(),
            virtual_frontier_contracts = virtual_frontier_contracts.len(),
            "starting genesis import"
        );

        self.install_params(&params).map_err(Box::new)?;
        self.check_module_accounts().map_err(Box::new)?;
        self.install_accounts(&accounts).map_err(Box::new)?;
        if self.config.chain_kind().is_development() {
            self.bootstrap_native_bank_contract(&params.evm_denom, &virtual_frontier_contracts)
                .map_err(Box::new)?;
        }
        self.import_virtual_contracts(&virtual_frontier_contracts)
            .map_err(Box::new)?;
        self.check_deployer_sequence().map_err(Box::new)?;

        info!("finished genesis import");
        Ok(Vec::new())
    }

    fn install_params(&mut self, params: &Params) -> Result<(), GenesisError> {
        if self.config.chain_kind().is_restricted() && params.enable_create {
            return Err(GenesisError::EnableCreateNotAllowed);
        }
        params.validate()?;
        self.tracking_copy.borrow_mut().write_params(params.clone());
        debug!(evm_denom = %params.evm_denom, "stored params");
        Ok(())
    }

    fn check_module_accounts(&mut self) -> Result<(), GenesisError> {
        let mut tc = self.tracking_copy.borrow_mut();
        for name in [EVM_MODULE_NAME, DEPLOYER_MODULE_NAME] {
            if tc.module_address(name)?.is_none() {
                return Err(GenesisError::MissingModuleAccount(name.to_string()));
            }
        }
        Ok(())
    }

    fn install_accounts(&mut self, accounts: &[GenesisAccount]) -> Result<(), GenesisError> {
        let mut tc = self.tracking_copy.borrow_mut();
        for genesis_account in accounts {
            let address = genesis_account.address;
            let account = tc
                .account(address)?
                .ok_or(GenesisError::AccountNotFound(address))?;
            if !account.has_capability(EVM_ACCOUNT_CAPABILITY) {
                return Err(GenesisError::NotAnEvmAccount(address));
            }
            let evm_account = account
                .as_evm()
                .ok_or(GenesisError::NotAnEvmAccount(address))?;

            let code_hash = keccak256(genesis_account.code.as_slice());
            if !genesis_account.code.is_empty() && evm_account.code_hash() != code_hash {
                return Err(GenesisError::CodeHashMismatch {
                    address,
                    expected: evm_account.code_hash(),
                    actual: code_hash,
                });
            }
            tc.write_code(code_hash, genesis_account.code.clone());

            for entry in &genesis_account.storage {
                tc.write_state(address, entry.key, entry.value);
            }
            debug!(
                %address,
                code_length = genesis_account.code.len(),
                storage_slots = genesis_account.storage.len(),
                "imported genesis account"
            );
        }
        Ok(())
    }

    /// Deploys the bank contract of the native denomination, unless one is already registered
    /// in the state or carried, active, by the snapshot.
    fn bootstrap_native_bank_contract(
        &mut self,
        evm_denom: &str,
        snapshot: &[VirtualContract],
    ) -> Result<(), GenesisError> {
        let mut tc = self.tracking_copy.borrow_mut();
        if tc
            .bank_contract_address_by_denom(evm_denom)
            .map_err(GenesisError::Registry)?
            .is_some()
        {
            debug!(evm_denom, "native bank contract already deployed");
            return Ok(());
        }
        let in_snapshot = snapshot.iter().any(|contract| {
            contract.active
                && contract
                    .bank_contract_metadata()
                    .map_or(false, |metadata| metadata.min_denom == evm_denom)
        });
        if in_snapshot {
            debug!(evm_denom, "native bank contract carried by the genesis state");
            return Ok(());
        }

        let denom_metadata = match tc.denom_metadata(evm_denom)? {
            Some(denom_metadata) => denom_metadata,
            None => {
                let denom_metadata = DenomMetadata::default_for_native(evm_denom)
                    .ok_or_else(|| GenesisError::InvalidDenomMetadata(evm_denom.to_string()))?;
                tc.write_denom_metadata(denom_metadata.clone());
                denom_metadata
            }
        };
        let mut metadata = BankContractMetadata::from_denom_metadata(&denom_metadata)
            .ok_or_else(|| GenesisError::InvalidDenomMetadata(evm_denom.to_string()))?;
        metadata.min_denom = evm_denom.to_string();

        let contract = Deployer::deploy_bank_contract(&mut *tc, true, &metadata)
            .map_err(GenesisError::Deploy)?;
        info!(
            address = %contract.address,
            denom = evm_denom,
            "deployed virtual frontier bank contract for native denom"
        );
        Ok(())
    }

    fn import_virtual_contracts(
        &mut self,
        contracts: &[VirtualContract],
    ) -> Result<(), GenesisError> {
        let mut tc = self.tracking_copy.borrow_mut();
        Deployer::import_genesis_contracts(&mut *tc, contracts)
            .map_err(GenesisError::VirtualContract)
    }

    fn check_deployer_sequence(&mut self) -> Result<(), GenesisError> {
        let mut tc = self.tracking_copy.borrow_mut();
        let expected = tc
            .virtual_contract_count()
            .map_err(GenesisError::Registry)?;
        let actual = tc
            .module_account(DEPLOYER_MODULE_NAME)?
            .ok_or_else(|| GenesisError::MissingModuleAccount(DEPLOYER_MODULE_NAME.to_string()))?
            .sequence();
        if expected != actual {
            return Err(GenesisError::DeployerSequenceMismatch { expected, actual });
        }
        Ok(())
    }
}

/// Exports the genesis state of the execution environment module: EVM accounts in address order
/// with their code and storage, every virtual contract in insertion order and the parameters.
pub fn export_genesis<R>(tc: &mut TrackingCopy<R>) -> Result<GenesisState, GenesisError>
where
    R: StateReader<Key, StoredValue, Error = GlobalStateError>,
{
    let mut accounts = Vec::new();
    for account in tc.accounts()? {
        let evm_account = match account.as_evm() {
            Some(evm_account) => *evm_account,
            None => continue,
        };
        let address = account.address();
        let code = tc.code(evm_account.code_hash())?.unwrap_or_default();
        let storage = tc.account_storage(address)?;
        accounts.push(GenesisAccount {
            address,
            code,
            storage,
        });
    }
    let virtual_frontier_contracts = tc.virtual_contracts().map_err(GenesisError::Registry)?;
    let params = tc.params()?.unwrap_or_default();
    info!(
        accounts = accounts.len(),
        virtual_frontier_contracts = virtual_frontier_contracts.len(),
        "exported genesis state"
    );
    Ok(GenesisState::new(
        params,
        accounts,
        virtual_frontier_contracts,
    ))
}
