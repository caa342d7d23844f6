use frontier_execution_engine::{
    data_access_layer::{
        GenesisRequest, GenesisResult, VirtualContractCallRequest, VirtualContractCallResult,
    },
    engine_state::EngineConfig,
    global_state::in_memory::InMemoryGlobalStateView,
    system::{
        deployer::Deployer,
        genesis::GenesisError,
        registry::VirtualContractRegistry,
        DEPLOYER_MODULE_NAME, EVM_MODULE_NAME,
    },
    tracking_copy::{TrackingCopyAccountExt, TrackingCopyBankExt, TrackingCopyEvmExt},
    CommitProvider, InMemoryGlobalState, StateProvider, TrackingCopy,
};
use frontier_types::{
    bytesrepr::Bytes, execution::Effects, keccak256, Account, BankContractMetadata, EvmAddress,
    GenesisState, Key, Params, StoredValue, VirtualContract, H256, U256,
};

use crate::{logging, DEFAULT_ENGINE_CONFIG};

/// Builder for running genesis and virtual contract calls against an in-memory global state.
pub struct InMemoryTestBuilder {
    /// Engine configuration used for every genesis run.
    engine_config: EngineConfig,
    /// The state under test.
    global_state: InMemoryGlobalState,
    /// Result of the last genesis run.
    genesis_result: Option<GenesisResult>,
    /// Result of the last virtual contract call.
    call_result: Option<VirtualContractCallResult>,
}

impl Default for InMemoryTestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_CONFIG.clone())
    }
}

impl InMemoryTestBuilder {
    /// Returns a new builder over an empty state.
    pub fn new(engine_config: EngineConfig) -> Self {
        logging::init();
        InMemoryTestBuilder {
            engine_config,
            global_state: InMemoryGlobalState::empty(),
            genesis_result: None,
            call_result: None,
        }
    }

    /// Returns the engine configuration.
    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    /// Returns the state under test.
    pub fn global_state(&self) -> &InMemoryGlobalState {
        &self.global_state
    }

    fn tracking_copy(&self) -> TrackingCopy<InMemoryGlobalStateView> {
        self.global_state
            .tracking_copy()
            .expect("should check out global state")
    }

    fn commit_with<F>(&mut self, write: F) -> &mut Self
    where
        F: FnOnce(&mut TrackingCopy<InMemoryGlobalStateView>),
    {
        let mut tc = self.tracking_copy();
        write(&mut tc);
        self.global_state
            .commit(tc.effects())
            .expect("should commit effects");
        self
    }

    /// Writes the module accounts genesis requires.
    pub fn with_module_accounts(&mut self) -> &mut Self {
        self.with_account(Account::new_module(EVM_MODULE_NAME))
            .with_account(Account::new_module(DEPLOYER_MODULE_NAME))
    }

    /// Writes `account` to the state.
    pub fn with_account(&mut self, account: Account) -> &mut Self {
        self.commit_with(|tc| tc.write_account(account))
    }

    /// Writes an account with EVM capability whose code hash is the hash of `code`. The code
    /// itself is not stored.
    pub fn with_evm_account(&mut self, address: EvmAddress, code: &[u8]) -> &mut Self {
        self.with_account(Account::new_evm(address, keccak256(code)))
    }

    /// Sets the sequence of the deployer module account.
    pub fn with_deployer_sequence(&mut self, sequence: u64) -> &mut Self {
        self.commit_with(|tc| {
            let mut deployer = tc
                .module_account(DEPLOYER_MODULE_NAME)
                .expect("should read deployer account")
                .expect("deployer account should exist");
            deployer.set_sequence(sequence);
            tc.write_account(deployer);
        })
    }

    /// Mints `amount` of `denom` to `address`.
    pub fn with_balance(&mut self, address: EvmAddress, denom: &str, amount: U256) -> &mut Self {
        self.commit_with(|tc| {
            tc.mint(address, denom, amount).expect("should mint");
        })
    }

    /// Runs genesis with `genesis_state`.
    pub fn run_genesis(&mut self, genesis_state: GenesisState) -> &mut Self {
        let request = GenesisRequest::new(self.engine_config.clone(), genesis_state);
        self.genesis_result = Some(self.global_state.genesis(request));
        self
    }

    /// Panics if the last genesis run failed.
    pub fn expect_genesis_success(&mut self) -> &mut Self {
        match self.genesis_result.as_ref().expect("genesis should have run") {
            GenesisResult::Success { .. } => self,
            GenesisResult::Failure(error) => panic!("expected genesis success: {}", error),
        }
    }

    /// Panics if the last genesis run succeeded.
    pub fn expect_genesis_failure(&mut self) -> &mut Self {
        assert!(
            !self
                .genesis_result
                .as_ref()
                .expect("genesis should have run")
                .is_success(),
            "expected genesis failure"
        );
        self
    }

    /// Returns the error of the last genesis run, if it failed.
    pub fn get_genesis_error(&self) -> Option<GenesisError> {
        match self.genesis_result.as_ref()? {
            GenesisResult::Failure(error) => Some(error.clone()),
            GenesisResult::Success { .. } => None,
        }
    }

    /// Returns the effects of the last genesis run, if it succeeded.
    pub fn get_genesis_effects(&self) -> Option<Effects> {
        match self.genesis_result.as_ref()? {
            GenesisResult::Success { effects, .. } => Some(effects.clone()),
            GenesisResult::Failure(_) => None,
        }
    }

    /// Exports the genesis state.
    pub fn export_genesis(&self) -> GenesisState {
        self.global_state
            .export_genesis()
            .expect("should export genesis")
    }

    /// Calls the virtual contract at `address` on behalf of `caller`.
    pub fn call(
        &mut self,
        address: EvmAddress,
        caller: EvmAddress,
        input: impl Into<Bytes>,
    ) -> &mut Self {
        let request = VirtualContractCallRequest::new(address, caller, input);
        self.call_result = Some(self.global_state.call_virtual_contract(request));
        self
    }

    /// Panics if the last call failed.
    pub fn expect_call_success(&mut self) -> &mut Self {
        let result = self.call_result.as_ref().expect("a call should have run");
        assert!(result.is_success(), "expected call success: {:?}", result);
        self
    }

    /// Returns the result of the last call.
    pub fn get_last_call_result(&self) -> Option<&VirtualContractCallResult> {
        self.call_result.as_ref()
    }

    /// Returns the output of the last call, if it succeeded.
    pub fn get_last_call_output(&self) -> Option<Bytes> {
        self.call_result.as_ref()?.output().cloned()
    }

    /// Deploys a bank contract and commits it.
    pub fn deploy_bank_contract(
        &mut self,
        active: bool,
        metadata: &BankContractMetadata,
    ) -> VirtualContract {
        let mut tc = self.tracking_copy();
        let contract =
            Deployer::deploy_bank_contract(&mut tc, active, metadata).expect("should deploy");
        self.global_state
            .commit(tc.effects())
            .expect("should commit deployment");
        contract
    }

    /// Activates or deactivates the record at `address` and commits the change.
    pub fn set_contract_active(&mut self, address: EvmAddress, active: bool) -> &mut Self {
        self.commit_with(|tc| {
            tc.set_virtual_contract_active(address, active)
                .expect("should update virtual contract");
        })
    }

    /// Returns the record at `address`.
    pub fn get_virtual_contract(&self, address: EvmAddress) -> Option<VirtualContract> {
        self.tracking_copy()
            .virtual_contract(address)
            .expect("should read virtual contract")
    }

    /// Returns every record in insertion order.
    pub fn get_virtual_contracts(&self) -> Vec<VirtualContract> {
        self.tracking_copy()
            .virtual_contracts()
            .expect("should read virtual contracts")
    }

    /// Returns the bank contract address registered for `denom`.
    pub fn get_bank_contract_address(&self, denom: &str) -> Option<EvmAddress> {
        self.tracking_copy()
            .bank_contract_address_by_denom(denom)
            .expect("should read denomination index")
    }

    /// Returns the account at `address`.
    pub fn get_account(&self, address: EvmAddress) -> Option<Account> {
        self.tracking_copy()
            .account(address)
            .expect("should read account")
    }

    /// Returns the sequence of the deployer module account.
    pub fn get_deployer_sequence(&self) -> u64 {
        self.tracking_copy()
            .module_account(DEPLOYER_MODULE_NAME)
            .expect("should read deployer account")
            .expect("deployer account should exist")
            .sequence()
    }

    /// Returns the balance of `address` in `denom`.
    pub fn get_balance(&self, address: EvmAddress, denom: &str) -> U256 {
        self.tracking_copy()
            .balance(address, denom)
            .expect("should read balance")
    }

    /// Returns the storage slot `key` of `address`.
    pub fn get_state(&self, address: EvmAddress, key: H256) -> H256 {
        self.tracking_copy()
            .state(address, key)
            .expect("should read storage")
    }

    /// Returns the code stored under `code_hash`.
    pub fn get_code(&self, code_hash: H256) -> Option<Bytes> {
        self.tracking_copy()
            .code(code_hash)
            .expect("should read code")
    }

    /// Returns the stored module parameters.
    pub fn get_params(&self) -> Option<Params> {
        self.tracking_copy().params().expect("should read params")
    }

    /// Returns a copy of every stored pair, in key order.
    pub fn dump(&self) -> Vec<(Key, StoredValue)> {
        self.global_state.dump().expect("should dump global state")
    }
}
