use once_cell::sync::Lazy;

use frontier_engine_test_support::{InMemoryTestBuilder, DEFAULT_EVM_DENOM};
use frontier_execution_engine::{
    engine_state::{EngineConfig, EngineConfigBuilder},
    shared::chain_kind::ChainKind,
    system::genesis::GenesisError,
};
use frontier_types::{GenesisState, Params};

static RESTRICTED_ENGINE_CONFIG: Lazy<EngineConfig> = Lazy::new(|| {
    EngineConfigBuilder::new()
        .with_chain_kind(ChainKind::Restricted)
        .with_chain_id("restricted_1100-1")
        .build()
});

static RESTRICTED_PARAMS: Lazy<Params> = Lazy::new(|| Params {
    enable_create: false,
    ..Params::default()
});

#[test]
fn should_reject_enabled_contract_creation() {
    let mut builder = InMemoryTestBuilder::new(RESTRICTED_ENGINE_CONFIG.clone());
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::default())
        .expect_genesis_failure();
    assert_eq!(
        builder.get_genesis_error(),
        Some(GenesisError::EnableCreateNotAllowed)
    );
    assert_eq!(builder.get_params(), None);
}

#[test]
fn should_accept_disabled_contract_creation() {
    let mut builder = InMemoryTestBuilder::new(RESTRICTED_ENGINE_CONFIG.clone());
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::new(
            RESTRICTED_PARAMS.clone(),
            Vec::new(),
            Vec::new(),
        ))
        .expect_genesis_success();

    assert_eq!(builder.get_params(), Some(RESTRICTED_PARAMS.clone()));
    assert_eq!(builder.get_bank_contract_address(DEFAULT_EVM_DENOM), None);
    assert_eq!(builder.export_genesis().params, *RESTRICTED_PARAMS);
}
