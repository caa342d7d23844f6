use assert_matches::assert_matches;
use once_cell::sync::Lazy;

use frontier_engine_test_support::{
    InMemoryTestBuilder, DEFAULT_CONTRACT_ADDR, DEFAULT_CONTRACT_CODE, DEFAULT_EVM_DENOM,
};
use frontier_execution_engine::{
    engine_state::{EngineConfig, EngineConfigBuilder},
    shared::chain_kind::ChainKind,
    system::{
        deployer::contract_address, genesis::GenesisError, registry::RegistryError,
        DEPLOYER_MODULE_NAME, EVM_MODULE_NAME,
    },
};
use frontier_types::{
    bytesrepr::{Bytes, ToBytes},
    keccak256, module_address, BankContractMetadata, ContractType, EvmAddress, GenesisAccount,
    GenesisState, Params, ValidationError, VirtualContract, H256,
};

static DEVELOPMENT_ENGINE_CONFIG: Lazy<EngineConfig> = Lazy::new(|| {
    EngineConfigBuilder::new()
        .with_chain_kind(ChainKind::Development)
        .build()
});

const SLOT_1: H256 = H256::new([1; 32]);
const SLOT_2: H256 = H256::new([2; 32]);

fn bank_contract(byte: u8, denom: &str, display_name: &str) -> VirtualContract {
    let metadata = BankContractMetadata::new(denom, 6, display_name)
        .to_bytes()
        .expect("should encode metadata");
    VirtualContract::new(
        EvmAddress::new([byte; 20]),
        true,
        ContractType::BankContract,
        Bytes::from(metadata),
    )
}

fn genesis_with_contract_account() -> GenesisState {
    let account = GenesisAccount::new(DEFAULT_CONTRACT_ADDR)
        .with_code(DEFAULT_CONTRACT_CODE.to_vec())
        .with_storage(SLOT_1, H256::new([0xaa; 32]))
        .with_storage(SLOT_2, H256::new([0xbb; 32]));
    GenesisState::new(Params::default(), vec![account], Vec::new())
}

fn builder_with_contract_account(engine_config: EngineConfig) -> InMemoryTestBuilder {
    let mut builder = InMemoryTestBuilder::new(engine_config);
    builder
        .with_module_accounts()
        .with_evm_account(DEFAULT_CONTRACT_ADDR, DEFAULT_CONTRACT_CODE);
    builder
}

#[test]
fn should_import_accounts_and_params() {
    let mut builder = builder_with_contract_account(EngineConfig::default());
    builder
        .run_genesis(genesis_with_contract_account())
        .expect_genesis_success();

    assert_eq!(builder.get_params(), Some(Params::default()));
    assert_eq!(
        builder.get_code(keccak256(DEFAULT_CONTRACT_CODE)),
        Some(Bytes::from(DEFAULT_CONTRACT_CODE.to_vec()))
    );
    assert_eq!(
        builder.get_state(DEFAULT_CONTRACT_ADDR, SLOT_2),
        H256::new([0xbb; 32])
    );
    assert!(builder.get_virtual_contracts().is_empty());
}

#[test]
fn should_round_trip_exported_genesis() {
    let mut builder = builder_with_contract_account(EngineConfig::default());
    let mut genesis_state = genesis_with_contract_account();
    let mut retired = bank_contract(0x52, "uatom", "ATOM");
    retired.active = false;
    genesis_state.virtual_frontier_contracts = vec![
        bank_contract(0x51, "uatom", "ATOM"),
        bank_contract(0x50, "uosmo", "OSMO"),
        retired,
    ];
    builder
        .with_deployer_sequence(3)
        .run_genesis(genesis_state.clone())
        .expect_genesis_success();

    let exported = builder.export_genesis();
    assert_eq!(exported, genesis_state);

    let json = exported.to_json_string().expect("should render json");
    let parsed = GenesisState::from_json_str(&json).expect("should parse json");

    let mut reimported = builder_with_contract_account(EngineConfig::default());
    reimported
        .with_deployer_sequence(3)
        .run_genesis(parsed)
        .expect_genesis_success();
    assert_eq!(reimported.export_genesis(), exported);
}

#[test]
fn should_round_trip_zero_valued_storage() {
    let mut builder = builder_with_contract_account(EngineConfig::default());
    let account = GenesisAccount::new(DEFAULT_CONTRACT_ADDR)
        .with_code(DEFAULT_CONTRACT_CODE.to_vec())
        .with_storage(SLOT_1, H256::ZERO)
        .with_storage(SLOT_2, H256::new([0xbb; 32]));
    let genesis_state = GenesisState::new(Params::default(), vec![account], Vec::new());
    builder
        .run_genesis(genesis_state.clone())
        .expect_genesis_success();

    let exported = builder.export_genesis();
    assert_eq!(exported.accounts[0].storage.len(), 2);
    assert_eq!(exported, genesis_state);
}

#[test]
fn should_keep_snapshot_order_of_virtual_contracts() {
    let contracts = vec![
        bank_contract(0x90, "uatom", "ATOM"),
        bank_contract(0x10, "uosmo", "OSMO"),
        bank_contract(0x50, "ujuno", "JUNO"),
    ];
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .with_deployer_sequence(3)
        .run_genesis(GenesisState::new(
            Params::default(),
            Vec::new(),
            contracts.clone(),
        ))
        .expect_genesis_success();

    assert_eq!(builder.get_virtual_contracts(), contracts);
    assert_eq!(
        builder.get_bank_contract_address("uosmo"),
        Some(EvmAddress::new([0x10; 20]))
    );
    assert_eq!(builder.get_deployer_sequence(), 3);
}

#[test]
fn should_fail_on_code_hash_mismatch_and_leave_state_untouched() {
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .with_evm_account(DEFAULT_CONTRACT_ADDR, &[0x00]);
    let before = builder.dump();

    builder
        .run_genesis(genesis_with_contract_account())
        .expect_genesis_failure();

    let error = builder.get_genesis_error().expect("should have error");
    assert_matches!(
        error,
        GenesisError::CodeHashMismatch { address, .. } if address == DEFAULT_CONTRACT_ADDR
    );
    assert!(error
        .to_string()
        .starts_with("the evm state code doesn't match with the codehash"));
    assert_eq!(builder.dump(), before);
}

#[test]
fn should_skip_code_hash_check_for_empty_code() {
    let mut builder = builder_with_contract_account(EngineConfig::default());
    let account = GenesisAccount::new(DEFAULT_CONTRACT_ADDR).with_storage(SLOT_1, SLOT_2);
    builder
        .run_genesis(GenesisState::new(
            Params::default(),
            vec![account],
            Vec::new(),
        ))
        .expect_genesis_success();

    assert_eq!(builder.get_code(keccak256(DEFAULT_CONTRACT_CODE)), None);
    assert_eq!(builder.get_state(DEFAULT_CONTRACT_ADDR, SLOT_1), SLOT_2);
}

#[test]
fn should_fail_for_unknown_account() {
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .run_genesis(genesis_with_contract_account())
        .expect_genesis_failure();
    assert_eq!(
        builder.get_genesis_error(),
        Some(GenesisError::AccountNotFound(DEFAULT_CONTRACT_ADDR))
    );
}

#[test]
fn should_fail_without_module_accounts() {
    let mut builder = InMemoryTestBuilder::default();
    builder
        .run_genesis(GenesisState::default())
        .expect_genesis_failure();
    assert_eq!(
        builder.get_genesis_error(),
        Some(GenesisError::MissingModuleAccount(EVM_MODULE_NAME.to_string()))
    );
    assert!(builder.dump().is_empty());
}

#[test]
fn should_fail_on_invalid_params() {
    let mut builder = InMemoryTestBuilder::default();
    let mut genesis_state = GenesisState::default();
    genesis_state.params.evm_denom = "a".to_string();
    builder
        .with_module_accounts()
        .run_genesis(genesis_state)
        .expect_genesis_failure();
    assert_matches!(
        builder.get_genesis_error(),
        Some(GenesisError::InvalidParams(_))
    );
    assert_eq!(builder.get_params(), None);
}

#[test]
fn should_fail_on_deployer_sequence_mismatch() {
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .with_deployer_sequence(3)
        .run_genesis(GenesisState::new(
            Params::default(),
            Vec::new(),
            vec![bank_contract(0x51, "uatom", "ATOM")],
        ))
        .expect_genesis_failure();

    let error = builder.get_genesis_error().expect("should have error");
    assert_eq!(
        error.to_string(),
        "invalid sequence number for deployer account, expect sequence 1 but got 3"
    );
    assert!(builder.get_virtual_contracts().is_empty());
}

#[test]
fn should_reject_invalid_snapshot_record() {
    let mut record = bank_contract(0xab, "uatom", "ATOM");
    record.address = record.address.to_uppercase().replacen("0X", "0x", 1);
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .with_deployer_sequence(1)
        .run_genesis(GenesisState::new(
            Params::default(),
            Vec::new(),
            vec![record],
        ))
        .expect_genesis_failure();
    assert_matches!(
        builder.get_genesis_error(),
        Some(GenesisError::VirtualContract(RegistryError::InvalidRecord(
            ValidationError::MalformedAddress { .. }
        )))
    );
}

#[test]
fn should_reject_duplicate_snapshot_records() {
    let record = bank_contract(0x51, "uatom", "ATOM");
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .with_deployer_sequence(2)
        .run_genesis(GenesisState::new(
            Params::default(),
            Vec::new(),
            vec![record.clone(), record],
        ))
        .expect_genesis_failure();
    assert_eq!(
        builder.get_genesis_error(),
        Some(GenesisError::VirtualContract(RegistryError::DuplicateAddress(
            EvmAddress::new([0x51; 20])
        )))
    );
}

#[test]
fn should_reject_two_active_bank_contracts_for_one_denom() {
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .with_deployer_sequence(2)
        .run_genesis(GenesisState::new(
            Params::default(),
            Vec::new(),
            vec![
                bank_contract(0x51, "uatom", "ATOM"),
                bank_contract(0x52, "uatom", "ATOM2"),
            ],
        ))
        .expect_genesis_failure();
    assert_matches!(
        builder.get_genesis_error(),
        Some(GenesisError::VirtualContract(
            RegistryError::DuplicateDenomination { existing, .. }
        )) if existing == EvmAddress::new([0x51; 20])
    );
}

#[test]
fn should_deploy_native_bank_contract_on_development_chain() {
    let mut builder = InMemoryTestBuilder::new(DEVELOPMENT_ENGINE_CONFIG.clone());
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::default())
        .expect_genesis_success();

    let expected_address = contract_address(&module_address(DEPLOYER_MODULE_NAME), 0);
    assert_eq!(
        builder.get_bank_contract_address(DEFAULT_EVM_DENOM),
        Some(expected_address)
    );
    let contract = builder
        .get_virtual_contract(expected_address)
        .expect("should have bank contract");
    assert!(contract.active);
    assert_eq!(
        contract.bank_contract_metadata(),
        Some(BankContractMetadata::new(DEFAULT_EVM_DENOM, 18, "PHOTON"))
    );
    assert_eq!(builder.get_deployer_sequence(), 1);
}

#[test]
fn development_genesis_should_be_reimportable() {
    let mut builder = InMemoryTestBuilder::new(DEVELOPMENT_ENGINE_CONFIG.clone());
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::default())
        .expect_genesis_success();
    let exported = builder.export_genesis();
    assert_eq!(exported.virtual_frontier_contracts.len(), 1);

    let mut reimported = InMemoryTestBuilder::new(DEVELOPMENT_ENGINE_CONFIG.clone());
    reimported
        .with_module_accounts()
        .with_deployer_sequence(1)
        .run_genesis(exported.clone())
        .expect_genesis_success();
    assert_eq!(reimported.export_genesis(), exported);
    assert_eq!(reimported.get_deployer_sequence(), 1);
}

#[test]
fn public_chain_should_not_deploy_native_bank_contract() {
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::default())
        .expect_genesis_success();
    assert_eq!(builder.get_bank_contract_address(DEFAULT_EVM_DENOM), None);
    assert_eq!(builder.get_deployer_sequence(), 0);
}

#[test]
fn development_genesis_should_be_idempotent_on_same_state() {
    let mut builder = InMemoryTestBuilder::new(DEVELOPMENT_ENGINE_CONFIG.clone());
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::default())
        .expect_genesis_success();
    let contracts = builder.get_virtual_contracts();
    let address = builder.get_bank_contract_address(DEFAULT_EVM_DENOM);

    builder
        .run_genesis(GenesisState::default())
        .expect_genesis_success();

    assert_eq!(builder.get_virtual_contracts(), contracts);
    assert_eq!(builder.get_bank_contract_address(DEFAULT_EVM_DENOM), address);
    assert_eq!(builder.get_deployer_sequence(), 1);
}
