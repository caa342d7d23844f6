use assert_matches::assert_matches;
use once_cell::sync::Lazy;

use frontier_engine_test_support::{
    InMemoryTestBuilder, ACCOUNT_1_ADDR, DEFAULT_ACCOUNT_ADDR, DEFAULT_ACCOUNT_INITIAL_AMOUNT,
    DEFAULT_EVM_DENOM,
};
use frontier_execution_engine::{
    data_access_layer::VirtualContractCallResult,
    engine_state::{EngineConfig, EngineConfigBuilder},
    shared::chain_kind::ChainKind,
    system::bank_contract::VirtualContractCallError,
};
use frontier_types::{
    abi, BankContractMethod, BankContractMetadata, EvmAddress, GenesisState, U256,
};

static DEVELOPMENT_ENGINE_CONFIG: Lazy<EngineConfig> = Lazy::new(|| {
    EngineConfigBuilder::new()
        .with_chain_kind(ChainKind::Development)
        .build()
});

const TRANSFER_AMOUNT: u64 = 250_000;

fn call_data(method: BankContractMethod, arguments: &[&[u8]]) -> Vec<u8> {
    let mut input = method.selector().to_vec();
    for argument in arguments {
        input.extend_from_slice(argument);
    }
    input
}

fn transfer_call_data(recipient: &EvmAddress, amount: U256) -> Vec<u8> {
    call_data(
        BankContractMethod::Transfer,
        &[
            &abi::encode_address(recipient),
            &abi::encode_uint256(amount),
        ],
    )
}

/// Runs development genesis and funds the default account, returning the native bank contract.
fn setup() -> (InMemoryTestBuilder, EvmAddress) {
    let mut builder = InMemoryTestBuilder::new(DEVELOPMENT_ENGINE_CONFIG.clone());
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::default())
        .expect_genesis_success()
        .with_balance(
            DEFAULT_ACCOUNT_ADDR,
            DEFAULT_EVM_DENOM,
            *DEFAULT_ACCOUNT_INITIAL_AMOUNT,
        );
    let contract = builder
        .get_bank_contract_address(DEFAULT_EVM_DENOM)
        .expect("native bank contract should be deployed");
    (builder, contract)
}

#[test]
fn should_report_token_metadata() {
    let (mut builder, contract) = setup();

    for method in [BankContractMethod::Name, BankContractMethod::Symbol] {
        builder
            .call(contract, DEFAULT_ACCOUNT_ADDR, call_data(method, &[]))
            .expect_call_success();
        assert_eq!(
            builder.get_last_call_output().expect("should have output").as_slice(),
            abi::encode_string("PHOTON").as_slice()
        );
    }

    builder
        .call(
            contract,
            DEFAULT_ACCOUNT_ADDR,
            call_data(BankContractMethod::Decimals, &[]),
        )
        .expect_call_success();
    assert_eq!(
        builder.get_last_call_output().expect("should have output").as_slice(),
        &abi::encode_uint8(18)[..]
    );
}

#[test]
fn should_report_supply_and_balances() {
    let (mut builder, contract) = setup();

    builder
        .call(
            contract,
            ACCOUNT_1_ADDR,
            call_data(BankContractMethod::TotalSupply, &[]),
        )
        .expect_call_success();
    assert_eq!(
        builder.get_last_call_output().expect("should have output").as_slice(),
        &abi::encode_uint256(*DEFAULT_ACCOUNT_INITIAL_AMOUNT)[..]
    );

    builder
        .call(
            contract,
            ACCOUNT_1_ADDR,
            call_data(
                BankContractMethod::BalanceOf,
                &[&abi::encode_address(&DEFAULT_ACCOUNT_ADDR)],
            ),
        )
        .expect_call_success();
    assert_eq!(
        builder.get_last_call_output().expect("should have output").as_slice(),
        &abi::encode_uint256(*DEFAULT_ACCOUNT_INITIAL_AMOUNT)[..]
    );
}

#[test]
fn should_transfer_native_balance() {
    let (mut builder, contract) = setup();
    let amount = U256::from(TRANSFER_AMOUNT);

    builder
        .call(
            contract,
            DEFAULT_ACCOUNT_ADDR,
            transfer_call_data(&ACCOUNT_1_ADDR, amount),
        )
        .expect_call_success();

    assert_eq!(
        builder.get_last_call_output().expect("should have output").as_slice(),
        &abi::encode_bool(true)[..]
    );
    assert_eq!(
        builder.get_balance(ACCOUNT_1_ADDR, DEFAULT_EVM_DENOM),
        amount
    );
    assert_eq!(
        builder.get_balance(DEFAULT_ACCOUNT_ADDR, DEFAULT_EVM_DENOM),
        *DEFAULT_ACCOUNT_INITIAL_AMOUNT - amount
    );
}

#[test]
fn failed_transfer_should_not_commit() {
    let (mut builder, contract) = setup();
    let before = builder.dump();

    builder.call(
        contract,
        ACCOUNT_1_ADDR,
        transfer_call_data(&DEFAULT_ACCOUNT_ADDR, U256::from(TRANSFER_AMOUNT)),
    );

    assert_matches!(
        builder.get_last_call_result(),
        Some(VirtualContractCallResult::Failure(
            VirtualContractCallError::InsufficientBalance { available, .. }
        )) if available.is_zero()
    );
    assert_eq!(builder.dump(), before);
}

#[test]
fn should_not_find_unregistered_address() {
    let (mut builder, _) = setup();
    let unknown = EvmAddress::new([0xee; 20]);
    builder.call(
        unknown,
        DEFAULT_ACCOUNT_ADDR,
        call_data(BankContractMethod::Name, &[]),
    );
    assert_eq!(
        builder.get_last_call_result(),
        Some(&VirtualContractCallResult::NotFound(unknown))
    );
}

#[test]
fn deactivated_contract_should_not_serve_calls() {
    let (mut builder, contract) = setup();
    builder.set_contract_active(contract, false).call(
        contract,
        DEFAULT_ACCOUNT_ADDR,
        call_data(BankContractMethod::Name, &[]),
    );
    assert_matches!(
        builder.get_last_call_result(),
        Some(VirtualContractCallResult::Failure(
            VirtualContractCallError::Inactive(_)
        ))
    );
}

#[test]
fn unknown_selector_should_fail() {
    let (mut builder, contract) = setup();
    builder.call(contract, DEFAULT_ACCOUNT_ADDR, vec![0xde, 0xad, 0xbe, 0xef]);
    assert_matches!(
        builder.get_last_call_result(),
        Some(VirtualContractCallResult::Failure(
            VirtualContractCallError::UnknownMethod(selector)
        )) if selector == &vec![0xde, 0xad, 0xbe, 0xef]
    );
}

#[test]
fn deployed_bank_contract_should_serve_its_denom() {
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::default())
        .expect_genesis_success()
        .with_balance(DEFAULT_ACCOUNT_ADDR, "uatom", U256::from(TRANSFER_AMOUNT));
    let atom = builder.deploy_bank_contract(true, &BankContractMetadata::new("uatom", 6, "ATOM"));

    builder
        .call(
            atom.contract_address(),
            DEFAULT_ACCOUNT_ADDR,
            transfer_call_data(&ACCOUNT_1_ADDR, U256::from(TRANSFER_AMOUNT)),
        )
        .expect_call_success();

    assert_eq!(
        builder.get_balance(ACCOUNT_1_ADDR, "uatom"),
        U256::from(TRANSFER_AMOUNT)
    );
    assert!(builder
        .get_balance(DEFAULT_ACCOUNT_ADDR, "uatom")
        .is_zero());
    assert!(builder
        .get_balance(ACCOUNT_1_ADDR, DEFAULT_EVM_DENOM)
        .is_zero());
}
