use assert_matches::assert_matches;

use frontier_engine_test_support::InMemoryTestBuilder;
use frontier_execution_engine::{
    system::{
        deployer::{contract_address, DeployError, Deployer},
        registry::{RegistryError, VirtualContractRegistry},
        DEPLOYER_MODULE_NAME,
    },
    CommitProvider, StateProvider,
};
use frontier_types::{module_address, BankContractMetadata, GenesisState};

fn builder() -> InMemoryTestBuilder {
    let mut builder = InMemoryTestBuilder::default();
    builder
        .with_module_accounts()
        .run_genesis(GenesisState::default())
        .expect_genesis_success();
    builder
}

#[test]
fn should_deploy_at_consecutive_derived_addresses() {
    let mut builder = builder();
    let deployer = module_address(DEPLOYER_MODULE_NAME);

    let atom = builder.deploy_bank_contract(true, &BankContractMetadata::new("uatom", 6, "ATOM"));
    let osmo = builder.deploy_bank_contract(true, &BankContractMetadata::new("uosmo", 6, "OSMO"));

    assert_eq!(atom.contract_address(), contract_address(&deployer, 0));
    assert_eq!(osmo.contract_address(), contract_address(&deployer, 1));
    assert_eq!(builder.get_deployer_sequence(), 2);
    assert_eq!(builder.get_virtual_contracts(), vec![atom, osmo.clone()]);
    assert_eq!(
        builder.get_bank_contract_address("uosmo"),
        Some(osmo.contract_address())
    );
}

#[test]
fn should_reject_second_active_bank_contract_for_denom_atomically() {
    let mut builder = builder();
    let atom = builder.deploy_bank_contract(true, &BankContractMetadata::new("uatom", 6, "ATOM"));
    let before = builder.dump();

    let mut tc = builder
        .global_state()
        .tracking_copy()
        .expect("should check out state");
    let error = Deployer::deploy_bank_contract(
        &mut tc,
        true,
        &BankContractMetadata::new("uatom", 6, "ATOM2"),
    )
    .expect_err("should reject duplicate denom");
    assert_matches!(
        error,
        DeployError::Registry(RegistryError::DuplicateDenomination { existing, .. })
            if existing == atom.contract_address()
    );
    assert!(tc.effects().is_empty());
    assert_eq!(builder.dump(), before);
    assert_eq!(builder.get_deployer_sequence(), 1);
}

#[test]
fn should_deploy_inactive_bank_contract_for_served_denom() {
    let mut builder = builder();
    let atom = builder.deploy_bank_contract(true, &BankContractMetadata::new("uatom", 6, "ATOM"));
    let shadow =
        builder.deploy_bank_contract(false, &BankContractMetadata::new("uatom", 6, "ATOM2"));

    assert!(!shadow.active);
    assert_eq!(
        builder.get_bank_contract_address("uatom"),
        Some(atom.contract_address())
    );
    assert_eq!(builder.get_deployer_sequence(), 2);
}

#[test]
fn should_hand_denom_over_on_reactivation() {
    let mut builder = builder();
    let atom = builder.deploy_bank_contract(true, &BankContractMetadata::new("uatom", 6, "ATOM"));
    let successor =
        builder.deploy_bank_contract(false, &BankContractMetadata::new("uatom", 6, "ATOM"));

    builder
        .set_contract_active(atom.contract_address(), false)
        .set_contract_active(successor.contract_address(), true);

    assert_eq!(
        builder.get_bank_contract_address("uatom"),
        Some(successor.contract_address())
    );
    let atom = builder
        .get_virtual_contract(atom.contract_address())
        .expect("should keep deactivated record");
    assert!(!atom.active);
}

#[test]
fn should_reject_reactivation_while_denom_is_served() {
    let mut builder = builder();
    let atom = builder.deploy_bank_contract(true, &BankContractMetadata::new("uatom", 6, "ATOM"));
    let shadow =
        builder.deploy_bank_contract(false, &BankContractMetadata::new("uatom", 6, "ATOM"));

    let mut tc = builder
        .global_state()
        .tracking_copy()
        .expect("should check out state");
    let error = tc
        .set_virtual_contract_active(shadow.contract_address(), true)
        .expect_err("should reject reactivation");
    assert_matches!(
        error,
        RegistryError::DuplicateDenomination { existing, .. } if existing == atom.contract_address()
    );
}

#[test]
fn exported_deployments_should_reimport() {
    let mut builder = builder();
    builder.deploy_bank_contract(true, &BankContractMetadata::new("uatom", 6, "ATOM"));
    builder.deploy_bank_contract(true, &BankContractMetadata::new("uosmo", 6, "OSMO"));
    let exported = builder.export_genesis();

    let mut reimported = InMemoryTestBuilder::default();
    reimported
        .with_module_accounts()
        .with_deployer_sequence(2)
        .run_genesis(exported.clone())
        .expect_genesis_success();
    assert_eq!(reimported.export_genesis(), exported);

    // Deployments continue from the carried-over sequence.
    let juno =
        reimported.deploy_bank_contract(true, &BankContractMetadata::new("ujuno", 6, "JUNO"));
    assert_eq!(
        juno.contract_address(),
        contract_address(&module_address(DEPLOYER_MODULE_NAME), 2)
    );
}

#[test]
fn deployment_effects_should_commit() {
    let builder = builder();
    let mut tc = builder
        .global_state()
        .tracking_copy()
        .expect("should check out state");
    let metadata = BankContractMetadata::new("uatom", 6, "ATOM");
    let contract =
        Deployer::deploy_bank_contract(&mut tc, true, &metadata).expect("should deploy");
    assert!(builder.get_virtual_contract(contract.contract_address()).is_none());

    builder
        .global_state()
        .commit(tc.effects())
        .expect("should commit");
    assert_eq!(
        builder.get_virtual_contract(contract.contract_address()),
        Some(contract)
    );
}
