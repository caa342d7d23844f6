//! Deployment of new virtual contracts at addresses derived from the deployer module account.

use rlp::RlpStream;
use thiserror::Error;
use tracing::{debug, info};

use frontier_types::{
    bytesrepr::{self, Bytes, ToBytes},
    keccak256, BankContractMetadata, ContractType, EvmAddress, Key, StoredValue,
    VirtualContract, EVM_ADDRESS_LENGTH, H256_LENGTH,
};

use crate::{
    global_state::{error::Error as GlobalStateError, StateReader},
    system::{
        registry::{RegistryError, VirtualContractRegistry},
        DEPLOYER_MODULE_NAME,
    },
    tracking_copy::{TrackingCopy, TrackingCopyAccountExt, TrackingCopyError},
};

/// Errors raised while deploying a virtual contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeployError {
    /// The deployer module account does not exist.
    #[error("the {} module account has not been set", DEPLOYER_MODULE_NAME)]
    MissingDeployerAccount,
    /// The deployer sequence cannot be advanced.
    #[error("deployer account sequence overflow")]
    SequenceOverflow,
    /// The metadata could not be encoded.
    #[error("failed to encode virtual contract metadata: {0}")]
    Encoding(#[from] bytesrepr::Error),
    /// The registry rejected the record.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Error reading or writing the state.
    #[error(transparent)]
    TrackingCopy(#[from] TrackingCopyError),
}

/// Derives the address of the contract created by `deployer` at `nonce`, following the EVM
/// `CREATE` rule: the last 20 bytes of `keccak256(rlp([deployer, nonce]))`.
pub fn contract_address(deployer: &EvmAddress, nonce: u64) -> EvmAddress {
    let mut stream = RlpStream::new_list(2);
    stream.append(&deployer.as_bytes().to_vec());
    stream.append(&nonce);
    let hash = keccak256(stream.out());
    let mut address = [0u8; EVM_ADDRESS_LENGTH];
    address.copy_from_slice(&hash.as_bytes()[H256_LENGTH - EVM_ADDRESS_LENGTH..]);
    EvmAddress::new(address)
}

/// Deploys virtual contracts.
pub struct Deployer;

impl Deployer {
    /// Deploys a record at the next derived address and advances the deployer sequence by one.
    ///
    /// The work is done on a fork of `tc`; nothing is written to `tc` unless every step succeeds.
    pub fn deploy_next<R>(
        tc: &mut TrackingCopy<R>,
        active: bool,
        contract_type: ContractType,
        metadata: Bytes,
    ) -> Result<VirtualContract, DeployError>
    where
        R: StateReader<Key, StoredValue, Error = GlobalStateError>,
    {
        let (contract, effects) = {
            let mut fork = tc.fork();
            let mut deployer = fork
                .module_account(DEPLOYER_MODULE_NAME)?
                .ok_or(DeployError::MissingDeployerAccount)?;
            let sequence = deployer.sequence();
            let address = contract_address(&deployer.address(), sequence);
            let contract = VirtualContract::new(address, active, contract_type, metadata);
            fork.create_virtual_contract(contract.clone())?;
            deployer.set_sequence(
                sequence
                    .checked_add(1)
                    .ok_or(DeployError::SequenceOverflow)?,
            );
            fork.write_account(deployer);
            (contract, fork.effects())
        };
        tc.apply_effects(effects);
        debug!(address = %contract.address, "deployed virtual frontier contract");
        Ok(contract)
    }

    /// Deploys a bank contract serving `metadata.min_denom`.
    pub fn deploy_bank_contract<R>(
        tc: &mut TrackingCopy<R>,
        active: bool,
        metadata: &BankContractMetadata,
    ) -> Result<VirtualContract, DeployError>
    where
        R: StateReader<Key, StoredValue, Error = GlobalStateError>,
    {
        let encoded = Bytes::from(metadata.to_bytes()?);
        Self::deploy_next(tc, active, ContractType::BankContract, encoded)
    }

    /// Stores snapshot records in order without touching the deployer sequence. The first
    /// rejected record aborts the import.
    pub fn import_genesis_contracts<R>(
        tc: &mut TrackingCopy<R>,
        contracts: &[VirtualContract],
    ) -> Result<(), RegistryError>
    where
        R: StateReader<Key, StoredValue, Error = GlobalStateError>,
    {
        for contract in contracts {
            tc.create_virtual_contract(contract.clone())?;
        }
        info!(count = contracts.len(), "imported virtual frontier contracts");
        Ok(())
    }
}
