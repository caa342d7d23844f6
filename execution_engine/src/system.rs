//! Native modules of the frontier bridge: the virtual contract registry, its deployer, genesis
//! handling and the virtual bank contract.

pub mod bank_contract;
pub mod deployer;
pub mod genesis;
pub mod registry;

/// Name of the module account of the execution environment.
pub const EVM_MODULE_NAME: &str = "evm";

/// Name of the module account whose sequence counts virtual contract deployments.
pub const DEPLOYER_MODULE_NAME: &str = "vfc-deployer";
