//! A library to support testing of the frontier bridge execution engine.

#![doc(test(attr(forbid(warnings))))]
#![warn(missing_docs)]

mod in_memory_test_builder;
pub mod logging;

use once_cell::sync::Lazy;

use frontier_execution_engine::engine_state::EngineConfig;
use frontier_types::{EvmAddress, Params, U256};

pub use frontier_types::DEFAULT_EVM_DENOM;
pub use in_memory_test_builder::InMemoryTestBuilder;

/// Default address of an externally owned account.
pub const DEFAULT_ACCOUNT_ADDR: EvmAddress = EvmAddress::new([0x11; 20]);
/// Address of a second externally owned account.
pub const ACCOUNT_1_ADDR: EvmAddress = EvmAddress::new([0x22; 20]);
/// Default address of an account carrying code.
pub const DEFAULT_CONTRACT_ADDR: EvmAddress = EvmAddress::new([0x42; 20]);
/// Default code of the account at [`DEFAULT_CONTRACT_ADDR`].
pub const DEFAULT_CONTRACT_CODE: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52, 0x00];
/// Default initial balance of [`DEFAULT_ACCOUNT_ADDR`], in the base unit.
pub const DEFAULT_ACCOUNT_INITIAL_BALANCE: u64 = 1_000_000_000_000_000_000;

/// Default engine configuration.
pub static DEFAULT_ENGINE_CONFIG: Lazy<EngineConfig> = Lazy::new(EngineConfig::default);

/// Default module parameters.
pub static DEFAULT_PARAMS: Lazy<Params> = Lazy::new(Params::default);

/// Default initial balance of [`DEFAULT_ACCOUNT_ADDR`].
pub static DEFAULT_ACCOUNT_INITIAL_AMOUNT: Lazy<U256> =
    Lazy::new(|| U256::from(DEFAULT_ACCOUNT_INITIAL_BALANCE));
