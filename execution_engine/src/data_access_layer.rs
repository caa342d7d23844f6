//! Requests and results of the operations exposed over the global state.

mod genesis;
mod virtual_contract_call;

pub use genesis::{GenesisRequest, GenesisResult, ValidatorUpdate};
pub use virtual_contract_call::{VirtualContractCallRequest, VirtualContractCallResult};
