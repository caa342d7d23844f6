use frontier_types::{bytesrepr::Bytes, execution::Effects, EvmAddress};

use crate::system::bank_contract::VirtualContractCallError;

/// A call of a virtual contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualContractCallRequest {
    address: EvmAddress,
    caller: EvmAddress,
    input: Bytes,
}

impl VirtualContractCallRequest {
    /// Creates a new request.
    pub fn new(address: EvmAddress, caller: EvmAddress, input: impl Into<Bytes>) -> Self {
        VirtualContractCallRequest {
            address,
            caller,
            input: input.into(),
        }
    }

    /// Returns the address of the called contract.
    pub fn address(&self) -> EvmAddress {
        self.address
    }

    /// Returns the caller.
    pub fn caller(&self) -> EvmAddress {
        self.caller
    }

    /// Returns the call data.
    pub fn input(&self) -> &[u8] {
        self.input.as_slice()
    }
}

/// Represents a result of a virtual contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualContractCallResult {
    /// No virtual contract exists at the address.
    NotFound(EvmAddress),
    /// The call failed; nothing was committed.
    Failure(VirtualContractCallError),
    /// The call succeeded and its effects were committed.
    Success {
        /// ABI-encoded output.
        output: Bytes,
        /// Effects of the call.
        effects: Effects,
    },
}

impl VirtualContractCallResult {
    /// Is success.
    pub fn is_success(&self) -> bool {
        matches!(self, VirtualContractCallResult::Success { .. })
    }

    /// Returns the output of a successful call.
    pub fn output(&self) -> Option<&Bytes> {
        match self {
            VirtualContractCallResult::Success { output, .. } => Some(output),
            VirtualContractCallResult::NotFound(_) | VirtualContractCallResult::Failure(_) => None,
        }
    }
}
