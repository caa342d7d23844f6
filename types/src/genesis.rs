//! The genesis document of the execution environment module.

#[cfg(feature = "datasize")]
use datasize::DataSize;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{Deserialize, Serialize};

use crate::{bytesrepr::Bytes, crypto, EvmAddress, Params, VirtualContract, H256};

/// A single storage slot of a genesis account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct StorageEntry {
    /// The slot.
    pub key: H256,
    /// The value held in the slot.
    pub value: H256,
}

impl StorageEntry {
    /// Constructs a new storage entry.
    pub fn new(key: H256, value: H256) -> Self {
        StorageEntry { key, value }
    }
}

/// Code and storage of an account at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct GenesisAccount {
    /// The account address.
    pub address: EvmAddress,
    /// The deployed code, hex-encoded without prefix.
    #[serde(default)]
    pub code: Bytes,
    /// Storage slots, ordered by key on export.
    #[serde(default)]
    pub storage: Vec<StorageEntry>,
}

impl GenesisAccount {
    /// Constructs a genesis account without code or storage.
    pub fn new(address: EvmAddress) -> Self {
        GenesisAccount {
            address,
            code: Bytes::new(),
            storage: Vec::new(),
        }
    }

    /// Sets the code.
    pub fn with_code(mut self, code: impl Into<Bytes>) -> Self {
        self.code = code.into();
        self
    }

    /// Appends a storage slot.
    pub fn with_storage(mut self, key: H256, value: H256) -> Self {
        self.storage.push(StorageEntry::new(key, value));
        self
    }

    /// Returns the Keccak-256 hash of the code.
    pub fn code_hash(&self) -> H256 {
        crypto::keccak256(self.code.as_slice())
    }
}

/// The genesis state of the execution environment module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct GenesisState {
    /// Module parameters.
    #[serde(default)]
    pub params: Params,
    /// Accounts carrying code or storage.
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    /// Virtual contract records, in insertion order.
    #[serde(default)]
    pub virtual_frontier_contracts: Vec<VirtualContract>,
}

impl GenesisState {
    /// Constructs a genesis state.
    pub fn new(
        params: Params,
        accounts: Vec<GenesisAccount>,
        virtual_frontier_contracts: Vec<VirtualContract>,
    ) -> Self {
        GenesisState {
            params,
            accounts,
            virtual_frontier_contracts,
        }
    }

    /// Parses a JSON genesis document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Renders the genesis state as a pretty-printed JSON document.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Distribution<GenesisAccount> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GenesisAccount {
        let code_length = rng.gen_range(0..64);
        let code: Bytes = (0..code_length).map(|_| rng.gen::<u8>()).collect();
        let storage = (0..rng.gen_range(0..4))
            .map(|_| StorageEntry::new(rng.gen(), rng.gen()))
            .collect();
        GenesisAccount {
            address: rng.gen(),
            code,
            storage,
        }
    }
}
