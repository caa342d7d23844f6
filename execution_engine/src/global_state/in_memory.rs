use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use tracing::debug;

use frontier_types::{
    bytesrepr::ToBytes,
    execution::{Effects, Transform, TransformKind},
    Key, StoredValue,
};

use crate::{
    global_state::{error::Error as GlobalStateError, CommitProvider, StateProvider, StateReader},
    tracking_copy::TrackingCopy,
};

type SharedStore = Arc<RwLock<BTreeMap<Key, StoredValue>>>;

/// Global state held in an ordered in-memory map.
#[derive(Clone, Default)]
pub struct InMemoryGlobalState {
    store: SharedStore,
}

/// Represents a snapshot of the in-memory global state, taken when the view was checked out.
pub struct InMemoryGlobalStateView {
    data: Arc<BTreeMap<Key, StoredValue>>,
}

impl InMemoryGlobalState {
    /// Creates an empty state.
    pub fn empty() -> Self {
        InMemoryGlobalState::default()
    }

    /// Creates a state holding the given pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Key, StoredValue)>) -> Self {
        InMemoryGlobalState {
            store: Arc::new(RwLock::new(pairs.into_iter().collect())),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn checkout(&self) -> Result<InMemoryGlobalStateView, GlobalStateError> {
        let data = self
            .store
            .read()
            .map_err(|_| GlobalStateError::Poison)?
            .clone();
        Ok(InMemoryGlobalStateView {
            data: Arc::new(data),
        })
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> Result<usize, GlobalStateError> {
        Ok(self.store.read().map_err(|_| GlobalStateError::Poison)?.len())
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> Result<bool, GlobalStateError> {
        Ok(self.len()? == 0)
    }

    /// Returns a copy of every stored pair, in key order.
    pub fn dump(&self) -> Result<Vec<(Key, StoredValue)>, GlobalStateError> {
        let store = self.store.read().map_err(|_| GlobalStateError::Poison)?;
        Ok(store
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

impl StateReader<Key, StoredValue> for InMemoryGlobalStateView {
    type Error = GlobalStateError;

    fn read(&self, key: &Key) -> Result<Option<StoredValue>, Self::Error> {
        Ok(self.data.get(key).cloned())
    }

    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Key>, Self::Error> {
        let mut ret = Vec::new();
        for key in self.data.keys() {
            if key.to_bytes()?.starts_with(prefix) {
                ret.push(key.clone());
            }
        }
        Ok(ret)
    }
}

impl StateProvider for InMemoryGlobalState {
    type Reader = InMemoryGlobalStateView;

    fn tracking_copy(&self) -> Result<TrackingCopy<Self::Reader>, GlobalStateError> {
        Ok(TrackingCopy::new(self.checkout()?))
    }
}

impl CommitProvider for InMemoryGlobalState {
    fn commit(&self, effects: Effects) -> Result<(), GlobalStateError> {
        let mut store = self.store.write().map_err(|_| GlobalStateError::Poison)?;
        let mut store_count = 0;
        let mut prune_count = 0;
        for (key, kind) in effects.value().into_iter().map(Transform::destructure) {
            match kind {
                TransformKind::Write(value) => {
                    store.insert(key, value);
                    store_count += 1;
                }
                TransformKind::Prune => {
                    store.remove(&key);
                    prune_count += 1;
                }
            }
        }
        debug!(store_count, prune_count, "InMemoryGlobalState::commit");
        Ok(())
    }
}
