//! This module defines the `TrackingCopy` - a utility that caches operations on the state, so that
//! the underlying state remains unmodified, but it can be interacted with as if the modifications
//! were applied on it.
mod error;
mod ext;

use std::{
    collections::{BTreeMap, BTreeSet},
    convert::TryFrom,
};

use num_traits::FromPrimitive;

use frontier_types::{
    bytesrepr::{self, ToBytes},
    execution::{Effects, Transform, TransformKind},
    Key, KeyTag, StoredValue, StoredValueTypeMismatch,
};

use crate::global_state::{error::Error as GlobalStateError, StateReader};

pub use self::{
    error::Error as TrackingCopyError,
    ext::{TrackingCopyAccountExt, TrackingCopyBankExt, TrackingCopyEvmExt},
};

/// Keeps track of already accessed keys.
/// We deliberately separate cached Reads from cached mutations so that mutated keys can be
/// enumerated without also enumerating everything that was merely read.
#[derive(Default)]
pub struct TrackingCopyCache {
    reads_cached: BTreeMap<Key, StoredValue>,
    muts_cached: BTreeMap<Key, StoredValue>,
    prunes_cached: BTreeSet<Key>,
    key_tag_muts_cached: BTreeMap<KeyTag, BTreeSet<Key>>,
}

impl TrackingCopyCache {
    /// Inserts `key` and `value` pair to Read cache.
    pub fn insert_read(&mut self, key: Key, value: StoredValue) {
        self.reads_cached.insert(key, value);
    }

    /// Inserts `key` and `value` pair to Write cache.
    pub fn insert_write(&mut self, key: Key, value: StoredValue) {
        self.prunes_cached.remove(&key);
        self.key_tag_muts_cached
            .entry(key.tag())
            .or_insert_with(BTreeSet::new)
            .insert(key.clone());
        self.muts_cached.insert(key, value);
    }

    /// Marks `key` as pruned.
    pub fn insert_prune(&mut self, key: Key) {
        self.prunes_cached.insert(key);
    }

    /// Gets value from `key` in the cache.
    pub fn get(&self, key: &Key) -> Option<&StoredValue> {
        if self.prunes_cached.contains(key) {
            // the item is marked for pruning and therefore
            // is no longer accessible.
            return None;
        }
        if let Some(value) = self.muts_cached.get(key) {
            return Some(value);
        };

        self.reads_cached.get(key)
    }

    /// Returns `true` if `key` is marked for pruning.
    pub fn is_pruned(&self, key: &Key) -> bool {
        self.prunes_cached.contains(key)
    }

    /// Gets the set of mutated, unpruned keys in the cache by `KeyTag`.
    pub fn get_key_tag_muts_cached(&self, key_tag: &KeyTag) -> BTreeSet<Key> {
        self.key_tag_muts_cached
            .get(key_tag)
            .map(|keys| {
                keys.iter()
                    .filter(|key| !self.prunes_cached.contains(key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// An interface for the global state that caches all operations (reads and writes) instead of
/// applying them directly to the state. This way the state remains unmodified, while the user can
/// interact with it as if it was being modified in real time.
pub struct TrackingCopy<R> {
    reader: R,
    cache: TrackingCopyCache,
    effects: Effects,
}

impl<R> TrackingCopy<R>
where
    R: StateReader<Key, StoredValue, Error = GlobalStateError>,
{
    /// Creates a new `TrackingCopy` using the `reader` as the interface to the state.
    pub fn new(reader: R) -> TrackingCopy<R> {
        TrackingCopy {
            reader,
            cache: TrackingCopyCache::default(),
            effects: Effects::new(),
        }
    }

    /// Returns the `reader` used to access the state.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Creates a new TrackingCopy, using this one (including its mutations) as the base state to
    /// read against. Changes made through the fork do not affect this tracking copy until its
    /// effects are passed to [`apply_effects`](Self::apply_effects), which makes the fork the
    /// unit of an all-or-nothing change.
    pub fn fork(&self) -> TrackingCopy<&TrackingCopy<R>> {
        TrackingCopy::new(self)
    }

    /// Returns a copy of the execution effects cached by this instance.
    pub fn effects(&self) -> Effects {
        self.effects.clone()
    }

    /// Replays `effects`, typically those of a fork, on this tracking copy.
    pub fn apply_effects(&mut self, effects: Effects) {
        for (key, kind) in effects.value().into_iter().map(Transform::destructure) {
            match kind {
                TransformKind::Write(value) => self.write(key, value),
                TransformKind::Prune => self.prune(key),
            }
        }
    }

    /// Reads the value stored under `key`.
    pub fn get(&mut self, key: &Key) -> Result<Option<StoredValue>, TrackingCopyError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.to_owned()));
        }
        if self.cache.is_pruned(key) {
            return Ok(None);
        }
        match self.reader.read(key)? {
            Some(value) => {
                self.cache.insert_read(key.clone(), value.clone());
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Reads the value stored under `key` as a `T`.
    pub fn read_as<T>(&mut self, key: &Key) -> Result<Option<T>, TrackingCopyError>
    where
        T: TryFrom<StoredValue, Error = StoredValueTypeMismatch>,
    {
        match self.get(key)? {
            Some(value) => Ok(Some(T::try_from(value)?)),
            None => Ok(None),
        }
    }

    /// Gets the set of keys in the state whose tag is `key_tag`.
    pub fn get_keys(&mut self, key_tag: &KeyTag) -> Result<BTreeSet<Key>, TrackingCopyError> {
        let mut ret: BTreeSet<Key> = BTreeSet::new();
        let keys = self.reader.keys_with_prefix(&[*key_tag as u8])?;
        // don't include keys marked for pruning
        for key in keys {
            if self.cache.is_pruned(&key) {
                continue;
            }
            ret.insert(key);
        }
        // there may be newly inserted keys which have not been committed yet
        ret.extend(self.cache.get_key_tag_muts_cached(key_tag));
        Ok(ret)
    }

    /// Gets the set of keys in the state whose serialized form starts with `prefix`.
    pub fn get_keys_with_prefix(
        &mut self,
        prefix: &[u8],
    ) -> Result<BTreeSet<Key>, TrackingCopyError> {
        let mut ret: BTreeSet<Key> = self
            .reader
            .keys_with_prefix(prefix)?
            .into_iter()
            .filter(|key| !self.cache.is_pruned(key))
            .collect();
        if let Some(tag) = prefix.first().copied().and_then(KeyTag::from_u8) {
            for key in self.cache.get_key_tag_muts_cached(&tag) {
                if key.to_bytes()?.starts_with(prefix) {
                    ret.insert(key);
                }
            }
        }
        Ok(ret)
    }

    /// Writes `value` under `key`. Note that the write is only cached, and the global state itself
    /// remains unmodified.
    pub fn write(&mut self, key: Key, value: StoredValue) {
        self.cache.insert_write(key.clone(), value.clone());
        self.effects
            .push(Transform::new(key, TransformKind::Write(value)));
    }

    /// Prunes a `key`.
    pub fn prune(&mut self, key: Key) {
        self.cache.insert_prune(key.clone());
        self.effects.push(Transform::new(key, TransformKind::Prune));
    }
}

/// The purpose of this implementation is to allow a "snapshot" mechanism for
/// TrackingCopy. The state of a TrackingCopy (including the effects of
/// any transforms it has accumulated) can be read using an immutable
/// reference to that TrackingCopy via this trait implementation. See
/// `TrackingCopy::fork` for more information.
impl<R> StateReader<Key, StoredValue> for &TrackingCopy<R>
where
    R: StateReader<Key, StoredValue>,
    R::Error: From<bytesrepr::Error>,
{
    type Error = R::Error;

    fn read(&self, key: &Key) -> Result<Option<StoredValue>, Self::Error> {
        if self.cache.is_pruned(key) {
            return Ok(None);
        }
        if let Some(value) = self.cache.muts_cached.get(key) {
            return Ok(Some(value.to_owned()));
        }
        self.reader.read(key)
    }

    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Key>, Self::Error> {
        let mut ret: BTreeSet<Key> = self
            .reader
            .keys_with_prefix(prefix)?
            .into_iter()
            .filter(|key| !self.cache.is_pruned(key))
            .collect();
        for key in self.cache.muts_cached.keys() {
            if self.cache.is_pruned(key) {
                continue;
            }
            if key.to_bytes()?.starts_with(prefix) {
                ret.insert(key.clone());
            }
        }
        Ok(ret.into_iter().collect())
    }
}
