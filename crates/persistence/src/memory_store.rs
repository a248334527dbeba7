// Copyright (C) 2015-2026 The Neo Project.
//
// memory_store.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! An in-memory [`Store`] used by tests and by embeddings that don't need
//! durability. A snapshot clones the committed map at open time, so
//! concurrent writers never perturb a reader mid-block (spec.md §4.1
//! serializable isolation).

use crate::error::StoreError;
use crate::key::StorageKey;
use crate::store::{ReadStore, SeekDirection, Snapshot, Store};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// An in-memory ordered key-value store.
#[derive(Default)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently committed.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if the store has no committed entries.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl ReadStore for MemoryStore {
    fn get(&self, key: &StorageKey) -> Option<Vec<u8>> {
        self.data.read().get(&key.to_bytes()).cloned()
    }

    fn seek(
        &self,
        prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = (StorageKey, Vec<u8>)> + '_> {
        seek_map(&self.data.read(), prefix, direction)
    }
}

impl Store for MemoryStore {
    fn snapshot(&self) -> Box<dyn Snapshot + '_> {
        Box::new(MemoryStoreSnapshot {
            backing: Arc::clone(&self.data),
            base: self.data.read().clone(),
            writes: BTreeMap::new(),
        })
    }
}

/// A point-in-time view over a [`MemoryStore`] with a local write buffer.
pub struct MemoryStoreSnapshot {
    backing: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
    base: BTreeMap<Vec<u8>, Vec<u8>>,
    /// `None` marks a buffered delete.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl ReadStore for MemoryStoreSnapshot {
    fn get(&self, key: &StorageKey) -> Option<Vec<u8>> {
        let bytes = key.to_bytes();
        match self.writes.get(&bytes) {
            Some(Some(value)) => Some(value.clone()),
            Some(None) => None,
            None => self.base.get(&bytes).cloned(),
        }
    }

    fn seek(
        &self,
        prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = (StorageKey, Vec<u8>)> + '_> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self.base.clone();
        for (key, value) in &self.writes {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        seek_map_owned(merged, prefix, direction)
    }
}

impl Snapshot for MemoryStoreSnapshot {
    fn put(&mut self, key: StorageKey, value: Vec<u8>) {
        self.writes.insert(key.to_bytes(), Some(value));
    }

    fn delete(&mut self, key: &StorageKey) {
        self.writes.insert(key.to_bytes(), None);
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut backing = self.backing.write();
        for (key, value) in self.writes {
            match value {
                Some(v) => {
                    backing.insert(key, v);
                }
                None => {
                    backing.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn discard(self: Box<Self>) {}
}

fn seek_map<'a>(
    map: &BTreeMap<Vec<u8>, Vec<u8>>,
    prefix: &[u8],
    direction: SeekDirection,
) -> Box<dyn Iterator<Item = (StorageKey, Vec<u8>)> + 'a> {
    seek_map_owned(map.clone(), prefix, direction)
}

fn seek_map_owned(
    map: BTreeMap<Vec<u8>, Vec<u8>>,
    prefix: &[u8],
    direction: SeekDirection,
) -> Box<dyn Iterator<Item = (StorageKey, Vec<u8>)>> {
    let prefix = prefix.to_vec();
    match direction {
        SeekDirection::Forward => {
            let items: Vec<_> = map
                .into_iter()
                .filter(move |(k, _)| k.as_slice() >= prefix.as_slice())
                .filter_map(|(k, v)| StorageKey::from_bytes(&k).map(|key| (key, v)))
                .collect();
            Box::new(items.into_iter())
        }
        SeekDirection::Backward => {
            let mut items: Vec<_> = map
                .into_iter()
                .filter(move |(k, _)| k.as_slice() <= prefix.as_slice())
                .filter_map(|(k, v)| StorageKey::from_bytes(&k).map(|key| (key, v)))
                .collect();
            items.reverse();
            Box::new(items.into_iter())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_does_not_see_writes_after_it_opened() {
        let store = MemoryStore::new();
        let key = StorageKey::new(1, b"a".to_vec());
        let mut snap = store.snapshot();
        snap.put(key.clone(), b"v1".to_vec());
        snap.commit().unwrap();

        let snap2 = store.snapshot();
        assert_eq!(snap2.get(&key), Some(b"v1".to_vec()));

        let mut snap3 = store.snapshot();
        snap3.put(key.clone(), b"v2".to_vec());
        // snap2 was opened before v2 was committed and must not observe it.
        assert_eq!(snap2.get(&key), Some(b"v1".to_vec()));
        snap3.commit().unwrap();
        let snap4 = store.snapshot();
        assert_eq!(snap4.get(&key), Some(b"v2".to_vec()));
    }

    #[test]
    fn discard_drops_buffered_writes() {
        let store = MemoryStore::new();
        let key = StorageKey::new(1, b"a".to_vec());
        let mut snap = store.snapshot();
        snap.put(key.clone(), b"v1".to_vec());
        snap.discard();
        assert_eq!(store.get(&key), None);
    }

    #[test]
    fn seek_forward_is_ascending_and_seek_backward_is_descending() {
        let store = MemoryStore::new();
        let mut snap = store.snapshot();
        for i in 0u8..5 {
            snap.put(StorageKey::new(1, vec![i]), vec![i]);
        }
        snap.commit().unwrap();

        let prefix = StorageKey::prefix(1, &[]);
        let forward: Vec<_> = store
            .seek(&prefix, SeekDirection::Forward)
            .map(|(k, _)| k.key()[0])
            .collect();
        assert_eq!(forward, vec![0, 1, 2, 3, 4]);

        let seek_at_2 = StorageKey::new(1, vec![2]).to_bytes();
        let backward: Vec<_> = store
            .seek(&seek_at_2, SeekDirection::Backward)
            .map(|(k, _)| k.key()[0])
            .collect();
        assert_eq!(backward, vec![2, 1, 0]);
    }
}
