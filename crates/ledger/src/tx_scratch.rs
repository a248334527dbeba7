// Copyright (C) 2015-2026 The Neo Project.
//
// tx_scratch.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `TxScratch`: a per-transaction write buffer layered on top of a block's
//! snapshot (spec.md §7 `VMFault`: "the transaction is still persisted ...
//! but its state mutations are rolled back"). A block persists through a
//! single snapshot for its whole duration, so rolling back one faulted
//! transaction without discarding its predecessors' already-applied writes
//! needs a second, narrower write buffer the persistence pipeline can
//! commit into the block snapshot on `Halt` and simply drop on `Fault` —
//! mirroring `neo-persistence`'s own store/snapshot layering one level down.

use neo_persistence::{ReadStore, SeekDirection, Snapshot, StorageKey, StoreError};
use std::collections::BTreeMap;

/// A write buffer scoped to one transaction's `Application` execution.
pub struct TxScratch<'a> {
    base: &'a mut dyn Snapshot,
    /// `None` marks a buffered delete.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> TxScratch<'a> {
    pub fn new(base: &'a mut dyn Snapshot) -> Self {
        Self { base, writes: BTreeMap::new() }
    }
}

impl ReadStore for TxScratch<'_> {
    fn get(&self, key: &StorageKey) -> Option<Vec<u8>> {
        match self.writes.get(&key.to_bytes()) {
            Some(Some(value)) => Some(value.clone()),
            Some(None) => None,
            None => self.base.get(key),
        }
    }

    fn seek(&self, prefix: &[u8], direction: SeekDirection) -> Box<dyn Iterator<Item = (StorageKey, Vec<u8>)> + '_> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .base
            .seek(prefix, SeekDirection::Forward)
            .map(|(key, value)| (key.to_bytes(), value))
            .collect();
        for (key, value) in &self.writes {
            if !key.starts_with(prefix) {
                continue;
            }
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        let prefix = prefix.to_vec();
        let mut items: Vec<_> = merged
            .into_iter()
            .filter_map(|(k, v)| StorageKey::from_bytes(&k).map(|key| (key, v)))
            .collect();
        if direction == SeekDirection::Backward {
            items.reverse();
        }
        Box::new(items.into_iter())
    }
}

impl Snapshot for TxScratch<'_> {
    fn put(&mut self, key: StorageKey, value: Vec<u8>) {
        self.writes.insert(key.to_bytes(), Some(value));
    }

    fn delete(&mut self, key: &StorageKey) {
        self.writes.insert(key.to_bytes(), None);
    }

    /// Applies every buffered write into the underlying block snapshot.
    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let TxScratch { base, writes } = *self;
        for (key_bytes, value) in writes {
            let key = StorageKey::from_bytes(&key_bytes).expect("keys were produced by StorageKey::to_bytes");
            match value {
                Some(v) => base.put(key, v),
                None => base.delete(&key),
            }
        }
        Ok(())
    }

    /// Drops every buffered write, leaving the underlying block snapshot
    /// exactly as it was before this transaction ran.
    fn discard(self: Box<Self>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_persistence::{MemoryStore, Store};

    #[test]
    fn committed_writes_become_visible_on_the_base_snapshot() {
        let store = MemoryStore::new();
        let mut base = store.snapshot();
        {
            let mut scratch = TxScratch::new(base.as_mut());
            scratch.put(StorageKey::new(1, vec![1]), vec![9]);
            Box::new(scratch).commit().unwrap();
        }
        assert_eq!(base.get(&StorageKey::new(1, vec![1])), Some(vec![9]));
    }

    #[test]
    fn discarded_writes_never_reach_the_base_snapshot() {
        let store = MemoryStore::new();
        let mut base = store.snapshot();
        {
            let mut scratch = TxScratch::new(base.as_mut());
            scratch.put(StorageKey::new(1, vec![1]), vec![9]);
            Box::new(scratch).discard();
        }
        assert_eq!(base.get(&StorageKey::new(1, vec![1])), None);
    }

    #[test]
    fn reads_fall_through_to_base_when_not_overlaid() {
        let store = MemoryStore::new();
        let mut base = store.snapshot();
        base.put(StorageKey::new(2, vec![5]), vec![7]);
        let scratch = TxScratch::new(base.as_mut());
        assert_eq!(scratch.get(&StorageKey::new(2, vec![5])), Some(vec![7]));
    }

    #[test]
    fn delete_shadows_a_value_visible_on_the_base_snapshot() {
        let store = MemoryStore::new();
        let mut base = store.snapshot();
        base.put(StorageKey::new(2, vec![5]), vec![7]);
        let mut scratch = TxScratch::new(base.as_mut());
        scratch.delete(&StorageKey::new(2, vec![5]));
        assert_eq!(scratch.get(&StorageKey::new(2, vec![5])), None);
    }
}
