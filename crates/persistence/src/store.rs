// Copyright (C) 2015-2026 The Neo Project.
//
// store.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The abstract `Store`/`Snapshot` contract (spec.md §4.1). The concrete
//! backend (RocksDB or otherwise) is out of scope per spec.md §1; this
//! crate defines only the trait boundary plus an in-memory reference
//! implementation used by tests and by single-process embeddings of the
//! node.

use crate::error::StoreError;
use crate::key::StorageKey;

/// Iteration direction for [`ReadStore::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    /// Ascending lexicographic order, keys ≥ the seek prefix.
    Forward,
    /// Descending lexicographic order, keys ≤ the seek prefix.
    Backward,
}

/// Read access shared by a durable `Store` and a transient `Snapshot`.
pub trait ReadStore {
    /// Looks up a single key.
    fn get(&self, key: &StorageKey) -> Option<Vec<u8>>;

    /// True if `key` is present.
    fn contains(&self, key: &StorageKey) -> bool {
        self.get(key).is_some()
    }

    /// Iterates entries whose byte-serialized key starts with `prefix`, in
    /// the requested direction. Results are strictly ordered (spec.md §4.1).
    fn seek(
        &self,
        prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = (StorageKey, Vec<u8>)> + '_>;
}

/// A read-only, point-in-time view with an accumulating write set.
///
/// All reads observe the state as of the moment the snapshot was taken
/// (serializable isolation, spec.md §4.1); writes are buffered locally and
/// only become visible to other snapshots after [`Snapshot::commit`].
pub trait Snapshot: ReadStore {
    /// Buffers a write; visible to subsequent reads on *this* snapshot but
    /// not to any other snapshot until commit.
    fn put(&mut self, key: StorageKey, value: Vec<u8>);

    /// Buffers a deletion.
    fn delete(&mut self, key: &StorageKey);

    /// Atomically applies every buffered write to the backing store.
    /// An I/O failure here is fatal (spec.md §7 `StorageError`).
    fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discards every buffered write without affecting the backing store.
    fn discard(self: Box<Self>);
}

/// A durable, ordered key-value store that can be opened for reading and
/// can mint isolated snapshots for writing.
pub trait Store: ReadStore {
    /// Opens a new snapshot of the current committed state.
    fn snapshot(&self) -> Box<dyn Snapshot + '_>;
}
