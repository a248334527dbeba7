// Copyright (C) 2015-2026 The Neo Project.
//
// lib.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Store/Snapshot abstraction (spec.md §2 C3, §4.1). The concrete backend
//! is out of scope; this crate is the seam a RocksDB (or other) adapter
//! would implement, plus an in-memory reference implementation.

pub mod error;
pub mod key;
pub mod memory_store;
pub mod store;

pub use error::StoreError;
pub use key::StorageKey;
pub use memory_store::MemoryStore;
pub use store::{ReadStore, SeekDirection, Snapshot, Store};
