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

//! Wire codec, inventory dispatch, block sync state machine, and peer
//! address book (spec.md §4.8). Owns no connection I/O itself; `node`
//! drives actual sockets and hands decoded messages here.

mod error;
mod inventory;
mod message;
mod peers;
mod sync;

pub use error::{NetworkError, NetworkResult};
pub use inventory::{filter_unknown, RelayWindow};
pub use message::{
    checksum, Command, InventoryPayload, InventoryType, Message, NetworkAddress, PeerIdentity,
    VersionPayload, MAX_INVENTORY_HASHES, PAYLOAD_MAX_SIZE,
};
pub use peers::{AddressBook, AddressEntry, Peer, PeerTable};
pub use sync::{SyncManager, SyncState, MAX_HEADERS_PER_REQUEST};
