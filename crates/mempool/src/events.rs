// Copyright (C) 2015-2026 The Neo Project.
//
// events.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Observable pool events (spec.md §4.6) and the trait callers implement
//! to receive them (relaying `TransactionAdded`, notifying wallets of
//! `TransactionRemoved`, and so on).

use neo_primitives::UInt256;

/// Why a transaction left the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// A block carrying this transaction was persisted.
    IncludedInBlock,
    /// Displaced by a higher-priority transaction naming it in a
    /// `Conflicts` attribute, or by the pool's capacity eviction.
    Replaced,
    /// `valid_until_block` passed while the transaction sat in the pool.
    Expired,
    /// Re-verification against a new chain head failed.
    PolicyFail,
    /// Dropped to make room for a higher-priority transaction when the
    /// pool was at capacity.
    Evicted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MempoolEvent {
    TransactionAdded(UInt256),
    TransactionRemoved(UInt256, RemovalReason),
}

/// Receives pool events as they happen. Called while the pool's internal
/// lock is held, so implementations must not call back into the pool.
pub trait MempoolObserver: Send + Sync {
    fn on_event(&self, event: MempoolEvent);
}

/// The default observer: discards every event.
pub struct NullObserver;

impl MempoolObserver for NullObserver {
    fn on_event(&self, _event: MempoolEvent) {}
}
