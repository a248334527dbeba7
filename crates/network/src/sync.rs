// Copyright (C) 2015-2026 The Neo Project.
//
// sync.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Header/block synchronization (spec.md §4.8): `NotSynchronizing →
//! SynchronizingHeaders → SynchronizingBlocks → Synchronized`.

use neo_ledger::Block;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use tracing::{debug, info};

/// Headers are requested in batches of at most this many per `GetHeaders`
/// (spec.md §4.8).
pub const MAX_HEADERS_PER_REQUEST: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    NotSynchronizing,
    SynchronizingHeaders,
    SynchronizingBlocks,
    Synchronized,
}

/// Drives header-then-body catch-up against a set of peers. Received
/// blocks are buffered until they chain from the current head
/// (spec.md §4.8 "buffered until they chain from the current head").
pub struct SyncManager {
    state: SyncState,
    current_height: u32,
    best_known_height: u32,
    buffered: BTreeMap<u32, Block>,
    in_flight: BTreeMap<u32, SocketAddr>,
}

impl SyncManager {
    pub fn new(current_height: u32) -> Self {
        Self {
            state: SyncState::NotSynchronizing,
            current_height,
            best_known_height: current_height,
            buffered: BTreeMap::new(),
            in_flight: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn current_height(&self) -> u32 {
        self.current_height
    }

    /// A peer announced a chain tip higher than ours; begin (or continue)
    /// catching up.
    pub fn observe_peer_height(&mut self, peer_height: u32) {
        if peer_height > self.best_known_height {
            self.best_known_height = peer_height;
        }
        if self.best_known_height > self.current_height && self.state == SyncState::NotSynchronizing {
            self.state = SyncState::SynchronizingHeaders;
            debug!(target_height = self.best_known_height, "starting header sync");
        }
    }

    /// Headers have been validated and chained; move on to fetching
    /// bodies once the header chain reaches the known tip.
    pub fn on_headers_received(&mut self, highest_header: u32) {
        if self.state != SyncState::SynchronizingHeaders {
            return;
        }
        if highest_header >= self.best_known_height {
            self.state = SyncState::SynchronizingBlocks;
            debug!("header sync complete, fetching block bodies");
        }
    }

    /// Indices still needed, in order, capped at `batch_size`, skipping
    /// any already in flight or buffered.
    pub fn next_block_requests(&self, batch_size: usize) -> Vec<u32> {
        let mut out = Vec::with_capacity(batch_size);
        let mut index = self.current_height + 1;
        while out.len() < batch_size && index <= self.best_known_height {
            if !self.buffered.contains_key(&index) && !self.in_flight.contains_key(&index) {
                out.push(index);
            }
            index += 1;
        }
        out
    }

    pub fn mark_requested(&mut self, index: u32, from: SocketAddr) {
        self.in_flight.insert(index, from);
    }

    /// Buffers a received block and drains every block that now chains
    /// from the current head, returning them in persistence order.
    pub fn receive_block(&mut self, index: u32, block: Block) -> Vec<Block> {
        self.in_flight.remove(&index);
        self.buffered.insert(index, block);
        let mut ready = Vec::new();
        loop {
            let next = self.current_height + 1;
            match self.buffered.remove(&next) {
                Some(block) => {
                    self.current_height = next;
                    ready.push(block);
                }
                None => break,
            }
        }
        if self.current_height >= self.best_known_height && self.state == SyncState::SynchronizingBlocks {
            self.state = SyncState::Synchronized;
            info!(height = self.current_height, "block sync complete");
        }
        ready
    }

    /// A fresh peer announcement moves a synchronized node back into
    /// catch-up mode.
    pub fn on_new_peer_tip(&mut self, peer_height: u32) {
        self.observe_peer_height(peer_height);
        if self.state == SyncState::Synchronized && peer_height > self.current_height {
            self.state = SyncState::SynchronizingHeaders;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_ledger::{Header, Witness};
    use neo_primitives::{UInt160, UInt256};

    fn block(index: u32) -> Block {
        Block {
            header: Header {
                version: 0,
                prev_hash: UInt256::zero(),
                merkle_root: UInt256::zero(),
                timestamp: index as u64,
                nonce: 0,
                index,
                primary_index: 0,
                next_consensus: UInt160::zero(),
                witness: Witness::new(vec![], vec![]),
            },
            transactions: vec![],
        }
    }

    #[test]
    fn observing_a_taller_peer_starts_header_sync() {
        let mut sync = SyncManager::new(0);
        assert_eq!(sync.state(), SyncState::NotSynchronizing);
        sync.observe_peer_height(10);
        assert_eq!(sync.state(), SyncState::SynchronizingHeaders);
    }

    #[test]
    fn full_state_progression_reaches_synchronized() {
        let mut sync = SyncManager::new(0);
        sync.observe_peer_height(2);
        sync.on_headers_received(2);
        assert_eq!(sync.state(), SyncState::SynchronizingBlocks);

        let ready = sync.receive_block(1, block(1));
        assert_eq!(ready.len(), 1);
        assert_eq!(sync.state(), SyncState::SynchronizingBlocks);

        let ready = sync.receive_block(2, block(2));
        assert_eq!(ready.len(), 1);
        assert_eq!(sync.state(), SyncState::Synchronized);
    }

    #[test]
    fn out_of_order_blocks_buffer_until_they_chain() {
        let mut sync = SyncManager::new(0);
        sync.observe_peer_height(3);
        sync.on_headers_received(3);

        assert!(sync.receive_block(3, block(3)).is_empty());
        assert!(sync.receive_block(2, block(2)).is_empty());
        let ready = sync.receive_block(1, block(1));
        assert_eq!(ready.len(), 3);
        assert_eq!(sync.current_height(), 3);
    }

    #[test]
    fn next_block_requests_skip_buffered_and_in_flight_indices() {
        let mut sync = SyncManager::new(0);
        sync.observe_peer_height(5);
        sync.on_headers_received(5);
        sync.mark_requested(1, "127.0.0.1:1".parse().unwrap());
        sync.receive_block(3, block(3));
        let requests = sync.next_block_requests(10);
        assert_eq!(requests, vec![2, 4, 5]);
    }
}
