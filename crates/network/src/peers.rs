// Copyright (C) 2015-2026 The Neo Project.
//
// peers.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Connected-peer state and the bounded address book (spec.md §4.8
//! "Peer discovery").

use crate::inventory::RelayWindow;
use crate::message::PeerIdentity;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

/// An entry the node has heard about but may not be connected to.
#[derive(Debug, Clone)]
pub struct AddressEntry {
    pub address: SocketAddr,
    pub last_attempt: Option<u64>,
    pub last_success: Option<u64>,
    pub attempts: u32,
}

impl AddressEntry {
    fn new(address: SocketAddr) -> Self {
        Self { address, last_attempt: None, last_success: None, attempts: 0 }
    }

    /// Exponential backoff capped at one hour: `min(2^attempts, 3600)` seconds.
    pub fn backoff(&self) -> Duration {
        let seconds = 1u64.checked_shl(self.attempts.min(12)).unwrap_or(3600).min(3600);
        Duration::from_secs(seconds)
    }

    pub fn is_ready(&self, now: u64) -> bool {
        match self.last_attempt {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.backoff().as_secs(),
        }
    }
}

/// Bounded store of known peer addresses, with per-address backoff
/// (spec.md §4.8: "bounded address book with per-address last-attempt
/// timestamps and backoff").
pub struct AddressBook {
    capacity: usize,
    entries: HashMap<SocketAddr, AddressEntry>,
}

impl AddressBook {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: HashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Learns of `address`, evicting the least-recently-successful entry
    /// if the book is already full. Returns `false` if the book was full
    /// and the new address wasn't accepted.
    pub fn learn(&mut self, address: SocketAddr) -> bool {
        if self.entries.contains_key(&address) {
            return true;
        }
        if self.entries.len() >= self.capacity {
            let evict = self
                .entries
                .values()
                .min_by_key(|e| e.last_success.unwrap_or(0))
                .map(|e| e.address);
            let Some(evict) = evict else {
                return false;
            };
            self.entries.remove(&evict);
        }
        self.entries.insert(address, AddressEntry::new(address));
        true
    }

    pub fn record_attempt(&mut self, address: SocketAddr, now: u64) {
        if let Some(entry) = self.entries.get_mut(&address) {
            entry.last_attempt = Some(now);
            entry.attempts += 1;
        }
    }

    pub fn record_success(&mut self, address: SocketAddr, now: u64) {
        if let Some(entry) = self.entries.get_mut(&address) {
            entry.last_success = Some(now);
            entry.attempts = 0;
        }
    }

    /// Addresses whose backoff has elapsed, ready to dial.
    pub fn ready_to_dial(&self, now: u64) -> Vec<SocketAddr> {
        self.entries.values().filter(|e| e.is_ready(now)).map(|e| e.address).collect()
    }
}

/// A connected peer: its handshake identity (once known) and its relay
/// suppression window (spec.md §4.8 "each peer carries state...").
pub struct Peer {
    pub address: SocketAddr,
    pub identity: Option<PeerIdentity>,
    pub last_seen: u64,
    pub relay_window: RelayWindow,
}

impl Peer {
    pub fn new(address: SocketAddr, now: u64) -> Self {
        Self { address, identity: None, last_seen: now, relay_window: RelayWindow::new() }
    }

    pub fn complete_handshake(&mut self, identity: PeerIdentity) {
        self.identity = Some(identity);
    }

    pub fn is_handshaked(&self) -> bool {
        self.identity.is_some()
    }
}

/// The set of currently-connected peers, keyed by address.
#[derive(Default)]
pub struct PeerTable {
    peers: HashMap<SocketAddr, Peer>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, peer: Peer) {
        self.peers.insert(peer.address, peer);
    }

    pub fn remove(&mut self, address: &SocketAddr) -> Option<Peer> {
        self.peers.remove(address)
    }

    pub fn get_mut(&mut self, address: &SocketAddr) -> Option<&mut Peer> {
        self.peers.get_mut(address)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Every peer except `exclude`, for broadcast (spec.md §4.8
    /// "Broadcast policy": announced to all connected peers except the
    /// source).
    pub fn all_except<'a>(&'a self, exclude: &'a SocketAddr) -> impl Iterator<Item = &'a Peer> + 'a {
        self.peers.values().filter(move |p| &p.address != exclude)
    }

    pub fn handshaked_peer_count(&self) -> usize {
        self.peers.values().filter(|p| p.is_handshaked()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{port}").parse().unwrap()
    }

    #[test]
    fn backoff_grows_exponentially_with_attempts() {
        let mut entry = AddressEntry::new(addr(1));
        assert_eq!(entry.backoff().as_secs(), 1);
        entry.attempts = 5;
        assert_eq!(entry.backoff().as_secs(), 32);
        entry.attempts = 20;
        assert_eq!(entry.backoff().as_secs(), 3600);
    }

    #[test]
    fn address_book_evicts_least_recently_successful_when_full() {
        let mut book = AddressBook::new(2);
        book.learn(addr(1));
        book.learn(addr(2));
        book.record_success(addr(1), 100);
        assert!(book.learn(addr(3)));
        assert_eq!(book.len(), 2);
        assert!(book.entries.contains_key(&addr(1)));
        assert!(!book.entries.contains_key(&addr(2)));
    }

    #[test]
    fn ready_to_dial_respects_backoff() {
        let mut book = AddressBook::new(10);
        book.learn(addr(1));
        book.record_attempt(addr(1), 1_000);
        assert!(!book.ready_to_dial(1_000).contains(&addr(1)));
        assert!(book.ready_to_dial(1_002).contains(&addr(1)));
    }

    #[test]
    fn broadcast_excludes_the_source_peer() {
        let mut table = PeerTable::new();
        table.insert(Peer::new(addr(1), 0));
        table.insert(Peer::new(addr(2), 0));
        let targets: Vec<_> = table.all_except(&addr(1)).map(|p| p.address).collect();
        assert_eq!(targets, vec![addr(2)]);
    }
}
