// Copyright (C) 2015-2026 The Neo Project.
//
// pool.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `Mempool`: the two-pool (verified / unverified) transaction collection
//! (spec.md §4.6). Every public operation takes the single internal lock
//! for its whole duration, so the pool as a whole is linearizable even
//! though admission, eviction, and block-persistence reconciliation each
//! touch several of its internal maps.

use crate::events::{MempoolEvent, MempoolObserver, NullObserver, RemovalReason};
use crate::priority::PriorityKey;
use crate::verification_context::TransactionVerificationContext;
use neo_ledger::{Transaction, VerificationContext, VerifyResult, MAX_VERIFICATION_GAS};
use neo_persistence::Snapshot;
use neo_primitives::{UInt160, UInt256};
use neo_smart_contract::native::{fungible, GasToken, NativeContract};
use neo_smart_contract::{ApplicationEngine, TriggerType};
use num_bigint::BigInt;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Tuning knobs (spec.md §4.6: capacity defaults to
/// `MaxTransactionsPerBlock * K`; the reference node uses `K = 100`,
/// giving the conventional 50,000-transaction pool).
#[derive(Debug, Clone, Copy)]
pub struct MempoolConfig {
    pub capacity: usize,
    /// How many of the best-ranked unverified transactions
    /// [`Mempool::reverify_unverified`] re-checks per call.
    pub reverify_batch: usize,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self { capacity: 50_000, reverify_batch: 500 }
    }
}

struct Entry {
    tx: Transaction,
    high_priority: bool,
    fee_per_byte: i64,
    sequence: u64,
}

impl Entry {
    fn key(&self) -> PriorityKey {
        PriorityKey::new(self.high_priority, self.fee_per_byte, self.sequence)
    }

    fn fee(&self) -> BigInt {
        BigInt::from(self.tx.system_fee) + BigInt::from(self.tx.network_fee)
    }
}

#[derive(Default)]
struct Sub {
    by_hash: HashMap<UInt256, Entry>,
    order: BTreeSet<(PriorityKey, UInt256)>,
}

impl Sub {
    fn insert(&mut self, hash: UInt256, entry: Entry) {
        self.order.insert((entry.key(), hash));
        self.by_hash.insert(hash, entry);
    }

    fn remove(&mut self, hash: &UInt256) -> Option<Entry> {
        let entry = self.by_hash.remove(hash)?;
        self.order.remove(&(entry.key(), *hash));
        Some(entry)
    }

    fn worst(&self) -> Option<UInt256> {
        self.order.iter().next().map(|(_, hash)| *hash)
    }

    fn len(&self) -> usize {
        self.by_hash.len()
    }
}

struct State {
    verified: Sub,
    unverified: Sub,
    context: TransactionVerificationContext,
    next_sequence: u64,
}

impl State {
    fn new() -> Self {
        Self { verified: Sub::default(), unverified: Sub::default(), context: TransactionVerificationContext::new(), next_sequence: 0 }
    }

    fn contains(&self, hash: &UInt256) -> bool {
        self.verified.by_hash.contains_key(hash) || self.unverified.by_hash.contains_key(hash)
    }

    fn len(&self) -> usize {
        self.verified.len() + self.unverified.len()
    }

    fn find(&self, hash: &UInt256) -> Option<&Entry> {
        self.verified.by_hash.get(hash).or_else(|| self.unverified.by_hash.get(hash))
    }

    /// The pool-wide worst-ranked entry and which sub-pool holds it,
    /// preferring to evict from `unverified` first: an entry that hasn't
    /// even survived re-verification against the latest head is a better
    /// eviction candidate than one that has.
    fn worst(&self) -> Option<(bool, UInt256)> {
        if let Some(hash) = self.unverified.worst() {
            return Some((false, hash));
        }
        self.verified.worst().map(|hash| (true, hash))
    }

    fn remove_any(&mut self, hash: &UInt256) -> Option<Entry> {
        self.verified.remove(hash).or_else(|| self.unverified.remove(hash))
    }
}

/// A capacity-bounded, fee-priority transaction pool split into a
/// `verified` collection (checked against the current chain head) and an
/// `unverified` one (carried across a block boundary, pending
/// re-verification against the new head).
pub struct Mempool {
    config: MempoolConfig,
    state: Mutex<State>,
    observer: Box<dyn MempoolObserver>,
}

impl Mempool {
    pub fn new(config: MempoolConfig) -> Self {
        Self::with_observer(config, Box::new(NullObserver))
    }

    pub fn with_observer(config: MempoolConfig, observer: Box<dyn MempoolObserver>) -> Self {
        Self { config, state: Mutex::new(State::new()), observer }
    }

    pub fn contains(&self, hash: &UInt256) -> bool {
        self.state.lock().contains(hash)
    }

    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, hash: &UInt256) -> Option<Transaction> {
        self.state.lock().find(hash).map(|entry| entry.tx.clone())
    }

    /// Runs the full admission pipeline: on-chain/pool duplicate checks
    /// and structural/policy/fee/balance/witness verification (delegated
    /// to [`neo_ledger::verify_transaction`]), the aggregate sender-fee
    /// check, `Conflicts`-attribute eviction, and capacity eviction.
    /// Admits into the `verified` pool on success.
    pub fn try_add(
        &self,
        tx: Transaction,
        snapshot: &mut dyn Snapshot,
        protocol: &neo_config::ProtocolSettings,
        current_height: u32,
        block_time: u64,
        chain: &dyn VerificationContext,
    ) -> VerifyResult {
        let hash = tx.hash();
        let mut state = self.state.lock();
        if state.contains(&hash) {
            return VerifyResult::AlreadyInPool;
        }
        let context = PoolContext { state: &state, chain };
        let result = neo_ledger::verify_transaction(snapshot, &tx, protocol, current_height, block_time, &context);
        if !result.is_success() {
            return result;
        }

        let Some(sender) = tx.sender() else {
            return VerifyResult::Invalid;
        };
        let fee = BigInt::from(tx.system_fee) + BigInt::from(tx.network_fee);
        let balance = gas_balance(snapshot, &sender, current_height, block_time);
        if !state.context.fits(&sender, &fee, &balance) {
            return VerifyResult::InsufficientFunds;
        }

        let high_priority = tx.attributes.iter().any(|a| matches!(a, neo_ledger::Attribute::HighPriority));
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        let candidate_key = PriorityKey::new(high_priority, tx.fee_per_byte(), sequence);

        for attribute in &tx.attributes {
            if let neo_ledger::Attribute::Conflicts { hash: conflicting } = attribute {
                if let Some(existing_key) = state.find(conflicting).map(Entry::key) {
                    if existing_key < candidate_key {
                        self.evict(&mut state, *conflicting, RemovalReason::Replaced);
                    } else {
                        return VerifyResult::HasConflicts;
                    }
                }
            }
        }

        if state.len() >= self.config.capacity {
            match state.worst() {
                Some((_, worst_hash)) if state.find(&worst_hash).map(Entry::key) < Some(candidate_key) => {
                    self.evict(&mut state, worst_hash, RemovalReason::Evicted);
                }
                _ => return VerifyResult::OutOfMemory,
            }
        }

        let fee_per_byte = tx.fee_per_byte();
        state.context.add(sender, fee);
        state.verified.insert(hash, Entry { tx, high_priority, fee_per_byte, sequence });
        self.observer.on_event(MempoolEvent::TransactionAdded(hash));
        info!(%hash, "admitted transaction to mempool");
        VerifyResult::Succeed
    }

    /// Removes a transaction for a caller-supplied reason, e.g. a wallet
    /// withdrawing its own unconfirmed transaction.
    pub fn remove(&self, hash: &UInt256, reason: RemovalReason) -> bool {
        let mut state = self.state.lock();
        self.evict(&mut state, *hash, reason)
    }

    fn evict(&self, state: &mut State, hash: UInt256, reason: RemovalReason) -> bool {
        let Some(entry) = state.remove_any(&hash) else {
            return false;
        };
        if let Some(sender) = entry.tx.sender() {
            state.context.remove(sender, entry.fee());
        }
        self.observer.on_event(MempoolEvent::TransactionRemoved(hash, reason));
        debug!(%hash, ?reason, "removed transaction from mempool");
        true
    }

    /// The best-ranked verified transactions, for block assembly.
    pub fn get_verified_for_block(&self, max_count: usize) -> Vec<Transaction> {
        let state = self.state.lock();
        state
            .verified
            .order
            .iter()
            .rev()
            .take(max_count)
            .filter_map(|(_, hash)| state.verified.by_hash.get(hash))
            .map(|entry| entry.tx.clone())
            .collect()
    }

    /// Reconciles the pool with a newly persisted block: transactions it
    /// carried are dropped with reason `IncludedInBlock`; every other
    /// verified transaction moves to `unverified`, since it was only ever
    /// checked against the block's now-stale parent.
    pub fn on_block_persisted(&self, included: &[UInt256]) {
        let mut state = self.state.lock();
        for hash in included {
            if let Some(entry) = state.remove_any(hash) {
                if let Some(sender) = entry.tx.sender() {
                    state.context.remove(sender, entry.fee());
                }
                self.observer.on_event(MempoolEvent::TransactionRemoved(*hash, RemovalReason::IncludedInBlock));
            }
        }
        let stale: Vec<UInt256> = state.verified.by_hash.keys().copied().collect();
        for hash in stale {
            if let Some(entry) = state.verified.remove(&hash) {
                state.unverified.insert(hash, entry);
            }
        }
        info!(moved = state.unverified.len(), "moved verified transactions to unverified after block persistence");
    }

    /// Re-checks the best-ranked `reverify_batch` unverified transactions
    /// against the new chain head, promoting survivors back to `verified`
    /// and dropping the rest.
    pub fn reverify_unverified(
        &self,
        snapshot: &mut dyn Snapshot,
        protocol: &neo_config::ProtocolSettings,
        current_height: u32,
        block_time: u64,
        chain: &dyn VerificationContext,
    ) {
        let mut state = self.state.lock();
        let batch: Vec<UInt256> =
            state.unverified.order.iter().rev().take(self.config.reverify_batch).map(|(_, hash)| *hash).collect();

        for hash in batch {
            let Some(entry) = state.unverified.remove(&hash) else { continue };
            let context = PoolContext { state: &state, chain };
            let result = neo_ledger::verify_transaction(snapshot, &entry.tx, protocol, current_height, block_time, &context);
            if result.is_success() {
                state.verified.insert(hash, entry);
            } else {
                if let Some(sender) = entry.tx.sender() {
                    state.context.remove(sender, entry.fee());
                }
                let reason = if result == VerifyResult::Expired { RemovalReason::Expired } else { RemovalReason::PolicyFail };
                self.observer.on_event(MempoolEvent::TransactionRemoved(hash, reason));
            }
        }
    }
}

/// Bridges a pool's own duplicate tracking with the caller's knowledge of
/// what's already on chain.
struct PoolContext<'a> {
    state: &'a State,
    chain: &'a dyn VerificationContext,
}

impl VerificationContext for PoolContext<'_> {
    fn is_on_chain(&self, hash: &UInt256) -> bool {
        self.chain.is_on_chain(hash)
    }

    fn is_pooled(&self, hash: &UInt256) -> bool {
        self.state.contains(hash)
    }
}

fn gas_balance(snapshot: &mut dyn Snapshot, account: &UInt160, current_height: u32, block_time: u64) -> BigInt {
    let engine = ApplicationEngine::new(TriggerType::VERIFICATION, snapshot, *account, None, vec![], current_height, block_time, MAX_VERIFICATION_GAS);
    let gas = GasToken::new();
    fungible::balance_of(&engine, gas.id(), account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_config::ProtocolSettings;
    use neo_ledger::{Attribute, Signer, Witness};
    use neo_persistence::{MemoryStore, Store};

    struct NoChainHistory;
    impl VerificationContext for NoChainHistory {
        fn is_on_chain(&self, _hash: &UInt256) -> bool {
            false
        }
        fn is_pooled(&self, _hash: &UInt256) -> bool {
            false
        }
    }

    fn account(byte: u8) -> UInt160 {
        UInt160::from_bytes(&[byte; 20]).unwrap()
    }

    fn fund(snapshot: &mut dyn Snapshot, who: UInt160, amount: i64) {
        let mut engine = ApplicationEngine::new(TriggerType::APPLICATION, snapshot, who, None, vec![], 0, 0, i64::MAX);
        GasToken::new().mint(&mut engine, &who, &BigInt::from(amount)).unwrap();
    }

    fn tx(sender: UInt160, nonce: u32, network_fee: i64, attributes: Vec<Attribute>) -> Transaction {
        Transaction {
            version: 0,
            nonce,
            system_fee: 0,
            network_fee,
            valid_until_block: 1000,
            signers: vec![Signer::called_by_entry(sender)],
            attributes,
            script: vec![0x40],
            witnesses: vec![Witness::new(vec![], vec![0x51])],
        }
    }

    #[test]
    fn admits_a_funded_transaction_into_the_verified_pool() {
        let pool = Mempool::new(MempoolConfig::default());
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let sender = account(1);
        fund(snapshot.as_mut(), sender, 10_000_000);
        let protocol = ProtocolSettings::default();

        let t = tx(sender, 1, 1_000_000, vec![]);
        let hash = t.hash();
        let result = pool.try_add(t, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);
        assert_eq!(result, VerifyResult::Succeed);
        assert!(pool.contains(&hash));
        assert_eq!(pool.get_verified_for_block(10).len(), 1);
    }

    #[test]
    fn rejects_duplicate_admission() {
        let pool = Mempool::new(MempoolConfig::default());
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let sender = account(2);
        fund(snapshot.as_mut(), sender, 10_000_000);
        let protocol = ProtocolSettings::default();

        let t = tx(sender, 1, 1_000_000, vec![]);
        pool.try_add(t.clone(), snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);
        let result = pool.try_add(t, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);
        assert_eq!(result, VerifyResult::AlreadyInPool);
    }

    #[test]
    fn higher_priority_conflicting_transaction_evicts_the_lower_one() {
        let pool = Mempool::new(MempoolConfig::default());
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let sender = account(3);
        fund(snapshot.as_mut(), sender, 10_000_000);
        let protocol = ProtocolSettings::default();

        let cheap = tx(sender, 1, 1_000_000, vec![]);
        let cheap_hash = cheap.hash();
        assert_eq!(pool.try_add(cheap, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory), VerifyResult::Succeed);

        let expensive = tx(sender, 2, 2_000_000, vec![Attribute::Conflicts { hash: cheap_hash }]);
        let expensive_hash = expensive.hash();
        assert_eq!(pool.try_add(expensive, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory), VerifyResult::Succeed);

        assert!(!pool.contains(&cheap_hash));
        assert!(pool.contains(&expensive_hash));
    }

    #[test]
    fn lower_priority_conflicting_transaction_is_rejected() {
        let pool = Mempool::new(MempoolConfig::default());
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let sender = account(4);
        fund(snapshot.as_mut(), sender, 10_000_000);
        let protocol = ProtocolSettings::default();

        let rich = tx(sender, 1, 2_000_000, vec![]);
        let rich_hash = rich.hash();
        pool.try_add(rich, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);

        let poor = tx(sender, 2, 1_000_000, vec![Attribute::Conflicts { hash: rich_hash }]);
        let result = pool.try_add(poor, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);
        assert_eq!(result, VerifyResult::HasConflicts);
        assert!(pool.contains(&rich_hash));
    }

    #[test]
    fn capacity_eviction_displaces_the_pool_minimum_for_a_better_transaction() {
        let pool = Mempool::new(MempoolConfig { capacity: 1, reverify_batch: 10 });
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();

        let low_sender = account(5);
        fund(snapshot.as_mut(), low_sender, 10_000_000);
        let low = tx(low_sender, 1, 1_000_000, vec![]);
        let low_hash = low.hash();
        pool.try_add(low, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);

        let high_sender = account(6);
        fund(snapshot.as_mut(), high_sender, 10_000_000);
        let high = tx(high_sender, 1, 5_000_000, vec![]);
        let high_hash = high.hash();
        let result = pool.try_add(high, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);

        assert_eq!(result, VerifyResult::Succeed);
        assert!(!pool.contains(&low_hash));
        assert!(pool.contains(&high_hash));
    }

    #[test]
    fn full_pool_rejects_a_transaction_that_does_not_outrank_the_minimum() {
        let pool = Mempool::new(MempoolConfig { capacity: 1, reverify_batch: 10 });
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();

        let first_sender = account(7);
        fund(snapshot.as_mut(), first_sender, 10_000_000);
        let first = tx(first_sender, 1, 5_000_000, vec![]);
        pool.try_add(first, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);

        let second_sender = account(8);
        fund(snapshot.as_mut(), second_sender, 10_000_000);
        let second = tx(second_sender, 1, 1_000_000, vec![]);
        let result = pool.try_add(second, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);
        assert_eq!(result, VerifyResult::OutOfMemory);
    }

    #[test]
    fn block_persistence_moves_survivors_to_unverified_and_drops_included_ones() {
        let pool = Mempool::new(MempoolConfig::default());
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();

        let sender = account(9);
        fund(snapshot.as_mut(), sender, 10_000_000);
        let included = tx(sender, 1, 1_000_000, vec![]);
        let included_hash = included.hash();
        pool.try_add(included, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);

        let other_sender = account(10);
        fund(snapshot.as_mut(), other_sender, 10_000_000);
        let survivor = tx(other_sender, 1, 1_000_000, vec![]);
        let survivor_hash = survivor.hash();
        pool.try_add(survivor, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);

        pool.on_block_persisted(&[included_hash]);

        assert!(!pool.contains(&included_hash));
        assert!(pool.contains(&survivor_hash));
        assert!(pool.get_verified_for_block(10).is_empty());

        pool.reverify_unverified(snapshot.as_mut(), &protocol, 2, 0, &NoChainHistory);
        assert_eq!(pool.get_verified_for_block(10).len(), 1);
    }

    #[test]
    fn reverification_drops_a_transaction_that_expired_across_the_block_boundary() {
        let pool = Mempool::new(MempoolConfig::default());
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();

        let sender = account(11);
        fund(snapshot.as_mut(), sender, 10_000_000);
        let mut t = tx(sender, 1, 1_000_000, vec![]);
        t.valid_until_block = 5;
        let hash = t.hash();
        pool.try_add(t, snapshot.as_mut(), &protocol, 1, 0, &NoChainHistory);

        pool.on_block_persisted(&[]);
        pool.reverify_unverified(snapshot.as_mut(), &protocol, 5, 0, &NoChainHistory);

        assert!(!pool.contains(&hash));
    }
}
