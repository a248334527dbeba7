// Copyright (C) 2015-2026 The Neo Project.
//
// verification_context.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `TransactionVerificationContext`: the sum of `system_fee + network_fee`
//! a sender already has pending across every one of its transactions
//! currently admitted to the pool. [`neo_ledger::verify_transaction`]
//! only checks a transaction's own fees against the sender's on-chain GAS
//! balance; this catches a sender whose *individually* affordable
//! transactions would collectively overdraw that balance once all of
//! them land in the same block.

use neo_primitives::UInt160;
use num_bigint::BigInt;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TransactionVerificationContext {
    pending: HashMap<UInt160, BigInt>,
}

impl TransactionVerificationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total fees the sender already has pending in the pool.
    pub fn pending_for(&self, sender: &UInt160) -> BigInt {
        self.pending.get(sender).cloned().unwrap_or_else(|| BigInt::from(0))
    }

    /// Whether admitting a transaction charging `fee` on top of what's
    /// already pending would still fit within `balance`.
    pub fn fits(&self, sender: &UInt160, fee: &BigInt, balance: &BigInt) -> bool {
        &(self.pending_for(sender) + fee) <= balance
    }

    pub fn add(&mut self, sender: UInt160, fee: BigInt) {
        let entry = self.pending.entry(sender).or_insert_with(|| BigInt::from(0));
        *entry += fee;
    }

    pub fn remove(&mut self, sender: UInt160, fee: BigInt) {
        if let Some(entry) = self.pending.get_mut(&sender) {
            *entry -= fee;
            if *entry <= BigInt::from(0) {
                self.pending.remove(&sender);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> UInt160 {
        UInt160::from_bytes(&[byte; 20]).unwrap()
    }

    #[test]
    fn aggregates_across_multiple_transactions_from_the_same_sender() {
        let mut ctx = TransactionVerificationContext::new();
        let sender = account(1);
        ctx.add(sender, BigInt::from(100));
        ctx.add(sender, BigInt::from(50));
        assert_eq!(ctx.pending_for(&sender), BigInt::from(150));
    }

    #[test]
    fn fits_rejects_once_aggregate_would_exceed_balance() {
        let mut ctx = TransactionVerificationContext::new();
        let sender = account(2);
        ctx.add(sender, BigInt::from(90));
        let balance = BigInt::from(100);
        assert!(!ctx.fits(&sender, &BigInt::from(20), &balance));
        assert!(ctx.fits(&sender, &BigInt::from(10), &balance));
    }

    #[test]
    fn removing_down_to_zero_drops_the_entry() {
        let mut ctx = TransactionVerificationContext::new();
        let sender = account(3);
        ctx.add(sender, BigInt::from(40));
        ctx.remove(sender, BigInt::from(40));
        assert_eq!(ctx.pending_for(&sender), BigInt::from(0));
    }
}
