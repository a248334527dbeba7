// Copyright (C) 2015-2026 The Neo Project.
//
// context.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `ConsensusContext`: the per-block state a validator resets on every
//! new head (spec.md §4.7 "Per-block state"), plus the N/f/M quorum math.

use crate::messages::{ChangeView, Commit, PrepareRequest};
use neo_primitives::{UInt160, UInt256};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ConsensusContext {
    pub block_index: u32,
    pub view_number: u8,
    pub my_index: i8,
    pub validators: Vec<UInt160>,
    pub prev_hash: UInt256,
    pub next_consensus: UInt160,
    pub prepare_request: Option<PrepareRequest>,
    preparations: HashMap<u8, UInt256>,
    commits: HashMap<u8, Commit>,
    change_views: HashMap<u8, ChangeView>,
}

impl ConsensusContext {
    pub fn new(
        block_index: u32,
        validators: Vec<UInt160>,
        my_index: i8,
        prev_hash: UInt256,
        next_consensus: UInt160,
    ) -> Self {
        Self {
            block_index,
            view_number: 0,
            my_index,
            validators,
            prev_hash,
            next_consensus,
            prepare_request: None,
            preparations: HashMap::new(),
            commits: HashMap::new(),
            change_views: HashMap::new(),
        }
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Maximum tolerated Byzantine validators: `f = floor((n-1)/3)`.
    pub fn max_faults(&self) -> usize {
        (self.validator_count().saturating_sub(1)) / 3
    }

    /// Required agreement threshold: `M = n - f`.
    pub fn quorum(&self) -> usize {
        self.validator_count() - self.max_faults()
    }

    /// `(block_index - view_number) mod n`, the index of the validator
    /// whose turn it is to propose at the current view (spec.md §4.7).
    pub fn primary_index(&self) -> u8 {
        let n = self.validator_count() as i64;
        if n == 0 {
            return 0;
        }
        let raw = self.block_index as i64 - self.view_number as i64;
        raw.rem_euclid(n) as u8
    }

    pub fn is_primary(&self) -> bool {
        self.my_index >= 0 && self.my_index as u8 == self.primary_index()
    }

    /// Advances to a new view, discarding every message recorded for the
    /// old one (spec.md §4.7 T0 reset on view change).
    pub fn start_view(&mut self, view_number: u8) {
        self.view_number = view_number;
        self.prepare_request = None;
        self.preparations.clear();
        self.commits.clear();
        self.change_views.clear();
    }

    pub fn record_preparation(&mut self, validator_index: u8, hash: UInt256) {
        self.preparations.insert(validator_index, hash);
    }

    pub fn preparation_count_for(&self, hash: &UInt256) -> usize {
        self.preparations.values().filter(|h| *h == hash).count()
    }

    pub fn has_quorum_preparations(&self, hash: &UInt256) -> bool {
        self.preparation_count_for(hash) >= self.quorum()
    }

    pub fn record_commit(&mut self, validator_index: u8, commit: Commit) {
        self.commits.insert(validator_index, commit);
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn has_quorum_commits(&self) -> bool {
        self.commit_count() >= self.quorum()
    }

    pub fn commits(&self) -> impl Iterator<Item = (&u8, &Commit)> {
        self.commits.iter()
    }

    pub fn record_change_view(&mut self, validator_index: u8, change_view: ChangeView) {
        self.change_views.insert(validator_index, change_view);
    }

    pub fn change_view_count_for(&self, target_view: u8) -> usize {
        self.change_views.values().filter(|cv| cv.new_view_number == target_view).count()
    }

    pub fn has_quorum_change_views(&self, target_view: u8) -> bool {
        self.change_view_count_for(target_view) >= self.quorum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validators(n: usize) -> Vec<UInt160> {
        (0..n).map(|i| UInt160::from_bytes(&[i as u8; 20]).unwrap()).collect()
    }

    #[test]
    fn quorum_math_matches_the_classic_dbft_table() {
        let ctx = ConsensusContext::new(0, validators(7), 0, UInt256::zero(), UInt160::zero());
        assert_eq!(ctx.max_faults(), 2);
        assert_eq!(ctx.quorum(), 5);
    }

    #[test]
    fn primary_index_rotates_backwards_with_the_view_number() {
        let mut ctx = ConsensusContext::new(10, validators(4), 0, UInt256::zero(), UInt160::zero());
        assert_eq!(ctx.primary_index(), 2); // 10 mod 4
        ctx.start_view(1);
        assert_eq!(ctx.primary_index(), 1); // (10-1) mod 4
    }

    #[test]
    fn quorum_preparations_require_matching_hashes() {
        let mut ctx = ConsensusContext::new(0, validators(4), 0, UInt256::zero(), UInt160::zero());
        let hash = UInt256::from_bytes(&[1u8; 32]).unwrap();
        let other = UInt256::from_bytes(&[2u8; 32]).unwrap();
        ctx.record_preparation(0, hash);
        ctx.record_preparation(1, hash);
        ctx.record_preparation(2, other);
        assert!(!ctx.has_quorum_preparations(&hash));
        ctx.record_preparation(3, hash);
        assert!(ctx.has_quorum_preparations(&hash));
    }

    #[test]
    fn starting_a_new_view_clears_prior_round_state() {
        let mut ctx = ConsensusContext::new(0, validators(4), 0, UInt256::zero(), UInt160::zero());
        ctx.record_commit(0, Commit { signature: vec![1] });
        ctx.start_view(1);
        assert_eq!(ctx.commit_count(), 0);
        assert_eq!(ctx.view_number, 1);
    }
}
