// Copyright (C) 2015-2026 The Neo Project.
//
// engine.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `DbftEngine`: the state transitions of spec.md §4.7, driven by
//! delivered messages and timer expiry. The engine never touches the
//! network or the store directly; it consumes messages and produces
//! messages to broadcast plus, on success, a [`FinalizedRound`] the
//! caller turns into a real block via [`neo_ledger::persist_block`].

use crate::context::ConsensusContext;
use crate::error::{ConsensusError, ConsensusResult};
use crate::messages::{
    ChangeView, ChangeViewReason, Commit, ConsensusMessage, PrepareRequest, PrepareResponse,
    RecoveryMessage, RecoveryRequest,
};
use neo_cryptography::ecdsa::{self, Curve};
use neo_cryptography::hash::sha256;
use neo_ledger::{Header, Witness};
use neo_primitives::{merkle, UInt160, UInt256};
use tracing::{debug, info, warn};

/// Where a validator is within one view of one block's round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    RequestSent,
    ResponseSent,
    CommitSent,
}

/// The outcome of a round reaching commit quorum: the header hash every
/// signature is over, and the collected `(validator_index, signature)`
/// pairs. The caller assembles the witness and the full block; the
/// engine only certifies that quorum was reached.
#[derive(Debug, Clone)]
pub struct FinalizedRound {
    pub header: Header,
    pub signatures: Vec<(u8, Vec<u8>)>,
}

pub struct DbftEngine {
    pub context: ConsensusContext,
    pub phase: Phase,
    private_key: Vec<u8>,
}

impl DbftEngine {
    pub fn new(context: ConsensusContext, private_key: Vec<u8>) -> Self {
        Self { context, phase: Phase::Initial, private_key }
    }

    pub fn reset_for_new_block(&mut self, block_index: u32, validators: Vec<UInt160>, my_index: i8, prev_hash: UInt256, next_consensus: UInt160) {
        self.context = ConsensusContext::new(block_index, validators, my_index, prev_hash, next_consensus);
        self.phase = Phase::Initial;
    }

    /// Builds and records this validator's own `PrepareRequest`, if it is
    /// the primary for the current view and hasn't already sent one.
    pub fn make_prepare_request(&mut self, timestamp: u64, nonce: u64, transaction_hashes: Vec<UInt256>) -> Option<ConsensusMessage> {
        if !self.context.is_primary() || self.phase != Phase::Initial {
            return None;
        }
        let request = PrepareRequest { timestamp, nonce, transaction_hashes };
        let hash = prepare_request_hash(&self.context.view_number, &request);
        self.context.prepare_request = Some(request.clone());
        self.context.record_preparation(self.context.primary_index(), hash);
        self.phase = Phase::RequestSent;
        info!(block_index = self.context.block_index, view = self.context.view_number, "broadcasting PrepareRequest as primary");
        Some(ConsensusMessage::PrepareRequest(request))
    }

    /// A backup's reaction to the primary's `PrepareRequest`.
    pub fn on_prepare_request(&mut self, sender: u8, view: u8, request: PrepareRequest) -> ConsensusResult<Option<ConsensusMessage>> {
        self.check_sender(sender, view)?;
        if sender != self.context.primary_index() {
            warn!(sender, expected = self.context.primary_index(), "PrepareRequest from non-primary validator, ignoring");
            return Ok(None);
        }
        if self.context.prepare_request.is_some() {
            return Err(ConsensusError::DuplicateMessage("PrepareRequest", sender));
        }
        let hash = prepare_request_hash(&view, &request);
        self.context.prepare_request = Some(request);
        self.context.record_preparation(sender, hash);
        self.phase = Phase::ResponseSent;
        Ok(Some(ConsensusMessage::PrepareResponse(PrepareResponse { preparation_hash: hash })))
    }

    /// Records a preparation (`PrepareRequest` or `PrepareResponse`);
    /// once `M` validators agree on the same hash, signs and broadcasts
    /// this validator's `Commit`.
    pub fn on_prepare_response(&mut self, sender: u8, view: u8, response: PrepareResponse) -> ConsensusResult<Option<ConsensusMessage>> {
        self.check_sender(sender, view)?;
        self.context.record_preparation(sender, response.preparation_hash);
        self.try_commit(response.preparation_hash)
    }

    fn try_commit(&mut self, preparation_hash: UInt256) -> ConsensusResult<Option<ConsensusMessage>> {
        if self.phase == Phase::CommitSent || !self.context.has_quorum_preparations(&preparation_hash) {
            return Ok(None);
        }
        let Some(request) = self.context.prepare_request.clone() else {
            return Ok(None);
        };
        let header = self.candidate_header(&request);
        let signature = ecdsa::sign(header.hash().as_bytes(), &self.private_key, Curve::Secp256r1)
            .map_err(|e| ConsensusError::RecoveryFailed { message: e.to_string() })?;
        let my_index = self.context.my_index.max(0) as u8;
        self.context.record_commit(my_index, Commit { signature: signature.clone() });
        self.phase = Phase::CommitSent;
        info!(block_index = self.context.block_index, view = self.context.view_number, "quorum preparation reached, broadcasting Commit");
        Ok(Some(ConsensusMessage::Commit(Commit { signature })))
    }

    /// Records a `Commit`; once `M` are collected, returns the finalized
    /// round for the caller to turn into a real block.
    pub fn on_commit(&mut self, sender: u8, view: u8, commit: Commit) -> ConsensusResult<Option<FinalizedRound>> {
        self.check_sender(sender, view)?;
        self.context.record_commit(sender, commit);
        if !self.context.has_quorum_commits() {
            return Ok(None);
        }
        let Some(request) = self.context.prepare_request.clone() else {
            return Err(ConsensusError::RecoveryFailed { message: "commit quorum reached without a recorded PrepareRequest".into() });
        };
        let header = self.candidate_header(&request);
        let signatures = self.context.commits().map(|(index, commit)| (*index, commit.signature.clone())).collect();
        info!(block_index = self.context.block_index, "commit quorum reached, finalizing block");
        Ok(Some(FinalizedRound { header, signatures }))
    }

    /// Timer expiry before `CommitSent` (spec.md §4.7): broadcast a
    /// request to move to the next view. Refused once committed, so a
    /// validator never abandons a block it has already agreed to.
    pub fn on_timer_expired(&mut self, timestamp: u64) -> Option<ConsensusMessage> {
        if self.phase == Phase::CommitSent {
            return None;
        }
        let target_view = self.context.view_number.wrapping_add(1);
        let my_index = self.context.my_index.max(0) as u8;
        self.context.record_change_view(my_index, ChangeView { new_view_number: target_view, timestamp, reason: ChangeViewReason::Timeout });
        debug!(target_view, "timer expired, requesting view change");
        Some(ConsensusMessage::ChangeView(ChangeView { new_view_number: target_view, timestamp, reason: ChangeViewReason::Timeout }))
    }

    /// Records a `ChangeView`; once `M` validators have requested the
    /// same target view, advances to it. Refused after `CommitSent`
    /// (spec.md §4.7 safety invariant).
    pub fn on_change_view(&mut self, sender: u8, view: u8, change_view: ChangeView) -> ConsensusResult<bool> {
        if self.phase == Phase::CommitSent {
            return Ok(false);
        }
        self.check_sender(sender, view)?;
        let target = change_view.new_view_number;
        self.context.record_change_view(sender, change_view);
        if self.context.has_quorum_change_views(target) {
            self.context.start_view(target);
            self.phase = Phase::Initial;
            info!(new_view = target, "view change quorum reached");
            return Ok(true);
        }
        Ok(false)
    }

    /// A peer asked to be brought up to speed on this view: reply with
    /// everything this validator has recorded, unless nothing has
    /// happened yet (spec.md §4.7 "reply with RecoveryMessage").
    pub fn on_recovery_request(&self, _sender: u8, _request: RecoveryRequest) -> Option<ConsensusMessage> {
        if self.context.prepare_request.is_none() && self.context.commit_count() == 0 {
            return None;
        }
        Some(ConsensusMessage::RecoveryMessage(Box::new(self.build_recovery_message())))
    }

    /// Replays a peer's recorded state into this context: its
    /// `PrepareRequest` (if this validator hasn't seen one) and every
    /// commit it collected, then re-checks for quorum.
    pub fn on_recovery_message(&mut self, recovery: RecoveryMessage) -> ConsensusResult<Option<FinalizedRound>> {
        if self.context.prepare_request.is_none() {
            if let Some((sender, request)) = recovery.prepare_request {
                let hash = prepare_request_hash(&self.context.view_number, &request);
                self.context.prepare_request = Some(request);
                self.context.record_preparation(sender, hash);
            }
        }
        for (index, commit) in recovery.commits {
            self.context.record_commit(index, commit);
        }
        if !self.context.has_quorum_commits() {
            return Ok(None);
        }
        let Some(request) = self.context.prepare_request.clone() else {
            return Err(ConsensusError::RecoveryFailed { message: "recovered commit quorum without a PrepareRequest".into() });
        };
        let header = self.candidate_header(&request);
        let signatures = self.context.commits().map(|(index, commit)| (*index, commit.signature.clone())).collect();
        self.phase = Phase::CommitSent;
        Ok(Some(FinalizedRound { header, signatures }))
    }

    /// Builds a `RecoveryMessage` summarizing everything recorded for
    /// the current view, for a validator that just sent `RecoveryRequest`.
    pub fn build_recovery_message(&self) -> RecoveryMessage {
        RecoveryMessage {
            change_views: Vec::new(),
            prepare_request: self.context.prepare_request.clone().map(|r| (self.context.primary_index(), r)),
            preparation_hashes: Vec::new(),
            commits: self.context.commits().map(|(index, commit)| (*index, commit.clone())).collect(),
        }
    }

    fn check_sender(&self, sender: u8, view: u8) -> ConsensusResult<()> {
        if sender as usize >= self.context.validator_count() {
            return Err(ConsensusError::InvalidValidatorIndex { index: sender as i64, count: self.context.validator_count() });
        }
        if view != self.context.view_number {
            return Err(ConsensusError::StaleView { message_view: view, current_view: self.context.view_number });
        }
        Ok(())
    }

    fn candidate_header(&self, request: &PrepareRequest) -> Header {
        Header {
            version: 0,
            prev_hash: self.context.prev_hash,
            merkle_root: merkle::compute_root(&request.transaction_hashes),
            timestamp: request.timestamp,
            nonce: request.nonce,
            index: self.context.block_index,
            primary_index: self.context.primary_index(),
            next_consensus: self.context.next_consensus,
            witness: Witness::new(Vec::new(), Vec::new()),
        }
    }
}

/// `Hash256` over the view number and the request's fields, the value
/// every `PrepareResponse` for this round must echo back.
fn prepare_request_hash(view_number: &u8, request: &PrepareRequest) -> UInt256 {
    let mut bytes = vec![*view_number];
    bytes.extend_from_slice(&request.timestamp.to_le_bytes());
    bytes.extend_from_slice(&request.nonce.to_le_bytes());
    for hash in &request.transaction_hashes {
        bytes.extend_from_slice(hash.as_bytes());
    }
    let digest = sha256(&sha256(&bytes));
    UInt256::from_bytes(&digest).expect("sha256 output is 32 bytes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validators(n: usize) -> Vec<UInt160> {
        (0..n).map(|i| UInt160::from_bytes(&[i as u8; 20]).unwrap()).collect()
    }

    fn engine(my_index: i8, validators_list: Vec<UInt160>) -> DbftEngine {
        let context = ConsensusContext::new(1, validators_list, my_index, UInt256::zero(), UInt160::zero());
        DbftEngine::new(context, vec![7u8; 32])
    }

    #[test]
    fn primary_broadcasts_a_prepare_request_and_self_prepares() {
        let validators_list = validators(4);
        let mut e = engine(1, validators_list); // block 1, n=4: primary = 1 mod 4 = 1
        let msg = e.make_prepare_request(100, 1, vec![]);
        assert!(msg.is_some());
        assert_eq!(e.phase, Phase::RequestSent);
    }

    #[test]
    fn non_primary_does_not_send_a_prepare_request() {
        let validators_list = validators(4);
        let mut e = engine(0, validators_list); // my_index=0, primary=1: not primary
        assert!(e.make_prepare_request(100, 1, vec![]).is_none());
        assert_eq!(e.phase, Phase::Initial);
    }

    #[test]
    fn backup_responds_to_the_expected_primary_and_rejects_others() {
        let validators_list = validators(4);
        let mut e = engine(0, validators_list);
        let request = PrepareRequest { timestamp: 1, nonce: 1, transaction_hashes: vec![] };
        let response = e.on_prepare_request(1, 0, request.clone()).unwrap();
        assert!(response.is_some());
        assert_eq!(e.phase, Phase::ResponseSent);

        let mut e2 = engine(0, validators(4));
        let response2 = e2.on_prepare_request(2, 0, request).unwrap();
        assert!(response2.is_none());
    }

    #[test]
    fn commit_quorum_finalizes_the_round() {
        let validators_list = validators(4);
        let mut e = engine(1, validators_list.clone());
        e.make_prepare_request(100, 1, vec![]).unwrap();

        let hash = prepare_request_hash(&0, e.context.prepare_request.as_ref().unwrap());
        let mut commit_msg = None;
        for sender in [0u8, 2, 3] {
            let out = e.on_prepare_response(sender, 0, PrepareResponse { preparation_hash: hash }).unwrap();
            if out.is_some() {
                commit_msg = out;
            }
        }
        assert!(commit_msg.is_some());
        assert_eq!(e.phase, Phase::CommitSent);

        let mut finalized = None;
        for sender in [0u8, 2, 3] {
            let out = e.on_commit(sender, 0, Commit { signature: vec![sender] }).unwrap();
            if out.is_some() {
                finalized = out;
            }
        }
        assert!(finalized.is_some());
        assert!(finalized.unwrap().signatures.len() >= e.context.quorum());
    }

    #[test]
    fn change_view_is_refused_after_commit_sent() {
        let validators_list = validators(4);
        let mut e = engine(1, validators_list);
        e.make_prepare_request(100, 1, vec![]).unwrap();
        let hash = prepare_request_hash(&0, e.context.prepare_request.as_ref().unwrap());
        for sender in [0u8, 2, 3] {
            e.on_prepare_response(sender, 0, PrepareResponse { preparation_hash: hash }).unwrap();
        }
        assert_eq!(e.phase, Phase::CommitSent);
        assert!(e.on_timer_expired(200).is_none());
        let advanced = e.on_change_view(0, 0, ChangeView { new_view_number: 1, timestamp: 200, reason: ChangeViewReason::Timeout }).unwrap();
        assert!(!advanced);
    }

    #[test]
    fn view_change_quorum_advances_the_view_and_resets_the_round() {
        let validators_list = validators(4);
        let mut e = engine(0, validators_list);
        e.make_prepare_request(100, 1, vec![]); // not primary at view 0, no-op
        let mut advanced = false;
        for sender in [0u8, 1, 2] {
            advanced = e
                .on_change_view(sender, 0, ChangeView { new_view_number: 1, timestamp: 50, reason: ChangeViewReason::Timeout })
                .unwrap();
        }
        assert!(advanced);
        assert_eq!(e.context.view_number, 1);
        assert_eq!(e.phase, Phase::Initial);
    }
}
