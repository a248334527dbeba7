// Copyright (C) 2015-2026 The Neo Project.
//
// messages.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The six dBFT message shapes (spec.md §4.7) and the envelope every one
//! of them travels in, signed by the sending validator's key.

use neo_primitives::UInt256;

/// Why a validator is asking to move to a later view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeViewReason {
    Timeout,
    ChangeAgreement,
    TxNotFound,
    TxRejectedByPolicy,
    TxInvalid,
    BlockRejectedByPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeView {
    pub new_view_number: u8,
    pub timestamp: u64,
    pub reason: ChangeViewReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareRequest {
    pub timestamp: u64,
    pub nonce: u64,
    pub transaction_hashes: Vec<UInt256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareResponse {
    /// Hash of the `PrepareRequest` this responds to.
    pub preparation_hash: UInt256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Signature over the final block header's hash.
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryRequest {
    pub timestamp: u64,
}

/// Enough of the sender's own view of the round for the recipient to
/// reconstruct its context: every change-view and preparation it has
/// recorded, the primary's request if seen, and every commit collected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecoveryMessage {
    pub change_views: Vec<(u8, ChangeView)>,
    pub prepare_request: Option<(u8, PrepareRequest)>,
    pub preparation_hashes: Vec<(u8, UInt256)>,
    pub commits: Vec<(u8, Commit)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusMessage {
    ChangeView(ChangeView),
    PrepareRequest(PrepareRequest),
    PrepareResponse(PrepareResponse),
    Commit(Commit),
    RecoveryRequest(RecoveryRequest),
    RecoveryMessage(Box<RecoveryMessage>),
}

impl ConsensusMessage {
    pub fn label(&self) -> &'static str {
        match self {
            ConsensusMessage::ChangeView(_) => "ChangeView",
            ConsensusMessage::PrepareRequest(_) => "PrepareRequest",
            ConsensusMessage::PrepareResponse(_) => "PrepareResponse",
            ConsensusMessage::Commit(_) => "Commit",
            ConsensusMessage::RecoveryRequest(_) => "RecoveryRequest",
            ConsensusMessage::RecoveryMessage(_) => "RecoveryMessage",
        }
    }
}

/// The wire envelope every consensus message travels in (spec.md §4.7:
/// "all wrapped in an ExtensiblePayload signed by the sender validator
/// key"). `neo-consensus` models only the consensus-specific payload;
/// `neo-network` is responsible for the outer `ExtensiblePayload` framing
/// and its own witness check before handing the payload here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusPayload {
    pub validator_index: u8,
    pub block_index: u32,
    pub view_number: u8,
    pub message: ConsensusMessage,
}
