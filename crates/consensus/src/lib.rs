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

//! dBFT consensus: per-view message quorum tracking and the state
//! machine that turns quorum into a finalized block header
//! (spec.md §4.7).

mod context;
mod engine;
mod error;
mod messages;

pub use context::ConsensusContext;
pub use engine::{DbftEngine, FinalizedRound, Phase};
pub use error::{ConsensusError, ConsensusResult};
pub use messages::{
    ChangeView, ChangeViewReason, Commit, ConsensusMessage, ConsensusPayload, PrepareRequest,
    PrepareResponse, RecoveryMessage, RecoveryRequest,
};
