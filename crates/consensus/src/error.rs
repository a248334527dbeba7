// Copyright (C) 2015-2026 The Neo Project.
//
// error.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    #[error("validator index {index} is out of range for {count} validators")]
    InvalidValidatorIndex { index: i64, count: usize },
    #[error("message for view {message_view} arrived while at view {current_view}")]
    StaleView { message_view: u8, current_view: u8 },
    #[error("message claims block index {message_index}, engine is at {current_index}")]
    WrongBlockIndex { message_index: u32, current_index: u32 },
    #[error("{0} arrived from validator {1} more than once for this view")]
    DuplicateMessage(&'static str, u8),
    #[error("signature verification failed for validator {0}")]
    InvalidSignature(u8),
    #[error("recovery message could not reconstruct a consistent context: {message}")]
    RecoveryFailed { message: String },
}

pub type ConsensusResult<T> = Result<T, ConsensusError>;
