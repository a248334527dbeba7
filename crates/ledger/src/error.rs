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

//! Errors raised by the block/transaction data model and the persistence
//! and verification pipelines (spec.md §7).

use thiserror::Error;

/// Errors surfaced while building, persisting, or verifying ledger entries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Wire/storage decoding failed (spec.md §7 `FormatError`).
    #[error("format error: {0}")]
    Io(#[from] neo_io::IoError),

    /// A block failed one of its structural invariants (prev_hash,
    /// timestamp ordering, merkle root).
    #[error("invalid block: {message}")]
    InvalidBlock { message: String },

    /// A transaction failed structural validation (spec.md §4.5 step 1).
    #[error("invalid transaction: {message}")]
    InvalidTransaction { message: String },

    /// The application engine faulted while running native or script
    /// logic during block persistence.
    #[error("contract error: {0}")]
    Contract(#[from] neo_smart_contract::error::ContractError),

    /// The backing store failed to commit. Fatal per spec.md §7.
    #[error("store error: {0}")]
    Store(#[from] neo_persistence::StoreError),

    /// Block persistence was attempted out of sequence.
    #[error("expected block index {expected}, got {actual}")]
    OutOfOrder { expected: u32, actual: u32 },
}

/// Convenience alias for this crate's fallible operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
