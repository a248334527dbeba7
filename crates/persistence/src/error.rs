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

//! Store errors. Per spec.md §4.1/§7, a commit I/O failure is fatal: the
//! node halts rather than risk producing a forked state, so callers of
//! [`StoreError::Io`] are expected to abort, not retry.

use thiserror::Error;

/// Errors raised by the store/snapshot abstraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The underlying backend failed to durably commit a write batch. Fatal.
    #[error("storage I/O failure during commit: {message}")]
    Io {
        /// Backend-supplied description.
        message: String,
    },

    /// A caller asked to discard a snapshot that had already been committed.
    #[error("snapshot already finalized")]
    AlreadyFinalized,
}
