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

//! `MempoolError`: failures the pool itself raises, distinct from
//! [`neo_ledger::VerifyResult`], which reports why a transaction was
//! rejected rather than a failure of the pool's own bookkeeping.

use neo_ledger::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum MempoolError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

pub type MempoolResult<T> = Result<T, MempoolError>;
