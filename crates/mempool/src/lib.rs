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

//! The two-pool transaction mempool (spec.md §4.6): admission, eviction,
//! and block-persistence reconciliation on top of `neo-ledger`'s
//! transaction verification pipeline.

pub mod error;
pub mod events;
pub mod pool;
pub mod priority;
pub mod verification_context;

pub use error::{MempoolError, MempoolResult};
pub use events::{MempoolEvent, MempoolObserver, NullObserver, RemovalReason};
pub use pool::{Mempool, MempoolConfig};
pub use verification_context::TransactionVerificationContext;
