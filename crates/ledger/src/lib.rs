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

//! Block and transaction data model, the transaction admission pipeline,
//! and the block persistence pipeline (spec.md §3, §4.5).

pub mod attribute;
pub mod block;
pub mod error;
pub mod genesis;
pub mod header;
pub mod persist;
pub mod signer;
pub mod transaction;
pub mod tx_scratch;
pub mod verification;
pub mod verify_result;
pub mod witness;

pub use attribute::Attribute;
pub use block::Block;
pub use error::{LedgerError, LedgerResult};
pub use genesis::{genesis_block, initialize_genesis_state};
pub use header::Header;
pub use persist::{persist_block, TransactionOutcome};
pub use signer::Signer;
pub use transaction::Transaction;
pub use tx_scratch::TxScratch;
pub use verification::{verify_transaction, VerificationContext, MAX_VERIFICATION_GAS};
pub use verify_result::VerifyResult;
pub use witness::Witness;
