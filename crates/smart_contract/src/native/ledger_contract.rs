// Copyright (C) 2015-2026 The Neo Project.
//
// ledger_contract.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `LedgerContract`: scripts' read-only view of persisted blocks and
//! transactions (spec.md §4.4).
//!
//! This contract never imports `neo-ledger`'s `Block`/`Transaction` types:
//! `neo-ledger` depends on `neo-smart-contract` (its verification pipeline
//! drives the application engine), so the reverse import would be
//! circular. Instead, `neo-ledger`'s block-persistence code writes the
//! serialized block/transaction bytes into this contract's storage space
//! directly (using the same prefixes this module reads), and scripts get
//! back the raw bytes — deserializing them into `neo-ledger` types is the
//! caller's job, same as the reference node's interop layer returning
//! opaque `Block`/`Transaction` interop handles rather than VM-native values.

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::native::native_contract::{arg, NativeContract};
use neo_primitives::{UInt160, UInt256};
use neo_vm::StackItem;

const ID: i32 = -4;
const PREFIX_BLOCK: u8 = 9;
const PREFIX_TRANSACTION: u8 = 11;
const PREFIX_CURRENT_BLOCK: u8 = 12;

fn block_key(hash: &UInt256) -> Vec<u8> {
    let mut key = vec![PREFIX_BLOCK];
    key.extend_from_slice(hash.as_bytes());
    key
}

fn transaction_key(hash: &UInt256) -> Vec<u8> {
    let mut key = vec![PREFIX_TRANSACTION];
    key.extend_from_slice(hash.as_bytes());
    key
}

fn hash_arg(args: &[StackItem], index: usize, contract: &'static str, method: &str) -> ContractResult<UInt256> {
    let bytes = arg(args, index, contract, method)?.as_bytes()?;
    UInt256::from_bytes(&bytes).map_err(|_| ContractError::InvalidArguments {
        contract: contract.to_string(),
        method: method.to_string(),
        message: format!("argument {index} is not a 32-byte hash"),
    })
}

/// Read-only access to persisted blocks and transactions.
pub struct LedgerContract;

impl LedgerContract {
    pub fn new() -> Self {
        Self
    }

    /// Current best block hash, `UInt256::zero()` before genesis persists.
    pub fn current_hash(&self, engine: &ApplicationEngine) -> UInt256 {
        engine
            .get_storage(ID, &[PREFIX_CURRENT_BLOCK])
            .and_then(|bytes| bytes.get(0..32).and_then(|b| UInt256::from_bytes(b).ok()))
            .unwrap_or_else(UInt256::zero)
    }

    /// Current best block index, `0` before genesis persists (genesis
    /// itself is index 0, so callers distinguish "no blocks yet" via
    /// [`LedgerContract::current_hash`] being zero).
    pub fn current_index(&self, engine: &ApplicationEngine) -> u32 {
        engine
            .get_storage(ID, &[PREFIX_CURRENT_BLOCK])
            .and_then(|bytes| bytes.get(32..36).map(|b| u32::from_le_bytes(b.try_into().unwrap())))
            .unwrap_or(0)
    }

    /// Records `hash`/`index` as the new best block. Called by `neo-ledger`'s
    /// persistence pipeline via a direct `NativeContract::invoke` dispatch
    /// is avoided in favor of this typed accessor, since block persistence
    /// runs outside any script's `CALL`.
    pub fn set_current_block(&self, engine: &mut ApplicationEngine, hash: UInt256, index: u32) -> ContractResult<()> {
        let mut bytes = hash.as_bytes().to_vec();
        bytes.extend_from_slice(&index.to_le_bytes());
        engine.put_storage(ID, vec![PREFIX_CURRENT_BLOCK], bytes)
    }

    /// Persists a block's serialized bytes under its hash.
    pub fn put_block(&self, engine: &mut ApplicationEngine, hash: UInt256, bytes: Vec<u8>) -> ContractResult<()> {
        engine.put_storage(ID, block_key(&hash), bytes)
    }

    /// Persists a transaction's serialized bytes under its hash.
    pub fn put_transaction(&self, engine: &mut ApplicationEngine, hash: UInt256, bytes: Vec<u8>) -> ContractResult<()> {
        engine.put_storage(ID, transaction_key(&hash), bytes)
    }

    pub fn contains_block(&self, engine: &ApplicationEngine, hash: &UInt256) -> bool {
        engine.get_storage(ID, &block_key(hash)).is_some()
    }

    pub fn contains_transaction(&self, engine: &ApplicationEngine, hash: &UInt256) -> bool {
        engine.get_storage(ID, &transaction_key(hash)).is_some()
    }
}

impl Default for LedgerContract {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for LedgerContract {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "LedgerContract"
    }

    fn invoke(&self, engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "currentHash" => Ok(StackItem::byte_string(self.current_hash(engine).as_bytes().to_vec())),
            "currentIndex" => Ok(StackItem::Integer((self.current_index(engine) as i64).into())),
            "getBlock" => {
                let hash = hash_arg(&args, 0, self.name(), method)?;
                Ok(engine.get_storage(ID, &block_key(&hash)).map(StackItem::byte_string).unwrap_or(StackItem::Null))
            }
            "getTransaction" => {
                let hash = hash_arg(&args, 0, self.name(), method)?;
                Ok(engine.get_storage(ID, &transaction_key(&hash)).map(StackItem::byte_string).unwrap_or(StackItem::Null))
            }
            "containsBlock" => {
                let hash = hash_arg(&args, 0, self.name(), method)?;
                Ok(StackItem::Boolean(self.contains_block(engine, &hash)))
            }
            "containsTransaction" => {
                let hash = hash_arg(&args, 0, self.name(), method)?;
                Ok(StackItem::Boolean(self.contains_transaction(engine, &hash)))
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_persistence::{MemoryStore, Store};

    #[test]
    fn unknown_block_is_not_contained() {
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let engine = ApplicationEngine::new(
            crate::trigger::TriggerType::APPLICATION,
            snapshot.as_mut(),
            UInt160::zero(),
            None,
            vec![],
            0,
            0,
            0,
        );
        let ledger = LedgerContract::new();
        assert!(!ledger.contains_block(&engine, &UInt256::zero()));
        assert_eq!(ledger.current_index(&engine), 0);
    }
}
