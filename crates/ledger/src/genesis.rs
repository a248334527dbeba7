// Copyright (C) 2015-2026 The Neo Project.
//
// genesis.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The genesis block and the one-time native-contract state it seeds:
//! the initial committee and the full NEO supply minted to its first
//! member (spec.md §4.4, §4.5).

use crate::block::Block;
use crate::error::LedgerResult;
use crate::header::Header;
use crate::witness::Witness;
use neo_persistence::Snapshot;
use neo_primitives::{merkle, UInt160, UInt256};
use neo_smart_contract::native::NeoToken;
use neo_smart_contract::{ApplicationEngine, TriggerType};

/// The genesis block carries no transactions; every other block's
/// `prev_hash` chain bottoms out at this one with index 0.
pub fn genesis_block(timestamp: u64, next_consensus: UInt160) -> Block {
    let header = Header {
        version: 0,
        prev_hash: UInt256::zero(),
        merkle_root: merkle::compute_root(&[]),
        timestamp,
        nonce: 0,
        index: 0,
        primary_index: 0,
        next_consensus,
        witness: Witness::new(Vec::new(), vec![neo_vm::OpCode::Push1 as u8]),
    };
    Block { header, transactions: Vec::new() }
}

/// Seeds `snapshot` with the initial committee and mints the full NEO
/// supply to its first member. Must run exactly once, before the genesis
/// block itself is recorded via [`crate::persist::persist_block`].
pub fn initialize_genesis_state(snapshot: &mut dyn Snapshot, committee: &[UInt160]) -> LedgerResult<()> {
    let mut engine = ApplicationEngine::new(
        TriggerType::APPLICATION,
        snapshot,
        UInt160::zero(),
        None,
        Vec::new(),
        0,
        0,
        i64::MAX,
    );
    NeoToken::new().initialize_genesis(&mut engine, committee)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::persist_block;
    use neo_persistence::{MemoryStore, Store};
    use neo_smart_contract::native::{fungible, GasToken, LedgerContract, NativeContract};
    use num_bigint::BigInt;

    #[test]
    fn genesis_block_has_no_transactions_and_index_zero() {
        let block = genesis_block(1_468_595_301, UInt160::zero());
        assert!(block.transactions.is_empty());
        assert_eq!(block.index(), 0);
        assert_eq!(block.header.prev_hash, UInt256::zero());
    }

    #[test]
    fn initialize_genesis_state_mints_total_supply_to_first_member() {
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let committee = vec![UInt160::from_bytes(&[1u8; 20]).unwrap(), UInt160::from_bytes(&[2u8; 20]).unwrap()];
        initialize_genesis_state(snapshot.as_mut(), &committee).unwrap();

        let engine = ApplicationEngine::new(TriggerType::APPLICATION, snapshot.as_mut(), UInt160::zero(), None, vec![], 0, 0, 0);
        let neo = NeoToken::new();
        assert_eq!(fungible::balance_of(&engine, neo.id(), &committee[0]), BigInt::from(100_000_000));
        assert_eq!(neo.committee(&engine), committee);
    }

    #[test]
    fn genesis_block_persists_cleanly_after_state_initialization() {
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let committee = vec![UInt160::from_bytes(&[3u8; 20]).unwrap()];
        initialize_genesis_state(snapshot.as_mut(), &committee).unwrap();

        let block = genesis_block(1_468_595_301, committee[0]);
        persist_block(snapshot.as_mut(), &block, 0).unwrap();

        let engine = ApplicationEngine::new(TriggerType::APPLICATION, snapshot.as_mut(), UInt160::zero(), None, vec![], 0, 0, 0);
        assert_eq!(LedgerContract::new().current_hash(&engine), block.hash());
        let _ = GasToken::new();
    }
}
