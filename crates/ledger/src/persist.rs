// Copyright (C) 2015-2026 The Neo Project.
//
// persist.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The block persistence pipeline: `OnPersist` native hooks, each
//! transaction's fee burn and script execution, collected-fee payout, and
//! `PostPersist` native hooks (spec.md §4.5).

use crate::block::Block;
use crate::error::{LedgerError, LedgerResult};
use crate::tx_scratch::TxScratch;
use neo_io::SerializableExt;
use neo_persistence::Snapshot;
use neo_primitives::{UInt160, UInt256};
use neo_smart_contract::native::{fungible, GasToken, LedgerContract, NativeContract};
use neo_smart_contract::{ApplicationEngine, TriggerType};
use neo_vm::{CallFlags, ExecutionEngine, Script, VMState};
use num_bigint::BigInt;

/// How one transaction's execution resolved during persistence. The
/// transaction is recorded on the ledger either way; only a `Halt` keeps
/// its state mutations (spec.md §7 `VMFault`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub hash: UInt256,
    pub vm_state: VMState,
    pub gas_consumed: i64,
}

/// Applies `block` to `snapshot`: runs `OnPersist` hooks, executes and
/// records every transaction, pays out their collected network fees to
/// the block's next-consensus account, runs `PostPersist` hooks, and
/// finally records the block as current. The caller is expected to have
/// already run [`crate::block::Block::verify_against_parent`]. `network_magic`
/// is mixed into any `System.Crypto.CheckSig`/`CheckMultisig` a transaction
/// script runs directly (spec.md §4.3).
pub fn persist_block(snapshot: &mut dyn Snapshot, block: &Block, network_magic: u32) -> LedgerResult<Vec<TransactionOutcome>> {
    let index = block.index();
    let time = block.header.timestamp;
    let ledger = LedgerContract::new();
    let gas = GasToken::new();

    run_system_hooks(snapshot, index, time, TriggerType::ON_PERSIST)?;

    let mut outcomes = Vec::with_capacity(block.transactions.len());
    let mut collected_network_fee: i64 = 0;

    for tx in &block.transactions {
        let sender = tx.sender().ok_or_else(|| LedgerError::InvalidTransaction {
            message: "transaction has no signers".into(),
        })?;
        collected_network_fee += tx.network_fee;

        {
            let mut fee_engine =
                ApplicationEngine::new(TriggerType::APPLICATION, snapshot, sender, Some(tx.hash()), vec![], index, time, i64::MAX);
            let spent = BigInt::from(tx.system_fee) + BigInt::from(tx.network_fee);
            fungible::burn(&mut fee_engine, gas.id(), gas.hash(), &sender, &spent)?;
        }

        let (vm_state, gas_consumed) = run_transaction(snapshot, tx, index, time, network_magic)?;

        {
            let mut record_engine =
                ApplicationEngine::new(TriggerType::APPLICATION, snapshot, sender, Some(tx.hash()), vec![], index, time, i64::MAX);
            ledger.put_transaction(&mut record_engine, tx.hash(), tx.to_array())?;
        }

        outcomes.push(TransactionOutcome { hash: tx.hash(), vm_state, gas_consumed });
    }

    if collected_network_fee > 0 {
        let mut payout_engine = ApplicationEngine::new(
            TriggerType::APPLICATION,
            snapshot,
            block.header.next_consensus,
            None,
            vec![],
            index,
            time,
            i64::MAX,
        );
        gas.mint(&mut payout_engine, &block.header.next_consensus, &BigInt::from(collected_network_fee))?;
    }

    run_system_hooks(snapshot, index, time, TriggerType::POST_PERSIST)?;

    let mut record_engine =
        ApplicationEngine::new(TriggerType::APPLICATION, snapshot, UInt160::zero(), None, vec![], index, time, i64::MAX);
    ledger.put_block(&mut record_engine, block.hash(), block.to_array())?;
    ledger.set_current_block(&mut record_engine, block.hash(), index)?;

    Ok(outcomes)
}

fn run_system_hooks(snapshot: &mut dyn Snapshot, index: u32, time: u64, trigger: TriggerType) -> LedgerResult<()> {
    let mut engine = ApplicationEngine::new(trigger, snapshot, UInt160::zero(), None, vec![], index, time, i64::MAX);
    engine.run_system_hooks()?;
    Ok(())
}

/// Runs `tx.script` against a [`TxScratch`] layered on `snapshot`, so a
/// faulted transaction's writes never reach the block-wide snapshot while
/// the block as a whole still commits the transactions before it.
fn run_transaction(
    snapshot: &mut dyn Snapshot,
    tx: &crate::transaction::Transaction,
    index: u32,
    time: u64,
    network_magic: u32,
) -> LedgerResult<(VMState, i64)> {
    let container_signers = tx.signers.iter().map(|s| s.to_container_signer()).collect();
    let entry = tx.signers.first().map(|s| s.account).unwrap_or_else(UInt160::zero);
    let mut scratch = TxScratch::new(snapshot);
    let state;
    let gas_consumed;
    {
        let mut engine = ApplicationEngine::new(
            TriggerType::APPLICATION,
            &mut scratch,
            entry,
            Some(tx.hash()),
            container_signers,
            index,
            time,
            tx.system_fee,
        )
        .with_network_magic(network_magic);
        let mut execution = ExecutionEngine::new(tx.system_fee);
        execution.load_script(Script::new(tx.script.clone()), CallFlags::ALL);
        state = execution.execute(&mut engine);
        gas_consumed = execution.gas_consumed();
    }
    if state == VMState::HALT {
        Box::new(scratch).commit()?;
    } else {
        Box::new(scratch).discard();
    }
    Ok((state, gas_consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;
    use crate::signer::Signer;
    use crate::witness::Witness;
    use neo_persistence::{MemoryStore, Store};
    use neo_primitives::merkle;

    fn funded_tx(sender: UInt160) -> crate::transaction::Transaction {
        crate::transaction::Transaction {
            version: 0,
            nonce: 1,
            system_fee: 1_000_000,
            network_fee: 500_000,
            valid_until_block: 1000,
            signers: vec![Signer::called_by_entry(sender)],
            attributes: vec![],
            script: vec![0x40], // RET
            witnesses: vec![Witness::new(vec![], vec![0x51])],
        }
    }

    fn block_with(transactions: Vec<crate::transaction::Transaction>) -> Block {
        let merkle_root = merkle::compute_root(&transactions.iter().map(crate::transaction::Transaction::hash).collect::<Vec<_>>());
        Block {
            header: Header {
                version: 0,
                prev_hash: UInt256::zero(),
                merkle_root,
                timestamp: 1,
                nonce: 0,
                index: 0,
                primary_index: 0,
                next_consensus: UInt160::from_bytes(&[7u8; 20]).unwrap(),
                witness: Witness::new(vec![], vec![0x51]),
            },
            transactions,
        }
    }

    fn fund(snapshot: &mut dyn Snapshot, account: UInt160, amount: i64) {
        let mut engine = ApplicationEngine::new(TriggerType::APPLICATION, snapshot, account, None, vec![], 0, 0, i64::MAX);
        GasToken::new().mint(&mut engine, &account, &BigInt::from(amount)).unwrap();
    }

    #[test]
    fn halted_transaction_is_recorded_and_keeps_its_writes() {
        let sender = UInt160::from_bytes(&[1u8; 20]).unwrap();
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        fund(snapshot.as_mut(), sender, 10_000_000);

        let tx = funded_tx(sender);
        let tx_hash = tx.hash();
        let block = block_with(vec![tx]);

        let outcomes = persist_block(snapshot.as_mut(), &block, 0).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].hash, tx_hash);
        assert_eq!(outcomes[0].vm_state, VMState::HALT);

        let engine = ApplicationEngine::new(TriggerType::APPLICATION, snapshot.as_mut(), UInt160::zero(), None, vec![], 0, 0, 0);
        assert!(LedgerContract::new().contains_transaction(&engine, &tx_hash));
    }

    #[test]
    fn collected_network_fees_are_paid_to_next_consensus() {
        let sender = UInt160::from_bytes(&[2u8; 20]).unwrap();
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        fund(snapshot.as_mut(), sender, 10_000_000);

        let tx = funded_tx(sender);
        let block = block_with(vec![tx]);
        persist_block(snapshot.as_mut(), &block, 0).unwrap();

        let engine = ApplicationEngine::new(TriggerType::APPLICATION, snapshot.as_mut(), UInt160::zero(), None, vec![], 0, 0, 0);
        let gas = GasToken::new();
        let balance = fungible::balance_of(&engine, gas.id(), &block.header.next_consensus);
        assert_eq!(balance, BigInt::from(500_000));
    }

    #[test]
    fn block_becomes_current_after_persisting() {
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let block = block_with(vec![]);
        persist_block(snapshot.as_mut(), &block, 0).unwrap();

        let engine = ApplicationEngine::new(TriggerType::APPLICATION, snapshot.as_mut(), UInt160::zero(), None, vec![], 0, 0, 0);
        let ledger = LedgerContract::new();
        assert_eq!(ledger.current_hash(&engine), block.hash());
        assert_eq!(ledger.current_index(&engine), 0);
    }
}
