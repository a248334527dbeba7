// Copyright (C) 2015-2026 The Neo Project.
//
// verification.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The transaction admission pipeline: structure, validity window,
//! conflicts, policy, fees, balance, and witnesses, in that order, each
//! step short-circuiting on the first failure (spec.md §4.5).

use crate::attribute::Attribute;
use crate::transaction::Transaction;
use crate::verify_result::VerifyResult;
use neo_config::ProtocolSettings;
use neo_io::Serializable;
use neo_persistence::Snapshot;
use neo_primitives::UInt256;
use neo_smart_contract::native::{fungible, GasToken, NativeContract, PolicyContract};
use neo_smart_contract::{ApplicationEngine, TriggerType};
use neo_vm::{CallFlags, ExecutionEngine, Script, VMState};
use num_bigint::BigInt;

/// Gas budget for running a single witness's scripts. The reference node
/// charges verification against the transaction's own `system_fee`; this
/// pipeline checks balance/fee adequacy up front (steps 5-6) and then caps
/// each witness's own execution at a fixed ceiling so a malicious
/// verification script can't stall admission.
pub const MAX_VERIFICATION_GAS: i64 = 20_000_000;

/// Looks up whatever the caller already knows about other transactions,
/// so this crate doesn't need to depend on the mempool for conflict and
/// duplicate checks.
pub trait VerificationContext {
    /// True if a transaction with this hash is already on the chain.
    fn is_on_chain(&self, hash: &UInt256) -> bool;
    /// True if a transaction with this hash is already pooled, pending
    /// inclusion in a block.
    fn is_pooled(&self, hash: &UInt256) -> bool;
}

/// Runs every admission step against `tx`. `snapshot` supplies storage for
/// the native-contract reads steps 4-6 need (policy, balances); it is never
/// mutated.
pub fn verify_transaction(
    snapshot: &mut dyn Snapshot,
    tx: &Transaction,
    protocol: &ProtocolSettings,
    current_height: u32,
    block_time: u64,
    context: &dyn VerificationContext,
) -> VerifyResult {
    if context.is_on_chain(&tx.hash()) {
        return VerifyResult::AlreadyExists;
    }
    if context.is_pooled(&tx.hash()) {
        return VerifyResult::AlreadyInPool;
    }
    if let Err(result) = verify_structure(tx) {
        return result;
    }
    if let Err(result) = verify_validity_window(tx, current_height, protocol) {
        return result;
    }
    if let Err(result) = verify_conflicts(tx, context) {
        return result;
    }

    let policy_engine = read_only_engine(snapshot, tx, current_height, block_time);
    if let Err(result) = verify_policy(tx, &policy_engine) {
        return result;
    }
    if let Err(result) = verify_fees(tx, &policy_engine) {
        return result;
    }
    if let Err(result) = verify_balance(tx, &policy_engine) {
        return result;
    }
    drop(policy_engine);

    verify_witnesses(snapshot, tx, protocol, current_height, block_time)
}

fn verify_structure(tx: &Transaction) -> Result<(), VerifyResult> {
    match tx.verify_structure() {
        Ok(()) => Ok(()),
        Err(_) if tx.size() > crate::transaction::MAX_TRANSACTION_SIZE => Err(VerifyResult::OverSize),
        Err(_) => Err(VerifyResult::Invalid),
    }
}

fn verify_validity_window(tx: &Transaction, current_height: u32, protocol: &ProtocolSettings) -> Result<(), VerifyResult> {
    if tx.valid_until_block <= current_height {
        return Err(VerifyResult::Expired);
    }
    let max_valid_until = current_height.saturating_add(protocol.max_valid_until_block_increment);
    if tx.valid_until_block > max_valid_until {
        return Err(VerifyResult::InvalidAttribute);
    }
    for attribute in &tx.attributes {
        if let Attribute::NotValidBefore { height } = attribute {
            if current_height < *height {
                return Err(VerifyResult::UnableToVerify);
            }
        }
    }
    Ok(())
}

fn verify_conflicts(tx: &Transaction, context: &dyn VerificationContext) -> Result<(), VerifyResult> {
    for attribute in &tx.attributes {
        if let Attribute::Conflicts { hash } = attribute {
            if context.is_on_chain(hash) {
                return Err(VerifyResult::HasConflicts);
            }
        }
    }
    Ok(())
}

fn verify_policy(tx: &Transaction, engine: &ApplicationEngine) -> Result<(), VerifyResult> {
    let policy = PolicyContract::new();
    for signer in &tx.signers {
        if policy.is_blocked(engine, &signer.account) {
            return Err(VerifyResult::PolicyFail);
        }
    }
    Ok(())
}

/// `network_fee` must cover the byte-size fee plus each witness's
/// verification-script execution cost plus each attribute's surcharge
/// (spec.md §4.5 step 5). The execution cost is estimated from script
/// length rather than actually run here, so a witness whose script hash
/// doesn't match its signer is never executed before `verify_witnesses`
/// rejects it.
fn verify_fees(tx: &Transaction, engine: &ApplicationEngine) -> Result<(), VerifyResult> {
    let policy = PolicyContract::new();
    let mut required = tx.size() as i64 * policy.fee_per_byte(engine);

    let exec_fee_factor = policy.exec_fee_factor(engine);
    for witness in &tx.witnesses {
        let script_len = (witness.invocation_script.len() + witness.verification_script.len()) as i64;
        required = required.saturating_add(script_len.saturating_mul(exec_fee_factor));
    }

    for attribute in &tx.attributes {
        required = required.saturating_add(policy.attribute_fee(engine, attribute.type_byte()));
    }

    if tx.network_fee < required {
        return Err(VerifyResult::PolicyFail);
    }
    Ok(())
}

fn verify_balance(tx: &Transaction, engine: &ApplicationEngine) -> Result<(), VerifyResult> {
    let Some(sender) = tx.sender() else {
        return Err(VerifyResult::Invalid);
    };
    let gas = GasToken::new();
    let balance = fungible::balance_of(engine, gas.id(), &sender);
    let required = BigInt::from(tx.system_fee) + BigInt::from(tx.network_fee);
    if balance < required {
        return Err(VerifyResult::InsufficientFunds);
    }
    Ok(())
}

fn verify_witnesses(
    snapshot: &mut dyn Snapshot,
    tx: &Transaction,
    protocol: &ProtocolSettings,
    current_height: u32,
    block_time: u64,
) -> VerifyResult {
    if tx.witnesses.len() != tx.signers.len() {
        return VerifyResult::InvalidWitness;
    }
    for (signer, witness) in tx.signers.iter().zip(&tx.witnesses) {
        if witness.script_hash() != signer.account {
            return VerifyResult::InvalidWitness;
        }
        let mut script_bytes = witness.invocation_script.clone();
        script_bytes.extend_from_slice(&witness.verification_script);

        let container_signers = tx.signers.iter().map(|s| s.to_container_signer()).collect();
        let mut app_engine = ApplicationEngine::new(
            TriggerType::VERIFICATION,
            snapshot,
            signer.account,
            Some(tx.hash()),
            container_signers,
            current_height,
            block_time,
            MAX_VERIFICATION_GAS,
        )
        .with_network_magic(protocol.network.magic());

        let mut execution = ExecutionEngine::new(MAX_VERIFICATION_GAS);
        execution.load_script(Script::new(script_bytes), CallFlags::READ_ONLY);
        let state = execution.execute(&mut app_engine);
        if state != VMState::HALT {
            return VerifyResult::InvalidWitness;
        }
        match execution.result_stack().last() {
            Some(item) if item.as_bool() => {}
            _ => return VerifyResult::InvalidWitness,
        }
    }
    VerifyResult::Succeed
}

fn read_only_engine<'a>(
    snapshot: &'a mut dyn Snapshot,
    tx: &Transaction,
    current_height: u32,
    block_time: u64,
) -> ApplicationEngine<'a> {
    let container_signers = tx.signers.iter().map(|s| s.to_container_signer()).collect();
    ApplicationEngine::new(
        TriggerType::VERIFICATION,
        snapshot,
        tx.sender().expect("verify_structure already checked at least one signer"),
        Some(tx.hash()),
        container_signers,
        current_height,
        block_time,
        MAX_VERIFICATION_GAS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Signer;
    use crate::witness::Witness;
    use neo_persistence::{MemoryStore, Store};
    use neo_primitives::UInt160;

    struct NoHistory;
    impl VerificationContext for NoHistory {
        fn is_on_chain(&self, _hash: &UInt256) -> bool {
            false
        }
        fn is_pooled(&self, _hash: &UInt256) -> bool {
            false
        }
    }

    struct AlreadySeen(UInt256);
    impl VerificationContext for AlreadySeen {
        fn is_on_chain(&self, hash: &UInt256) -> bool {
            *hash == self.0
        }
        fn is_pooled(&self, _hash: &UInt256) -> bool {
            false
        }
    }

    fn fund(snapshot: &mut dyn Snapshot, account: UInt160, amount: i64) {
        let mut engine =
            ApplicationEngine::new(TriggerType::APPLICATION, snapshot, account, None, vec![], 0, 0, i64::MAX);
        GasToken::new().mint(&mut engine, &account, &BigInt::from(amount)).unwrap();
    }

    fn sample_tx() -> Transaction {
        Transaction {
            version: 0,
            nonce: 1,
            system_fee: 0,
            network_fee: 1_000_000,
            valid_until_block: 100,
            signers: vec![Signer::called_by_entry(UInt160::from_bytes(&[1u8; 20]).unwrap())],
            attributes: vec![],
            script: vec![0x40],
            witnesses: vec![Witness::new(vec![], vec![0x51])],
        }
    }

    #[test]
    fn already_on_chain_short_circuits_before_any_state_reads() {
        let tx = sample_tx();
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();
        let result = verify_transaction(snapshot.as_mut(), &tx, &protocol, 1, 0, &AlreadySeen(tx.hash()));
        assert_eq!(result, VerifyResult::AlreadyExists);
    }

    #[test]
    fn expired_transaction_is_rejected_before_touching_storage() {
        let tx = sample_tx();
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();
        let result = verify_transaction(snapshot.as_mut(), &tx, &protocol, 200, 0, &NoHistory);
        assert_eq!(result, VerifyResult::Expired);
    }

    #[test]
    fn valid_until_far_beyond_the_configured_window_is_rejected() {
        let mut tx = sample_tx();
        tx.valid_until_block = 10_000_000;
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();
        let result = verify_transaction(snapshot.as_mut(), &tx, &protocol, 1, 0, &NoHistory);
        assert_eq!(result, VerifyResult::InvalidAttribute);
    }

    #[test]
    fn mismatched_witness_script_hash_is_rejected_without_executing_it() {
        let mut tx = sample_tx();
        tx.witnesses[0] = Witness::new(vec![], vec![0x52]);
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        fund(snapshot.as_mut(), tx.sender().unwrap(), 1_000_000_000);
        let protocol = ProtocolSettings::default();
        let result = verify_transaction(snapshot.as_mut(), &tx, &protocol, 1, 0, &NoHistory);
        assert_eq!(result, VerifyResult::InvalidWitness);
    }

    #[test]
    fn insufficient_gas_balance_is_rejected_before_witness_execution() {
        let tx = sample_tx();
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();
        let result = verify_transaction(snapshot.as_mut(), &tx, &protocol, 1, 0, &NoHistory);
        assert_eq!(result, VerifyResult::InsufficientFunds);
    }

    #[test]
    fn conflicts_attribute_naming_an_on_chain_hash_is_rejected() {
        let mut tx = sample_tx();
        let conflicting = UInt256::from_bytes(&[9u8; 32]).unwrap();
        tx.attributes.push(Attribute::Conflicts { hash: conflicting });
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let protocol = ProtocolSettings::default();
        let result = verify_transaction(snapshot.as_mut(), &tx, &protocol, 1, 0, &AlreadySeen(conflicting));
        assert_eq!(result, VerifyResult::HasConflicts);
    }
}
