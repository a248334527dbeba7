// Copyright (C) 2015-2026 The Neo Project.
//
// fungible.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Shared NEP-17-style balance/transfer bookkeeping reused by `NeoToken`
//! and `GasToken` (spec.md §4.4). Mirrors the reference node's abstract
//! fungible-token base class, but as a set of free functions rather than a
//! generic trait, since the two token contracts' account states differ
//! only in `NeoToken`'s extra vote tracking, handled by its own module.

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::native::native_contract::arg;
use neo_primitives::UInt160;
use neo_vm::StackItem;
use num_bigint::BigInt;
use num_traits::Zero;

/// Storage prefix for a token's total-supply counter.
pub const PREFIX_TOTAL_SUPPLY: u8 = 11;
/// Storage prefix for a per-account balance entry.
pub const PREFIX_ACCOUNT: u8 = 20;

/// Builds the storage key for `account`'s balance entry.
pub fn account_key(account: &UInt160) -> Vec<u8> {
    let mut key = vec![PREFIX_ACCOUNT];
    key.extend_from_slice(account.as_bytes());
    key
}

/// Builds the storage key for the total-supply counter.
pub fn total_supply_key() -> Vec<u8> {
    vec![PREFIX_TOTAL_SUPPLY]
}

fn read_amount(engine: &ApplicationEngine, contract_id: i32, key: Vec<u8>) -> BigInt {
    engine
        .get_storage(contract_id, &key)
        .map(|bytes| BigInt::from_signed_bytes_le(&bytes))
        .unwrap_or_else(BigInt::zero)
}

fn write_amount(engine: &mut ApplicationEngine, contract_id: i32, key: Vec<u8>, value: &BigInt) -> ContractResult<()> {
    if value.is_zero() {
        engine.delete_storage(contract_id, &key)
    } else {
        engine.put_storage(contract_id, key, value.to_signed_bytes_le())
    }
}

/// Reads `account`'s balance under `contract_id`'s storage space.
pub fn balance_of(engine: &ApplicationEngine, contract_id: i32, account: &UInt160) -> BigInt {
    read_amount(engine, contract_id, account_key(account))
}

/// Reads the token's total supply.
pub fn total_supply(engine: &ApplicationEngine, contract_id: i32) -> BigInt {
    read_amount(engine, contract_id, total_supply_key())
}

/// Mints `amount` into `account`, updating both the balance and total supply.
pub fn mint(
    engine: &mut ApplicationEngine,
    contract_id: i32,
    contract_hash: UInt160,
    account: &UInt160,
    amount: &BigInt,
) -> ContractResult<()> {
    if amount.is_zero() {
        return Ok(());
    }
    let balance = balance_of(engine, contract_id, account) + amount;
    write_amount(engine, contract_id, account_key(account), &balance)?;
    let supply = total_supply(engine, contract_id) + amount;
    write_amount(engine, contract_id, total_supply_key(), &supply)?;
    emit_transfer(engine, contract_hash, None, Some(*account), amount);
    Ok(())
}

/// Burns `amount` from `account`, failing if the balance would go negative.
pub fn burn(
    engine: &mut ApplicationEngine,
    contract_id: i32,
    contract_hash: UInt160,
    account: &UInt160,
    amount: &BigInt,
) -> ContractResult<()> {
    if amount.is_zero() {
        return Ok(());
    }
    let balance = balance_of(engine, contract_id, account);
    if &balance < amount {
        return Err(ContractError::InvalidState(format!("{account} has insufficient balance to burn")));
    }
    write_amount(engine, contract_id, account_key(account), &(balance - amount))?;
    let supply = total_supply(engine, contract_id) - amount;
    write_amount(engine, contract_id, total_supply_key(), &supply)?;
    emit_transfer(engine, contract_hash, Some(*account), None, amount);
    Ok(())
}

/// Moves `amount` from `from` to `to`, requiring `from`'s witness unless the
/// call originates from `from` itself (a contract transferring its own
/// balance), and failing on insufficient funds.
pub fn transfer(
    engine: &mut ApplicationEngine,
    contract_id: i32,
    contract_hash: UInt160,
    from: &UInt160,
    to: &UInt160,
    amount: &BigInt,
) -> ContractResult<bool> {
    if amount.sign() == num_bigint::Sign::Minus {
        return Err(ContractError::InvalidState("transfer amount cannot be negative".into()));
    }
    if !engine.check_witness(from) {
        return Ok(false);
    }
    if from != to {
        let balance = balance_of(engine, contract_id, from);
        if &balance < amount {
            return Ok(false);
        }
        if !amount.is_zero() {
            write_amount(engine, contract_id, account_key(from), &(balance - amount))?;
            let to_balance = balance_of(engine, contract_id, to) + amount;
            write_amount(engine, contract_id, account_key(to), &to_balance)?;
        }
    }
    emit_transfer(engine, contract_hash, Some(*from), Some(*to), amount);
    Ok(true)
}

fn emit_transfer(engine: &mut ApplicationEngine, contract_hash: UInt160, from: Option<UInt160>, to: Option<UInt160>, amount: &BigInt) {
    let _ = contract_hash;
    let from_item = from.map(|h| StackItem::byte_string(h.as_bytes().to_vec())).unwrap_or(StackItem::Null);
    let to_item = to.map(|h| StackItem::byte_string(h.as_bytes().to_vec())).unwrap_or(StackItem::Null);
    engine.emit_notification("Transfer", vec![from_item, to_item, StackItem::Integer(amount.clone())]);
}

/// Parses a `UInt160` argument at `index`, with a uniform error on the wrong shape.
pub fn uint160_arg(args: &[StackItem], index: usize, contract: &'static str, method: &str) -> ContractResult<UInt160> {
    let item = arg(args, index, contract, method)?;
    let bytes = item.as_bytes().map_err(|_| ContractError::InvalidArguments {
        contract: contract.to_string(),
        method: method.to_string(),
        message: format!("argument {index} is not a byte string"),
    })?;
    UInt160::from_bytes(&bytes).map_err(|_| ContractError::InvalidArguments {
        contract: contract.to_string(),
        method: method.to_string(),
        message: format!("argument {index} is not a 20-byte hash"),
    })
}

/// Parses an integer argument at `index`.
pub fn int_arg(args: &[StackItem], index: usize, contract: &'static str, method: &str) -> ContractResult<BigInt> {
    let item = arg(args, index, contract, method)?;
    item.as_int().map_err(|_| ContractError::InvalidArguments {
        contract: contract.to_string(),
        method: method.to_string(),
        message: format!("argument {index} is not an integer"),
    })
}
