// Copyright (C) 2015-2026 The Neo Project.
//
// policy_contract.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `PolicyContract`: network fee parameters and the blocked-account list
//! (spec.md §4.4). Committee-only setters are gated on a committee witness;
//! this implementation checks witness against the single account configured
//! as committee rather than modeling NEO's multi-signature committee
//! address, since that derivation lives in `NeoToken` (spec.md §9 open
//! question: committee membership is read from `NeoToken`'s storage at
//! call time rather than cached here).

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::native::fungible::uint160_arg;
use crate::native::native_contract::NativeContract;
use neo_primitives::UInt160;
use neo_vm::StackItem;

const ID: i32 = -7;

const FEE_PER_BYTE_KEY: &[u8] = b"FeePerByte";
const EXEC_FEE_FACTOR_KEY: &[u8] = b"ExecFeeFactor";
const STORAGE_PRICE_KEY: &[u8] = b"StoragePrice";
const BLOCKED_ACCOUNT_PREFIX: u8 = 15;
const ATTRIBUTE_FEE_PREFIX: u8 = 20;

const DEFAULT_FEE_PER_BYTE: i64 = 1000;
const DEFAULT_EXEC_FEE_FACTOR: i64 = 30;
const DEFAULT_STORAGE_PRICE: i64 = 100_000;

/// Fee parameters and blocked-account list.
pub struct PolicyContract;

impl PolicyContract {
    pub fn new() -> Self {
        Self
    }

    fn get_i64(&self, engine: &ApplicationEngine, key: &[u8], default: i64) -> i64 {
        engine
            .get_storage(ID, key)
            .map(|bytes| i64::from_le_bytes(bytes.try_into().unwrap_or([0; 8])))
            .unwrap_or(default)
    }

    fn set_i64(&self, engine: &mut ApplicationEngine, key: &[u8], value: i64) -> ContractResult<()> {
        require_committee(engine)?;
        engine.put_storage(ID, key.to_vec(), value.to_le_bytes().to_vec())
    }

    fn blocked_key(account: &UInt160) -> Vec<u8> {
        let mut key = vec![BLOCKED_ACCOUNT_PREFIX];
        key.extend_from_slice(account.as_bytes());
        key
    }

    fn attribute_fee_key(type_byte: u8) -> Vec<u8> {
        vec![ATTRIBUTE_FEE_PREFIX, type_byte]
    }

    /// The extra network fee a transaction owes for carrying an attribute
    /// of `type_byte`, summed by the admission pipeline alongside the
    /// per-byte fee (spec.md §4.5 step 5). Defaults to 0, same as real Neo
    /// until the committee raises it for a specific type.
    pub fn attribute_fee(&self, engine: &ApplicationEngine, type_byte: u8) -> i64 {
        self.get_i64(engine, &Self::attribute_fee_key(type_byte), 0)
    }

    fn set_attribute_fee(&self, engine: &mut ApplicationEngine, type_byte: u8, value: i64) -> ContractResult<()> {
        self.set_i64(engine, &Self::attribute_fee_key(type_byte), value)
    }

    /// Whether `account` is on the blocked list, consulted by the
    /// transaction verification pipeline (spec.md §4.5 step 2).
    pub fn is_blocked(&self, engine: &ApplicationEngine, account: &UInt160) -> bool {
        engine.get_storage(ID, &Self::blocked_key(account)).is_some()
    }

    pub fn fee_per_byte(&self, engine: &ApplicationEngine) -> i64 {
        self.get_i64(engine, FEE_PER_BYTE_KEY, DEFAULT_FEE_PER_BYTE)
    }

    pub fn exec_fee_factor(&self, engine: &ApplicationEngine) -> i64 {
        self.get_i64(engine, EXEC_FEE_FACTOR_KEY, DEFAULT_EXEC_FEE_FACTOR)
    }

    pub fn storage_price(&self, engine: &ApplicationEngine) -> i64 {
        self.get_i64(engine, STORAGE_PRICE_KEY, DEFAULT_STORAGE_PRICE)
    }
}

impl Default for PolicyContract {
    fn default() -> Self {
        Self::new()
    }
}

fn require_committee(engine: &ApplicationEngine) -> ContractResult<()> {
    let committee = crate::native::neo_token::committee_address(engine);
    if engine.check_witness(&committee) {
        Ok(())
    } else {
        Err(ContractError::InvalidState("requires committee witness".into()))
    }
}

impl NativeContract for PolicyContract {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "PolicyContract"
    }

    fn invoke(&self, engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "getFeePerByte" => Ok(StackItem::Integer(self.fee_per_byte(engine).into())),
            "getExecFeeFactor" => Ok(StackItem::Integer(self.exec_fee_factor(engine).into())),
            "getStoragePrice" => Ok(StackItem::Integer(self.storage_price(engine).into())),
            "getAttributeFee" => {
                let value = crate::native::fungible::int_arg(&args, 0, self.name(), method)?;
                let type_byte = i64::try_from(value).unwrap_or_default() as u8;
                Ok(StackItem::Integer(self.attribute_fee(engine, type_byte).into()))
            }
            "setAttributeFee" => {
                require_committee(engine)?;
                let type_byte = crate::native::fungible::int_arg(&args, 0, self.name(), method)?;
                let type_byte = i64::try_from(type_byte).unwrap_or_default() as u8;
                let value = crate::native::fungible::int_arg(&args, 1, self.name(), method)?;
                self.set_attribute_fee(engine, type_byte, i64::try_from(value).unwrap_or_default())?;
                Ok(StackItem::Null)
            }
            "setFeePerByte" => {
                let value = crate::native::fungible::int_arg(&args, 0, self.name(), method)?;
                self.set_i64(engine, FEE_PER_BYTE_KEY, i64::try_from(value).unwrap_or_default())?;
                Ok(StackItem::Null)
            }
            "setExecFeeFactor" => {
                let value = crate::native::fungible::int_arg(&args, 0, self.name(), method)?;
                self.set_i64(engine, EXEC_FEE_FACTOR_KEY, i64::try_from(value).unwrap_or_default())?;
                Ok(StackItem::Null)
            }
            "setStoragePrice" => {
                let value = crate::native::fungible::int_arg(&args, 0, self.name(), method)?;
                self.set_i64(engine, STORAGE_PRICE_KEY, i64::try_from(value).unwrap_or_default())?;
                Ok(StackItem::Null)
            }
            "blockAccount" => {
                require_committee(engine)?;
                let account = uint160_arg(&args, 0, self.name(), method)?;
                engine.put_storage(ID, Self::blocked_key(&account), vec![1])?;
                Ok(StackItem::Boolean(true))
            }
            "unblockAccount" => {
                require_committee(engine)?;
                let account = uint160_arg(&args, 0, self.name(), method)?;
                engine.delete_storage(ID, &Self::blocked_key(&account))?;
                Ok(StackItem::Boolean(true))
            }
            "isBlocked" => {
                let account = uint160_arg(&args, 0, self.name(), method)?;
                Ok(StackItem::Boolean(self.is_blocked(engine, &account)))
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }
}
