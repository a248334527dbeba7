// Copyright (C) 2015-2026 The Neo Project.
//
// gas_token.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `GasToken`: the divisible fee-payment token (spec.md §4.4). All balance
//! bookkeeping is shared with `NeoToken` through [`crate::native::fungible`];
//! this module only supplies the GAS-specific id and decimals, plus the
//! [`mint`](GasToken::mint) entry point the block-persistence pipeline and
//! `NeoToken`'s `PostPersist` hook use to pay out collected network fees and
//! the per-block reward.

use crate::application_engine::ApplicationEngine;
use crate::error::ContractError;
use crate::error::ContractResult;
use crate::native::fungible::{self, int_arg, uint160_arg};
use crate::native::native_contract::NativeContract;
use neo_primitives::UInt160;
use neo_vm::StackItem;
use num_bigint::BigInt;

const ID: i32 = -6;
const DECIMALS: u8 = 8;

/// The GAS fee-payment token.
pub struct GasToken;

impl GasToken {
    pub fn new() -> Self {
        Self
    }

    /// Mints `amount` datoshi of GAS to `account`, used by the block
    /// persistence pipeline to pay out collected network fees (spec.md
    /// §4.5 step "OnPersist").
    pub fn mint(&self, engine: &mut ApplicationEngine, account: &UInt160, amount: &BigInt) -> ContractResult<()> {
        fungible::mint(engine, ID, self.hash(), account, amount)
    }
}

impl Default for GasToken {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for GasToken {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "GasToken"
    }

    fn invoke(&self, engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "symbol" => Ok(StackItem::byte_string(b"GAS".to_vec())),
            "decimals" => Ok(StackItem::Integer((DECIMALS as i64).into())),
            "totalSupply" => Ok(StackItem::Integer(fungible::total_supply(engine, ID))),
            "balanceOf" => {
                let account = uint160_arg(&args, 0, self.name(), method)?;
                Ok(StackItem::Integer(fungible::balance_of(engine, ID, &account)))
            }
            "transfer" => {
                let from = uint160_arg(&args, 0, self.name(), method)?;
                let to = uint160_arg(&args, 1, self.name(), method)?;
                let amount = int_arg(&args, 2, self.name(), method)?;
                Ok(StackItem::Boolean(fungible::transfer(engine, ID, self.hash(), &from, &to, &amount)?))
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }
}
