// Copyright (C) 2015-2026 The Neo Project.
//
// contract_management.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `ContractManagement`: deploy/update/destroy for user-deployed contracts
//! (spec.md §4.4). Assigns monotonically increasing non-negative contract
//! IDs, distinct from the fixed negative IDs native contracts use (spec.md
//! §6).

use crate::application_engine::ApplicationEngine;
use crate::contract_state::{ContractManifest, ContractState};
use crate::error::{ContractError, ContractResult};
use crate::native::native_contract::{arg, NativeContract};
use neo_io::SerializableExt;
use neo_primitives::UInt160;
use neo_vm::StackItem;

const ID: i32 = -1;
const PREFIX_CONTRACT: u8 = 8;
const PREFIX_NEXT_ID: u8 = 15;

fn contract_key(hash: &UInt160) -> Vec<u8> {
    let mut key = vec![PREFIX_CONTRACT];
    key.extend_from_slice(hash.as_bytes());
    key
}

/// Looks up a deployed contract by hash directly against `engine`'s
/// snapshot, bypassing `invoke()` so `System.Contract.Call`'s dispatch
/// doesn't need a round trip through a `StackItem`-shaped method call.
pub fn load_by_hash(engine: &ApplicationEngine, hash: &UInt160) -> Option<ContractState> {
    engine.get_storage(ID, &contract_key(hash)).and_then(|bytes| ContractState::from_array(&bytes).ok())
}

/// Deploy/update/destroy for user contracts.
pub struct ContractManagement;

impl ContractManagement {
    pub fn new() -> Self {
        Self
    }

    fn next_id(engine: &mut ApplicationEngine) -> ContractResult<i32> {
        let current = engine
            .get_storage(ID, &[PREFIX_NEXT_ID])
            .map(|bytes| i32::from_le_bytes(bytes.try_into().unwrap_or([0; 4])))
            .unwrap_or(1);
        engine.put_storage(ID, vec![PREFIX_NEXT_ID], (current + 1).to_le_bytes().to_vec())?;
        Ok(current)
    }
}

impl Default for ContractManagement {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for ContractManagement {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "ContractManagement"
    }

    fn invoke(&self, engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "getContract" => {
                let hash_bytes = arg(&args, 0, self.name(), method)?.as_bytes()?;
                let hash = UInt160::from_bytes(&hash_bytes).map_err(|_| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: "not a 20-byte hash".into(),
                })?;
                match load_by_hash(engine, &hash) {
                    Some(state) => Ok(contract_state_to_item(&state)),
                    None => Ok(StackItem::Null),
                }
            }
            "deploy" => {
                let nef_script = arg(&args, 0, self.name(), method)?.as_bytes()?;
                let manifest_name = String::from_utf8_lossy(&arg(&args, 1, self.name(), method)?.as_bytes()?).into_owned();
                let hash = neo_cryptography::hash::hash160(&nef_script);
                if load_by_hash(engine, &hash).is_some() {
                    return Err(ContractError::InvalidState(format!("contract {hash} already deployed")));
                }
                let id = Self::next_id(engine)?;
                let state = ContractState {
                    id,
                    update_counter: 0,
                    hash,
                    nef_script,
                    manifest: ContractManifest::empty(manifest_name),
                };
                engine.put_storage(ID, contract_key(&hash), state.to_array())?;
                Ok(contract_state_to_item(&state))
            }
            "update" => {
                let hash_bytes = arg(&args, 0, self.name(), method)?.as_bytes()?;
                let hash = UInt160::from_bytes(&hash_bytes).map_err(|_| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: "not a 20-byte hash".into(),
                })?;
                let mut state = load_by_hash(engine, &hash).ok_or(ContractError::ContractNotFound { hash: hash.to_string() })?;
                if !engine.check_witness(&hash) {
                    return Err(ContractError::InvalidState("update requires the contract's own witness".into()));
                }
                state.nef_script = arg(&args, 1, self.name(), method)?.as_bytes()?;
                state.update_counter += 1;
                engine.put_storage(ID, contract_key(&hash), state.to_array())?;
                Ok(StackItem::Null)
            }
            "destroy" => {
                let current = engine.current_script_hash();
                if !engine.check_witness(&current) {
                    return Err(ContractError::InvalidState("destroy requires the contract's own witness".into()));
                }
                engine.delete_storage(ID, &contract_key(&current))?;
                Ok(StackItem::Null)
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }
}

fn contract_state_to_item(state: &ContractState) -> StackItem {
    StackItem::array(vec![
        StackItem::Integer((state.id as i64).into()),
        StackItem::Integer((state.update_counter as i64).into()),
        StackItem::byte_string(state.hash.as_bytes().to_vec()),
        StackItem::byte_string(state.nef_script.clone()),
        StackItem::byte_string(state.manifest.name.clone().into_bytes()),
    ])
}
