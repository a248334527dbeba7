// Copyright (C) 2015-2026 The Neo Project.
//
// role_management.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `RoleManagement`: the committee-designated node lists for Oracle,
//! StateValidator, NeoFS alphabet, and P2P notary roles (spec.md §4.4).

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::native::native_contract::NativeContract;
use neo_vm::StackItem;
use num_traits::ToPrimitive;

const ID: i32 = -8;

/// A designated role, matching the reference node's fixed role-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Role {
    StateValidator = 4,
    Oracle = 8,
    NeoFsAlphabetNode = 16,
    P2pNotary = 32,
}

impl Role {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            4 => Some(Role::StateValidator),
            8 => Some(Role::Oracle),
            16 => Some(Role::NeoFsAlphabetNode),
            32 => Some(Role::P2pNotary),
            _ => None,
        }
    }
}

/// Designated-node lists, keyed by role.
pub struct RoleManagement;

impl RoleManagement {
    pub fn new() -> Self {
        Self
    }

    fn key(role: Role) -> Vec<u8> {
        vec![role as u8]
    }

    /// Public keys designated for `role`, in designation order.
    pub fn designated_by_role(&self, engine: &ApplicationEngine, role: Role) -> Vec<Vec<u8>> {
        engine
            .get_storage(ID, &Self::key(role))
            .map(|bytes| bytes.chunks_exact(33).map(|c| c.to_vec()).collect())
            .unwrap_or_default()
    }
}

impl Default for RoleManagement {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for RoleManagement {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "RoleManagement"
    }

    fn invoke(&self, engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "getDesignatedByRole" => {
                let role_value = args.first().ok_or_else(|| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: "expected a role byte".into(),
                })?.as_int()?;
                let role = Role::from_u8(role_value.to_u8().unwrap_or(0)).ok_or_else(|| {
                    ContractError::InvalidArguments {
                        contract: self.name().to_string(),
                        method: method.to_string(),
                        message: "unknown role".into(),
                    }
                })?;
                let items = self.designated_by_role(engine, role).into_iter().map(StackItem::byte_string).collect();
                Ok(StackItem::array(items))
            }
            "designateAsRole" => {
                let committee = crate::native::neo_token::committee_address(engine);
                if !engine.check_witness(&committee) {
                    return Err(ContractError::InvalidState("requires committee witness".into()));
                }
                let role_value = args.first().ok_or_else(|| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: "expected a role byte".into(),
                })?.as_int()?;
                let role = Role::from_u8(role_value.to_u8().unwrap_or(0)).ok_or_else(|| {
                    ContractError::InvalidArguments {
                        contract: self.name().to_string(),
                        method: method.to_string(),
                        message: "unknown role".into(),
                    }
                })?;
                let nodes = match args.get(1) {
                    Some(StackItem::Array(items)) => items.borrow().clone(),
                    _ => {
                        return Err(ContractError::InvalidArguments {
                            contract: self.name().to_string(),
                            method: method.to_string(),
                            message: "expected an array of public keys".into(),
                        })
                    }
                };
                let mut bytes = Vec::with_capacity(nodes.len() * 33);
                for node in &nodes {
                    bytes.extend_from_slice(&node.as_bytes()?);
                }
                engine.put_storage(ID, Self::key(role), bytes)?;
                Ok(StackItem::Null)
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }
}
