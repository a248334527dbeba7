// Copyright (C) 2015-2026 The Neo Project.
//
// native_contract.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The `NativeContract` trait and the registry dispatching `CALL`s and
//! block-persistence hooks to the nine contracts spec.md §4.4 names.

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::trigger::TriggerType;
use neo_cryptography::hash::hash160;
use neo_primitives::UInt160;
use neo_vm::StackItem;
use std::rc::Rc;

/// Derives a native contract's script hash from its name.
///
/// The reference node derives native hashes from a contract's (empty) NEF
/// script plus sender `UInt160::zero()`; since native contracts carry no
/// real script here, this crate instead hashes the contract's name, which
/// is equally stable and collision-free for the fixed set of nine natives.
pub fn native_hash(name: &str) -> UInt160 {
    hash160(name.as_bytes())
}

/// One native contract's Rust-implemented behavior.
pub trait NativeContract {
    /// Negative, stable storage-space ID (spec.md §6).
    fn id(&self) -> i32;

    /// This contract's script hash, used for `CALL` dispatch and for
    /// `allowed_contracts` witness-scope checks.
    fn hash(&self) -> UInt160 {
        native_hash(self.name())
    }

    /// The contract's fixed name (`"NeoToken"`, `"GasToken"`, ...).
    fn name(&self) -> &'static str;

    /// Invokes `method` with `args`, as routed by `System.Contract.Call` or
    /// by a direct native invocation from another native contract.
    fn invoke(
        &self,
        engine: &mut ApplicationEngine,
        method: &str,
        args: Vec<StackItem>,
    ) -> ContractResult<StackItem>;

    /// Runs under `TriggerType::ON_PERSIST`, before any transaction applies.
    fn on_persist(&self, _engine: &mut ApplicationEngine) -> ContractResult<()> {
        Ok(())
    }

    /// Runs under `TriggerType::POST_PERSIST`, after every transaction applies.
    fn post_persist(&self, _engine: &mut ApplicationEngine) -> ContractResult<()> {
        Ok(())
    }
}

/// Looks up which argument was requested, with a uniform "wrong shape" error.
pub(crate) fn arg(
    args: &[StackItem],
    index: usize,
    contract: &'static str,
    method: &str,
) -> ContractResult<StackItem> {
    args.get(index).cloned().ok_or_else(|| ContractError::InvalidArguments {
        contract: contract.to_string(),
        method: method.to_string(),
        message: format!("expected at least {} argument(s)", index + 1),
    })
}

/// The fixed set of native contracts, keyed by script hash for `CALL`
/// dispatch and by trigger for block-persistence hooks.
///
/// Contracts are held behind `Rc` rather than `Box` so [`NativeRegistry::get`]
/// can hand callers an owned handle: a dispatcher invoking a contract needs
/// `&mut ApplicationEngine` (which owns this registry) at the same time as
/// the contract reference, which a borrow tied to `&self` cannot survive.
#[derive(Clone)]
pub struct NativeRegistry {
    contracts: Vec<Rc<dyn NativeContract>>,
}

impl NativeRegistry {
    /// Builds the registry with spec.md §4.4's nine native contracts.
    pub fn new() -> Self {
        use crate::native::{
            ContractManagement, CryptoLib, GasToken, LedgerContract, NeoToken, OracleContract,
            PolicyContract, RoleManagement, StdLib,
        };
        Self {
            contracts: vec![
                Rc::new(ContractManagement::new()),
                Rc::new(StdLib::new()),
                Rc::new(CryptoLib::new()),
                Rc::new(LedgerContract::new()),
                Rc::new(NeoToken::new()),
                Rc::new(GasToken::new()),
                Rc::new(PolicyContract::new()),
                Rc::new(RoleManagement::new()),
                Rc::new(OracleContract::new()),
            ],
        }
    }

    /// Finds the native contract deployed at `hash`, if any.
    pub fn get(&self, hash: &UInt160) -> Option<Rc<dyn NativeContract>> {
        self.contracts.iter().find(|c| c.hash() == *hash).cloned()
    }

    /// Every native contract's hash, for the verification pipeline's
    /// "blocked account can't be a native contract" style checks.
    pub fn hashes(&self) -> impl Iterator<Item = UInt160> + '_ {
        self.contracts.iter().map(|c| c.hash())
    }

    /// Runs every native contract's `on_persist`/`post_persist` hook for
    /// `trigger`, in registration order (spec.md §4.5's block pipeline runs
    /// `ContractManagement` before the token contracts, matching C6's
    /// dependency order: management, then the rest).
    pub fn run_system_hooks(
        &self,
        engine: &mut ApplicationEngine,
        trigger: TriggerType,
    ) -> ContractResult<()> {
        for contract in &self.contracts {
            match trigger {
                TriggerType::ON_PERSIST => contract.on_persist(engine)?,
                TriggerType::POST_PERSIST => contract.post_persist(engine)?,
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for NativeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
