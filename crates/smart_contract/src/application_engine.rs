// Copyright (C) 2015-2026 The Neo Project.
//
// application_engine.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The application engine: the VM host that gives scripts access to
//! storage, native contracts, and witness checks (spec.md §2 C5, §4.3).
//!
//! This drives a [`neo_vm::ExecutionEngine`] from the outside by
//! implementing [`neo_vm::SyscallHandler`], the seam `neo-vm` exposes so it
//! never needs to know this crate exists (spec.md §9's layering note).

use crate::contract_state::ContractState;
use crate::error::{ContractError, ContractResult};
use crate::native::NativeRegistry;
use crate::notification::NotificationEvent;
use crate::syscalls;
use crate::trigger::TriggerType;
use crate::witness_scope::WitnessScope;
use neo_persistence::{ReadStore, Snapshot, StorageKey};
use neo_primitives::{UInt160, UInt256};
use neo_vm::{CallFlags, ExecutionEngine, InteropInterface, Script, StackItem, SyscallHandler, VMState, VmError, VmResult};
use num_traits::ToPrimitive;
use std::any::Any;
use std::fmt;

/// A transaction/block signer, reduced to what `CheckWitness` needs.
/// `neo-ledger::Signer` carries the full wire format and converts into this
/// when constructing an engine.
#[derive(Debug, Clone)]
pub struct ContainerSigner {
    pub account: UInt160,
    pub scopes: WitnessScope,
    pub allowed_contracts: Vec<UInt160>,
    pub allowed_groups: Vec<Vec<u8>>,
}

/// A storage-space handle returned by `System.Storage.GetContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageContext {
    pub contract_id: i32,
    pub read_only: bool,
}

impl InteropInterface for StorageContext {
    fn type_name(&self) -> &'static str {
        "StorageContext"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for StorageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageContext({}{})", self.contract_id, if self.read_only { ", ro" } else { "" })
    }
}

/// The VM host. One instance drives exactly one trigger invocation (one
/// transaction's `Application`/`Verification` run, or one block's
/// `OnPersist`/`PostPersist` run); callers construct a fresh engine per
/// invocation and commit or discard `snapshot`'s writes based on the
/// outcome (spec.md §4.5).
pub struct ApplicationEngine<'a> {
    trigger: TriggerType,
    snapshot: &'a mut dyn Snapshot,
    container_hash: Option<UInt256>,
    signers: Vec<ContainerSigner>,
    block_index: u32,
    block_time: u64,
    entry_script_hash: UInt160,
    call_stack: Vec<UInt160>,
    current_contract_id: Vec<Option<i32>>,
    notifications: Vec<NotificationEvent>,
    native_registry: NativeRegistry,
    gas_consumed: i64,
    gas_limit: i64,
    network_magic: u32,
}

/// Maximum size of a storage key, per spec.md §6.
pub const MAX_STORAGE_KEY_SIZE: usize = 64;
/// Maximum size of a storage value, per spec.md §6.
pub const MAX_STORAGE_VALUE_SIZE: usize = u16::MAX as usize;

impl<'a> ApplicationEngine<'a> {
    /// Builds a new engine for one trigger invocation.
    pub fn new(
        trigger: TriggerType,
        snapshot: &'a mut dyn Snapshot,
        entry_script_hash: UInt160,
        container_hash: Option<UInt256>,
        signers: Vec<ContainerSigner>,
        block_index: u32,
        block_time: u64,
        gas_limit: i64,
    ) -> Self {
        Self {
            trigger,
            snapshot,
            container_hash,
            signers,
            block_index,
            block_time,
            entry_script_hash,
            call_stack: vec![entry_script_hash],
            current_contract_id: vec![None],
            notifications: Vec::new(),
            native_registry: NativeRegistry::new(),
            gas_consumed: 0,
            gas_limit,
            network_magic: 0,
        }
    }

    /// Sets the network magic mixed into `System.Crypto.CheckSig`/
    /// `CheckMultisig`'s signed message (spec.md §4.3): `network_magic ||
    /// container_hash`. Callers that never verify a witness (balance
    /// lookups, storage-only probes) can skip this and keep the default 0.
    pub fn with_network_magic(mut self, network_magic: u32) -> Self {
        self.network_magic = network_magic;
        self
    }

    pub fn network_magic(&self) -> u32 {
        self.network_magic
    }

    pub fn trigger(&self) -> TriggerType {
        self.trigger
    }

    pub fn block_index(&self) -> u32 {
        self.block_index
    }

    pub fn block_time(&self) -> u64 {
        self.block_time
    }

    pub fn container_hash(&self) -> Option<UInt256> {
        self.container_hash
    }

    pub fn gas_consumed(&self) -> i64 {
        self.gas_consumed
    }

    pub fn notifications(&self) -> &[NotificationEvent] {
        &self.notifications
    }

    pub fn native_registry(&self) -> &NativeRegistry {
        &self.native_registry
    }

    /// Runs every native contract's `on_persist`/`post_persist` hook for
    /// `self.trigger()` (spec.md §4.5's block pipeline). Takes the registry
    /// out of `self` for the duration of the call: `NativeRegistry::
    /// run_system_hooks` needs `&mut ApplicationEngine` alongside `&self`,
    /// which a borrow of `self.native_registry` can't coexist with.
    pub fn run_system_hooks(&mut self) -> ContractResult<()> {
        let trigger = self.trigger;
        let registry = std::mem::take(&mut self.native_registry);
        let result = registry.run_system_hooks(self, trigger);
        self.native_registry = registry;
        result
    }

    /// The contract hash currently executing (top of the call stack).
    pub fn current_script_hash(&self) -> UInt160 {
        *self.call_stack.last().unwrap_or(&self.entry_script_hash)
    }

    /// The contract hash that invoked the current one, if any.
    pub fn calling_script_hash(&self) -> Option<UInt160> {
        if self.call_stack.len() < 2 {
            None
        } else {
            Some(self.call_stack[self.call_stack.len() - 2])
        }
    }

    pub fn entry_script_hash(&self) -> UInt160 {
        self.entry_script_hash
    }

    /// Charges `amount` datoshi against the engine's own gas budget, used
    /// for native-contract invocations that happen outside a running VM
    /// instruction stream (e.g. block-persistence hooks).
    pub fn charge(&mut self, amount: i64) -> ContractResult<()> {
        let remaining = self.gas_limit - self.gas_consumed;
        if amount > remaining {
            return Err(ContractError::OutOfGas);
        }
        self.gas_consumed += amount;
        Ok(())
    }

    /// `System.Runtime.CheckWitness` semantics (spec.md §4.5 step 7): true
    /// if `account` signed the container with a scope that covers the
    /// currently executing contract.
    pub fn check_witness(&self, account: &UInt160) -> bool {
        let current = self.current_script_hash();
        self.signers.iter().any(|signer| {
            if signer.account != *account {
                return false;
            }
            if signer.scopes.contains(WitnessScope::GLOBAL) {
                return true;
            }
            if signer.scopes.contains(WitnessScope::CALLED_BY_ENTRY) && self.call_stack.len() == 1 {
                return true;
            }
            if signer.scopes.contains(WitnessScope::CUSTOM_CONTRACTS)
                && signer.allowed_contracts.contains(&current)
            {
                return true;
            }
            false
        })
    }

    /// Emits a `System.Runtime.Notify` event from the currently executing
    /// contract.
    pub fn emit_notification(&mut self, event_name: impl Into<String>, state: Vec<StackItem>) {
        self.notifications.push(NotificationEvent {
            script_hash: self.current_script_hash(),
            event_name: event_name.into(),
            state,
        });
    }

    /// Reads a native or deployed contract's storage.
    pub fn get_storage(&self, contract_id: i32, key: &[u8]) -> Option<Vec<u8>> {
        self.snapshot.get(&StorageKey::new(contract_id, key.to_vec()))
    }

    /// Writes a native or deployed contract's storage, subject to the
    /// trigger's write permission and the size limits spec.md §6 names.
    pub fn put_storage(&mut self, contract_id: i32, key: Vec<u8>, value: Vec<u8>) -> ContractResult<()> {
        if !self.trigger.allows_writes() {
            return Err(ContractError::InvalidState("storage write under a read-only trigger".into()));
        }
        if key.len() > MAX_STORAGE_KEY_SIZE {
            return Err(ContractError::StorageSizeExceeded { kind: "key" });
        }
        if value.len() > MAX_STORAGE_VALUE_SIZE {
            return Err(ContractError::StorageSizeExceeded { kind: "value" });
        }
        self.snapshot.put(StorageKey::new(contract_id, key), value);
        Ok(())
    }

    /// Deletes a native or deployed contract's storage entry.
    pub fn delete_storage(&mut self, contract_id: i32, key: &[u8]) -> ContractResult<()> {
        if !self.trigger.allows_writes() {
            return Err(ContractError::InvalidState("storage delete under a read-only trigger".into()));
        }
        self.snapshot.delete(&StorageKey::new(contract_id, key.to_vec()));
        Ok(())
    }

    /// Iterates every entry of `contract_id` whose key starts with `prefix`,
    /// returning the contract-local key (with `contract_id`'s 4-byte prefix
    /// already stripped) alongside its value.
    pub fn find_storage(&self, contract_id: i32, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let byte_prefix = StorageKey::prefix(contract_id, prefix);
        self.snapshot
            .seek(&byte_prefix, neo_persistence::SeekDirection::Forward)
            .map(|(key, value)| (key.key().to_vec(), value))
            .collect()
    }

    /// Looks up a deployed contract's state via `ContractManagement`'s
    /// storage (`neo-smart-contract` owns this lookup directly rather than
    /// routing through `ContractManagement::invoke` to avoid re-deserializing
    /// the contract twice per `CALL`).
    pub fn load_contract_state(&self, hash: &UInt160) -> Option<ContractState> {
        crate::native::contract_management::load_by_hash(self, hash)
    }

    fn check_required_flags(&self, engine: &ExecutionEngine, required: CallFlags) -> VmResult<()> {
        let actual = engine
            .current_context()
            .ok_or_else(|| VmError::InvalidContext { message: "no active context".into() })?
            .call_flags;
        if !actual.contains(required) {
            return Err(VmError::InvalidContext {
                message: format!("syscall requires {required:?}, context has {actual:?}"),
            });
        }
        Ok(())
    }

    fn pop(engine: &mut ExecutionEngine) -> VmResult<StackItem> {
        engine
            .current_context_mut()
            .ok_or_else(|| VmError::InvalidContext { message: "no active context".into() })?
            .evaluation_stack
            .pop()
    }

    fn push(engine: &mut ExecutionEngine, item: StackItem) -> VmResult<()> {
        engine
            .current_context_mut()
            .ok_or_else(|| VmError::InvalidContext { message: "no active context".into() })?
            .evaluation_stack
            .push(item)
    }

    fn hash_from_item(item: &StackItem) -> VmResult<UInt160> {
        let bytes = item.as_bytes()?;
        UInt160::from_bytes(&bytes).map_err(|_| VmError::InvalidCast { from: "ByteString", to: "UInt160" })
    }

    fn dispatch_contract_call(&mut self, engine: &mut ExecutionEngine) -> VmResult<()> {
        let flags_item = Self::pop(engine)?;
        let args_item = Self::pop(engine)?;
        let method_item = Self::pop(engine)?;
        let hash_item = Self::pop(engine)?;

        let target = Self::hash_from_item(&hash_item)?;
        let method = String::from_utf8(method_item.as_bytes()?)
            .map_err(|_| VmError::InvalidCast { from: "ByteString", to: "utf8 method name" })?;
        let args = match args_item {
            StackItem::Array(items) => items.borrow().clone(),
            StackItem::Struct(items) => items.borrow().clone(),
            other => return Err(VmError::InvalidCast { from: other.type_name(), to: "Array" }),
        };
        let requested_flags = CallFlags::from_bits_truncate(flags_item.as_int()?.to_u8().unwrap_or(0));
        let caller_flags = engine
            .current_context()
            .ok_or_else(|| VmError::InvalidContext { message: "no active context".into() })?
            .call_flags;
        let effective_flags = requested_flags & caller_flags;

        if let Some(contract) = self.native_registry.get(&target) {
            self.call_stack.push(target);
            self.current_contract_id.push(Some(contract.id()));
            let result = contract.invoke(self, &method, args);
            self.call_stack.pop();
            self.current_contract_id.pop();
            match result {
                // `contract` is an owned `Rc` clone (see `NativeRegistry::get`),
                // so invoking it with `self` passed mutably does not alias any
                // live borrow of `self.native_registry`.
                Ok(value) => Self::push(engine, value),
                Err(err) => Err(VmError::Aborted { message: err.to_string() }),
            }
        } else if let Some(state) = self.load_contract_state(&target) {
            self.call_stack.push(target);
            self.current_contract_id.push(Some(state.id));
            engine.load_script(Script::new(state.nef_script), effective_flags);
            Self::push(engine, StackItem::array(args))?;
            Ok(())
        } else {
            Err(VmError::InvalidContext { message: format!("contract {target} not found") })
        }
    }

    fn dispatch_storage_get_context(&mut self, engine: &mut ExecutionEngine, read_only: bool) -> VmResult<()> {
        let contract_id = *self.current_contract_id.last().unwrap_or(&None);
        let contract_id = contract_id.ok_or_else(|| VmError::InvalidContext {
            message: "current script has no storage context".into(),
        })?;
        let context = StorageContext { contract_id, read_only };
        Self::push(engine, StackItem::InteropInterface(std::rc::Rc::new(context)))
    }

    fn storage_context_from(item: &StackItem) -> VmResult<StorageContext> {
        match item {
            StackItem::InteropInterface(interop) => interop
                .as_any()
                .downcast_ref::<StorageContext>()
                .copied()
                .ok_or_else(|| VmError::InvalidCast { from: "InteropInterface", to: "StorageContext" }),
            other => Err(VmError::InvalidCast { from: other.type_name(), to: "StorageContext" }),
        }
    }

    /// The message `System.Crypto.CheckSig`/`CheckMultisig` verify against:
    /// `network_magic || container_hash` (spec.md §4.3). Without the magic
    /// prefix a witness would verify the same signature across every
    /// network sharing a transaction hash, which the wire format forbids.
    fn signed_message(&self) -> Vec<u8> {
        let mut message = self.network_magic.to_le_bytes().to_vec();
        if let Some(hash) = self.container_hash {
            message.extend_from_slice(hash.as_bytes());
        }
        message
    }

    /// Invokes `method` on `target` with `args` from a caller that has no
    /// `ExecutionEngine` of its own in scope — a native contract finalizing
    /// a callback from inside `NativeContract::invoke` (e.g. `OracleContract`
    /// delivering a response). Native targets are dispatched straight through
    /// the registry; deployed targets run to completion in a fresh
    /// `ExecutionEngine`, mirroring `run_transaction`'s own script run.
    pub fn call_contract(&mut self, target: UInt160, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        if let Some(contract) = self.native_registry.get(&target) {
            self.call_stack.push(target);
            self.current_contract_id.push(Some(contract.id()));
            let result = contract.invoke(self, method, args);
            self.call_stack.pop();
            self.current_contract_id.pop();
            return result;
        }

        let state = self
            .load_contract_state(&target)
            .ok_or_else(|| ContractError::InvalidState(format!("contract {target} not found")))?;

        self.call_stack.push(target);
        self.current_contract_id.push(Some(state.id));
        let mut execution = ExecutionEngine::new(self.gas_limit - self.gas_consumed);
        execution.load_script(Script::new(state.nef_script), CallFlags::ALL);
        let pushed = execution
            .current_context_mut()
            .ok_or_else(|| ContractError::InvalidState("no active context".into()))
            .and_then(|ctx| ctx.evaluation_stack.push(StackItem::array(args)).map_err(|e| ContractError::InvalidState(e.to_string())));
        if let Err(err) = pushed {
            self.call_stack.pop();
            self.current_contract_id.pop();
            return Err(err);
        }

        let vm_state = execution.execute(self);
        self.gas_consumed += execution.gas_consumed();
        self.call_stack.pop();
        self.current_contract_id.pop();

        match vm_state {
            VMState::HALT => Ok(StackItem::Null),
            _ => Err(ContractError::InvalidState(format!("{target}.{method} callback faulted"))),
        }
    }
}

impl SyscallHandler for ApplicationEngine<'_> {
    fn on_syscall(&mut self, engine: &mut ExecutionEngine, method_hash: u32) -> VmResult<()> {
        let descriptor = syscalls::lookup(method_hash).ok_or(VmError::UnknownSyscall(method_hash))?;
        self.check_required_flags(engine, descriptor.required_flags)?;

        match descriptor.name {
            "System.Contract.Call" => self.dispatch_contract_call(engine),
            "System.Contract.GetCallFlags" => {
                let flags = engine.current_context().map(|c| c.call_flags.bits()).unwrap_or(0);
                Self::push(engine, StackItem::Integer((flags as i64).into()))
            }
            "System.Runtime.Platform" => Self::push(engine, StackItem::byte_string(b"NEO".to_vec())),
            "System.Runtime.GetTrigger" => {
                Self::push(engine, StackItem::Integer((self.trigger.bits() as i64).into()))
            }
            "System.Runtime.GetTime" => Self::push(engine, StackItem::Integer((self.block_time as i64).into())),
            "System.Runtime.GetScriptContainer" => {
                let bytes = self.container_hash.map(|h| h.as_bytes().to_vec()).unwrap_or_default();
                Self::push(engine, StackItem::byte_string(bytes))
            }
            "System.Runtime.GetExecutingScriptHash" => {
                Self::push(engine, StackItem::byte_string(self.current_script_hash().as_bytes().to_vec()))
            }
            "System.Runtime.GetCallingScriptHash" => {
                let bytes = self.calling_script_hash().map(|h| h.as_bytes().to_vec()).unwrap_or_default();
                Self::push(engine, StackItem::byte_string(bytes))
            }
            "System.Runtime.GetEntryScriptHash" => {
                Self::push(engine, StackItem::byte_string(self.entry_script_hash.as_bytes().to_vec()))
            }
            "System.Runtime.CheckWitness" => {
                let item = Self::pop(engine)?;
                let account = Self::hash_from_item(&item)?;
                Self::push(engine, StackItem::Boolean(self.check_witness(&account)))
            }
            "System.Runtime.GetNotifications" => {
                let items: Vec<StackItem> = self
                    .notifications
                    .iter()
                    .map(|n| {
                        StackItem::array(vec![
                            StackItem::byte_string(n.script_hash.as_bytes().to_vec()),
                            StackItem::byte_string(n.event_name.clone().into_bytes()),
                            StackItem::array(n.state.clone()),
                        ])
                    })
                    .collect();
                Self::push(engine, StackItem::array(items))
            }
            "System.Runtime.GasLeft" => {
                let remaining = engine.gas_limit() - engine.gas_consumed();
                Self::push(engine, StackItem::Integer(remaining.into()))
            }
            "System.Runtime.BurnGas" => {
                let amount = Self::pop(engine)?
                    .as_int()?
                    .to_i64()
                    .ok_or_else(|| VmError::InvalidCast { from: "Integer", to: "i64" })?;
                self.charge(amount).map_err(|e| VmError::Aborted { message: e.to_string() })
            }
            "System.Runtime.Notify" => {
                let state = Self::pop(engine)?;
                let name = Self::pop(engine)?;
                let name = String::from_utf8(name.as_bytes()?)
                    .map_err(|_| VmError::InvalidCast { from: "ByteString", to: "utf8 event name" })?;
                let items = match state {
                    StackItem::Array(items) => items.borrow().clone(),
                    other => vec![other],
                };
                self.emit_notification(name, items);
                Ok(())
            }
            "System.Runtime.Log" => {
                let message = Self::pop(engine)?;
                let text = String::from_utf8_lossy(&message.as_bytes()?).into_owned();
                tracing::info!(contract = %self.current_script_hash(), %text, "contract log");
                Ok(())
            }
            "System.Storage.GetContext" => self.dispatch_storage_get_context(engine, false),
            "System.Storage.GetReadOnlyContext" => self.dispatch_storage_get_context(engine, true),
            "System.Storage.Get" => {
                let key = Self::pop(engine)?.as_bytes()?;
                let context = Self::storage_context_from(&Self::pop(engine)?)?;
                let value = self.get_storage(context.contract_id, &key);
                Self::push(engine, value.map(StackItem::byte_string).unwrap_or(StackItem::Null))
            }
            "System.Storage.Put" => {
                let value = Self::pop(engine)?.as_bytes()?;
                let key = Self::pop(engine)?.as_bytes()?;
                let context = Self::storage_context_from(&Self::pop(engine)?)?;
                if context.read_only {
                    return Err(VmError::InvalidContext { message: "write through read-only storage context".into() });
                }
                self.put_storage(context.contract_id, key, value)
                    .map_err(|e| VmError::Aborted { message: e.to_string() })
            }
            "System.Storage.Delete" => {
                let key = Self::pop(engine)?.as_bytes()?;
                let context = Self::storage_context_from(&Self::pop(engine)?)?;
                if context.read_only {
                    return Err(VmError::InvalidContext { message: "delete through read-only storage context".into() });
                }
                self.delete_storage(context.contract_id, &key)
                    .map_err(|e| VmError::Aborted { message: e.to_string() })
            }
            "System.Storage.Find" => {
                let prefix = Self::pop(engine)?.as_bytes()?;
                let context = Self::storage_context_from(&Self::pop(engine)?)?;
                let entries = self.find_storage(context.contract_id, &prefix);
                let items = entries
                    .into_iter()
                    .map(|(k, v)| StackItem::array(vec![StackItem::byte_string(k), StackItem::byte_string(v)]))
                    .collect();
                Self::push(engine, StackItem::array(items))
            }
            "System.Crypto.CheckSig" => {
                let signature = Self::pop(engine)?.as_bytes()?;
                let pubkey = Self::pop(engine)?.as_bytes()?;
                let message = self.signed_message();
                let ok = neo_cryptography::ecdsa::verify(&message, &signature, &pubkey, neo_cryptography::ecdsa::Curve::Secp256r1)
                    .unwrap_or(false);
                Self::push(engine, StackItem::Boolean(ok))
            }
            "System.Crypto.CheckMultisig" => {
                let signatures_item = Self::pop(engine)?;
                let pubkeys_item = Self::pop(engine)?;
                let signatures = match signatures_item {
                    StackItem::Array(items) => items.borrow().clone(),
                    other => vec![other],
                };
                let pubkeys = match pubkeys_item {
                    StackItem::Array(items) => items.borrow().clone(),
                    other => vec![other],
                };
                let message = self.signed_message();
                let ok = verify_multisig(&message, &signatures, &pubkeys)?;
                Self::push(engine, StackItem::Boolean(ok))
            }
            "System.Contract.CreateStandardAccount" => {
                let pubkey = Self::pop(engine)?.as_bytes()?;
                let hash = neo_cryptography::hash::hash160(&pubkey);
                Self::push(engine, StackItem::byte_string(hash.as_bytes().to_vec()))
            }
            _ => Err(VmError::UnknownSyscall(method_hash)),
        }
    }

    fn syscall_price(&self, method_hash: u32) -> i64 {
        syscalls::lookup(method_hash).map(|d| d.price).unwrap_or(0)
    }
}

fn verify_multisig(message: &[u8], signatures: &[StackItem], pubkeys: &[StackItem]) -> VmResult<bool> {
    if signatures.is_empty() || signatures.len() > pubkeys.len() {
        return Ok(false);
    }
    let mut pubkey_index = 0;
    for signature in signatures {
        let signature_bytes = signature.as_bytes()?;
        let mut matched = false;
        while pubkey_index < pubkeys.len() {
            let pubkey_bytes = pubkeys[pubkey_index].as_bytes()?;
            pubkey_index += 1;
            if neo_cryptography::ecdsa::verify(message, &signature_bytes, &pubkey_bytes, neo_cryptography::ecdsa::Curve::Secp256r1)
                .unwrap_or(false)
            {
                matched = true;
                break;
            }
        }
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}
