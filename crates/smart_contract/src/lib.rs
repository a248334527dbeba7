// Copyright (C) 2015-2026 The Neo Project.
//
// lib.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Application engine: the VM host that gives scripts access to storage,
//! native contracts, and witness checks (spec.md §2 C5, C6).
//!
//! This crate drives `neo-vm` from the outside through the
//! [`neo_vm::SyscallHandler`] seam; `neo-vm` itself knows nothing about
//! contracts, triggers, or storage. `neo-ledger` depends on this crate (its
//! transaction-verification pipeline runs scripts through
//! [`application_engine::ApplicationEngine`]), never the other way around.

pub mod application_engine;
pub mod contract_state;
pub mod error;
pub mod native;
pub mod notification;
pub mod syscalls;
pub mod trigger;
pub mod witness_scope;

pub use application_engine::{ApplicationEngine, ContainerSigner, StorageContext};
pub use contract_state::{ContractManifest, ContractState};
pub use error::{ContractError, ContractResult};
pub use native::{NativeContract, NativeRegistry};
pub use notification::NotificationEvent;
pub use trigger::TriggerType;
pub use witness_scope::WitnessScope;
