// Copyright (C) 2015-2026 The Neo Project.
//
// notification.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `System.Runtime.Notify` events (spec.md §4.3).

use neo_primitives::UInt160;
use neo_vm::StackItem;

/// One notification emitted by `System.Runtime.Notify` during execution.
///
/// Held as a flat `Vec` rather than replayed live, so a faulted transaction
/// can discard every notification it emitted along with its storage writes.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    /// The contract that raised the event.
    pub script_hash: UInt160,
    /// The event's declared name (≤32 UTF-8 bytes in the reference node;
    /// not re-validated here since the manifest ABI check is out of scope).
    pub event_name: String,
    /// The event payload, as pushed onto the stack by the contract.
    pub state: Vec<StackItem>,
}
