// Copyright (C) 2015-2026 The Neo Project.
//
// syscalls.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The fixed table of syscalls a script may invoke (spec.md §4.3).
//!
//! `SYSCALL` carries a 4-byte method hash rather than a name; the reference
//! node derives it from the first four bytes of `SHA256(ascii name)`. This
//! crate does the same so a compiled script's hash is reproducible from its
//! source name without needing a live name registry at decode time.

use neo_cryptography::hash::sha256;
use neo_vm::CallFlags;

/// Computes the 4-byte little-endian syscall hash for `name`.
pub fn syscall_hash(name: &str) -> u32 {
    let digest = sha256(name.as_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// One entry in the syscall table: its name (for diagnostics), gas price,
/// and the call flags a script must hold to invoke it.
#[derive(Debug, Clone, Copy)]
pub struct SyscallDescriptor {
    pub name: &'static str,
    pub price: i64,
    pub required_flags: CallFlags,
}

macro_rules! syscalls {
    ($($name:literal => ($price:expr, $flags:expr)),* $(,)?) => {
        /// Every registered syscall, in declaration order.
        pub const SYSCALLS: &[SyscallDescriptor] = &[
            $(SyscallDescriptor { name: $name, price: $price, required_flags: $flags }),*
        ];
    };
}

syscalls! {
    "System.Contract.Call" => (1 << 15, CallFlags::ALLOW_CALL),
    "System.Contract.GetCallFlags" => (1 << 10, CallFlags::NONE),
    "System.Contract.CreateStandardAccount" => (1 << 8, CallFlags::NONE),
    "System.Runtime.Platform" => (1 << 3, CallFlags::NONE),
    "System.Runtime.GetTrigger" => (1 << 3, CallFlags::NONE),
    "System.Runtime.GetTime" => (1 << 3, CallFlags::NONE),
    "System.Runtime.GetScriptContainer" => (1 << 3, CallFlags::NONE),
    "System.Runtime.GetExecutingScriptHash" => (1 << 3, CallFlags::NONE),
    "System.Runtime.GetCallingScriptHash" => (1 << 3, CallFlags::NONE),
    "System.Runtime.GetEntryScriptHash" => (1 << 3, CallFlags::NONE),
    "System.Runtime.CheckWitness" => (1 << 10, CallFlags::NONE),
    "System.Runtime.GetNotifications" => (1 << 8, CallFlags::NONE),
    "System.Runtime.GasLeft" => (1 << 4, CallFlags::NONE),
    "System.Runtime.BurnGas" => (1 << 4, CallFlags::NONE),
    "System.Runtime.Notify" => (1 << 15, CallFlags::ALLOW_NOTIFY),
    "System.Runtime.Log" => (1 << 15, CallFlags::ALLOW_NOTIFY),
    "System.Storage.GetContext" => (1 << 4, CallFlags::READ_STATES),
    "System.Storage.GetReadOnlyContext" => (1 << 4, CallFlags::READ_STATES),
    "System.Storage.Get" => (1 << 15, CallFlags::READ_STATES),
    "System.Storage.Put" => (1 << 15, CallFlags::WRITE_STATES),
    "System.Storage.Delete" => (1 << 15, CallFlags::WRITE_STATES),
    "System.Storage.Find" => (1 << 15, CallFlags::READ_STATES),
    "System.Crypto.CheckSig" => (1 << 15, CallFlags::NONE),
    "System.Crypto.CheckMultisig" => (1 << 16, CallFlags::NONE),
}

/// Looks up a syscall's descriptor by its 4-byte hash.
pub fn lookup(hash: u32) -> Option<&'static SyscallDescriptor> {
    SYSCALLS.iter().find(|d| syscall_hash(d.name) == hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_syscall_round_trips_its_hash() {
        for descriptor in SYSCALLS {
            let hash = syscall_hash(descriptor.name);
            assert_eq!(lookup(hash).unwrap().name, descriptor.name);
        }
    }
}
