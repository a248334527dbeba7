// Copyright (C) 2015-2026 The Neo Project.
//
// trigger.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `TriggerType`: which phase of block/transaction processing invoked the
//! application engine (spec.md §4.3). Native contracts gate which of their
//! methods may run under each trigger (e.g. `NeoToken::on_persist` only
//! runs under `ON_PERSIST`).

use bitflags::bitflags;

bitflags! {
    /// The circumstance under which a script is executing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TriggerType: u8 {
        /// Runs once per block, before any transaction, reserved for native
        /// housekeeping (e.g. NEO's per-block GAS distribution).
        const ON_PERSIST = 0x01;
        /// Runs once per block, after every transaction has applied.
        const POST_PERSIST = 0x02;
        /// A transaction's witness-verification script (read-only; no storage writes).
        const VERIFICATION = 0x20;
        /// A transaction's entry script, or an RPC `invokefunction` call.
        const APPLICATION = 0x40;
        /// `ON_PERSIST | POST_PERSIST`: the two triggers driven directly by
        /// block persistence rather than an individual transaction.
        const SYSTEM = Self::ON_PERSIST.bits() | Self::POST_PERSIST.bits();
        /// `APPLICATION | VERIFICATION`: triggers a transaction itself drives.
        const ALL = Self::ON_PERSIST.bits() | Self::POST_PERSIST.bits()
            | Self::VERIFICATION.bits() | Self::APPLICATION.bits();
    }
}

impl TriggerType {
    /// Whether storage writes are permitted under this trigger. Verification
    /// is read-only by definition (spec.md §4.5 step 7).
    pub fn allows_writes(self) -> bool {
        self != TriggerType::VERIFICATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_is_read_only() {
        assert!(!TriggerType::VERIFICATION.allows_writes());
        assert!(TriggerType::APPLICATION.allows_writes());
        assert!(TriggerType::ON_PERSIST.allows_writes());
    }

    #[test]
    fn system_excludes_application_and_verification() {
        assert!(!TriggerType::SYSTEM.contains(TriggerType::APPLICATION));
        assert!(!TriggerType::SYSTEM.contains(TriggerType::VERIFICATION));
    }
}
