// Copyright (C) 2015-2026 The Neo Project.
//
// witness_scope.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `WitnessScope`: how far a transaction signer's witness extends (spec.md
//! §3). Lives in this crate rather than `neo-ledger` because `CheckWitness`
//! — the only thing that interprets these bits — is part of the
//! application engine (spec.md §2 C5); `neo-ledger::Signer` reuses this type
//! for its `scopes` field.

use bitflags::bitflags;

bitflags! {
    /// The set of contracts a signer's witness is considered valid for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WitnessScope: u8 {
        /// The witness is never considered valid (a signer with only fee
        /// obligations, no authorization).
        const NONE = 0x00;
        /// Valid only when the currently executing contract was invoked
        /// directly by the entry script (not via a nested `CALL`).
        const CALLED_BY_ENTRY = 0x01;
        /// Valid for the explicit contract hashes in `allowed_contracts`.
        const CUSTOM_CONTRACTS = 0x10;
        /// Valid for contracts belonging to one of `allowed_groups`.
        const CUSTOM_GROUPS = 0x20;
        /// Valid subject to the signer's witness rule tree (rule evaluation
        /// beyond boolean contract/group membership is out of scope here).
        const WITNESS_RULES = 0x40;
        /// Valid everywhere. Mutually exclusive with every other bit.
        const GLOBAL = 0x80;
    }
}

impl WitnessScope {
    /// `Global` may not be combined with any other scope bit (spec.md §3).
    pub fn is_valid_combination(self) -> bool {
        !(self.contains(WitnessScope::GLOBAL) && self != WitnessScope::GLOBAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_rejects_combination_with_other_bits() {
        let combined = WitnessScope::GLOBAL | WitnessScope::CALLED_BY_ENTRY;
        assert!(!combined.is_valid_combination());
        assert!(WitnessScope::GLOBAL.is_valid_combination());
        assert!((WitnessScope::CUSTOM_CONTRACTS | WitnessScope::CUSTOM_GROUPS).is_valid_combination());
    }
}
