// Copyright (C) 2015-2026 The Neo Project.
//
// call_flags.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Permission bits carried on an execution context and checked by syscalls
//! that touch storage, call other contracts, or emit notifications
//! (spec.md §4.3).

use bitflags::bitflags;

bitflags! {
    /// Capabilities granted to a contract invocation. A callee's effective
    /// flags are the intersection of what the caller passed to
    /// `System.Contract.Call` and the caller's own flags: privileges never
    /// escalate across a call boundary.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CallFlags: u8 {
        const NONE = 0;
        const READ_STATES = 0b0000_0001;
        const WRITE_STATES = 0b0000_0010;
        const ALLOW_CALL = 0b0000_0100;
        const ALLOW_NOTIFY = 0b0000_1000;
        const STATES = Self::READ_STATES.bits() | Self::WRITE_STATES.bits();
        const READ_ONLY = Self::READ_STATES.bits() | Self::ALLOW_CALL.bits();
        const ALL = Self::STATES.bits() | Self::ALLOW_CALL.bits() | Self::ALLOW_NOTIFY.bits();
    }
}

impl Default for CallFlags {
    fn default() -> Self {
        CallFlags::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_excludes_write_states() {
        assert!(!CallFlags::READ_ONLY.contains(CallFlags::WRITE_STATES));
        assert!(CallFlags::READ_ONLY.contains(CallFlags::READ_STATES));
    }

    #[test]
    fn intersection_never_grants_beyond_caller() {
        let caller = CallFlags::READ_STATES | CallFlags::ALLOW_CALL;
        let requested = CallFlags::ALL;
        let effective = caller & requested;
        assert_eq!(effective, caller);
        assert!(!effective.contains(CallFlags::WRITE_STATES));
    }
}
