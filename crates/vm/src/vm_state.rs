// Copyright (C) 2015-2026 The Neo Project.
//
// vm_state.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The execution engine's top-level state (spec.md §4.2).

use bitflags::bitflags;

bitflags! {
    /// State of an [`crate::execution_engine::ExecutionEngine`]. `NONE` is
    /// the only state a caller may resume execution from; `HALT`/`FAULT`/
    /// `BREAK` are terminal or suspended states reached via
    /// [`crate::execution_engine::ExecutionEngine::execute`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct VMState: u8 {
        const NONE = 0;
        const HALT = 0b0000_0001;
        const FAULT = 0b0000_0010;
        const BREAK = 0b0000_0100;
    }
}

impl Default for VMState {
    fn default() -> Self {
        VMState::NONE
    }
}

impl VMState {
    /// Whether the engine has stopped running (either outcome).
    pub fn is_terminal(self) -> bool {
        self.intersects(VMState::HALT | VMState::FAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_and_fault_are_terminal_break_is_not() {
        assert!(VMState::HALT.is_terminal());
        assert!(VMState::FAULT.is_terminal());
        assert!(!VMState::BREAK.is_terminal());
        assert!(!VMState::NONE.is_terminal());
    }
}
