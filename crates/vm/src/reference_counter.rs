// Copyright (C) 2015-2026 The Neo Project.
//
// reference_counter.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Engine-owned item-count bound (spec.md §9: "reference counting for
//! cycle detection is an explicit engine-owned counter, not
//! object-embedded").
//!
//! Compound items (`Array`/`Struct`/`Map`/`Buffer`) are `Rc<RefCell<_>>`
//! internally, so Rust's own reference counting already reclaims memory
//! when the last handle to a sub-graph is dropped — including cycles that
//! become unreachable from every execution context, since `Rc` cycles that
//! are unreachable from the *stacks* still count against the bound below
//! even if the Rust allocator won't free them. `ReferenceCounter` does not
//! need to replicate cycle collection; it only needs to bound how many
//! stack-item slots the engine is willing to account for at once, which it
//! does by counting every push/pop of a compound item's *elements* as they
//! are walked, rather than via a live incremental graph count.
use crate::error::{VmError, VmResult};

/// Maximum number of items the reference counter will allow the engine to
/// account for across every stack and compound item (spec.md §4.2).
pub const MAX_STACK_SIZE: usize = 2048;

/// Tracks how many stack-item slots are currently charged against
/// `MAX_STACK_SIZE`, shared by every execution context in one engine.
#[derive(Debug, Default)]
pub struct ReferenceCounter {
    count: usize,
}

impl ReferenceCounter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self { count: 0 }
    }

    /// Current count.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Charges `n` additional items, failing if the bound would be exceeded.
    pub fn add(&mut self, n: usize) -> VmResult<()> {
        let new_count = self.count + n;
        if new_count > MAX_STACK_SIZE {
            return Err(VmError::LimitExceeded {
                message: format!("stack item count {new_count} exceeds MaxStackSize {MAX_STACK_SIZE}"),
            });
        }
        self.count = new_count;
        Ok(())
    }

    /// Releases `n` previously charged items.
    pub fn remove(&mut self, n: usize) {
        self.count = self.count.saturating_sub(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_growth_past_max_stack_size() {
        let mut counter = ReferenceCounter::new();
        counter.add(MAX_STACK_SIZE).unwrap();
        assert!(counter.add(1).is_err());
    }

    #[test]
    fn remove_frees_capacity_for_future_adds() {
        let mut counter = ReferenceCounter::new();
        counter.add(MAX_STACK_SIZE).unwrap();
        counter.remove(10);
        assert!(counter.add(5).is_ok());
    }
}
