// Copyright (C) 2015-2026 The Neo Project.
//
// evaluation_stack.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Per-context evaluation stack (spec.md §4.2). Indices for `PICK`/`ROLL`/
//! `XDROP` and friends count from the top, matching the reference VM's
//! addressing.

use crate::error::{VmError, VmResult};
use crate::reference_counter::ReferenceCounter;
use crate::stack_item::StackItem;
use std::cell::RefCell;
use std::rc::Rc;

/// A LIFO stack of [`StackItem`]s, charging pushes and discharging pops
/// against a shared [`ReferenceCounter`].
pub struct EvaluationStack {
    items: Vec<StackItem>,
    reference_counter: Rc<RefCell<ReferenceCounter>>,
}

impl EvaluationStack {
    /// Creates an empty stack sharing `reference_counter` with the rest of
    /// the engine's contexts.
    pub fn new(reference_counter: Rc<RefCell<ReferenceCounter>>) -> Self {
        Self {
            items: Vec::new(),
            reference_counter,
        }
    }

    /// Number of items currently on this stack.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes an item, charging its slot count against the shared counter.
    pub fn push(&mut self, item: StackItem) -> VmResult<()> {
        self.reference_counter.borrow_mut().add(item.slot_count())?;
        self.items.push(item);
        Ok(())
    }

    /// Pops the top item, releasing its slot count.
    pub fn pop(&mut self) -> VmResult<StackItem> {
        let item = self.items.pop().ok_or(VmError::StackUnderflow {
            needed: 1,
            available: 0,
        })?;
        self.reference_counter.borrow_mut().remove(item.slot_count());
        Ok(item)
    }

    /// Returns a clone of the item `index` slots from the top (0 = top)
    /// without removing it, as `PICK`/`DUP` do.
    pub fn peek(&self, index: usize) -> VmResult<StackItem> {
        let len = self.items.len();
        if index >= len {
            return Err(VmError::StackUnderflow {
                needed: index + 1,
                available: len,
            });
        }
        Ok(self.items[len - 1 - index].clone())
    }

    /// Removes and returns the item `index` slots from the top, shifting
    /// items above it down (`XDROP`/`ROLL`).
    pub fn remove(&mut self, index: usize) -> VmResult<StackItem> {
        let len = self.items.len();
        if index >= len {
            return Err(VmError::StackUnderflow {
                needed: index + 1,
                available: len,
            });
        }
        let item = self.items.remove(len - 1 - index);
        self.reference_counter.borrow_mut().remove(item.slot_count());
        Ok(item)
    }

    /// Inserts `item` so it ends up `index` slots from the top (`ROLL`'s
    /// reinsertion half), charging its slot count.
    pub fn insert(&mut self, index: usize, item: StackItem) -> VmResult<()> {
        let len = self.items.len();
        if index > len {
            return Err(VmError::StackUnderflow {
                needed: index,
                available: len,
            });
        }
        self.reference_counter.borrow_mut().add(item.slot_count())?;
        self.items.insert(len - index, item);
        Ok(())
    }

    /// Removes every item, releasing all charged slots (used when a
    /// context is disposed).
    pub fn clear(&mut self) {
        let mut counter = self.reference_counter.borrow_mut();
        for item in self.items.drain(..) {
            counter.remove(item.slot_count());
        }
    }
}

impl Drop for EvaluationStack {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_stack() -> EvaluationStack {
        EvaluationStack::new(Rc::new(RefCell::new(ReferenceCounter::new())))
    }

    #[test]
    fn push_then_pop_round_trips_value() {
        let mut stack = new_stack();
        stack.push(StackItem::Integer(7.into())).unwrap();
        let popped = stack.pop().unwrap();
        assert!(popped.vm_eq(&StackItem::Integer(7.into())));
    }

    #[test]
    fn pop_on_empty_stack_is_underflow() {
        let mut stack = new_stack();
        assert!(matches!(stack.pop(), Err(VmError::StackUnderflow { .. })));
    }

    #[test]
    fn remove_shifts_items_above_it() {
        let mut stack = new_stack();
        stack.push(StackItem::Integer(1.into())).unwrap();
        stack.push(StackItem::Integer(2.into())).unwrap();
        stack.push(StackItem::Integer(3.into())).unwrap();
        let removed = stack.remove(1).unwrap();
        assert!(removed.vm_eq(&StackItem::Integer(2.into())));
        assert_eq!(stack.len(), 2);
        assert!(stack.peek(0).unwrap().vm_eq(&StackItem::Integer(3.into())));
        assert!(stack.peek(1).unwrap().vm_eq(&StackItem::Integer(1.into())));
    }

    #[test]
    fn drop_releases_counter_charges() {
        let counter = Rc::new(RefCell::new(ReferenceCounter::new()));
        {
            let mut stack = EvaluationStack::new(counter.clone());
            stack.push(StackItem::Integer(1.into())).unwrap();
            stack.push(StackItem::array(vec![StackItem::Integer(2.into())])).unwrap();
        }
        assert_eq!(counter.borrow().count(), 0);
    }
}
