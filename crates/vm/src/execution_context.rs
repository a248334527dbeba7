// Copyright (C) 2015-2026 The Neo Project.
//
// execution_context.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! One frame of the engine's call stack: an instruction pointer into a
//! [`Script`], its evaluation stack, local/static/argument slots, and the
//! try/catch frames opened by `TRY`/`TRYL` (spec.md §4.2).

use crate::call_flags::CallFlags;
use crate::error::{VmError, VmResult};
use crate::evaluation_stack::EvaluationStack;
use crate::reference_counter::ReferenceCounter;
use crate::script::Script;
use crate::stack_item::StackItem;
use std::cell::RefCell;
use std::rc::Rc;

/// Which part of a `TRY` block is currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionHandlingState {
    Try,
    Catch,
    Finally,
}

/// One open `TRY ... CATCH ... FINALLY ... ENDTRY` frame.
#[derive(Debug, Clone)]
pub struct ExceptionHandlingContext {
    pub catch_pointer: Option<usize>,
    pub finally_pointer: Option<usize>,
    pub end_pointer: usize,
    pub state: ExceptionHandlingState,
}

impl ExceptionHandlingContext {
    pub fn has_catch(&self) -> bool {
        self.catch_pointer.is_some()
    }

    pub fn has_finally(&self) -> bool {
        self.finally_pointer.is_some()
    }
}

/// A shared slot array (locals, statics, or arguments). Shared via `Rc` so
/// `STSFLD`'s writes are visible through every context that was loaded
/// from the same static-field table (static fields are script-scoped, not
/// context-scoped, in the reference VM).
pub type SlotsRef = Rc<RefCell<Vec<StackItem>>>;

/// One frame of the execution engine's call stack.
pub struct ExecutionContext {
    pub script: Script,
    pub instruction_pointer: usize,
    pub evaluation_stack: EvaluationStack,
    pub call_flags: CallFlags,
    pub static_fields: Option<SlotsRef>,
    pub local_variables: Option<SlotsRef>,
    pub arguments: Option<SlotsRef>,
    try_stack: Vec<ExceptionHandlingContext>,
    /// Where `ENDFINALLY` should resume after the currently running
    /// `FINALLY` block completes, when that block was entered via the
    /// normal (non-exceptional) `ENDTRY` path. `None` means the `FINALLY`
    /// block was entered while unwinding an exception, so `ENDFINALLY`
    /// should let the exception keep propagating instead of resuming.
    pending_finally_return: Option<usize>,
}

impl ExecutionContext {
    /// Creates a new frame at instruction 0 with empty slot tables.
    pub fn new(script: Script, call_flags: CallFlags, reference_counter: Rc<RefCell<ReferenceCounter>>) -> Self {
        Self {
            script,
            instruction_pointer: 0,
            evaluation_stack: EvaluationStack::new(reference_counter),
            call_flags,
            static_fields: None,
            local_variables: None,
            arguments: None,
            try_stack: Vec::new(),
            pending_finally_return: None,
        }
    }

    /// Records where `ENDFINALLY` should resume once the finally block it
    /// is about to run completes.
    pub fn set_pending_finally_return(&mut self, target: usize) {
        self.pending_finally_return = Some(target);
    }

    /// Consumes the pending resume target, if any.
    pub fn take_pending_finally_return(&mut self) -> Option<usize> {
        self.pending_finally_return.take()
    }

    /// Whether the instruction pointer has run off the end of the script,
    /// which is equivalent to an implicit `RET` at the outermost context.
    pub fn at_end(&self) -> bool {
        self.instruction_pointer >= self.script.len()
    }

    /// Allocates `count` `Null`-initialized local variable slots
    /// (`INITSLOT`'s local half).
    pub fn init_local_variables(&mut self, count: usize) {
        self.local_variables = Some(Rc::new(RefCell::new(vec![StackItem::Null; count])));
    }

    /// Allocates `count` `Null`-initialized argument slots, populated by
    /// the caller immediately afterward (`INITSLOT`'s argument half).
    pub fn init_arguments(&mut self, count: usize) {
        self.arguments = Some(Rc::new(RefCell::new(vec![StackItem::Null; count])));
    }

    /// Allocates `count` `Null`-initialized static field slots
    /// (`INITSSLOT`).
    pub fn init_static_fields(&mut self, count: usize) {
        self.static_fields = Some(Rc::new(RefCell::new(vec![StackItem::Null; count])));
    }

    /// Pushes a new try frame (`TRY`/`TRYL`).
    pub fn enter_try(&mut self, catch_pointer: Option<usize>, finally_pointer: Option<usize>, end_pointer: usize) -> VmResult<()> {
        if catch_pointer.is_none() && finally_pointer.is_none() {
            return Err(VmError::InvalidScript {
                message: "TRY with neither catch nor finally target".into(),
            });
        }
        self.try_stack.push(ExceptionHandlingContext {
            catch_pointer,
            finally_pointer,
            end_pointer,
            state: ExceptionHandlingState::Try,
        });
        Ok(())
    }

    /// The innermost open try frame, if any.
    pub fn current_try(&self) -> Option<&ExceptionHandlingContext> {
        self.try_stack.last()
    }

    /// The innermost open try frame, mutably.
    pub fn current_try_mut(&mut self) -> Option<&mut ExceptionHandlingContext> {
        self.try_stack.last_mut()
    }

    /// Pops the innermost try frame (`ENDTRY`/`ENDFINALLY` completing).
    pub fn exit_try(&mut self) -> Option<ExceptionHandlingContext> {
        self.try_stack.pop()
    }

    /// Finds and unwinds to the innermost try frame that can catch (has a
    /// `CATCH` target and hasn't already entered its catch/finally), used
    /// by `THROW` and fault propagation. Returns the catch entry point,
    /// popping every frame above and including it that has no catch.
    pub fn unwind_to_catch(&mut self) -> Option<usize> {
        while let Some(frame) = self.try_stack.last() {
            if frame.state == ExceptionHandlingState::Try && frame.has_catch() {
                let pointer = frame.catch_pointer.unwrap();
                self.try_stack.last_mut().unwrap().state = ExceptionHandlingState::Catch;
                return Some(pointer);
            }
            if frame.state != ExceptionHandlingState::Finally && frame.has_finally() {
                let pointer = frame.finally_pointer.unwrap();
                self.try_stack.last_mut().unwrap().state = ExceptionHandlingState::Finally;
                return Some(pointer);
            }
            self.try_stack.pop();
        }
        None
    }

    /// Number of open try frames; used by the engine to decide whether an
    /// uncaught exception escaping this context should fault the whole
    /// engine or merely pop the context (spec.md §4.2).
    pub fn open_try_frame_count(&self) -> usize {
        self.try_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_context(bytes: Vec<u8>) -> ExecutionContext {
        ExecutionContext::new(
            Script::new(bytes),
            CallFlags::ALL,
            Rc::new(RefCell::new(ReferenceCounter::new())),
        )
    }

    #[test]
    fn at_end_is_true_past_script_length() {
        let mut ctx = new_context(vec![0x21]);
        assert!(!ctx.at_end());
        ctx.instruction_pointer = 1;
        assert!(ctx.at_end());
    }

    #[test]
    fn unwind_to_catch_finds_nearest_handler() {
        let mut ctx = new_context(vec![0x21; 20]);
        ctx.enter_try(Some(10), None, 15).unwrap();
        let target = ctx.unwind_to_catch();
        assert_eq!(target, Some(10));
        assert_eq!(ctx.current_try().unwrap().state, ExceptionHandlingState::Catch);
    }

    #[test]
    fn unwind_falls_through_to_finally_when_no_catch() {
        let mut ctx = new_context(vec![0x21; 20]);
        ctx.enter_try(None, Some(12), 15).unwrap();
        let target = ctx.unwind_to_catch();
        assert_eq!(target, Some(12));
    }

    #[test]
    fn try_with_no_targets_is_rejected() {
        let mut ctx = new_context(vec![0x21; 20]);
        assert!(ctx.enter_try(None, None, 15).is_err());
    }
}
