// Copyright (C) 2015-2026 The Neo Project.
//
// execution_engine.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The fetch-decode-execute loop (spec.md §4.2). `ExecutionEngine` handles
//! every opcode that doesn't leave the VM layer; `SYSCALL` is handed to a
//! caller-supplied [`SyscallHandler`] so the application-engine layer
//! (native contracts, storage, notifications) never has to live inside
//! this crate.

use crate::call_flags::CallFlags;
use crate::error::{VmError, VmResult};
use crate::evaluation_stack::EvaluationStack;
use crate::execution_context::ExecutionContext;
use crate::gas_table::opcode_price;
use crate::op_code::OpCode;
use crate::reference_counter::ReferenceCounter;
use crate::script::Script;
use crate::stack_item::{index_to_usize, StackItem};
use crate::vm_state::VMState;
use num_bigint::BigInt;
use num_traits::{Pow, Signed, ToPrimitive, Zero};
use std::cell::RefCell;
use std::rc::Rc;

/// Handles `SYSCALL` instructions on behalf of the engine. The
/// application-engine layer implements this to dispatch to native
/// contracts and interop services (spec.md §4.3); a bare `ExecutionEngine`
/// with no handler faults on the first `SYSCALL` it meets.
pub trait SyscallHandler {
    /// Executes the syscall identified by `method_hash`, manipulating
    /// `engine`'s current context's evaluation stack directly.
    fn on_syscall(&mut self, engine: &mut ExecutionEngine, method_hash: u32) -> VmResult<()>;

    /// Additional gas price for this syscall, charged before `on_syscall`
    /// runs (native contract syscalls vary widely in price).
    fn syscall_price(&self, method_hash: u32) -> i64;
}

/// A `SyscallHandler` that faults on every syscall, used when the VM runs
/// in isolation (e.g. unit tests that never reach `SYSCALL`).
pub struct NoSyscalls;

impl SyscallHandler for NoSyscalls {
    fn on_syscall(&mut self, _engine: &mut ExecutionEngine, method_hash: u32) -> VmResult<()> {
        Err(VmError::UnknownSyscall(method_hash))
    }

    fn syscall_price(&self, _method_hash: u32) -> i64 {
        0
    }
}

/// The stack-machine interpreter. Owns the invocation stack of
/// [`ExecutionContext`]s, the shared [`ReferenceCounter`], gas accounting,
/// and the terminal [`VMState`].
pub struct ExecutionEngine {
    state: VMState,
    invocation_stack: Vec<ExecutionContext>,
    result_stack: Vec<StackItem>,
    reference_counter: Rc<RefCell<ReferenceCounter>>,
    gas_consumed: i64,
    gas_limit: i64,
}

impl ExecutionEngine {
    /// Creates an engine with the given gas limit in datoshi and no loaded
    /// script; call [`ExecutionEngine::load_script`] before
    /// [`ExecutionEngine::execute`].
    pub fn new(gas_limit: i64) -> Self {
        Self {
            state: VMState::BREAK,
            invocation_stack: Vec::new(),
            result_stack: Vec::new(),
            reference_counter: Rc::new(RefCell::new(ReferenceCounter::new())),
            gas_consumed: 0,
            gas_limit,
        }
    }

    /// Current engine state.
    pub fn state(&self) -> VMState {
        self.state
    }

    /// Total gas spent so far.
    pub fn gas_consumed(&self) -> i64 {
        self.gas_consumed
    }

    /// The engine's total gas budget, as given to [`ExecutionEngine::new`].
    pub fn gas_limit(&self) -> i64 {
        self.gas_limit
    }

    /// Pushes a new context running `script` onto the invocation stack.
    pub fn load_script(&mut self, script: Script, call_flags: CallFlags) {
        self.invocation_stack.push(ExecutionContext::new(
            script,
            call_flags,
            self.reference_counter.clone(),
        ));
        self.state = VMState::NONE;
    }

    /// The innermost (currently running) context.
    pub fn current_context(&self) -> Option<&ExecutionContext> {
        self.invocation_stack.last()
    }

    /// Mutable handle to the innermost context.
    pub fn current_context_mut(&mut self) -> Option<&mut ExecutionContext> {
        self.invocation_stack.last_mut()
    }

    /// Whole invocation stack, outermost first.
    pub fn invocation_stack(&self) -> &[ExecutionContext] {
        &self.invocation_stack
    }

    /// Items left on the result stack once the engine halts.
    pub fn result_stack(&self) -> &[StackItem] {
        &self.result_stack
    }

    /// Runs until `HALT`, `FAULT`, or `BREAK`, dispatching `SYSCALL` to
    /// `syscalls`. Each call resumes from wherever the engine last
    /// stopped, so a `BREAK` state (not used by this crate directly, but
    /// left available for a future debugger) can be single-stepped by
    /// calling [`ExecutionEngine::execute_next`] in a loop instead.
    pub fn execute(&mut self, syscalls: &mut dyn SyscallHandler) -> VMState {
        if self.invocation_stack.is_empty() {
            self.fault(VmError::InvalidContext {
                message: "execute called with no loaded script".into(),
            });
            return self.state;
        }
        self.state = VMState::NONE;
        while self.state == VMState::NONE {
            self.execute_next(syscalls);
        }
        self.state
    }

    /// Executes exactly one instruction, updating `self.state` if the
    /// engine terminates.
    fn execute_next(&mut self, syscalls: &mut dyn SyscallHandler) {
        if self.invocation_stack.is_empty() {
            self.state = VMState::HALT;
            return;
        }
        let context = self.invocation_stack.last().expect("checked non-empty");
        if context.at_end() {
            self.handle_return();
            return;
        }
        let instruction = match context.script.instruction_at(context.instruction_pointer) {
            Ok(instr) => instr,
            Err(err) => {
                self.fault(err);
                return;
            }
        };

        let price = if instruction.opcode == OpCode::Syscall {
            let hash = u32::from_le_bytes(instruction.operand[..4].try_into().unwrap_or_default());
            opcode_price(instruction.opcode) + syscalls.syscall_price(hash)
        } else {
            opcode_price(instruction.opcode)
        };
        if let Err(err) = self.charge_gas(price) {
            self.fault(err);
            return;
        }

        let next_position = instruction.next_position;
        self.invocation_stack.last_mut().unwrap().instruction_pointer = next_position;

        let result = self.dispatch(instruction.opcode, &instruction.operand, syscalls);
        match result {
            Ok(()) => {
                if self.invocation_stack.is_empty() {
                    self.state = VMState::HALT;
                }
            }
            Err(err) => self.handle_fault_or_catch(err),
        }
    }

    fn charge_gas(&mut self, price: i64) -> VmResult<()> {
        let remaining = self.gas_limit - self.gas_consumed;
        if price > remaining {
            return Err(VmError::OutOfGas {
                needed: price,
                remaining,
            });
        }
        self.gas_consumed += price;
        Ok(())
    }

    fn fault(&mut self, _err: VmError) {
        self.state = VMState::FAULT;
    }

    /// Attempts to route `err` to an open `TRY` frame in the current (or
    /// an enclosing) context; faults the whole engine if none catches it
    /// (spec.md §4.2 "uncaught exceptions fault the outer engine").
    fn handle_fault_or_catch(&mut self, err: VmError) {
        loop {
            let Some(context) = self.invocation_stack.last_mut() else {
                self.fault(err);
                return;
            };
            if let Some(target) = context.unwind_to_catch() {
                context.instruction_pointer = target;
                return;
            }
            if self.invocation_stack.len() == 1 {
                self.fault(err);
                return;
            }
            self.invocation_stack.pop();
        }
    }

    /// Pops the current context; if it was the last one, moves its
    /// evaluation stack contents to the result stack and halts.
    fn handle_return(&mut self) {
        let context = self.invocation_stack.pop().expect("checked non-empty");
        let EvaluationStackSalvage(mut items) = EvaluationStackSalvage::take(context.evaluation_stack);
        if self.invocation_stack.is_empty() {
            self.result_stack.append(&mut items);
            self.state = VMState::HALT;
        } else if let Some(caller) = self.invocation_stack.last_mut() {
            for item in items {
                let _ = caller.evaluation_stack.push(item);
            }
        }
    }

    fn dispatch(&mut self, opcode: OpCode, operand: &[u8], syscalls: &mut dyn SyscallHandler) -> VmResult<()> {
        use OpCode::*;
        match opcode {
            PushInt8 | PushInt16 | PushInt32 | PushInt64 | PushInt128 | PushInt256 => {
                self.push(StackItem::Integer(BigInt::from_signed_bytes_le(operand)))
            }
            PushT => self.push(StackItem::Boolean(true)),
            PushF => self.push(StackItem::Boolean(false)),
            PushNull => self.push(StackItem::Null),
            PushM1 => self.push(StackItem::Integer(BigInt::from(-1))),
            Push0 | Push1 | Push2 | Push3 | Push4 | Push5 | Push6 | Push7 | Push8 | Push9
            | Push10 | Push11 | Push12 | Push13 | Push14 | Push15 | Push16 => {
                let n = opcode as i64 - Push0 as i64;
                self.push(StackItem::Integer(BigInt::from(n)))
            }
            PushData1 | PushData2 | PushData4 => self.push(StackItem::byte_string(operand.to_vec())),
            PushA => {
                let offset = i32::from_le_bytes(operand.try_into().unwrap_or_default());
                let position = self.context_mut()?.instruction_pointer as i64 + offset as i64 - 5;
                self.push(StackItem::Pointer {
                    script_hash: [0u8; 20],
                    position: position.max(0) as u32,
                })
            }

            Nop => Ok(()),
            Jmp | JmpL => self.jump_relative(operand),
            JmpIf | JmpIfL => self.jump_if(operand, true),
            JmpIfNot | JmpIfNotL => self.jump_if(operand, false),
            JmpEq | JmpEqL => self.jump_compare(operand, |o| o == std::cmp::Ordering::Equal),
            JmpNe | JmpNeL => self.jump_compare(operand, |o| o != std::cmp::Ordering::Equal),
            JmpGt | JmpGtL => self.jump_compare(operand, |o| o == std::cmp::Ordering::Greater),
            JmpGe | JmpGeL => self.jump_compare(operand, |o| o != std::cmp::Ordering::Less),
            JmpLt | JmpLtL => self.jump_compare(operand, |o| o == std::cmp::Ordering::Less),
            JmpLe | JmpLeL => self.jump_compare(operand, |o| o != std::cmp::Ordering::Greater),
            Call | CallL => self.call_relative(operand),
            Ret => {
                self.handle_return();
                Ok(())
            }
            Abort => Err(VmError::Aborted {
                message: "ABORT executed".into(),
            }),
            Assert => {
                let value = self.pop()?;
                if value.as_bool() {
                    Ok(())
                } else {
                    Err(VmError::Aborted {
                        message: "ASSERT popped a falsy value".into(),
                    })
                }
            }
            Throw => Err(VmError::UnhandledException),
            Try | TryL => {
                let wide = matches!(opcode, TryL);
                let (catch_offset, finally_offset) = if wide {
                    (
                        i32::from_le_bytes(operand[0..4].try_into().unwrap()),
                        i32::from_le_bytes(operand[4..8].try_into().unwrap()),
                    )
                } else {
                    (operand[0] as i8 as i32, operand[1] as i8 as i32)
                };
                let operand_len = if wide { 8 } else { 2 };
                let base = self.context()?.instruction_pointer as i64 - 1 - operand_len;
                let catch_pointer = if catch_offset != 0 { Some((base + catch_offset as i64) as usize) } else { None };
                let finally_pointer = if finally_offset != 0 { Some((base + finally_offset as i64) as usize) } else { None };
                let end_pointer = self.context()?.instruction_pointer;
                self.context_mut()?.enter_try(catch_pointer, finally_pointer, end_pointer)
            }
            EndTry | EndTryL => {
                let wide = matches!(opcode, EndTryL);
                let offset = decode_offset(operand);
                let operand_len = if wide { 4 } else { 1 };
                let base = self.context()?.instruction_pointer as i64 - 1 - operand_len;
                let end_target = (base + offset as i64) as usize;
                let frame = self.context_mut()?.exit_try().ok_or(VmError::InvalidContext {
                    message: "ENDTRY with no open try frame".into(),
                })?;
                if let Some(finally) = frame.finally_pointer {
                    self.context_mut()?.set_pending_finally_return(end_target);
                    self.context_mut()?.instruction_pointer = finally;
                } else {
                    self.context_mut()?.instruction_pointer = end_target;
                }
                Ok(())
            }
            EndFinally => {
                match self.context_mut()?.take_pending_finally_return() {
                    Some(target) => {
                        self.context_mut()?.instruction_pointer = target;
                        Ok(())
                    }
                    None => Err(VmError::UnhandledException),
                }
            }
            Syscall => {
                let hash = u32::from_le_bytes(operand.try_into().unwrap_or_default());
                syscalls.on_syscall(self, hash)
            }
            CallA | CallT => Err(VmError::InvalidContext {
                message: "CALLA/CALLT require application-engine support".into(),
            }),

            Depth => {
                let len = self.context()?.evaluation_stack.len() as i64;
                self.push(StackItem::Integer(BigInt::from(len)))
            }
            Drop => {
                self.pop()?;
                Ok(())
            }
            Nip => {
                self.context_mut()?.evaluation_stack.remove(1)?;
                Ok(())
            }
            Xdrop => {
                let n = index_to_usize(&self.pop()?.as_int()?)?;
                self.context_mut()?.evaluation_stack.remove(n)?;
                Ok(())
            }
            Clear => {
                self.context_mut()?.evaluation_stack.clear();
                Ok(())
            }
            Dup => {
                let top = self.context()?.evaluation_stack.peek(0)?;
                self.push(top)
            }
            Over => {
                let item = self.context()?.evaluation_stack.peek(1)?;
                self.push(item)
            }
            Pick => {
                let n = index_to_usize(&self.pop()?.as_int()?)?;
                let item = self.context()?.evaluation_stack.peek(n)?;
                self.push(item)
            }
            Tuck => {
                let top = self.context()?.evaluation_stack.peek(0)?;
                self.context_mut()?.evaluation_stack.insert(2, top)
            }
            Swap => {
                let a = self.context_mut()?.evaluation_stack.remove(1)?;
                self.push(a)
            }
            Rot => {
                let a = self.context_mut()?.evaluation_stack.remove(2)?;
                self.push(a)
            }
            Roll => {
                let n = index_to_usize(&self.pop()?.as_int()?)?;
                let item = self.context_mut()?.evaluation_stack.remove(n)?;
                self.push(item)
            }
            Reverse3 => self.reverse_top(3),
            Reverse4 => self.reverse_top(4),
            ReverseN => {
                let n = index_to_usize(&self.pop()?.as_int()?)?;
                self.reverse_top(n)
            }

            InitSSlot => {
                self.context_mut()?.init_static_fields(operand[0] as usize);
                Ok(())
            }
            InitSlot => {
                let local_count = operand[0] as usize;
                let arg_count = operand[1] as usize;
                self.context_mut()?.init_local_variables(local_count);
                self.context_mut()?.init_arguments(arg_count);
                for i in (0..arg_count).rev() {
                    let value = self.pop()?;
                    let context = self.context()?;
                    if let Some(args) = &context.arguments {
                        args.borrow_mut()[i] = value;
                    }
                }
                Ok(())
            }
            LdSFld0 | LdSFld => self.load_slot(Slot::Static, opcode_index(opcode, LdSFld0, LdSFld, operand)),
            StSFld0 | StSFld => self.store_slot(Slot::Static, opcode_index(opcode, StSFld0, StSFld, operand)),
            LdLoc0 | LdLoc => self.load_slot(Slot::Local, opcode_index(opcode, LdLoc0, LdLoc, operand)),
            StLoc0 | StLoc => self.store_slot(Slot::Local, opcode_index(opcode, StLoc0, StLoc, operand)),
            LdArg0 | LdArg => self.load_slot(Slot::Argument, opcode_index(opcode, LdArg0, LdArg, operand)),
            StArg0 | StArg => self.store_slot(Slot::Argument, opcode_index(opcode, StArg0, StArg, operand)),

            NewBuffer => {
                let size = index_to_usize(&self.pop()?.as_int()?)?;
                self.push(StackItem::buffer(vec![0u8; size]))
            }
            MemCpy => {
                let count = index_to_usize(&self.pop()?.as_int()?)?;
                let src_index = index_to_usize(&self.pop()?.as_int()?)?;
                let src = self.pop()?.as_bytes()?;
                let dst_index = index_to_usize(&self.pop()?.as_int()?)?;
                let dst_item = self.pop()?;
                if let StackItem::Buffer(buf) = &dst_item {
                    let mut buf = buf.borrow_mut();
                    if src_index + count > src.len() || dst_index + count > buf.len() {
                        return Err(VmError::LimitExceeded {
                            message: "MEMCPY range out of bounds".into(),
                        });
                    }
                    buf[dst_index..dst_index + count].copy_from_slice(&src[src_index..src_index + count]);
                    Ok(())
                } else {
                    Err(VmError::InvalidCast { from: dst_item.type_name(), to: "Buffer" })
                }
            }
            Cat => {
                let b = self.pop()?.as_bytes()?;
                let a = self.pop()?.as_bytes()?;
                let mut out = a;
                out.extend_from_slice(&b);
                self.push(StackItem::byte_string(out))
            }
            Substr => {
                let count = index_to_usize(&self.pop()?.as_int()?)?;
                let index = index_to_usize(&self.pop()?.as_int()?)?;
                let bytes = self.pop()?.as_bytes()?;
                let end = index.checked_add(count).ok_or(VmError::LimitExceeded { message: "SUBSTR overflow".into() })?;
                let slice = bytes.get(index..end).ok_or(VmError::LimitExceeded { message: "SUBSTR out of range".into() })?;
                self.push(StackItem::byte_string(slice.to_vec()))
            }
            Left => {
                let count = index_to_usize(&self.pop()?.as_int()?)?;
                let bytes = self.pop()?.as_bytes()?;
                let slice = bytes.get(..count).ok_or(VmError::LimitExceeded { message: "LEFT out of range".into() })?;
                self.push(StackItem::byte_string(slice.to_vec()))
            }
            Right => {
                let count = index_to_usize(&self.pop()?.as_int()?)?;
                let bytes = self.pop()?.as_bytes()?;
                let start = bytes.len().checked_sub(count).ok_or(VmError::LimitExceeded { message: "RIGHT out of range".into() })?;
                self.push(StackItem::byte_string(bytes[start..].to_vec()))
            }

            Invert => {
                let value = self.pop()?.as_int()?;
                self.push(StackItem::Integer(!value))
            }
            And => self.binary_int(|a, b| a & b),
            Or => self.binary_int(|a, b| a | b),
            Xor => self.binary_int(|a, b| a ^ b),
            Equal => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(StackItem::Boolean(a.vm_eq(&b)))
            }
            NotEqual => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(StackItem::Boolean(!a.vm_eq(&b)))
            }

            Sign => {
                let value = self.pop()?.as_int()?;
                let sign = if value.is_zero() { 0 } else if value.is_negative() { -1 } else { 1 };
                self.push(StackItem::Integer(BigInt::from(sign)))
            }
            Abs => {
                let value = self.pop()?.as_int()?;
                self.push(StackItem::Integer(value.abs()))
            }
            Negate => {
                let value = self.pop()?.as_int()?;
                self.push(StackItem::Integer(-value))
            }
            Inc => {
                let value = self.pop()?.as_int()?;
                self.push(StackItem::Integer(value + 1))
            }
            Dec => {
                let value = self.pop()?.as_int()?;
                self.push(StackItem::Integer(value - 1))
            }
            Add => self.binary_int(|a, b| a + b),
            Sub => self.binary_int(|a, b| a - b),
            Mul => self.binary_int(|a, b| a * b),
            Div => self.checked_binary_int(|a, b| if b.is_zero() { None } else { Some(a / b) }),
            Mod => self.checked_binary_int(|a, b| if b.is_zero() { None } else { Some(a % b) }),
            Pow => {
                let exponent = self.pop()?.as_int()?;
                let base = self.pop()?.as_int()?;
                let exponent = exponent.to_u32().ok_or(VmError::InvalidCast { from: "Integer", to: "exponent" })?;
                self.push(StackItem::Integer(num_traits::Pow::pow(base, exponent)))
            }
            Sqrt => {
                let value = self.pop()?.as_int()?;
                if value.is_negative() {
                    return Err(VmError::InvalidCast { from: "Integer", to: "sqrt operand" });
                }
                let magnitude = value.to_biguint().expect("checked non-negative");
                self.push(StackItem::Integer(BigInt::from(magnitude.sqrt())))
            }
            ModMul => {
                let modulus = self.pop()?.as_int()?;
                let b = self.pop()?.as_int()?;
                let a = self.pop()?.as_int()?;
                if modulus.is_zero() {
                    return Err(VmError::InvalidCast { from: "Integer", to: "modulus" });
                }
                let product = a * b;
                let euclidean = ((&product % &modulus) + &modulus) % &modulus;
                self.push(StackItem::Integer(euclidean))
            }
            ModPow => {
                let modulus = self.pop()?.as_int()?;
                let exponent = self.pop()?.as_int()?;
                let base = self.pop()?.as_int()?;
                self.push(StackItem::Integer(base.modpow(&exponent, &modulus)))
            }
            Shl => self.binary_int(|a, b| a << b.to_u32().unwrap_or(0)),
            Shr => self.binary_int(|a, b| a >> b.to_u32().unwrap_or(0)),
            Not => {
                let value = self.pop()?;
                self.push(StackItem::Boolean(!value.as_bool()))
            }
            Nz => {
                let value = self.pop()?.as_int()?;
                self.push(StackItem::Boolean(!value.is_zero()))
            }
            NumEqual => self.compare(|o| o == std::cmp::Ordering::Equal),
            NumNotEqual => self.compare(|o| o != std::cmp::Ordering::Equal),
            Lt => self.compare(|o| o == std::cmp::Ordering::Less),
            Le => self.compare(|o| o != std::cmp::Ordering::Greater),
            Gt => self.compare(|o| o == std::cmp::Ordering::Greater),
            Ge => self.compare(|o| o != std::cmp::Ordering::Less),
            Min => {
                let b = self.pop()?.as_int()?;
                let a = self.pop()?.as_int()?;
                self.push(StackItem::Integer(a.min(b)))
            }
            Max => {
                let b = self.pop()?.as_int()?;
                let a = self.pop()?.as_int()?;
                self.push(StackItem::Integer(a.max(b)))
            }
            Within => {
                let max = self.pop()?.as_int()?;
                let min = self.pop()?.as_int()?;
                let value = self.pop()?.as_int()?;
                self.push(StackItem::Boolean(value >= min && value < max))
            }
            BoolAnd => {
                let b = self.pop()?.as_bool();
                let a = self.pop()?.as_bool();
                self.push(StackItem::Boolean(a && b))
            }
            BoolOr => {
                let b = self.pop()?.as_bool();
                let a = self.pop()?.as_bool();
                self.push(StackItem::Boolean(a || b))
            }

            PackMap => {
                let count = index_to_usize(&self.pop()?.as_int()?)?;
                let mut pairs = Vec::with_capacity(count);
                for _ in 0..count {
                    let value = self.pop()?;
                    let key = self.pop()?;
                    pairs.push((key, value));
                }
                self.push(StackItem::Map(Rc::new(RefCell::new(pairs))))
            }
            PackStruct | Pack => {
                let count = index_to_usize(&self.pop()?.as_int()?)?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.pop()?);
                }
                if opcode == PackStruct {
                    self.push(StackItem::new_struct(items))
                } else {
                    self.push(StackItem::array(items))
                }
            }
            Unpack => {
                let item = self.pop()?;
                let items = match item {
                    StackItem::Array(a) | StackItem::Struct(a) => a.borrow().clone(),
                    other => return Err(VmError::InvalidCast { from: other.type_name(), to: "Array" }),
                };
                let count = items.len();
                for value in items {
                    self.push(value)?;
                }
                self.push(StackItem::Integer(BigInt::from(count)))
            }
            NewArray0 => self.push(StackItem::array(Vec::new())),
            NewArray | NewArrayT => {
                let count = index_to_usize(&self.pop()?.as_int()?)?;
                self.push(StackItem::array(vec![StackItem::Null; count]))
            }
            NewStruct0 => self.push(StackItem::new_struct(Vec::new())),
            NewStruct => {
                let count = index_to_usize(&self.pop()?.as_int()?)?;
                self.push(StackItem::new_struct(vec![StackItem::Null; count]))
            }
            NewMap => self.push(StackItem::Map(Rc::new(RefCell::new(Vec::new())))),
            Size => {
                let item = self.pop()?;
                let size = match &item {
                    StackItem::ByteString(b) => b.len(),
                    StackItem::Buffer(b) => b.borrow().len(),
                    StackItem::Array(a) | StackItem::Struct(a) => a.borrow().len(),
                    StackItem::Map(m) => m.borrow().len(),
                    other => return Err(VmError::InvalidCast { from: other.type_name(), to: "sized type" }),
                };
                self.push(StackItem::Integer(BigInt::from(size)))
            }
            HasKey => {
                let key = self.pop()?;
                let item = self.pop()?;
                let found = match &item {
                    StackItem::Array(a) | StackItem::Struct(a) => {
                        let index = index_to_usize(&key.as_int()?)?;
                        index < a.borrow().len()
                    }
                    StackItem::Map(m) => m.borrow().iter().any(|(k, _)| k.vm_eq(&key)),
                    other => return Err(VmError::InvalidCast { from: other.type_name(), to: "keyed type" }),
                };
                self.push(StackItem::Boolean(found))
            }
            Keys => {
                let item = self.pop()?;
                match item {
                    StackItem::Map(m) => self.push(StackItem::array(m.borrow().iter().map(|(k, _)| k.clone()).collect())),
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "Map" }),
                }
            }
            Values => {
                let item = self.pop()?;
                match item {
                    StackItem::Map(m) => self.push(StackItem::array(m.borrow().iter().map(|(_, v)| v.clone()).collect())),
                    StackItem::Array(a) | StackItem::Struct(a) => self.push(StackItem::array(a.borrow().clone())),
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "Map or Array" }),
                }
            }
            PickItem => {
                let key = self.pop()?;
                let item = self.pop()?;
                match &item {
                    StackItem::Array(a) | StackItem::Struct(a) => {
                        let index = index_to_usize(&key.as_int()?)?;
                        let value = a.borrow().get(index).cloned().ok_or(VmError::LimitExceeded { message: "PICKITEM index out of range".into() })?;
                        self.push(value)
                    }
                    StackItem::Map(m) => {
                        let value = m.borrow().iter().find(|(k, _)| k.vm_eq(&key)).map(|(_, v)| v.clone());
                        self.push(value.ok_or(VmError::LimitExceeded { message: "PICKITEM key not found".into() })?)
                    }
                    StackItem::ByteString(b) => {
                        let index = index_to_usize(&key.as_int()?)?;
                        let byte = *b.get(index).ok_or(VmError::LimitExceeded { message: "PICKITEM index out of range".into() })?;
                        self.push(StackItem::Integer(BigInt::from(byte)))
                    }
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "indexable type" }),
                }
            }
            Append => {
                let value = self.pop()?;
                let item = self.pop()?;
                match item {
                    StackItem::Array(a) | StackItem::Struct(a) => {
                        self.reference_counter.borrow_mut().add(value.slot_count())?;
                        a.borrow_mut().push(value);
                        Ok(())
                    }
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "Array" }),
                }
            }
            SetItem => {
                let value = self.pop()?;
                let key = self.pop()?;
                let item = self.pop()?;
                match &item {
                    StackItem::Array(a) | StackItem::Struct(a) => {
                        let index = index_to_usize(&key.as_int()?)?;
                        let mut a = a.borrow_mut();
                        let slot = a.get_mut(index).ok_or(VmError::LimitExceeded { message: "SETITEM index out of range".into() })?;
                        *slot = value;
                        Ok(())
                    }
                    StackItem::Map(m) => {
                        let mut m = m.borrow_mut();
                        if let Some(entry) = m.iter_mut().find(|(k, _)| k.vm_eq(&key)) {
                            entry.1 = value;
                        } else {
                            m.push((key, value));
                        }
                        Ok(())
                    }
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "Array or Map" }),
                }
            }
            ReverseItems => {
                let item = self.pop()?;
                match item {
                    StackItem::Array(a) | StackItem::Struct(a) => {
                        a.borrow_mut().reverse();
                        Ok(())
                    }
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "Array" }),
                }
            }
            Remove => {
                let key = self.pop()?;
                let item = self.pop()?;
                match &item {
                    StackItem::Array(a) | StackItem::Struct(a) => {
                        let index = index_to_usize(&key.as_int()?)?;
                        if index >= a.borrow().len() {
                            return Err(VmError::LimitExceeded { message: "REMOVE index out of range".into() });
                        }
                        a.borrow_mut().remove(index);
                        Ok(())
                    }
                    StackItem::Map(m) => {
                        m.borrow_mut().retain(|(k, _)| !k.vm_eq(&key));
                        Ok(())
                    }
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "Array or Map" }),
                }
            }
            ClearItems => {
                let item = self.pop()?;
                match item {
                    StackItem::Array(a) | StackItem::Struct(a) => {
                        a.borrow_mut().clear();
                        Ok(())
                    }
                    StackItem::Map(m) => {
                        m.borrow_mut().clear();
                        Ok(())
                    }
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "Array or Map" }),
                }
            }
            PopItem => {
                let item = self.pop()?;
                match item {
                    StackItem::Array(a) | StackItem::Struct(a) => {
                        let value = a.borrow_mut().pop().ok_or(VmError::LimitExceeded { message: "POPITEM on empty array".into() })?;
                        self.push(value)
                    }
                    other => Err(VmError::InvalidCast { from: other.type_name(), to: "Array" }),
                }
            }

            IsNull => {
                let item = self.pop()?;
                self.push(StackItem::Boolean(matches!(item, StackItem::Null)))
            }
            IsType => {
                let expected = operand[0];
                let item = self.pop()?;
                self.push(StackItem::Boolean(stack_item_type_matches(&item, expected)))
            }
            Convert => {
                let target = operand[0];
                let item = self.pop()?;
                self.push(convert_item(item, target)?)
            }
        }
    }

    fn push(&mut self, item: StackItem) -> VmResult<()> {
        self.context_mut()?.evaluation_stack.push(item)
    }

    fn pop(&mut self) -> VmResult<StackItem> {
        self.context_mut()?.evaluation_stack.pop()
    }

    fn context(&self) -> VmResult<&ExecutionContext> {
        self.invocation_stack.last().ok_or(VmError::InvalidContext {
            message: "no active context".into(),
        })
    }

    fn context_mut(&mut self) -> VmResult<&mut ExecutionContext> {
        self.invocation_stack.last_mut().ok_or(VmError::InvalidContext {
            message: "no active context".into(),
        })
    }

    fn reverse_top(&mut self, n: usize) -> VmResult<()> {
        let context = self.context_mut()?;
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(context.evaluation_stack.pop()?);
        }
        for item in items {
            context.evaluation_stack.push(item)?;
        }
        Ok(())
    }

    fn binary_int(&mut self, f: impl FnOnce(BigInt, BigInt) -> BigInt) -> VmResult<()> {
        let b = self.pop()?.as_int()?;
        let a = self.pop()?.as_int()?;
        self.push(StackItem::Integer(f(a, b)))
    }

    fn checked_binary_int(&mut self, f: impl FnOnce(BigInt, BigInt) -> Option<BigInt>) -> VmResult<()> {
        let b = self.pop()?.as_int()?;
        let a = self.pop()?.as_int()?;
        let result = f(a, b).ok_or(VmError::InvalidCast {
            from: "Integer",
            to: "division by zero",
        })?;
        self.push(StackItem::Integer(result))
    }

    fn compare(&mut self, f: impl FnOnce(std::cmp::Ordering) -> bool) -> VmResult<()> {
        let b = self.pop()?.as_int()?;
        let a = self.pop()?.as_int()?;
        self.push(StackItem::Boolean(f(a.cmp(&b))))
    }

    fn jump_relative(&mut self, operand: &[u8]) -> VmResult<()> {
        let offset = decode_offset(operand);
        self.apply_jump(offset, operand.len())
    }

    fn jump_if(&mut self, operand: &[u8], want: bool) -> VmResult<()> {
        let condition = self.pop()?.as_bool();
        if condition == want {
            self.jump_relative(operand)
        } else {
            Ok(())
        }
    }

    fn jump_compare(&mut self, operand: &[u8], f: impl FnOnce(std::cmp::Ordering) -> bool) -> VmResult<()> {
        let b = self.pop()?.as_int()?;
        let a = self.pop()?.as_int()?;
        if f(a.cmp(&b)) {
            self.jump_relative(operand)
        } else {
            Ok(())
        }
    }

    fn apply_jump(&mut self, offset: i32, operand_len: usize) -> VmResult<()> {
        let context = self.context_mut()?;
        let instruction_start = context.instruction_pointer as i64 - 1 - operand_len as i64;
        let target = instruction_start + offset as i64;
        if target < 0 || target as usize > context.script.len() {
            return Err(VmError::InvalidScript {
                message: format!("jump target {target} out of range"),
            });
        }
        context.instruction_pointer = target as usize;
        Ok(())
    }

    fn call_relative(&mut self, operand: &[u8]) -> VmResult<()> {
        let offset = decode_offset(operand);
        let context = self.context()?;
        let instruction_start = context.instruction_pointer as i64 - 1 - operand.len() as i64;
        let target = (instruction_start + offset as i64) as usize;
        let script = context.script.clone();
        let call_flags = context.call_flags;
        let mut new_context = ExecutionContext::new(script, call_flags, self.reference_counter.clone());
        new_context.instruction_pointer = target;
        self.invocation_stack.push(new_context);
        Ok(())
    }

    fn load_slot(&mut self, slot: Slot, index: usize) -> VmResult<()> {
        let context = self.context()?;
        let table = slot.table(context).ok_or(VmError::InvalidContext {
            message: "slot table not initialized".into(),
        })?;
        let value = table.borrow().get(index).cloned().ok_or(VmError::InvalidContext {
            message: "slot index out of range".into(),
        })?;
        self.push(value)
    }

    fn store_slot(&mut self, slot: Slot, index: usize) -> VmResult<()> {
        let value = self.pop()?;
        let context = self.context()?;
        let table = slot.table(context).ok_or(VmError::InvalidContext {
            message: "slot table not initialized".into(),
        })?;
        let mut table = table.borrow_mut();
        let entry = table.get_mut(index).ok_or(VmError::InvalidContext {
            message: "slot index out of range".into(),
        })?;
        *entry = value;
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Static,
    Local,
    Argument,
}

impl Slot {
    fn table(self, context: &ExecutionContext) -> Option<crate::execution_context::SlotsRef> {
        match self {
            Slot::Static => context.static_fields.clone(),
            Slot::Local => context.local_variables.clone(),
            Slot::Argument => context.arguments.clone(),
        }
    }
}

fn opcode_index(actual: OpCode, zero_variant: OpCode, indexed_variant: OpCode, operand: &[u8]) -> usize {
    if actual == zero_variant {
        0
    } else {
        debug_assert_eq!(actual, indexed_variant);
        operand[0] as usize
    }
}

fn decode_offset(operand: &[u8]) -> i32 {
    if operand.len() == 1 {
        operand[0] as i8 as i32
    } else {
        i32::from_le_bytes(operand.try_into().unwrap_or_default())
    }
}

fn stack_item_type_matches(item: &StackItem, type_code: u8) -> bool {
    // Matches the reference VM's StackItemType byte values.
    matches!(
        (type_code, item),
        (0x00, StackItem::Null)
            | (0x10, StackItem::Boolean(_))
            | (0x20, StackItem::Integer(_))
            | (0x30, StackItem::ByteString(_))
            | (0x40, StackItem::Buffer(_))
            | (0x50, StackItem::Array(_))
            | (0x60, StackItem::Struct(_))
            | (0x70, StackItem::Map(_))
            | (0x80, StackItem::InteropInterface(_))
            | (0x28, StackItem::Pointer { .. })
    )
}

fn convert_item(item: StackItem, type_code: u8) -> VmResult<StackItem> {
    match type_code {
        0x00 => Ok(StackItem::Null),
        0x10 => Ok(StackItem::Boolean(item.as_bool())),
        0x20 => Ok(StackItem::Integer(item.as_int()?)),
        0x30 => Ok(StackItem::byte_string(item.as_bytes()?)),
        0x40 => Ok(StackItem::buffer(item.as_bytes()?)),
        other => Err(VmError::InvalidCast {
            from: item.type_name(),
            to: match other {
                0x50 => "Array",
                0x60 => "Struct",
                0x70 => "Map",
                _ => "unknown StackItemType",
            },
        }),
    }
}

struct EvaluationStackSalvage(Vec<StackItem>);

impl EvaluationStackSalvage {
    /// Drains `stack` bottom-to-top. Each `pop()` discharges the item's
    /// slot count; callers that move these items onto another stack via
    /// `push()` recharge them there, so nothing is ever double-counted.
    fn take(mut stack: EvaluationStack) -> Self {
        let mut items = Vec::with_capacity(stack.len());
        while let Ok(item) = stack.pop() {
            items.push(item);
        }
        items.reverse();
        Self(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Script;

    fn run(bytes: Vec<u8>, gas_limit: i64) -> ExecutionEngine {
        let mut engine = ExecutionEngine::new(gas_limit);
        engine.load_script(Script::new(bytes), CallFlags::ALL);
        engine.execute(&mut NoSyscalls);
        engine
    }

    #[test]
    fn push_and_add_halts_with_expected_result() {
        let engine = run(vec![OpCode::Push1 as u8, OpCode::Push2 as u8, OpCode::Add as u8, OpCode::Ret as u8], 1_000_000);
        assert_eq!(engine.state(), VMState::HALT);
        assert_eq!(engine.result_stack().len(), 1);
        assert!(engine.result_stack()[0].vm_eq(&StackItem::Integer(3.into())));
    }

    #[test]
    fn division_by_zero_faults() {
        let engine = run(vec![OpCode::Push1 as u8, OpCode::Push0 as u8, OpCode::Div as u8, OpCode::Ret as u8], 1_000_000);
        assert_eq!(engine.state(), VMState::FAULT);
    }

    #[test]
    fn exact_gas_limit_halts_one_less_faults() {
        let script = vec![OpCode::Push1 as u8, OpCode::Ret as u8];
        let exact_cost = opcode_price(OpCode::Push1) + opcode_price(OpCode::Ret);
        let halted = run(script.clone(), exact_cost);
        assert_eq!(halted.state(), VMState::HALT);
        let faulted = run(script, exact_cost - 1);
        assert_eq!(faulted.state(), VMState::FAULT);
    }

    #[test]
    fn throw_with_no_try_frame_faults_the_engine() {
        let engine = run(vec![OpCode::Throw as u8], 1_000_000);
        assert_eq!(engine.state(), VMState::FAULT);
    }

    #[test]
    fn assert_on_falsy_value_faults() {
        let engine = run(vec![OpCode::Push0 as u8, OpCode::Assert as u8], 1_000_000);
        assert_eq!(engine.state(), VMState::FAULT);
    }

    #[test]
    fn array_append_and_pickitem_round_trip() {
        let engine = run(
            vec![
                OpCode::NewArray0 as u8,
                OpCode::Push5 as u8,
                OpCode::Append as u8,
                OpCode::Push0 as u8,
                OpCode::PickItem as u8,
                OpCode::Ret as u8,
            ],
            1_000_000,
        );
        assert_eq!(engine.state(), VMState::HALT);
        assert!(engine.result_stack()[0].vm_eq(&StackItem::Integer(5.into())));
    }
}
