// Copyright (C) 2015-2026 The Neo Project.
//
// lib.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Stack-based interpreter for Neo N3 scripts.
//!
//! This crate implements the instruction set, stack item model, and
//! fetch-decode-execute loop described in spec.md §4.2. It knows nothing
//! about contracts, native methods, or storage — those live in
//! `neo-smart-contract`, which drives this engine through
//! [`execution_engine::SyscallHandler`].

pub mod call_flags;
pub mod error;
pub mod evaluation_stack;
pub mod execution_context;
pub mod execution_engine;
pub mod gas_table;
pub mod op_code;
pub mod reference_counter;
pub mod script;
pub mod stack_item;
pub mod vm_state;

pub use call_flags::CallFlags;
pub use error::{VmError, VmResult};
pub use evaluation_stack::EvaluationStack;
pub use execution_context::{ExceptionHandlingContext, ExceptionHandlingState, ExecutionContext};
pub use execution_engine::{ExecutionEngine, NoSyscalls, SyscallHandler};
pub use op_code::OpCode;
pub use reference_counter::{ReferenceCounter, MAX_STACK_SIZE};
pub use script::{Instruction, Script};
pub use stack_item::{InteropInterface, StackItem, MAX_ITEM_SIZE};
pub use vm_state::VMState;
