// Copyright (C) 2015-2026 The Neo Project.
//
// error.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! VM-internal errors. These never reach a caller as a panic: every one of
//! them is converted into a `Fault` [`crate::vm_state::VMState`] by the
//! execution engine (spec.md §4.2 "uncaught exceptions fault the outer
//! engine"), except [`VmError::InvalidScript`], which is a `FormatError`
//! raised before execution even begins.

use thiserror::Error;

/// Result alias used internally by the VM.
pub type VmResult<T> = Result<T, VmError>;

/// A failure during script loading or instruction execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// The script bytes could not be decoded into instructions (e.g. an
    /// operand ran past the end of the script).
    #[error("invalid script: {message}")]
    InvalidScript {
        /// Description of the decode failure.
        message: String,
    },

    /// Remaining gas would go negative (spec.md §4.2 "OutOfGas").
    #[error("out of gas: needed {needed}, remaining {remaining}")]
    OutOfGas {
        /// Datoshi the next opcode/syscall would cost.
        needed: i64,
        /// Datoshi left before the attempted charge.
        remaining: i64,
    },

    /// A stack operation addressed an index beyond the stack's depth.
    #[error("stack underflow: needed {needed} items, had {available}")]
    StackUnderflow {
        /// Items the operation required.
        needed: usize,
        /// Items actually on the stack.
        available: usize,
    },

    /// A push or compound-item mutation would exceed `MaxStackSize` or
    /// `MaxItemSize` (spec.md §4.2).
    #[error("stack or item size limit exceeded: {message}")]
    LimitExceeded {
        /// Which limit was hit and by how much.
        message: String,
    },

    /// A stack item was asked to convert to a type it cannot represent
    /// (e.g. an `Array` as an `Integer`).
    #[error("invalid cast from {from} to {to}")]
    InvalidCast {
        /// Source item type.
        from: &'static str,
        /// Requested target type.
        to: &'static str,
    },

    /// `CALL`/`RET` addressed a context that doesn't exist, or the context
    /// stack was already empty.
    #[error("invalid context operation: {message}")]
    InvalidContext {
        /// Description of the failure.
        message: String,
    },

    /// A `THROW` with no matching `try` frame anywhere on the context stack.
    #[error("unhandled exception")]
    UnhandledException,

    /// A syscall name did not resolve to a registered handler.
    #[error("unknown syscall: {0:#010x}")]
    UnknownSyscall(u32),

    /// `ASSERT` popped a falsy value, or `ABORT` executed.
    #[error("script aborted: {message}")]
    Aborted {
        /// Reason given by `ASSERT`/`ABORT`.
        message: String,
    },
}
