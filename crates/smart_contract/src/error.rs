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

//! Errors raised by the application engine and native contracts (spec.md §7).

use thiserror::Error;

/// Errors surfaced above the VM layer while running a trigger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// `SYSCALL` named a method hash with no registered handler.
    #[error("unknown syscall 0x{hash:08x}")]
    UnknownSyscall { hash: u32 },

    /// The current call flags don't grant a syscall's required flags.
    #[error("syscall requires call flags {required:?}, context has {actual:?}")]
    MissingCallFlags { required: u8, actual: u8 },

    /// A native contract method name has no match.
    #[error("native contract {contract} has no method {method}")]
    UnknownMethod { contract: String, method: String },

    /// A native contract method was called with the wrong argument shape.
    #[error("native contract {contract}.{method}: {message}")]
    InvalidArguments { contract: String, method: String, message: String },

    /// A CALL targeted a script hash with no deployed or native contract.
    #[error("contract {hash} not found")]
    ContractNotFound { hash: String },

    /// Gas limit exhausted (mirrors `neo_vm::VmError::OutOfGas` above the VM boundary).
    #[error("out of gas")]
    OutOfGas,

    /// A storage value exceeded `MAX_STORAGE_VALUE_SIZE` or a key exceeded
    /// `MAX_STORAGE_KEY_SIZE`.
    #[error("storage {kind} exceeds maximum size")]
    StorageSizeExceeded { kind: &'static str },

    /// Arithmetic overflow in fixed-point/token accounting.
    #[error("arithmetic overflow computing {context}")]
    ArithmeticOverflow { context: String },

    /// A transfer, burn, or other balance mutation was rejected.
    #[error("{0}")]
    InvalidState(String),

    /// The underlying VM faulted.
    #[error("vm fault: {0}")]
    Vm(#[from] neo_vm::VmError),

    /// The backing store failed to commit.
    #[error("store error: {0}")]
    Store(#[from] neo_persistence::StoreError),
}

/// Convenience alias for this crate's fallible operations.
pub type ContractResult<T> = Result<T, ContractError>;
