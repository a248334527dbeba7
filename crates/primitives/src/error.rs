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

//! Error types shared by the primitives crate.

use thiserror::Error;

/// Errors produced while constructing or decoding primitive values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitivesError {
    /// A fixed-width byte array was given the wrong number of bytes.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Number of bytes required.
        expected: usize,
        /// Number of bytes actually given.
        actual: usize,
    },

    /// A hex string could not be decoded.
    #[error("invalid hex string: {message}")]
    InvalidHex {
        /// Description of the parse failure.
        message: String,
    },

    /// A VarInt encoding was not in its shortest valid form.
    #[error("non-canonical VarInt encoding")]
    NonCanonicalVarInt,

    /// A VarInt value exceeded the caller-supplied maximum.
    #[error("VarInt value {value} exceeds maximum {max}")]
    VarIntTooLarge {
        /// The decoded value.
        value: u64,
        /// The caller's declared maximum.
        max: u64,
    },

    /// Fixed-point arithmetic would overflow i64.
    #[error("datoshi arithmetic overflow")]
    AmountOverflow,

    /// Fixed-point arithmetic would produce a negative amount where one is
    /// not permitted.
    #[error("negative datoshi amount: {0}")]
    NegativeAmount(i64),
}
