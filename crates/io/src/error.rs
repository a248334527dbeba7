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

//! Codec errors. Every variant here is a spec.md §7 `FormatError`: the
//! data on the wire or in storage was malformed. Callers disconnect the
//! peer or reject the record; they never retry.

use neo_primitives::PrimitivesError;
use thiserror::Error;

/// Result alias used throughout the codec.
pub type IoResult<T> = Result<T, IoError>;

/// Errors raised while reading or writing the Neo binary format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IoError {
    /// The reader ran out of bytes before the requested read completed.
    #[error("end of stream: wanted {requested} bytes, {available} remaining")]
    EndOfStream {
        /// Bytes the caller asked to read.
        requested: usize,
        /// Bytes actually left in the buffer.
        available: usize,
    },

    /// A length-prefixed field exceeded its declared maximum.
    #[error("value exceeds maximum size: {actual} > {max}")]
    ExceedsMaximum {
        /// Size the field declared.
        actual: usize,
        /// Maximum permitted by the field's format.
        max: usize,
    },

    /// A primitive codec error (VarInt, fixed-width hash) propagated up.
    #[error(transparent)]
    Primitive(#[from] PrimitivesError),

    /// A string field was not valid UTF-8.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// A value deserialized successfully but failed a structural invariant
    /// (e.g. an enum discriminant with no matching variant).
    #[error("invalid format: {message}")]
    InvalidFormat {
        /// Description of what was wrong.
        message: String,
    },
}
