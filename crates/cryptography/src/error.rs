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

//! Errors from the cryptography facade.

use thiserror::Error;

/// Errors raised by hashing, signing or address-encoding operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A public key or signature byte string was the wrong length or not a
    /// valid point/scalar encoding for its curve.
    #[error("invalid key or signature encoding: {message}")]
    InvalidEncoding {
        /// Description of what failed to parse.
        message: String,
    },

    /// Base58Check's trailing checksum did not match its payload.
    #[error("base58check checksum mismatch")]
    ChecksumMismatch,

    /// The decoded Base58 payload was shorter than the checksum alone.
    #[error("base58 payload too short")]
    PayloadTooShort,
}
