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

//! Cryptographic facade (spec.md §2 C2). Wraps external crates (`sha2`,
//! `ripemd`, `p256`, `k256`, `bs58`) behind the named operations spec.md
//! treats as an external collaborator: `Hash160`/`Hash256`, ECDSA
//! sign/verify over secp256r1 and secp256k1, and Base58Check address
//! encoding. BLS12-381 and scrypt/PBKDF2 are out of scope here — nothing
//! in the ledger/VM/consensus core calls them (wallet key derivation and
//! Oracle/NeoFS BLS signatures are outside this spec's scope per §1).

pub mod address;
pub mod ecdsa;
pub mod error;
pub mod hash;

pub use address::{decode_address, decode_check, encode_address, encode_check};
pub use ecdsa::Curve;
pub use error::CryptoError;
pub use hash::{hash160, hash256, ripemd160, sha256};
