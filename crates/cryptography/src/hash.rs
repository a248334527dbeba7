// Copyright (C) 2015-2026 The Neo Project.
//
// hash.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Named hash operations (spec.md §2 C2): `Hash160`, `Hash256`, and the raw
//! SHA-256/RIPEMD-160 primitives they compose.

use neo_primitives::{UInt160, UInt256};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256(data).
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// RIPEMD-160(data).
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// `Hash256(data) = SHA-256(SHA-256(data))`, used for block and transaction
/// identifiers (spec.md §3).
pub fn hash256(data: &[u8]) -> UInt256 {
    let first = sha256(data);
    let second = sha256(&first);
    UInt256::from_bytes(&second).expect("sha256 output is 32 bytes")
}

/// `Hash160(data) = RIPEMD-160(SHA-256(data))`, used to derive script
/// hashes from a verification script (spec.md §3 Witness).
pub fn hash160(data: &[u8]) -> UInt160 {
    let sha = sha256(data);
    let ripemd = ripemd160(&sha);
    UInt160::from_bytes(&ripemd).expect("ripemd160 output is 20 bytes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash256_is_double_sha256() {
        let data = b"neo";
        let expected = sha256(&sha256(data));
        assert_eq!(hash256(data).as_bytes(), &expected);
    }

    #[test]
    fn hash160_is_ripemd_of_sha256() {
        let data = b"neo";
        let expected = ripemd160(&sha256(data));
        assert_eq!(hash160(data).as_bytes(), &expected);
    }
}
