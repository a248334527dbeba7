// Copyright (C) 2015-2026 The Neo Project.
//
// address.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Base58Check address encoding for `UInt160` script hashes.
//!
//! The payload is `version_byte || script_hash`, Base58Check-encoded with a
//! 4-byte `Hash256` checksum, matching the reference node's
//! `Helper.ToAddress`/`Helper.ToScriptHash`.

use crate::error::CryptoError;
use crate::hash::hash256;
use neo_primitives::UInt160;

/// Encodes a script hash as a Base58Check address for the given address
/// version byte (spec.md §6 config: address version is network-specific).
pub fn encode_address(script_hash: &UInt160, version: u8) -> String {
    let mut payload = Vec::with_capacity(1 + UInt160::LEN);
    payload.push(version);
    payload.extend_from_slice(script_hash.as_bytes());
    encode_check(&payload)
}

/// Decodes a Base58Check address, verifying the version byte matches and
/// returning the contained script hash.
pub fn decode_address(address: &str, expected_version: u8) -> Result<UInt160, CryptoError> {
    let payload = decode_check(address)?;
    if payload.len() != 1 + UInt160::LEN {
        return Err(CryptoError::InvalidEncoding {
            message: format!("unexpected address payload length {}", payload.len()),
        });
    }
    if payload[0] != expected_version {
        return Err(CryptoError::InvalidEncoding {
            message: format!("address version {} does not match network {}", payload[0], expected_version),
        });
    }
    UInt160::from_bytes(&payload[1..]).map_err(|e| CryptoError::InvalidEncoding {
        message: e.to_string(),
    })
}

/// Base58Check-encodes arbitrary `data`, appending a 4-byte `Hash256` checksum.
pub fn encode_check(data: &[u8]) -> String {
    let checksum = hash256(data);
    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum.as_bytes()[..4]);
    bs58::encode(payload).into_string()
}

/// Decodes and verifies a Base58Check string, returning the payload with
/// the checksum stripped.
pub fn decode_check(s: &str) -> Result<Vec<u8>, CryptoError> {
    let decoded = bs58::decode(s)
        .into_vec()
        .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
    if decoded.len() < 4 {
        return Err(CryptoError::PayloadTooShort);
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - 4);
    let expected = hash256(payload);
    if &expected.as_bytes()[..4] != checksum {
        return Err(CryptoError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_round_trips() {
        let hash = UInt160::zero();
        let addr = encode_address(&hash, 0x35);
        let decoded = decode_address(&addr, 0x35).unwrap();
        assert_eq!(decoded, hash);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let hash = UInt160::zero();
        let addr = encode_address(&hash, 0x35);
        assert!(decode_address(&addr, 0x17).is_err());
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let hash = UInt160::zero();
        let mut addr = encode_address(&hash, 0x35).into_bytes();
        // Flip the last base58 character to corrupt the checksum.
        *addr.last_mut().unwrap() ^= 1;
        let addr = String::from_utf8(addr).unwrap();
        assert!(decode_check(&addr).is_err());
    }
}
