// Copyright (C) 2015-2026 The Neo Project.
//
// ecdsa.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! ECDSA sign/verify over the two curves Neo N3 supports: secp256r1 (the
//! default, used by `System.Crypto.CheckSig`) and secp256k1 (accepted for
//! interoperability with other ecosystems, spec.md §2 C2).
//!
//! Signatures are the raw `r || s` 64-byte form used on Neo's wire, not
//! DER — matching the reference node's `Crypto.VerifySignature`.

use crate::error::CryptoError;
use k256::ecdsa::signature::hazmat::{PrehashSigner as K256PrehashSigner, PrehashVerifier as K256PrehashVerifier};
use k256::ecdsa::{Signature as K256Signature, SigningKey as K256SigningKey, VerifyingKey as K256VerifyingKey};
use p256::ecdsa::signature::hazmat::{PrehashSigner as P256PrehashSigner, PrehashVerifier as P256PrehashVerifier};
use p256::ecdsa::{Signature as P256Signature, SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use sha2::{Digest, Sha256};

/// The named curve a public key / signature pair is interpreted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// NIST P-256, Neo N3's default signing curve.
    Secp256r1,
    /// secp256k1, accepted for cross-chain compatibility.
    Secp256k1,
}

/// Signs `message`'s SHA-256 digest with `private_key` (32 bytes), returning
/// the raw `r || s` signature.
pub fn sign(message: &[u8], private_key: &[u8], curve: Curve) -> Result<Vec<u8>, CryptoError> {
    let digest: [u8; 32] = Sha256::digest(message).into();
    match curve {
        Curve::Secp256r1 => {
            let key = P256SigningKey::from_slice(private_key)
                .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
            let sig: P256Signature = P256PrehashSigner::sign_prehash(&key, &digest)
                .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
            Ok(sig.to_bytes().to_vec())
        }
        Curve::Secp256k1 => {
            let key = K256SigningKey::from_slice(private_key)
                .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
            let sig: K256Signature = K256PrehashSigner::sign_prehash(&key, &digest)
                .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
            Ok(sig.to_bytes().to_vec())
        }
    }
}

/// Verifies a raw `r || s` signature over `message`'s SHA-256 digest against
/// `public_key` (compressed or uncompressed SEC1 encoding).
///
/// Returns `Ok(false)` rather than an error for a structurally valid but
/// non-matching signature; malformed encodings are `Err`.
pub fn verify(
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
    curve: Curve,
) -> Result<bool, CryptoError> {
    let digest: [u8; 32] = Sha256::digest(message).into();
    match curve {
        Curve::Secp256r1 => {
            let key = P256VerifyingKey::from_sec1_bytes(public_key)
                .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
            let sig = P256Signature::from_slice(signature)
                .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
            Ok(key.verify_prehash(&digest, &sig).is_ok())
        }
        Curve::Secp256k1 => {
            let key = K256VerifyingKey::from_sec1_bytes(public_key)
                .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
            let sig = K256Signature::from_slice(signature)
                .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
            Ok(key.verify_prehash(&digest, &sig).is_ok())
        }
    }
}

/// Derives the compressed SEC1 public key for a secp256r1 private key.
pub fn derive_public_key_secp256r1(private_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key = P256SigningKey::from_slice(private_key)
        .map_err(|e| CryptoError::InvalidEncoding { message: e.to_string() })?;
    Ok(key.verifying_key().to_encoded_point(true).as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips_secp256r1() {
        let sk = p256::ecdsa::SigningKey::random(&mut rand::thread_rng());
        let sk_bytes = sk.to_bytes();
        let pk = derive_public_key_secp256r1(&sk_bytes).unwrap();
        let message = b"neo dbft";
        let sig = sign(message, &sk_bytes, Curve::Secp256r1).unwrap();
        assert!(verify(message, &sig, &pk, Curve::Secp256r1).unwrap());
    }

    #[test]
    fn tampered_message_fails_verification() {
        let sk = p256::ecdsa::SigningKey::random(&mut rand::thread_rng());
        let sk_bytes = sk.to_bytes();
        let pk = derive_public_key_secp256r1(&sk_bytes).unwrap();
        let sig = sign(b"original", &sk_bytes, Curve::Secp256r1).unwrap();
        assert!(!verify(b"tampered", &sig, &pk, Curve::Secp256r1).unwrap());
    }
}
