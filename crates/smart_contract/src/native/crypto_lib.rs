// Copyright (C) 2015-2026 The Neo Project.
//
// crypto_lib.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `CryptoLib`: hashing and signature verification exposed to scripts
//! beyond the `System.Crypto.*` syscalls (spec.md §4.4) — `CryptoLib`
//! covers curve-parameterized verification and the hash functions scripts
//! need for commit/reveal patterns.

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::native::native_contract::{arg, NativeContract};
use neo_cryptography::ecdsa::Curve;
use neo_cryptography::hash::{hash160, hash256, ripemd160, sha256};
use neo_vm::StackItem;

const ID: i32 = -3;

/// Hashing and curve-parameterized signature verification.
pub struct CryptoLib;

impl CryptoLib {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CryptoLib {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for CryptoLib {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "CryptoLib"
    }

    fn invoke(&self, _engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "sha256" => {
                let data = arg(&args, 0, self.name(), method)?.as_bytes()?;
                Ok(StackItem::byte_string(sha256(&data).to_vec()))
            }
            "ripemd160" => {
                let data = arg(&args, 0, self.name(), method)?.as_bytes()?;
                Ok(StackItem::byte_string(ripemd160(&data).to_vec()))
            }
            "hash160" => {
                let data = arg(&args, 0, self.name(), method)?.as_bytes()?;
                Ok(StackItem::byte_string(hash160(&data).as_bytes().to_vec()))
            }
            "hash256" => {
                let data = arg(&args, 0, self.name(), method)?.as_bytes()?;
                Ok(StackItem::byte_string(hash256(&data).as_bytes().to_vec()))
            }
            "verifyWithECDsa" => {
                let message = arg(&args, 0, self.name(), method)?.as_bytes()?;
                let pubkey = arg(&args, 1, self.name(), method)?.as_bytes()?;
                let signature = arg(&args, 2, self.name(), method)?.as_bytes()?;
                let curve_id = args.get(3).map(|item| item.as_int()).transpose()?;
                let curve = match curve_id.and_then(|v| num_traits::ToPrimitive::to_u8(&v)) {
                    Some(1) => Curve::Secp256k1,
                    _ => Curve::Secp256r1,
                };
                let ok = neo_cryptography::ecdsa::verify(&message, &signature, &pubkey, curve).unwrap_or(false);
                Ok(StackItem::Boolean(ok))
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }
}
