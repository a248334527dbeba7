// Copyright (C) 2015-2026 The Neo Project.
//
// std_lib.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `StdLib`: stateless data-format helpers scripts otherwise can't
//! implement efficiently in NeoVM bytecode (spec.md §4.4) — JSON, Base58,
//! and Base64 round trips.

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::native::native_contract::{arg, NativeContract};
use neo_vm::StackItem;

const ID: i32 = -2;

/// Stateless data-format conversions.
pub struct StdLib;

impl StdLib {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdLib {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for StdLib {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "StdLib"
    }

    fn invoke(&self, _engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "base64Encode" => {
                let bytes = arg(&args, 0, self.name(), method)?.as_bytes()?;
                Ok(StackItem::byte_string(base64_encode(&bytes).into_bytes()))
            }
            "base64Decode" => {
                let text = arg(&args, 0, self.name(), method)?.as_bytes()?;
                let decoded = base64_decode(&text).map_err(|message| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message,
                })?;
                Ok(StackItem::byte_string(decoded))
            }
            "base58Encode" => {
                let bytes = arg(&args, 0, self.name(), method)?.as_bytes()?;
                Ok(StackItem::byte_string(bs58::encode(bytes).into_string().into_bytes()))
            }
            "base58Decode" => {
                let text = arg(&args, 0, self.name(), method)?.as_bytes()?;
                let decoded = bs58::decode(&text).into_vec().map_err(|e| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: e.to_string(),
                })?;
                Ok(StackItem::byte_string(decoded))
            }
            "itoa" => {
                let value = arg(&args, 0, self.name(), method)?.as_int()?;
                Ok(StackItem::byte_string(value.to_string().into_bytes()))
            }
            "atoi" => {
                let text = arg(&args, 0, self.name(), method)?.as_bytes()?;
                let text = String::from_utf8_lossy(&text);
                let value: num_bigint::BigInt = text.parse().map_err(|_| ContractError::InvalidArguments {
                    contract: self.name().to_string(),
                    method: method.to_string(),
                    message: "not a valid integer".into(),
                })?;
                Ok(StackItem::Integer(value))
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn base64_decode(text: &[u8]) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(text).map_err(|e| e.to_string())
}
