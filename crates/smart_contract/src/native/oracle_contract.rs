// Copyright (C) 2015-2026 The Neo Project.
//
// oracle_contract.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `OracleContract`: off-chain data requests fulfilled by designated Oracle
//! nodes (spec.md §4.4). Off-chain HTTP retrieval itself is out of scope
//! (spec.md §1 core-node scope); this models the on-chain request/response
//! lifecycle — filing a request with its per-URL id-list, and finalizing it
//! by invoking the originator's callback with the response — plus the
//! committee-gated response-fee setter.

use crate::application_engine::ApplicationEngine;
use crate::error::{ContractError, ContractResult};
use crate::native::native_contract::NativeContract;
use neo_cryptography::hash::hash160;
use neo_primitives::UInt160;
use neo_vm::StackItem;
use num_traits::ToPrimitive;

const ID: i32 = -9;
const PREFIX_REQUEST: u8 = 7;
const PREFIX_REQUEST_ID: u8 = 9;
const PREFIX_ID_LIST: u8 = 8;
const PRICE_KEY: &[u8] = b"Price";
const DEFAULT_PRICE: i64 = 50_000_000;

/// A pending Oracle request: the requesting contract, the URL, and the
/// callback to invoke once a response arrives.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub originator: neo_primitives::UInt160,
    pub url: String,
    pub filter: String,
    pub callback: String,
    pub user_data: Vec<u8>,
    pub gas_for_response: i64,
}

/// Off-chain data requests and their on-chain responses.
pub struct OracleContract;

impl OracleContract {
    pub fn new() -> Self {
        Self
    }

    fn next_request_id(&self, engine: &mut ApplicationEngine) -> ContractResult<u64> {
        let current = engine
            .get_storage(ID, &[PREFIX_REQUEST_ID])
            .map(|bytes| u64::from_le_bytes(bytes.try_into().unwrap_or([0; 8])))
            .unwrap_or(0);
        let next = current + 1;
        engine.put_storage(ID, vec![PREFIX_REQUEST_ID], next.to_le_bytes().to_vec())?;
        Ok(next)
    }

    fn request_key(id: u64) -> Vec<u8> {
        let mut key = vec![PREFIX_REQUEST];
        key.extend_from_slice(&id.to_le_bytes());
        key
    }

    fn id_list_key(url: &str) -> Vec<u8> {
        let mut key = vec![PREFIX_ID_LIST];
        key.extend_from_slice(hash160(url.as_bytes()).as_bytes());
        key
    }

    /// Every pending request id filed against `url`, oldest first.
    pub fn requests_by_url(&self, engine: &ApplicationEngine, url: &str) -> Vec<u64> {
        engine
            .get_storage(ID, &Self::id_list_key(url))
            .map(|bytes| bytes.chunks_exact(8).map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap())).collect())
            .unwrap_or_default()
    }

    fn save_requests_by_url(&self, engine: &mut ApplicationEngine, url: &str, ids: &[u64]) -> ContractResult<()> {
        if ids.is_empty() {
            return engine.delete_storage(ID, &Self::id_list_key(url));
        }
        let mut bytes = Vec::with_capacity(ids.len() * 8);
        for id in ids {
            bytes.extend_from_slice(&id.to_le_bytes());
        }
        engine.put_storage(ID, Self::id_list_key(url), bytes)
    }

    pub fn price(&self, engine: &ApplicationEngine) -> i64 {
        engine
            .get_storage(ID, PRICE_KEY)
            .map(|bytes| i64::from_le_bytes(bytes.try_into().unwrap_or([0; 8])))
            .unwrap_or(DEFAULT_PRICE)
    }
}

impl Default for OracleContract {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for OracleContract {
    fn id(&self) -> i32 {
        ID
    }

    fn name(&self) -> &'static str {
        "OracleContract"
    }

    fn invoke(&self, engine: &mut ApplicationEngine, method: &str, args: Vec<StackItem>) -> ContractResult<StackItem> {
        match method {
            "getPrice" => Ok(StackItem::Integer(self.price(engine).into())),
            "setPrice" => {
                let committee = crate::native::neo_token::committee_address(engine);
                if !engine.check_witness(&committee) {
                    return Err(ContractError::InvalidState("requires committee witness".into()));
                }
                let value = crate::native::fungible::int_arg(&args, 0, self.name(), method)?;
                engine.put_storage(ID, PRICE_KEY.to_vec(), value.to_signed_bytes_le())?;
                Ok(StackItem::Null)
            }
            "request" => {
                let url = String::from_utf8_lossy(&crate::native::native_contract::arg(&args, 0, self.name(), method)?.as_bytes()?).into_owned();
                let filter = args.get(1).map(|item| item.as_bytes()).transpose()?.map(|b| String::from_utf8_lossy(&b).into_owned()).unwrap_or_default();
                let callback = String::from_utf8_lossy(&crate::native::native_contract::arg(&args, 2, self.name(), method)?.as_bytes()?).into_owned();
                let user_data = args.get(3).map(|item| item.as_bytes()).transpose()?.unwrap_or_default();
                let gas_for_response = crate::native::fungible::int_arg(&args, 4, self.name(), method)
                    .ok()
                    .and_then(|v| num_traits::ToPrimitive::to_i64(&v))
                    .unwrap_or(0);
                let id = self.next_request_id(engine)?;
                let request = OracleRequest {
                    originator: engine.current_script_hash(),
                    url: url.clone(),
                    filter,
                    callback,
                    user_data,
                    gas_for_response,
                };
                let encoded = encode_request(&request);
                engine.put_storage(ID, Self::request_key(id), encoded)?;
                let mut ids = self.requests_by_url(engine, &url);
                ids.push(id);
                self.save_requests_by_url(engine, &url, &ids)?;
                Ok(StackItem::Integer((id as i64).into()))
            }
            "finish" => {
                let id = crate::native::fungible::int_arg(&args, 0, self.name(), method)?
                    .to_u64()
                    .ok_or_else(|| ContractError::InvalidArguments {
                        contract: self.name().to_string(),
                        method: method.to_string(),
                        message: "request id out of range".into(),
                    })?;
                let code = crate::native::fungible::int_arg(&args, 1, self.name(), method)?;
                let result = crate::native::native_contract::arg(&args, 2, self.name(), method)?.as_bytes()?;

                let encoded = engine.get_storage(ID, &Self::request_key(id)).ok_or_else(|| {
                    ContractError::InvalidState(format!("no pending oracle request #{id}"))
                })?;
                let request = decode_request(&encoded)
                    .ok_or_else(|| ContractError::InvalidState(format!("corrupt oracle request #{id}")))?;

                engine.delete_storage(ID, &Self::request_key(id))?;
                let mut ids = self.requests_by_url(engine, &request.url);
                ids.retain(|&stored| stored != id);
                self.save_requests_by_url(engine, &request.url, &ids)?;

                let callback_args = vec![
                    StackItem::Integer((id as i64).into()),
                    StackItem::Integer(code),
                    StackItem::byte_string(result),
                    StackItem::byte_string(request.user_data.clone()),
                ];
                engine.call_contract(request.originator, &request.callback, callback_args)?;
                Ok(StackItem::Boolean(true))
            }
            _ => Err(ContractError::UnknownMethod { contract: self.name().to_string(), method: method.to_string() }),
        }
    }
}

fn decode_request(bytes: &[u8]) -> Option<OracleRequest> {
    let mut offset = 0usize;
    let originator = UInt160::from_bytes(bytes.get(offset..offset + UInt160::LEN)?).ok()?;
    offset += UInt160::LEN;

    let mut fields = Vec::with_capacity(3);
    for _ in 0..3 {
        let len = u32::from_le_bytes(bytes.get(offset..offset + 4)?.try_into().ok()?) as usize;
        offset += 4;
        fields.push(String::from_utf8(bytes.get(offset..offset + len)?.to_vec()).ok()?);
        offset += len;
    }

    let user_data_len = u32::from_le_bytes(bytes.get(offset..offset + 4)?.try_into().ok()?) as usize;
    offset += 4;
    let user_data = bytes.get(offset..offset + user_data_len)?.to_vec();
    offset += user_data_len;

    let gas_for_response = i64::from_le_bytes(bytes.get(offset..offset + 8)?.try_into().ok()?);

    Some(OracleRequest {
        originator,
        url: fields[0].clone(),
        filter: fields[1].clone(),
        callback: fields[2].clone(),
        user_data,
        gas_for_response,
    })
}

fn encode_request(request: &OracleRequest) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(request.originator.as_bytes());
    for field in [&request.url, &request.filter, &request.callback] {
        out.extend_from_slice(&(field.len() as u32).to_le_bytes());
        out.extend_from_slice(field.as_bytes());
    }
    out.extend_from_slice(&(request.user_data.len() as u32).to_le_bytes());
    out.extend_from_slice(&request.user_data);
    out.extend_from_slice(&request.gas_for_response.to_le_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::contract_management::ContractManagement;
    use crate::trigger::TriggerType;
    use neo_persistence::{MemoryStore, Store};
    use num_bigint::BigInt;

    #[test]
    fn request_then_finish_invokes_the_originators_callback() {
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();

        let nef_script = vec![0x40]; // RET
        let originator = hash160(&nef_script);
        {
            let mut deploy_engine =
                ApplicationEngine::new(TriggerType::APPLICATION, snapshot.as_mut(), UInt160::zero(), None, vec![], 0, 0, 0);
            ContractManagement::new()
                .invoke(
                    &mut deploy_engine,
                    "deploy",
                    vec![StackItem::byte_string(nef_script.clone()), StackItem::byte_string(b"Callback".to_vec())],
                )
                .unwrap();
        }

        let oracle = OracleContract::new();
        let mut engine =
            ApplicationEngine::new(TriggerType::APPLICATION, snapshot.as_mut(), originator, None, vec![], 0, 0, 0);

        let request_args = vec![
            StackItem::byte_string(b"https://example.com/price".to_vec()),
            StackItem::byte_string(b"$.price".to_vec()),
            StackItem::byte_string(b"onPrice".to_vec()),
            StackItem::byte_string(b"userdata".to_vec()),
            StackItem::Integer(BigInt::from(1_000_000)),
        ];
        let id = match oracle.invoke(&mut engine, "request", request_args).unwrap() {
            StackItem::Integer(n) => n.to_u64().unwrap(),
            _ => panic!("expected an integer id"),
        };
        assert_eq!(oracle.requests_by_url(&engine, "https://example.com/price"), vec![id]);

        let finish_args = vec![
            StackItem::Integer(BigInt::from(id)),
            StackItem::Integer(BigInt::from(0)),
            StackItem::byte_string(b"{\"price\":1}".to_vec()),
        ];
        let result = oracle.invoke(&mut engine, "finish", finish_args).unwrap();
        assert!(result.as_bool());
        assert!(oracle.requests_by_url(&engine, "https://example.com/price").is_empty());
    }

    #[test]
    fn finish_on_an_unknown_request_id_errors() {
        let store = MemoryStore::new();
        let mut snapshot = store.snapshot();
        let oracle = OracleContract::new();
        let mut engine =
            ApplicationEngine::new(TriggerType::APPLICATION, snapshot.as_mut(), UInt160::zero(), None, vec![], 0, 0, 0);
        let finish_args =
            vec![StackItem::Integer(BigInt::from(42)), StackItem::Integer(BigInt::from(0)), StackItem::byte_string(vec![])];
        assert!(oracle.invoke(&mut engine, "finish", finish_args).is_err());
    }
}
