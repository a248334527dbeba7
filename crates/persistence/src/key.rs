// Copyright (C) 2015-2026 The Neo Project.
//
// key.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `StorageKey`: `(contract_id: i32 LE, key: bytes)` (spec.md §3, §6).
//!
//! Native contracts receive negative IDs (NeoToken -1, GasToken -2, ...);
//! deployed contracts receive monotonically increasing non-negative IDs.

/// A composite storage key addressing one contract's key space.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageKey {
    contract_id: i32,
    key: Vec<u8>,
}

impl StorageKey {
    /// Builds a key for `contract_id` under `key`.
    pub fn new(contract_id: i32, key: impl Into<Vec<u8>>) -> Self {
        Self {
            contract_id,
            key: key.into(),
        }
    }

    /// The owning contract's ID.
    pub fn contract_id(&self) -> i32 {
        self.contract_id
    }

    /// The contract-local key bytes.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Serializes to the on-disk byte form: `contract_id (i32 LE) || key`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.key.len());
        out.extend_from_slice(&self.contract_id.to_le_bytes());
        out.extend_from_slice(&self.key);
        out
    }

    /// Parses the on-disk byte form back into a `StorageKey`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }
        let contract_id = i32::from_le_bytes(bytes[0..4].try_into().unwrap());
        Some(Self {
            contract_id,
            key: bytes[4..].to_vec(),
        })
    }

    /// Builds the byte prefix identifying every key belonging to `contract_id`,
    /// optionally extended with a contract-local sub-prefix.
    pub fn prefix(contract_id: i32, sub_prefix: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + sub_prefix.len());
        out.extend_from_slice(&contract_id.to_le_bytes());
        out.extend_from_slice(sub_prefix);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let key = StorageKey::new(-3, vec![1, 2, 3]);
        let bytes = key.to_bytes();
        assert_eq!(StorageKey::from_bytes(&bytes).unwrap(), key);
    }

    #[test]
    fn prefix_matches_key_bytes_prefix() {
        let key = StorageKey::new(-1, vec![9, 9]);
        let prefix = StorageKey::prefix(-1, &[9]);
        assert!(key.to_bytes().starts_with(&prefix));
    }
}
