// Copyright (C) 2015-2026 The Neo Project.
//
// contract_state.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `ContractState`: a deployed contract's identity, script, and manifest, as
//! persisted by `ContractManagement` (spec.md §4.4).

use neo_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use neo_primitives::UInt160;

/// Declared capabilities of a contract, carried in its manifest. Only the
/// fields the application engine actually consults are modeled; the rest of
/// the NEP-based manifest schema (events, permissions, groups) is outside
/// this spec's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractManifest {
    /// Human-readable contract name, as declared at deployment.
    pub name: String,
    /// Method names the contract exposes, for `System.Contract.Call`
    /// existence checks. A full ABI (parameter/return types) is not modeled.
    pub methods: Vec<String>,
}

impl ContractManifest {
    /// A manifest declaring no methods, used for contracts that only run
    /// `_deploy`.
    pub fn empty(name: impl Into<String>) -> Self {
        Self { name: name.into(), methods: Vec::new() }
    }
}

/// A deployed contract's on-chain record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractState {
    /// The contract's storage-space ID (spec.md §6): negative for natives,
    /// non-negative and monotonically increasing for deployed contracts.
    pub id: i32,
    /// Incremented on every successful `update`; starts at 0 at deploy.
    pub update_counter: u16,
    /// The contract's script hash (`Hash160` of `nef_script`).
    pub hash: UInt160,
    /// The raw VM script this contract runs when called.
    pub nef_script: Vec<u8>,
    /// The contract's declared manifest.
    pub manifest: ContractManifest,
}

impl Serializable for ContractState {
    fn size(&self) -> usize {
        4 + 2 + UInt160::LEN
            + 4 + self.nef_script.len()
            + 4 + self.manifest.name.len()
            + 4 + self.manifest.methods.iter().map(|m| 4 + m.len()).sum::<usize>()
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.id as u32);
        writer.write_u16(self.update_counter);
        writer.write_uint160(&self.hash);
        writer.write_var_bytes(&self.nef_script);
        writer.write_var_bytes(self.manifest.name.as_bytes());
        writer.write_var_int(self.manifest.methods.len() as u64);
        for method in &self.manifest.methods {
            writer.write_var_bytes(method.as_bytes());
        }
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let id = reader.read_u32()? as i32;
        let update_counter = reader.read_u16()?;
        let hash = reader.read_uint160()?;
        let nef_script = reader.read_var_bytes(u16::MAX as usize)?;
        let name = String::from_utf8_lossy(&reader.read_var_bytes(256)?).into_owned();
        let method_count = reader.read_var_int(4096)? as usize;
        let mut methods = Vec::with_capacity(method_count);
        for _ in 0..method_count {
            methods.push(String::from_utf8_lossy(&reader.read_var_bytes(256)?).into_owned());
        }
        Ok(ContractState {
            id,
            update_counter,
            hash,
            nef_script,
            manifest: ContractManifest { name, methods },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_io::SerializableExt;

    #[test]
    fn round_trips_through_bytes() {
        let state = ContractState {
            id: 5,
            update_counter: 2,
            hash: UInt160::zero(),
            nef_script: vec![0x11, 0x22],
            manifest: ContractManifest {
                name: "Example".into(),
                methods: vec!["main".into(), "balanceOf".into()],
            },
        };
        let bytes = state.to_array();
        let back = ContractState::from_array(&bytes).unwrap();
        assert_eq!(back, state);
    }
}
