// Copyright (C) 2015-2026 The Neo Project.
//
// signer.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `Signer`: an account authorizing a transaction, plus the scope its
//! witness is considered valid for (spec.md §3).

use neo_io::{BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use neo_primitives::UInt160;
use neo_smart_contract::WitnessScope;

/// Maximum number of signers on a single transaction (spec.md §3).
pub const MAX_SIGNERS: usize = 16;
const MAX_ALLOWED_CONTRACTS: usize = 16;
const MAX_ALLOWED_GROUPS: usize = 16;

/// One transaction signer and the reach of its witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    pub account: UInt160,
    pub scopes: WitnessScope,
    pub allowed_contracts: Vec<UInt160>,
    pub allowed_groups: Vec<Vec<u8>>,
}

impl Signer {
    /// Builds a signer with `CalledByEntry` scope and no extra grants, the
    /// common case for a transaction's sender.
    pub fn called_by_entry(account: UInt160) -> Self {
        Self {
            account,
            scopes: WitnessScope::CALLED_BY_ENTRY,
            allowed_contracts: Vec::new(),
            allowed_groups: Vec::new(),
        }
    }

    /// Converts into the reduced shape [`neo_smart_contract::ContainerSigner`]
    /// that `CheckWitness` consumes.
    pub fn to_container_signer(&self) -> neo_smart_contract::ContainerSigner {
        neo_smart_contract::ContainerSigner {
            account: self.account,
            scopes: self.scopes,
            allowed_contracts: self.allowed_contracts.clone(),
            allowed_groups: self.allowed_groups.clone(),
        }
    }
}

impl Serializable for Signer {
    fn size(&self) -> usize {
        let mut size = UInt160::LEN + 1;
        if self.scopes.contains(WitnessScope::CUSTOM_CONTRACTS) {
            size += neo_primitives::var_int_size(self.allowed_contracts.len() as u64)
                + self.allowed_contracts.len() * UInt160::LEN;
        }
        if self.scopes.contains(WitnessScope::CUSTOM_GROUPS) {
            size += neo_primitives::var_int_size(self.allowed_groups.len() as u64);
            size += self
                .allowed_groups
                .iter()
                .map(|g| neo_primitives::var_int_size(g.len() as u64) + g.len())
                .sum::<usize>();
        }
        size
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_uint160(&self.account);
        writer.write_u8(self.scopes.bits());
        if self.scopes.contains(WitnessScope::CUSTOM_CONTRACTS) {
            writer.write_var_int(self.allowed_contracts.len() as u64);
            for contract in &self.allowed_contracts {
                writer.write_uint160(contract);
            }
        }
        if self.scopes.contains(WitnessScope::CUSTOM_GROUPS) {
            writer.write_var_int(self.allowed_groups.len() as u64);
            for group in &self.allowed_groups {
                writer.write_var_bytes(group);
            }
        }
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let account = reader.read_uint160()?;
        let scopes = WitnessScope::from_bits(reader.read_u8()?).ok_or_else(|| IoError::InvalidFormat {
            message: "unknown witness scope bit".into(),
        })?;
        if !scopes.is_valid_combination() {
            return Err(IoError::InvalidFormat {
                message: "Global scope cannot be combined with other scopes".into(),
            });
        }
        let allowed_contracts = if scopes.contains(WitnessScope::CUSTOM_CONTRACTS) {
            reader.read_serializable_list_of_uint160(MAX_ALLOWED_CONTRACTS as u64)?
        } else {
            Vec::new()
        };
        let allowed_groups = if scopes.contains(WitnessScope::CUSTOM_GROUPS) {
            let count = reader.read_var_int(MAX_ALLOWED_GROUPS as u64)?;
            let mut groups = Vec::with_capacity(count as usize);
            for _ in 0..count {
                groups.push(reader.read_var_bytes(33)?);
            }
            groups
        } else {
            Vec::new()
        };
        Ok(Self {
            account,
            scopes,
            allowed_contracts,
            allowed_groups,
        })
    }
}

/// Extension used only by [`Signer::deserialize`]; not part of `neo-io`
/// proper since reading a bare list of `UInt160`s (no `Serializable` impl
/// for the primitive itself) is specific to this one wire field.
trait ReadUInt160List {
    fn read_serializable_list_of_uint160(&mut self, max_count: u64) -> IoResult<Vec<UInt160>>;
}

impl ReadUInt160List for MemoryReader<'_> {
    fn read_serializable_list_of_uint160(&mut self, max_count: u64) -> IoResult<Vec<UInt160>> {
        let count = self.read_var_int(max_count)?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(self.read_uint160()?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_io::SerializableExt;

    #[test]
    fn round_trips_called_by_entry() {
        let signer = Signer::called_by_entry(UInt160::from_bytes(&[1u8; 20]).unwrap());
        let bytes = signer.to_array();
        assert_eq!(bytes.len(), signer.size());
        assert_eq!(Signer::from_array(&bytes).unwrap(), signer);
    }

    #[test]
    fn round_trips_with_custom_contracts_and_groups() {
        let signer = Signer {
            account: UInt160::from_bytes(&[2u8; 20]).unwrap(),
            scopes: WitnessScope::CUSTOM_CONTRACTS | WitnessScope::CUSTOM_GROUPS,
            allowed_contracts: vec![UInt160::from_bytes(&[3u8; 20]).unwrap()],
            allowed_groups: vec![vec![1, 2, 3]],
        };
        let bytes = signer.to_array();
        assert_eq!(Signer::from_array(&bytes).unwrap(), signer);
    }

    #[test]
    fn rejects_global_combined_with_other_scopes() {
        let mut bytes = UInt160::zero().as_bytes().to_vec();
        bytes.push((WitnessScope::GLOBAL | WitnessScope::CALLED_BY_ENTRY).bits());
        assert!(Signer::from_array(&bytes).is_err());
    }

    #[test]
    fn rejects_unknown_scope_bits() {
        let mut bytes = UInt160::zero().as_bytes().to_vec();
        bytes.push(0x08); // no defined bit
        assert!(Signer::from_array(&bytes).is_err());
    }
}
