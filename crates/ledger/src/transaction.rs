// Copyright (C) 2015-2026 The Neo Project.
//
// transaction.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `Transaction`: one signed, fee-paying unit of work (spec.md §3).

use crate::attribute::Attribute;
use crate::error::{LedgerError, LedgerResult};
use crate::signer::{Signer, MAX_SIGNERS};
use crate::witness::Witness;
use neo_cryptography::hash::sha256;
use neo_io::{BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use neo_primitives::UInt256;
use std::collections::HashSet;

/// Maximum serialized size of a transaction (spec.md §3).
pub const MAX_TRANSACTION_SIZE: usize = 102_400;
/// Maximum number of attributes on a transaction (spec.md §3).
pub const MAX_TRANSACTION_ATTRIBUTES: usize = 16;
/// Maximum byte length of a transaction's script.
pub const MAX_SCRIPT_LENGTH: usize = 65_535;
const CURRENT_VERSION: u8 = 0;

/// A signed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u8,
    pub nonce: u32,
    pub system_fee: i64,
    pub network_fee: i64,
    pub valid_until_block: u32,
    pub signers: Vec<Signer>,
    pub attributes: Vec<Attribute>,
    pub script: Vec<u8>,
    pub witnesses: Vec<Witness>,
}

impl Transaction {
    /// The sender is the first signer (spec.md §3), the account whose
    /// witness must cover `system_fee + network_fee`.
    pub fn sender(&self) -> Option<neo_primitives::UInt160> {
        self.signers.first().map(|s| s.account)
    }

    /// Bytes hashed to produce [`Transaction::hash`]: every field except
    /// the witnesses (spec.md §3).
    fn unsigned_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        self.serialize_unsigned(&mut writer);
        writer.into_bytes()
    }

    fn serialize_unsigned(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.version);
        writer.write_u32(self.nonce);
        writer.write_i64(self.system_fee);
        writer.write_i64(self.network_fee);
        writer.write_u32(self.valid_until_block);
        writer.write_var_int(self.signers.len() as u64);
        for signer in &self.signers {
            signer.serialize(writer);
        }
        writer.write_var_int(self.attributes.len() as u64);
        for attribute in &self.attributes {
            attribute.serialize(writer);
        }
        writer.write_var_bytes(&self.script);
    }

    fn unsigned_size(&self) -> usize {
        1 + 4
            + 8
            + 8
            + 4
            + neo_primitives::var_int_size(self.signers.len() as u64)
            + self.signers.iter().map(Serializable::size).sum::<usize>()
            + neo_primitives::var_int_size(self.attributes.len() as u64)
            + self.attributes.iter().map(Serializable::size).sum::<usize>()
            + neo_primitives::var_int_size(self.script.len() as u64)
            + self.script.len()
    }

    /// `Hash256` of the unsigned portion of the transaction (spec.md §3).
    pub fn hash(&self) -> UInt256 {
        let digest = sha256(&sha256(&self.unsigned_bytes()));
        UInt256::from_bytes(&digest).expect("sha256 output is 32 bytes")
    }

    /// `network_fee / size`, the priority metric the mempool orders by
    /// (spec.md §4.6).
    pub fn fee_per_byte(&self) -> i64 {
        let size = self.size() as i64;
        if size == 0 {
            0
        } else {
            self.network_fee / size
        }
    }

    /// Structural checks independent of any ledger state (spec.md §4.5
    /// step 1): field ranges, signer/attribute/script bounds, and the
    /// one-witness-per-signer rule.
    pub fn verify_structure(&self) -> LedgerResult<()> {
        if self.version != CURRENT_VERSION {
            return Err(LedgerError::InvalidTransaction { message: format!("unsupported version {}", self.version) });
        }
        if self.system_fee < 0 {
            return Err(LedgerError::InvalidTransaction { message: "system_fee must not be negative".into() });
        }
        if self.network_fee < 0 {
            return Err(LedgerError::InvalidTransaction { message: "network_fee must not be negative".into() });
        }
        if self.signers.is_empty() || self.signers.len() > MAX_SIGNERS {
            return Err(LedgerError::InvalidTransaction { message: "signer count out of range".into() });
        }
        let mut seen_accounts = HashSet::with_capacity(self.signers.len());
        for signer in &self.signers {
            if !seen_accounts.insert(signer.account) {
                return Err(LedgerError::InvalidTransaction { message: "duplicate signer account".into() });
            }
        }
        if self.attributes.len() > MAX_TRANSACTION_ATTRIBUTES {
            return Err(LedgerError::InvalidTransaction { message: "too many attributes".into() });
        }
        let mut seen_unique_types = HashSet::new();
        for attribute in &self.attributes {
            if attribute.is_unique() && !seen_unique_types.insert(attribute.type_byte()) {
                return Err(LedgerError::InvalidTransaction {
                    message: format!("duplicate unique attribute type {:#04x}", attribute.type_byte()),
                });
            }
        }
        if self.script.is_empty() || self.script.len() > MAX_SCRIPT_LENGTH {
            return Err(LedgerError::InvalidTransaction { message: "script length out of range".into() });
        }
        if self.witnesses.len() != self.signers.len() {
            return Err(LedgerError::InvalidTransaction {
                message: "witness count must equal signer count".into(),
            });
        }
        if self.size() > MAX_TRANSACTION_SIZE {
            return Err(LedgerError::InvalidTransaction { message: "transaction exceeds maximum size".into() });
        }
        Ok(())
    }
}

impl Serializable for Transaction {
    fn size(&self) -> usize {
        self.unsigned_size()
            + neo_primitives::var_int_size(self.witnesses.len() as u64)
            + self.witnesses.iter().map(Serializable::size).sum::<usize>()
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        self.serialize_unsigned(writer);
        writer.write_var_int(self.witnesses.len() as u64);
        for witness in &self.witnesses {
            witness.serialize(writer);
        }
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let version = reader.read_u8()?;
        let nonce = reader.read_u32()?;
        let system_fee = reader.read_i64()?;
        let network_fee = reader.read_i64()?;
        let valid_until_block = reader.read_u32()?;
        let signer_count = reader.read_var_int(MAX_SIGNERS as u64)?;
        if signer_count == 0 {
            return Err(IoError::InvalidFormat { message: "transaction must have at least one signer".into() });
        }
        let mut signers = Vec::with_capacity(signer_count as usize);
        for _ in 0..signer_count {
            signers.push(Signer::deserialize(reader)?);
        }
        let attribute_count = reader.read_var_int(MAX_TRANSACTION_ATTRIBUTES as u64)?;
        let mut attributes = Vec::with_capacity(attribute_count as usize);
        for _ in 0..attribute_count {
            attributes.push(Attribute::deserialize(reader)?);
        }
        let script = reader.read_var_bytes(MAX_SCRIPT_LENGTH)?;
        if script.is_empty() {
            return Err(IoError::InvalidFormat { message: "transaction script must not be empty".into() });
        }
        let witness_count = reader.read_var_int(MAX_SIGNERS as u64)?;
        if witness_count as usize != signers.len() {
            return Err(IoError::InvalidFormat { message: "witness count must equal signer count".into() });
        }
        let mut witnesses = Vec::with_capacity(witness_count as usize);
        for _ in 0..witness_count {
            witnesses.push(Witness::deserialize(reader)?);
        }
        Ok(Self {
            version,
            nonce,
            system_fee,
            network_fee,
            valid_until_block,
            signers,
            attributes,
            script,
            witnesses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_io::SerializableExt;
    use neo_primitives::UInt160;

    fn sample(script: Vec<u8>) -> Transaction {
        Transaction {
            version: 0,
            nonce: 1,
            system_fee: 100,
            network_fee: 50,
            valid_until_block: 1000,
            signers: vec![Signer::called_by_entry(UInt160::from_bytes(&[1u8; 20]).unwrap())],
            attributes: vec![],
            script,
            witnesses: vec![Witness::new(vec![], vec![0x51])],
        }
    }

    #[test]
    fn round_trips_through_bytes() {
        let tx = sample(vec![0x40]);
        let bytes = tx.to_array();
        assert_eq!(bytes.len(), tx.size());
        assert_eq!(Transaction::from_array(&bytes).unwrap(), tx);
    }

    #[test]
    fn hash_excludes_witnesses() {
        let mut tx = sample(vec![0x40]);
        let hash_before = tx.hash();
        tx.witnesses[0] = Witness::new(vec![1, 2, 3], vec![0x51]);
        assert_eq!(tx.hash(), hash_before);
    }

    #[test]
    fn rejects_negative_system_fee() {
        let mut tx = sample(vec![0x40]);
        tx.system_fee = -1;
        assert!(tx.verify_structure().is_err());
    }

    #[test]
    fn rejects_mismatched_witness_count() {
        let mut tx = sample(vec![0x40]);
        tx.witnesses.push(Witness::new(vec![], vec![]));
        assert!(tx.verify_structure().is_err());
    }

    #[test]
    fn rejects_duplicate_signer_accounts() {
        let account = UInt160::from_bytes(&[1u8; 20]).unwrap();
        let mut tx = sample(vec![0x40]);
        tx.signers.push(Signer::called_by_entry(account));
        tx.witnesses.push(Witness::new(vec![], vec![0x51]));
        assert!(tx.verify_structure().is_err());
    }

    #[test]
    fn rejects_duplicate_unique_attributes() {
        let mut tx = sample(vec![0x40]);
        tx.attributes = vec![Attribute::HighPriority, Attribute::HighPriority];
        assert!(tx.verify_structure().is_err());
    }

    #[test]
    fn allows_multiple_conflicts_attributes() {
        let mut tx = sample(vec![0x40]);
        tx.attributes = vec![
            Attribute::Conflicts { hash: UInt256::zero() },
            Attribute::Conflicts { hash: UInt256::from_bytes(&[1u8; 32]).unwrap() },
        ];
        assert!(tx.verify_structure().is_ok());
    }

    #[test]
    fn deserialize_rejects_empty_script() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0); // version
        writer.write_u32(0); // nonce
        writer.write_i64(0); // system_fee
        writer.write_i64(0); // network_fee
        writer.write_u32(0); // valid_until_block
        writer.write_var_int(1);
        Signer::called_by_entry(UInt160::zero()).serialize(&mut writer);
        writer.write_var_int(0); // no attributes
        writer.write_var_bytes(&[]); // empty script
        writer.write_var_int(1);
        Witness::new(vec![], vec![]).serialize(&mut writer);
        assert!(Transaction::from_array(&writer.into_bytes()).is_err());
    }
}
