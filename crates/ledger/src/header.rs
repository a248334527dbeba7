// Copyright (C) 2015-2026 The Neo Project.
//
// header.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `Header`: a block's fixed-size metadata, independently hashable and
//! verifiable without its transactions (spec.md §3).

use crate::witness::Witness;
use neo_cryptography::hash::sha256;
use neo_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use neo_primitives::{UInt160, UInt256};

/// A block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u32,
    pub prev_hash: UInt256,
    pub merkle_root: UInt256,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub nonce: u64,
    pub index: u32,
    pub primary_index: u8,
    pub next_consensus: UInt160,
    /// Exactly one witness: the previous block's `next_consensus` script.
    pub witness: Witness,
}

impl Header {
    fn serialize_unsigned(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.version);
        writer.write_uint256(&self.prev_hash);
        writer.write_uint256(&self.merkle_root);
        writer.write_u64(self.timestamp);
        writer.write_u64(self.nonce);
        writer.write_u32(self.index);
        writer.write_u8(self.primary_index);
        writer.write_uint160(&self.next_consensus);
    }

    fn unsigned_size(&self) -> usize {
        4 + UInt256::LEN + UInt256::LEN + 8 + 8 + 4 + 1 + UInt160::LEN
    }

    /// `Hash256` of the header's unsigned fields (spec.md §3); the
    /// signature the header's witness must satisfy refers to this hash,
    /// never the witness itself.
    pub fn hash(&self) -> UInt256 {
        let mut writer = BinaryWriter::new();
        self.serialize_unsigned(&mut writer);
        let digest = sha256(&sha256(&writer.into_bytes()));
        UInt256::from_bytes(&digest).expect("sha256 output is 32 bytes")
    }
}

impl Serializable for Header {
    fn size(&self) -> usize {
        self.unsigned_size() + 1 + self.witness.size()
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        self.serialize_unsigned(writer);
        writer.write_var_int(1);
        self.witness.serialize(writer);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let version = reader.read_u32()?;
        let prev_hash = reader.read_uint256()?;
        let merkle_root = reader.read_uint256()?;
        let timestamp = reader.read_u64()?;
        let nonce = reader.read_u64()?;
        let index = reader.read_u32()?;
        let primary_index = reader.read_u8()?;
        let next_consensus = reader.read_uint160()?;
        let witness_count = reader.read_var_int(1)?;
        if witness_count != 1 {
            return Err(neo_io::IoError::InvalidFormat {
                message: "block header must carry exactly one witness".into(),
            });
        }
        let witness = Witness::deserialize(reader)?;
        Ok(Self {
            version,
            prev_hash,
            merkle_root,
            timestamp,
            nonce,
            index,
            primary_index,
            next_consensus,
            witness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_io::SerializableExt;

    fn sample() -> Header {
        Header {
            version: 0,
            prev_hash: UInt256::zero(),
            merkle_root: UInt256::from_bytes(&[7u8; 32]).unwrap(),
            timestamp: 1_600_000_000_000,
            nonce: 42,
            index: 1,
            primary_index: 0,
            next_consensus: UInt160::from_bytes(&[9u8; 20]).unwrap(),
            witness: Witness::new(vec![], vec![0x51]),
        }
    }

    #[test]
    fn round_trips_through_bytes() {
        let header = sample();
        let bytes = header.to_array();
        assert_eq!(bytes.len(), header.size());
        assert_eq!(Header::from_array(&bytes).unwrap(), header);
    }

    #[test]
    fn hash_is_stable_across_witness_changes() {
        let mut header = sample();
        let hash_before = header.hash();
        header.witness = Witness::new(vec![1, 2, 3], vec![0x51]);
        assert_eq!(header.hash(), hash_before);
    }

    #[test]
    fn deserialize_rejects_multiple_witnesses() {
        let header = sample();
        let mut writer = BinaryWriter::new();
        header.serialize_unsigned(&mut writer);
        writer.write_var_int(2);
        header.witness.serialize(&mut writer);
        header.witness.serialize(&mut writer);
        assert!(Header::from_array(&writer.into_bytes()).is_err());
    }
}
