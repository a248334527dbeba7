// Copyright (C) 2015-2026 The Neo Project.
//
// block.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `Block`: a header plus its transactions (spec.md §3).

use crate::error::{LedgerError, LedgerResult};
use crate::header::Header;
use crate::transaction::Transaction;
use neo_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use neo_primitives::merkle;

/// Maximum transactions per block, bounding block size alongside the
/// per-transaction cap (spec.md §3).
pub const MAX_TRANSACTIONS_PER_BLOCK: usize = 65_535;

/// A full block: header plus the transactions it commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// The block's hash, i.e. its header's hash.
    pub fn hash(&self) -> neo_primitives::UInt256 {
        self.header.hash()
    }

    pub fn index(&self) -> u32 {
        self.header.index
    }

    /// Checks the structural invariants spec.md §3 places on a block
    /// relative to its parent: sequential index, monotonic timestamp,
    /// matching `prev_hash`, and a merkle root over its transaction hashes.
    /// Caller-supplied `prev` is `None` only for the genesis block.
    pub fn verify_against_parent(&self, prev: Option<&Header>) -> LedgerResult<()> {
        if self.transactions.len() > MAX_TRANSACTIONS_PER_BLOCK {
            return Err(LedgerError::InvalidBlock { message: "too many transactions".into() });
        }
        match prev {
            Some(prev) => {
                if self.header.index != prev.index + 1 {
                    return Err(LedgerError::OutOfOrder { expected: prev.index + 1, actual: self.header.index });
                }
                if self.header.prev_hash != prev.hash() {
                    return Err(LedgerError::InvalidBlock { message: "prev_hash does not match parent".into() });
                }
                if self.header.timestamp <= prev.timestamp {
                    return Err(LedgerError::InvalidBlock {
                        message: "timestamp must be strictly greater than the parent's".into(),
                    });
                }
            }
            None => {
                if self.header.index != 0 {
                    return Err(LedgerError::InvalidBlock { message: "genesis block must have index 0".into() });
                }
            }
        }
        let leaves: Vec<_> = self.transactions.iter().map(Transaction::hash).collect();
        if merkle::compute_root(&leaves) != self.header.merkle_root {
            return Err(LedgerError::InvalidBlock { message: "merkle root does not match transactions".into() });
        }
        Ok(())
    }
}

impl Serializable for Block {
    fn size(&self) -> usize {
        self.header.size()
            + neo_primitives::var_int_size(self.transactions.len() as u64)
            + self.transactions.iter().map(Serializable::size).sum::<usize>()
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        self.header.serialize(writer);
        writer.write_var_int(self.transactions.len() as u64);
        for tx in &self.transactions {
            tx.serialize(writer);
        }
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let header = Header::deserialize(reader)?;
        let tx_count = reader.read_var_int(MAX_TRANSACTIONS_PER_BLOCK as u64)?;
        let mut transactions = Vec::with_capacity(tx_count as usize);
        for _ in 0..tx_count {
            transactions.push(Transaction::deserialize(reader)?);
        }
        Ok(Self { header, transactions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Signer;
    use crate::witness::Witness;
    use neo_io::SerializableExt;
    use neo_primitives::{UInt160, UInt256};

    fn tx() -> Transaction {
        Transaction {
            version: 0,
            nonce: 1,
            system_fee: 0,
            network_fee: 0,
            valid_until_block: 1000,
            signers: vec![Signer::called_by_entry(UInt160::zero())],
            attributes: vec![],
            script: vec![0x40],
            witnesses: vec![Witness::new(vec![], vec![0x51])],
        }
    }

    fn genesis() -> Block {
        let transactions = vec![tx()];
        let merkle_root = merkle::compute_root(&transactions.iter().map(Transaction::hash).collect::<Vec<_>>());
        Block {
            header: Header {
                version: 0,
                prev_hash: UInt256::zero(),
                merkle_root,
                timestamp: 1,
                nonce: 0,
                index: 0,
                primary_index: 0,
                next_consensus: UInt160::zero(),
                witness: Witness::new(vec![], vec![0x51]),
            },
            transactions,
        }
    }

    #[test]
    fn round_trips_through_bytes() {
        let block = genesis();
        let bytes = block.to_array();
        assert_eq!(bytes.len(), block.size());
        assert_eq!(Block::from_array(&bytes).unwrap(), block);
    }

    #[test]
    fn genesis_verifies_against_no_parent() {
        assert!(genesis().verify_against_parent(None).is_ok());
    }

    #[test]
    fn non_genesis_requires_index_zero_check_to_fail_without_parent() {
        let mut block = genesis();
        block.header.index = 1;
        assert!(block.verify_against_parent(None).is_err());
    }

    #[test]
    fn child_must_follow_parent_index_and_timestamp() {
        let parent = genesis();
        let mut child = genesis();
        child.header.index = 1;
        child.header.prev_hash = parent.header.hash();
        child.header.timestamp = parent.header.timestamp + 1;
        assert!(child.verify_against_parent(Some(&parent.header)).is_ok());

        let mut stale = child.clone();
        stale.header.timestamp = parent.header.timestamp;
        assert!(stale.verify_against_parent(Some(&parent.header)).is_err());

        let mut out_of_order = child.clone();
        out_of_order.header.index = 5;
        assert!(out_of_order.verify_against_parent(Some(&parent.header)).is_err());
    }

    #[test]
    fn tampered_merkle_root_is_rejected() {
        let mut block = genesis();
        block.header.merkle_root = UInt256::from_bytes(&[1u8; 32]).unwrap();
        assert!(block.verify_against_parent(None).is_err());
    }
}
