// Copyright (C) 2015-2026 The Neo Project.
//
// witness.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `Witness`: an (invocation_script, verification_script) pair proving a
//! signer authorized a transaction or block (spec.md §3).

use neo_cryptography::hash::hash160;
use neo_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use neo_primitives::UInt160;

/// Maximum size in bytes of either script half of a witness (spec.md §3).
pub const MAX_SCRIPT_SIZE: usize = 1024;

/// A signer's proof of authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub invocation_script: Vec<u8>,
    pub verification_script: Vec<u8>,
}

impl Witness {
    /// Builds a witness from its two script halves.
    pub fn new(invocation_script: Vec<u8>, verification_script: Vec<u8>) -> Self {
        Self {
            invocation_script,
            verification_script,
        }
    }

    /// The script hash a signer's `account` must equal:
    /// `Hash160(verification_script)`.
    pub fn script_hash(&self) -> UInt160 {
        hash160(&self.verification_script)
    }
}

impl Serializable for Witness {
    fn size(&self) -> usize {
        neo_primitives::var_int_size(self.invocation_script.len() as u64)
            + self.invocation_script.len()
            + neo_primitives::var_int_size(self.verification_script.len() as u64)
            + self.verification_script.len()
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_var_bytes(&self.invocation_script);
        writer.write_var_bytes(&self.verification_script);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let invocation_script = reader.read_var_bytes(MAX_SCRIPT_SIZE)?;
        let verification_script = reader.read_var_bytes(MAX_SCRIPT_SIZE)?;
        Ok(Self {
            invocation_script,
            verification_script,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_io::SerializableExt;

    #[test]
    fn round_trips_through_bytes() {
        let witness = Witness::new(vec![1, 2, 3], vec![4, 5, 6, 7]);
        let bytes = witness.to_array();
        assert_eq!(bytes.len(), witness.size());
        assert_eq!(Witness::from_array(&bytes).unwrap(), witness);
    }

    #[test]
    fn script_hash_is_hash160_of_verification_script() {
        let witness = Witness::new(vec![], vec![1, 2, 3]);
        assert_eq!(witness.script_hash(), hash160(&[1, 2, 3]));
    }
}
