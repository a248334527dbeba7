// Copyright (C) 2015-2026 The Neo Project.
//
// attribute.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `Attribute`: a tagged union over the closed set of transaction
//! attribute types (spec.md §3, §9 "runtime-polymorphic transaction
//! attributes via class hierarchy": replaced here with a plain enum —
//! unknown type bytes are a hard format error, not a silently-ignored
//! extension point).
//!
//! Type byte 0x20 meant `Script` in Neo 2.x and means `NotValidBefore` in
//! Neo N3 (spec.md §9); this module only ever decodes the N3 meaning, so a
//! legacy 2.x payload carrying that byte decodes into the wrong-shaped
//! attribute and is rejected by [`Attribute::deserialize`] on the
//! following bytes rather than silently accepted.

use neo_io::{BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use neo_primitives::UInt256;

/// Maximum bytes carried in an `OracleResponse` attribute's `result` field.
pub const MAX_ORACLE_RESULT_SIZE: usize = 2048;

const TYPE_HIGH_PRIORITY: u8 = 0x01;
const TYPE_ORACLE_RESPONSE: u8 = 0x11;
const TYPE_NOT_VALID_BEFORE: u8 = 0x20;
const TYPE_CONFLICTS: u8 = 0x21;
const TYPE_NOTARY_ASSISTED: u8 = 0x22;

/// One transaction attribute (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// Requires a committee witness; unique per transaction.
    HighPriority,
    /// Only valid on oracle-callback transactions; unique per transaction.
    OracleResponse { id: u64, code: u8, result: Vec<u8> },
    /// The transaction is invalid before `height` (spec.md §4.5 step 2).
    NotValidBefore { height: u32 },
    /// Declares a conflict with another transaction by hash; multiple
    /// instances are permitted on one transaction.
    Conflicts { hash: UInt256 },
    /// Marks a transaction as notary-assisted.
    NotaryAssisted,
}

impl Attribute {
    /// The wire type tag for this attribute.
    pub fn type_byte(&self) -> u8 {
        match self {
            Attribute::HighPriority => TYPE_HIGH_PRIORITY,
            Attribute::OracleResponse { .. } => TYPE_ORACLE_RESPONSE,
            Attribute::NotValidBefore { .. } => TYPE_NOT_VALID_BEFORE,
            Attribute::Conflicts { .. } => TYPE_CONFLICTS,
            Attribute::NotaryAssisted => TYPE_NOTARY_ASSISTED,
        }
    }

    /// Whether at most one instance of this attribute type may appear on a
    /// single transaction (spec.md §3: all except `Conflicts`).
    pub fn is_unique(&self) -> bool {
        !matches!(self, Attribute::Conflicts { .. })
    }
}

impl Serializable for Attribute {
    fn size(&self) -> usize {
        1 + match self {
            Attribute::HighPriority | Attribute::NotaryAssisted => 0,
            Attribute::OracleResponse { result, .. } => {
                8 + 1 + neo_primitives::var_int_size(result.len() as u64) + result.len()
            }
            Attribute::NotValidBefore { .. } => 4,
            Attribute::Conflicts { .. } => UInt256::LEN,
        }
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.type_byte());
        match self {
            Attribute::HighPriority | Attribute::NotaryAssisted => {}
            Attribute::OracleResponse { id, code, result } => {
                writer.write_u64(*id);
                writer.write_u8(*code);
                writer.write_var_bytes(result);
            }
            Attribute::NotValidBefore { height } => writer.write_u32(*height),
            Attribute::Conflicts { hash } => writer.write_uint256(hash),
        }
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let type_byte = reader.read_u8()?;
        match type_byte {
            TYPE_HIGH_PRIORITY => Ok(Attribute::HighPriority),
            TYPE_ORACLE_RESPONSE => {
                let id = reader.read_u64()?;
                let code = reader.read_u8()?;
                let result = reader.read_var_bytes(MAX_ORACLE_RESULT_SIZE)?;
                Ok(Attribute::OracleResponse { id, code, result })
            }
            TYPE_NOT_VALID_BEFORE => Ok(Attribute::NotValidBefore {
                height: reader.read_u32()?,
            }),
            TYPE_CONFLICTS => Ok(Attribute::Conflicts {
                hash: reader.read_uint256()?,
            }),
            TYPE_NOTARY_ASSISTED => Ok(Attribute::NotaryAssisted),
            other => Err(IoError::InvalidFormat {
                message: format!("unknown transaction attribute type byte {other:#04x}"),
            }),
        }
    }
}

/// Finds the first attribute matching `predicate`, replacing the source's
/// `GetAttribute<T>` (which `dynamic_cast`s a freshly-allocated wrapper and
/// so never matches anything — spec.md §9 open question). Callers ask for
/// a specific variant directly rather than a type parameter.
pub fn first_attribute_of_type<'a>(
    attributes: &'a [Attribute],
    predicate: impl Fn(&Attribute) -> bool,
) -> Option<&'a Attribute> {
    attributes.iter().find(|a| predicate(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_io::SerializableExt;

    #[test]
    fn round_trips_every_variant() {
        let variants = vec![
            Attribute::HighPriority,
            Attribute::OracleResponse { id: 7, code: 0, result: vec![1, 2, 3] },
            Attribute::NotValidBefore { height: 100 },
            Attribute::Conflicts { hash: UInt256::from_bytes(&[9u8; 32]).unwrap() },
            Attribute::NotaryAssisted,
        ];
        for attribute in variants {
            let bytes = attribute.to_array();
            assert_eq!(bytes.len(), attribute.size());
            assert_eq!(Attribute::from_array(&bytes).unwrap(), attribute);
        }
    }

    #[test]
    fn unknown_type_byte_is_rejected() {
        assert!(Attribute::from_array(&[0xFF]).is_err());
    }

    #[test]
    fn legacy_neo2_script_attribute_does_not_silently_decode() {
        // Neo 2.x used 0x20 for a variable-length `Script` payload; N3
        // reinterprets 0x20 as a fixed 4-byte height. A legacy payload
        // whose script bytes don't happen to be exactly 4 bytes fails
        // rather than silently decoding as a bogus height.
        let legacy = [TYPE_NOT_VALID_BEFORE, 1, 2]; // too short for a u32
        assert!(Attribute::from_array(&legacy).is_err());
    }

    #[test]
    fn conflicts_is_not_unique() {
        assert!(!Attribute::Conflicts { hash: UInt256::zero() }.is_unique());
        assert!(Attribute::HighPriority.is_unique());
    }

    #[test]
    fn first_attribute_of_type_finds_matching_variant() {
        let attrs = vec![Attribute::HighPriority, Attribute::NotValidBefore { height: 5 }];
        let found = first_attribute_of_type(&attrs, |a| matches!(a, Attribute::NotValidBefore { .. }));
        assert_eq!(found, Some(&Attribute::NotValidBefore { height: 5 }));
    }
}
