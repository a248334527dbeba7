// Copyright (C) 2015-2026 The Neo Project.
//
// serializable.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The `Serializable` trait every wire/storage type implements.

use crate::binary_writer::BinaryWriter;
use crate::error::IoResult;
use crate::memory_reader::MemoryReader;

/// A value with a canonical Neo binary representation.
///
/// Implementations must round-trip: `deserialize(&serialize(x)) == x` for
/// every valid `x` (spec.md §8 round-trip laws).
pub trait Serializable: Sized {
    /// Serialized size in bytes. Used to pre-size buffers and to enforce
    /// format-level size limits (e.g. `MaxTransactionSize`) without a full
    /// serialize pass.
    fn size(&self) -> usize;

    /// Appends this value's wire representation to `writer`.
    fn serialize(&self, writer: &mut BinaryWriter);

    /// Reads a value of this type from `reader`, advancing its cursor.
    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self>;
}

/// Convenience conversions built on top of [`Serializable`].
pub trait SerializableExt: Serializable {
    /// Serializes this value to a freshly allocated byte vector.
    fn to_array(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(self.size());
        self.serialize(&mut writer);
        writer.into_bytes()
    }

    /// Deserializes a value from a byte slice, requiring every byte to be
    /// consumed (no trailing garbage).
    fn from_array(data: &[u8]) -> IoResult<Self> {
        let mut reader = MemoryReader::new(data);
        let value = Self::deserialize(&mut reader)?;
        if !reader.is_empty() {
            return Err(crate::error::IoError::InvalidFormat {
                message: format!("{} unconsumed trailing bytes", reader.remaining()),
            });
        }
        Ok(value)
    }
}

impl<T: Serializable> SerializableExt for T {}
