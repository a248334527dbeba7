// Copyright (C) 2015-2026 The Neo Project.
//
// memory_reader.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! A cursor over a byte slice implementing Neo's little-endian wire format.
//!
//! Every bounded read goes through [`MemoryReader::read_bytes`], so a
//! truncated buffer always surfaces as [`IoError::EndOfStream`] rather than
//! panicking — required by spec.md §7 (`FormatError` never panics).

use crate::error::{IoError, IoResult};
use crate::Serializable;
use neo_primitives::{decode_var_int_bounded, UInt160, UInt256};

/// A read-only cursor over an in-memory byte buffer.
pub struct MemoryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> MemoryReader<'a> {
    /// Wraps `data` for sequential reading from offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True if every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads exactly `count` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, count: usize) -> IoResult<&'a [u8]> {
        if self.remaining() < count {
            return Err(IoError::EndOfStream {
                requested: count,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> IoResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a boolean byte (any non-zero value is `true`).
    pub fn read_bool(&mut self) -> IoResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> IoResult<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> IoResult<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a little-endian `i64`.
    pub fn read_i64(&mut self) -> IoResult<i64> {
        let bytes = self.read_bytes(8)?;
        Ok(i64::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> IoResult<u64> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a VarInt, rejecting values above `max`.
    pub fn read_var_int(&mut self, max: u64) -> IoResult<u64> {
        // VarInt decoding needs up to 9 bytes of lookahead without consuming
        // them first, since the non-canonical check happens inside decode.
        let available = self.remaining().min(9);
        let (value, consumed) =
            decode_var_int_bounded(&self.data[self.position..self.position + available], max)?;
        self.position += consumed;
        Ok(value)
    }

    /// Reads a VarInt-prefixed byte string, bounding the length by `max`.
    pub fn read_var_bytes(&mut self, max: usize) -> IoResult<Vec<u8>> {
        let len = self.read_var_int(max as u64)? as usize;
        Ok(self.read_bytes(len)?.to_vec())
    }

    /// Reads a UInt160 from its little-endian wire form.
    pub fn read_uint160(&mut self) -> IoResult<UInt160> {
        Ok(UInt160::from_bytes(self.read_bytes(UInt160::LEN)?)?)
    }

    /// Reads a UInt256 from its little-endian wire form.
    pub fn read_uint256(&mut self) -> IoResult<UInt256> {
        Ok(UInt256::from_bytes(self.read_bytes(UInt256::LEN)?)?)
    }

    /// Reads a single `Serializable` value.
    pub fn read_serializable<T: Serializable>(&mut self) -> IoResult<T> {
        T::deserialize(self)
    }

    /// Reads a VarInt-prefixed list of `Serializable` values, rejecting a
    /// declared count above `max_count`.
    pub fn read_serializable_list<T: Serializable>(&mut self, max_count: u64) -> IoResult<Vec<T>> {
        let count = self.read_var_int(max_count)? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::deserialize(self)?);
        }
        Ok(items)
    }

    /// Reads every remaining byte.
    pub fn read_to_end(&mut self) -> IoResult<&'a [u8]> {
        let remaining = self.remaining();
        self.read_bytes(remaining)
    }
}
