// Copyright (C) 2015-2026 The Neo Project.
//
// binary_writer.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Little-endian binary writer used by every `Serializable` implementation.

use crate::Serializable;
use neo_primitives::{encode_var_int, UInt160, UInt256};

/// Appends values to an in-memory buffer in Neo's wire byte order (all
/// multi-byte integers little-endian, per spec.md §6).
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates an empty writer with pre-reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Writes a boolean as a single `0x00`/`0x01` byte.
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    /// Writes a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `i64`.
    pub fn write_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `u64`.
    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a VarInt-prefixed byte string.
    pub fn write_var_bytes(&mut self, value: &[u8]) {
        self.write_var_int(value.len() as u64);
        self.buffer.extend_from_slice(value);
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.buffer.extend_from_slice(value);
    }

    /// Writes a VarInt.
    pub fn write_var_int(&mut self, value: u64) {
        encode_var_int(value, &mut self.buffer);
    }

    /// Writes a UInt160 in its little-endian wire form.
    pub fn write_uint160(&mut self, value: &UInt160) {
        self.buffer.extend_from_slice(value.as_bytes());
    }

    /// Writes a UInt256 in its little-endian wire form.
    pub fn write_uint256(&mut self, value: &UInt256) {
        self.buffer.extend_from_slice(value.as_bytes());
    }

    /// Writes a single `Serializable` value.
    pub fn write_serializable<T: Serializable>(&mut self, value: &T) {
        value.serialize(self);
    }

    /// Writes a VarInt-prefixed list of `Serializable` values.
    pub fn write_serializable_list<T: Serializable>(&mut self, values: &[T]) {
        self.write_var_int(values.len() as u64);
        for value in values {
            value.serialize(self);
        }
    }

    /// Consumes the writer, returning the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Returns a copy of the accumulated bytes without consuming the writer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.clone()
    }
}
