// Copyright (C) 2015-2026 The Neo Project.
//
// message.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Wire framing and command payloads (spec.md §4.8, §6): `magic || command
//! || compression_flag || payload_length || checksum || payload`.

use crate::error::{NetworkError, NetworkResult};
use neo_cryptography::hash::sha256;
use neo_io::{BinaryWriter, MemoryReader, Serializable};
use neo_primitives::UInt256;

/// Payloads larger than this are rejected and the sending peer is
/// disconnected (spec.md §4.8).
pub const PAYLOAD_MAX_SIZE: u32 = 0x0200_0000;

/// The single-byte command tags of spec.md §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Version,
    Verack,
    GetAddr,
    Addr,
    Ping,
    Pong,
    GetHeaders,
    Headers,
    GetBlocks,
    Mempool,
    Inv,
    GetData,
    GetBlockByIndex,
    NotFound,
    Transaction,
    Block,
    Extensible,
    Reject,
    FilterLoad,
    FilterAdd,
    FilterClear,
    MerkleBlock,
    Alert,
}

impl Command {
    pub fn tag(self) -> u8 {
        match self {
            Command::Version => 0x00,
            Command::Verack => 0x01,
            Command::GetAddr => 0x10,
            Command::Addr => 0x11,
            Command::Ping => 0x18,
            Command::Pong => 0x19,
            Command::GetHeaders => 0x20,
            Command::Headers => 0x21,
            Command::GetBlocks => 0x24,
            Command::Mempool => 0x25,
            Command::Inv => 0x27,
            Command::GetData => 0x28,
            Command::GetBlockByIndex => 0x29,
            Command::NotFound => 0x2a,
            Command::Transaction => 0x2b,
            Command::Block => 0x2c,
            Command::Extensible => 0x2e,
            Command::Reject => 0x2f,
            Command::FilterLoad => 0x30,
            Command::FilterAdd => 0x31,
            Command::FilterClear => 0x32,
            Command::MerkleBlock => 0x38,
            Command::Alert => 0x40,
        }
    }

    pub fn from_tag(tag: u8) -> NetworkResult<Self> {
        Ok(match tag {
            0x00 => Command::Version,
            0x01 => Command::Verack,
            0x10 => Command::GetAddr,
            0x11 => Command::Addr,
            0x18 => Command::Ping,
            0x19 => Command::Pong,
            0x20 => Command::GetHeaders,
            0x21 => Command::Headers,
            0x24 => Command::GetBlocks,
            0x25 => Command::Mempool,
            0x27 => Command::Inv,
            0x28 => Command::GetData,
            0x29 => Command::GetBlockByIndex,
            0x2a => Command::NotFound,
            0x2b => Command::Transaction,
            0x2c => Command::Block,
            0x2e => Command::Extensible,
            0x2f => Command::Reject,
            0x30 => Command::FilterLoad,
            0x31 => Command::FilterAdd,
            0x32 => Command::FilterClear,
            0x38 => Command::MerkleBlock,
            0x40 => Command::Alert,
            other => return Err(NetworkError::UnknownCommand(other)),
        })
    }
}

/// The inventory kind an `Inv`/`GetData`/`NotFound` hash list refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryType {
    Transaction,
    Block,
    Extensible,
}

impl InventoryType {
    fn tag(self) -> u8 {
        match self {
            InventoryType::Transaction => 0x2b,
            InventoryType::Block => 0x2c,
            InventoryType::Extensible => 0x2e,
        }
    }

    fn from_tag(tag: u8) -> NetworkResult<Self> {
        Ok(match tag {
            0x2b => InventoryType::Transaction,
            0x2c => InventoryType::Block,
            0x2e => InventoryType::Extensible,
            other => return Err(NetworkError::UnknownCommand(other)),
        })
    }
}

/// Up to 500 hashes of one inventory kind (spec.md §4.8).
pub const MAX_INVENTORY_HASHES: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryPayload {
    pub kind: InventoryType,
    pub hashes: Vec<UInt256>,
}

/// A decoded message: command plus raw payload bytes. Command-specific
/// payload parsing (`InventoryPayload`, `VersionPayload`, ...) happens on
/// demand from these bytes rather than through one giant enum, so adding a
/// payload shape never touches the framing code.
#[derive(Debug, Clone)]
pub struct Message {
    pub command: Command,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(command: Command, payload: Vec<u8>) -> NetworkResult<Self> {
        if payload.len() as u64 > PAYLOAD_MAX_SIZE as u64 {
            return Err(NetworkError::PayloadTooLarge { size: payload.len(), max: PAYLOAD_MAX_SIZE as usize });
        }
        Ok(Self { command, payload })
    }

    /// Encodes the full frame: `magic:u32 || command:u8 || compression_flag:u8
    /// || payload_length:u32 || checksum:u32 || payload`. Compression is
    /// never used by this node; the flag is always written as zero.
    pub fn encode(&self, magic: u32) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(14 + self.payload.len());
        writer.write_u32(magic);
        writer.write_u8(self.command.tag());
        writer.write_u8(0);
        writer.write_u32(self.payload.len() as u32);
        writer.write_u32(checksum(&self.payload));
        writer.write_bytes(&self.payload);
        writer.into_bytes()
    }

    /// Decodes one frame, verifying the checksum and the network magic.
    pub fn decode(bytes: &[u8], expected_magic: u32) -> NetworkResult<Self> {
        let mut reader = MemoryReader::new(bytes);
        let magic = reader.read_u32()?;
        if magic != expected_magic {
            return Err(NetworkError::Malformed {
                peer: "0.0.0.0:0".parse().unwrap(),
                reason: format!("network magic {magic:#x} does not match {expected_magic:#x}"),
            });
        }
        let command = Command::from_tag(reader.read_u8()?)?;
        let _compression_flag = reader.read_u8()?;
        let payload_length = reader.read_u32()?;
        if payload_length > PAYLOAD_MAX_SIZE {
            return Err(NetworkError::PayloadTooLarge { size: payload_length as usize, max: PAYLOAD_MAX_SIZE as usize });
        }
        let expected_checksum = reader.read_u32()?;
        let payload = reader.read_bytes(payload_length as usize)?.to_vec();
        let actual_checksum = checksum(&payload);
        if actual_checksum != expected_checksum {
            return Err(NetworkError::ChecksumMismatch { expected: expected_checksum, actual: actual_checksum });
        }
        Ok(Self { command, payload })
    }
}

/// First 4 bytes of `Hash256(payload)` (spec.md §4.8).
pub fn checksum(payload: &[u8]) -> u32 {
    let digest = sha256(&sha256(payload));
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

impl InventoryPayload {
    pub fn new(kind: InventoryType, hashes: Vec<UInt256>) -> Vec<Self> {
        hashes
            .chunks(MAX_INVENTORY_HASHES)
            .map(|chunk| InventoryPayload { kind, hashes: chunk.to_vec() })
            .collect()
    }
}

impl Serializable for InventoryPayload {
    fn size(&self) -> usize {
        1 + neo_primitives::var_int_size(self.hashes.len() as u64) + self.hashes.len() * UInt256::LEN
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.kind.tag());
        writer.write_var_int(self.hashes.len() as u64);
        for hash in &self.hashes {
            writer.write_uint256(hash);
        }
    }

    fn deserialize(reader: &mut MemoryReader) -> neo_io::IoResult<Self> {
        let kind = InventoryType::from_tag(reader.read_u8()?)
            .map_err(|e| neo_io::IoError::InvalidFormat { message: e.to_string() })?;
        let count = reader.read_var_int(MAX_INVENTORY_HASHES as u64)?;
        let mut hashes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            hashes.push(reader.read_uint256()?);
        }
        Ok(Self { kind, hashes })
    }
}

/// The handshake payload exchanged before anything else (spec.md §4.8
/// "a version/verack handshake precedes any other message").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPayload {
    pub version: u32,
    pub services: u64,
    pub timestamp: u64,
    pub port: u16,
    pub nonce: u32,
    pub user_agent: String,
    pub start_height: u32,
    pub allow_relay: bool,
}

impl Serializable for VersionPayload {
    fn size(&self) -> usize {
        4 + 8
            + 8
            + 2
            + 4
            + neo_primitives::var_int_size(self.user_agent.len() as u64)
            + self.user_agent.len()
            + 4
            + 1
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.version);
        writer.write_u64(self.services);
        writer.write_u64(self.timestamp);
        writer.write_u16(self.port);
        writer.write_u32(self.nonce);
        writer.write_var_bytes(self.user_agent.as_bytes());
        writer.write_u32(self.start_height);
        writer.write_bool(self.allow_relay);
    }

    fn deserialize(reader: &mut MemoryReader) -> neo_io::IoResult<Self> {
        Ok(Self {
            version: reader.read_u32()?,
            services: reader.read_u64()?,
            timestamp: reader.read_u64()?,
            port: reader.read_u16()?,
            nonce: reader.read_u32()?,
            user_agent: String::from_utf8_lossy(&reader.read_var_bytes(1024)?).into_owned(),
            start_height: reader.read_u32()?,
            allow_relay: reader.read_bool()?,
        })
    }
}

/// One entry of an `Addr` payload: a known peer and when it was last seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkAddress {
    pub timestamp: u64,
    pub services: u64,
    pub address: std::net::SocketAddr,
}

/// A peer's identity once the handshake completes (spec.md §4.8
/// "each peer carries state {user_agent, version, capabilities,
/// last_block_index, last_seen}").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerIdentity {
    pub user_agent: String,
    pub version: u32,
    pub capabilities: u64,
    pub last_block_index: u32,
    pub nonce: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tags_round_trip() {
        for command in [
            Command::Version,
            Command::Verack,
            Command::GetAddr,
            Command::Addr,
            Command::Ping,
            Command::Pong,
            Command::GetHeaders,
            Command::Headers,
            Command::GetBlocks,
            Command::Mempool,
            Command::Inv,
            Command::GetData,
            Command::GetBlockByIndex,
            Command::NotFound,
            Command::Transaction,
            Command::Block,
            Command::Extensible,
            Command::Reject,
            Command::FilterLoad,
            Command::FilterAdd,
            Command::FilterClear,
            Command::MerkleBlock,
            Command::Alert,
        ] {
            assert_eq!(Command::from_tag(command.tag()).unwrap(), command);
        }
    }

    #[test]
    fn frame_round_trips_and_validates_checksum() {
        let message = Message::new(Command::Ping, vec![1, 2, 3, 4]).unwrap();
        let bytes = message.encode(0x334f454e);
        let decoded = Message::decode(&bytes, 0x334f454e).unwrap();
        assert_eq!(decoded.command, Command::Ping);
        assert_eq!(decoded.payload, vec![1, 2, 3, 4]);
    }

    #[test]
    fn corrupted_payload_fails_the_checksum_check() {
        let message = Message::new(Command::Ping, vec![1, 2, 3, 4]).unwrap();
        let mut bytes = message.encode(0x334f454e);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        assert!(matches!(Message::decode(&bytes, 0x334f454e), Err(NetworkError::ChecksumMismatch { .. })));
    }

    #[test]
    fn oversize_payload_is_rejected_before_allocating() {
        let huge_header = {
            let mut writer = BinaryWriter::new();
            writer.write_u32(0x334f454e);
            writer.write_u8(Command::Block.tag());
            writer.write_u8(0);
            writer.write_u32(PAYLOAD_MAX_SIZE + 1);
            writer.write_u32(0);
            writer.into_bytes()
        };
        assert!(matches!(Message::decode(&huge_header, 0x334f454e), Err(NetworkError::PayloadTooLarge { .. })));
    }

    #[test]
    fn inventory_payload_chunks_at_the_500_hash_limit() {
        let hashes: Vec<UInt256> = (0..1200u32)
            .map(|i| UInt256::from_bytes(&{
                let mut b = [0u8; 32];
                b[0..4].copy_from_slice(&i.to_le_bytes());
                b
            }).unwrap())
            .collect();
        let chunks = InventoryPayload::new(InventoryType::Block, hashes);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].hashes.len(), MAX_INVENTORY_HASHES);
        assert_eq!(chunks[2].hashes.len(), 200);
    }
}
