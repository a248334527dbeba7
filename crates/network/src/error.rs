// Copyright (C) 2015-2026 The Neo Project.
//
// error.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::net::SocketAddr;

/// NetworkError kinds (spec.md §7 FormatError/NetworkError): malformed
/// wire data is a disconnect-and-never-retry offense; everything else is
/// a transient condition that backs a peer off.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: usize, max: usize },
    #[error("checksum mismatch: header said {expected:08x}, payload hashes to {actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("unknown command byte 0x{0:02x}")]
    UnknownCommand(u8),
    #[error("malformed message from {peer}: {reason}")]
    Malformed { peer: SocketAddr, reason: String },
    #[error("peer {0} is not connected")]
    NotConnected(SocketAddr),
    #[error("address book is full ({0} entries)")]
    AddressBookFull(usize),
    #[error(transparent)]
    Io(#[from] neo_io::IoError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
