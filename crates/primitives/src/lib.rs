// Copyright (C) 2015-2026 The Neo Project.
//
// lib.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Primitive value types shared across the Neo N3 core: fixed-width hashes,
//! fixed-point GAS amounts, the VarInt codec, and Merkle root computation.

pub mod datoshi;
pub mod error;
pub mod fixed_bytes;
pub mod merkle;
pub mod varint;

pub use datoshi::Datoshi;
pub use error::PrimitivesError;
pub use fixed_bytes::{UInt160, UInt256};
pub use varint::{decode_var_int, decode_var_int_bounded, encode_var_int, var_int_size};
