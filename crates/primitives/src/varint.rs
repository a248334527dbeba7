// Copyright (C) 2015-2026 The Neo Project.
//
// varint.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Variable-length integer codec (spec.md §3).
//!
//! Encoding is the shortest of four forms; decoding rejects any value that
//! could have been represented more compactly (spec.md §8 "over-long"
//! boundary behavior).

use crate::error::PrimitivesError;

const FD: u8 = 0xFD;
const FE: u8 = 0xFE;
const FF: u8 = 0xFF;

/// Returns the number of bytes `encode_var_int` will write for `value`.
pub fn var_int_size(value: u64) -> usize {
    if value < FD as u64 {
        1
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Encodes `value` using the shortest valid VarInt form.
pub fn encode_var_int(value: u64, out: &mut Vec<u8>) {
    if value < FD as u64 {
        out.push(value as u8);
    } else if value <= u16::MAX as u64 {
        out.push(FD);
        out.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= u32::MAX as u64 {
        out.push(FE);
        out.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        out.push(FF);
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Decodes a VarInt from the front of `bytes`, returning the value and the
/// number of bytes consumed. Rejects non-canonical (over-long) encodings.
pub fn decode_var_int(bytes: &[u8]) -> Result<(u64, usize), PrimitivesError> {
    let marker = *bytes
        .first()
        .ok_or(PrimitivesError::InvalidLength { expected: 1, actual: 0 })?;
    match marker {
        FD => {
            let value = read_u16(bytes, 1)?;
            if (value as u64) < FD as u64 {
                return Err(PrimitivesError::NonCanonicalVarInt);
            }
            Ok((value as u64, 3))
        }
        FE => {
            let value = read_u32(bytes, 1)?;
            if (value as u64) <= u16::MAX as u64 {
                return Err(PrimitivesError::NonCanonicalVarInt);
            }
            Ok((value as u64, 5))
        }
        FF => {
            let value = read_u64(bytes, 1)?;
            if value <= u32::MAX as u64 {
                return Err(PrimitivesError::NonCanonicalVarInt);
            }
            Ok((value, 9))
        }
        small => Ok((small as u64, 1)),
    }
}

/// Decodes a VarInt and rejects values above `max` (used to pre-size
/// allocations without trusting the wire, e.g. script/array lengths).
pub fn decode_var_int_bounded(bytes: &[u8], max: u64) -> Result<(u64, usize), PrimitivesError> {
    let (value, consumed) = decode_var_int(bytes)?;
    if value > max {
        return Err(PrimitivesError::VarIntTooLarge { value, max });
    }
    Ok((value, consumed))
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u16, PrimitivesError> {
    let slice = bytes.get(offset..offset + 2).ok_or(PrimitivesError::InvalidLength {
        expected: offset + 2,
        actual: bytes.len(),
    })?;
    Ok(u16::from_le_bytes(slice.try_into().unwrap()))
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, PrimitivesError> {
    let slice = bytes.get(offset..offset + 4).ok_or(PrimitivesError::InvalidLength {
        expected: offset + 4,
        actual: bytes.len(),
    })?;
    Ok(u32::from_le_bytes(slice.try_into().unwrap()))
}

fn read_u64(bytes: &[u8], offset: usize) -> Result<u64, PrimitivesError> {
    let slice = bytes.get(offset..offset + 8).ok_or(PrimitivesError::InvalidLength {
        expected: offset + 8,
        actual: bytes.len(),
    })?;
    Ok(u64::from_le_bytes(slice.try_into().unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_boundary_values() {
        for value in [0u64, 0xFC, 0xFD, 0xFFFF, 0x10000, u32::MAX as u64, u32::MAX as u64 + 1, u64::MAX] {
            let mut buf = Vec::new();
            encode_var_int(value, &mut buf);
            let (decoded, consumed) = decode_var_int(&buf).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, buf.len());
            assert_eq!(consumed, var_int_size(value));
        }
    }

    #[test]
    fn rejects_over_long_fd_encoding() {
        // 0xFD marker followed by a value < 0xFD is over-long.
        let bytes = [FD, 0x05, 0x00];
        assert_eq!(decode_var_int(&bytes), Err(PrimitivesError::NonCanonicalVarInt));
    }

    #[test]
    fn rejects_over_long_fe_and_ff_encodings() {
        let fe_short = [FE, 0xFF, 0xFF, 0x00, 0x00];
        assert_eq!(decode_var_int(&fe_short), Err(PrimitivesError::NonCanonicalVarInt));
        let mut ff_short = vec![FF];
        ff_short.extend_from_slice(&(u32::MAX as u64).to_le_bytes());
        assert_eq!(decode_var_int(&ff_short), Err(PrimitivesError::NonCanonicalVarInt));
    }

    #[test]
    fn bounded_decode_rejects_oversize() {
        let mut buf = Vec::new();
        encode_var_int(100, &mut buf);
        assert!(decode_var_int_bounded(&buf, 50).is_err());
        assert!(decode_var_int_bounded(&buf, 100).is_ok());
    }

    proptest::proptest! {
        #[test]
        fn round_trip_prop(value in proptest::prelude::any::<u64>()) {
            let mut buf = Vec::new();
            encode_var_int(value, &mut buf);
            let (decoded, consumed) = decode_var_int(&buf).unwrap();
            proptest::prop_assert_eq!(decoded, value);
            proptest::prop_assert_eq!(consumed, buf.len());
        }
    }
}
