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

//! Binary codec shared by every on-wire and on-disk Neo data structure.

pub mod binary_writer;
pub mod error;
pub mod memory_reader;
pub mod serializable;

pub use binary_writer::BinaryWriter;
pub use error::{IoError, IoResult};
pub use memory_reader::MemoryReader;
pub use serializable::{Serializable, SerializableExt};

#[cfg(test)]
mod tests {
    use super::*;
    use neo_primitives::{UInt160, UInt256};

    struct Pair(UInt160, UInt256);

    impl Serializable for Pair {
        fn size(&self) -> usize {
            UInt160::LEN + UInt256::LEN
        }

        fn serialize(&self, writer: &mut BinaryWriter) {
            writer.write_uint160(&self.0);
            writer.write_uint256(&self.1);
        }

        fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
            Ok(Pair(reader.read_uint160()?, reader.read_uint256()?))
        }
    }

    #[test]
    fn round_trips_a_composite_type() {
        let pair = Pair(UInt160::zero(), UInt256::zero());
        let bytes = pair.to_array();
        assert_eq!(bytes.len(), pair.size());
        let back = Pair::from_array(&bytes).unwrap();
        assert_eq!(back.0, pair.0);
        assert_eq!(back.1, pair.1);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = UInt160::zero().as_bytes().to_vec();
        bytes.extend_from_slice(UInt256::zero().as_bytes());
        bytes.push(0xFF);
        assert!(Pair::from_array(&bytes).is_err());
    }

    #[test]
    fn truncated_buffer_is_end_of_stream() {
        let bytes = vec![0u8; 10];
        assert!(matches!(
            Pair::from_array(&bytes),
            Err(IoError::EndOfStream { .. })
        ));
    }
}
