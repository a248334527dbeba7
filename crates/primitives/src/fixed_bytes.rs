// Copyright (C) 2015-2026 The Neo Project.
//
// fixed_bytes.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Macro generating Neo's fixed-width hash types (`UInt160`, `UInt256`).
//!
//! Both types store bytes little-endian (as they appear on the wire) and
//! compare lexicographically over that same byte order, per spec.md §3.
//! Their `Display`/`FromStr` hex form is big-endian with a `0x` prefix,
//! matching the C# reference node's `ToString`.

macro_rules! fixed_bytes_type {
    ($name:ident, $size:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name([u8; $size]);

        impl $name {
            /// Length of this type in bytes.
            pub const LEN: usize = $size;

            /// The all-zero value.
            pub const ZERO: $name = $name([0u8; $size]);

            /// Returns the all-zero value.
            pub fn zero() -> Self {
                Self::ZERO
            }

            /// Returns true if every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; $size]
            }

            /// Builds a value from a little-endian byte array.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::error::PrimitivesError> {
                if bytes.len() != $size {
                    return Err(crate::error::PrimitivesError::InvalidLength {
                        expected: $size,
                        actual: bytes.len(),
                    });
                }
                let mut arr = [0u8; $size];
                arr.copy_from_slice(bytes);
                Ok(Self(arr))
            }

            /// Returns the little-endian byte representation.
            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            /// Parses the big-endian `0x`-prefixed hex form used for display.
            pub fn from_hex(s: &str) -> Result<Self, crate::error::PrimitivesError> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let mut bytes = hex::decode(s).map_err(|e| {
                    crate::error::PrimitivesError::InvalidHex {
                        message: e.to_string(),
                    }
                })?;
                if bytes.len() != $size {
                    return Err(crate::error::PrimitivesError::InvalidLength {
                        expected: $size,
                        actual: bytes.len(),
                    });
                }
                bytes.reverse();
                Self::from_bytes(&bytes)
            }

            /// Renders the big-endian `0x`-prefixed hex form.
            pub fn to_hex(&self) -> String {
                let mut reversed = self.0;
                reversed.reverse();
                format!("0x{}", hex::encode(reversed))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::PrimitivesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_bytes_type!(
    UInt160,
    20,
    "A 160-bit hash, used for script hashes and account addresses."
);
fixed_bytes_type!(
    UInt256,
    32,
    "A 256-bit hash, used for block and transaction identifiers."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_all_zero_bytes() {
        assert_eq!(UInt256::zero().as_bytes(), &[0u8; 32]);
        assert!(UInt160::zero().is_zero());
    }

    #[test]
    fn hex_round_trips_and_is_big_endian() {
        let mut bytes = [0u8; 20];
        bytes[0] = 0x01;
        bytes[19] = 0xff;
        let value = UInt160::from_bytes(&bytes).unwrap();
        // big-endian display puts the last wire byte first.
        assert_eq!(value.to_hex(), format!("0x{}01", "ff".repeat(1)));
        let parsed: UInt160 = value.to_hex().parse().unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn ordering_is_lexicographic_over_stored_bytes() {
        let a = UInt256::from_bytes(&{
            let mut b = [0u8; 32];
            b[0] = 1;
            b
        })
        .unwrap();
        let b = UInt256::from_bytes(&{
            let mut b = [0u8; 32];
            b[0] = 2;
            b
        })
        .unwrap();
        assert!(a < b);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(UInt160::from_bytes(&[0u8; 19]).is_err());
        assert!(UInt256::from_hex("0x00").is_err());
    }

    proptest::proptest! {
        #[test]
        fn hex_round_trip_prop(bytes in proptest::collection::vec(proptest::prelude::any::<u8>(), 32..=32)) {
            let v = UInt256::from_bytes(&bytes).unwrap();
            let s = v.to_hex();
            let back = UInt256::from_hex(&s).unwrap();
            proptest::prop_assert_eq!(v, back);
        }
    }
}
