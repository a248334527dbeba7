// Copyright (C) 2015-2026 The Neo Project.
//
// merkle.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Merkle root computation over transaction hashes (spec.md §3 block
//! invariant 2, §8 invariant 2).
//!
//! Levels are computed as flat vectors rather than a pointer-linked tree
//! (spec.md §9 "replace shared-pointer object graphs with by-value
//! ownership"): each level is `sha256(sha256(left || right))` pairs, with
//! the last hash duplicated when a level has an odd count, matching the
//! reference node's `MerkleTree.ComputeRoot`.

use crate::UInt256;
use sha2::{Digest, Sha256};

fn hash256(data: &[u8]) -> UInt256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    UInt256::from_bytes(&second).expect("sha256 output is exactly 32 bytes")
}

/// Computes the Merkle root of an ordered list of leaf hashes.
///
/// Returns `UInt256::zero()` for an empty input, matching the reference
/// node's convention for a block with no transactions.
pub fn compute_root(leaves: &[UInt256]) -> UInt256 {
    if leaves.is_empty() {
        return UInt256::zero();
    }
    let mut level: Vec<UInt256> = leaves.to_vec();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            level.push(*level.last().unwrap());
        }
        level = level
            .chunks_exact(2)
            .map(|pair| {
                let mut buf = Vec::with_capacity(64);
                buf.extend_from_slice(pair[0].as_bytes());
                buf.extend_from_slice(pair[1].as_bytes());
                hash256(&buf)
            })
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(byte: u8) -> UInt256 {
        let mut bytes = [0u8; 32];
        bytes[0] = byte;
        UInt256::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(compute_root(&[]), UInt256::zero());
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let l = leaf(1);
        assert_eq!(compute_root(&[l]), l);
    }

    #[test]
    fn odd_count_duplicates_last_leaf() {
        let leaves = vec![leaf(1), leaf(2), leaf(3)];
        let with_dup = vec![leaf(1), leaf(2), leaf(3), leaf(3)];
        assert_eq!(compute_root(&leaves), compute_root(&with_dup));
    }

    #[test]
    fn different_orderings_produce_different_roots() {
        let a = compute_root(&[leaf(1), leaf(2)]);
        let b = compute_root(&[leaf(2), leaf(1)]);
        assert_ne!(a, b);
    }
}
