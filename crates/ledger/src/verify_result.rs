// Copyright (C) 2015-2026 The Neo Project.
//
// verify_result.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `VerifyResult`: the outcome of checking an inventory item (block or
//! transaction) before accepting it into the pool or chain (spec.md §4.5,
//! §4.6).

use serde::{Deserialize, Serialize};

/// Why a transaction or block was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerifyResult {
    /// Verification succeeded; the item may be relayed and persisted.
    Succeed,
    /// An item with the same hash is already on the chain.
    AlreadyExists,
    /// An item with the same hash is already in the mempool.
    AlreadyInPool,
    /// The mempool is full and the item was not accepted.
    OutOfMemory,
    /// The item's parent has not been seen yet, so it cannot be verified.
    UnableToVerify,
    /// The item failed a structural check not covered by a more specific
    /// variant.
    Invalid,
    /// The item's script faulted or left a falsy result.
    InvalidScript,
    /// One of the item's attributes failed validation.
    InvalidAttribute,
    /// A signature did not match its claimed account.
    InvalidSignature,
    /// A witness did not authorize the account it was attached to.
    InvalidWitness,
    /// The item exceeds a size limit.
    OverSize,
    /// The item's `valid_until_block` has passed.
    Expired,
    /// The sender cannot cover the item's fees.
    InsufficientFunds,
    /// The item violates a policy contract rule (blocked account, fee
    /// floor).
    PolicyFail,
    /// The item conflicts with another transaction already on chain or in
    /// the pool.
    HasConflicts,
    /// Verification failed for a reason not otherwise classified.
    Unknown,
}

impl VerifyResult {
    /// Whether this result permits the item to be relayed/persisted.
    pub fn is_success(self) -> bool {
        matches!(self, VerifyResult::Succeed)
    }
}

impl Default for VerifyResult {
    fn default() -> Self {
        VerifyResult::Unknown
    }
}

impl From<u8> for VerifyResult {
    fn from(value: u8) -> Self {
        match value {
            0 => VerifyResult::Succeed,
            1 => VerifyResult::AlreadyExists,
            2 => VerifyResult::AlreadyInPool,
            3 => VerifyResult::OutOfMemory,
            4 => VerifyResult::PolicyFail,
            5 => VerifyResult::Invalid,
            6 => VerifyResult::InsufficientFunds,
            7 => VerifyResult::Expired,
            8 => VerifyResult::InvalidAttribute,
            9 => VerifyResult::InvalidScript,
            10 => VerifyResult::InvalidSignature,
            11 => VerifyResult::InvalidWitness,
            12 => VerifyResult::OverSize,
            13 => VerifyResult::UnableToVerify,
            14 => VerifyResult::HasConflicts,
            _ => VerifyResult::Unknown,
        }
    }
}

impl From<VerifyResult> for u8 {
    fn from(result: VerifyResult) -> Self {
        result as u8
    }
}

impl std::fmt::Display for VerifyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyResult::Succeed => write!(f, "Succeed"),
            VerifyResult::AlreadyExists => write!(f, "AlreadyExists"),
            VerifyResult::AlreadyInPool => write!(f, "AlreadyInPool"),
            VerifyResult::OutOfMemory => write!(f, "OutOfMemory"),
            VerifyResult::PolicyFail => write!(f, "PolicyFail"),
            VerifyResult::Invalid => write!(f, "Invalid"),
            VerifyResult::InsufficientFunds => write!(f, "InsufficientFunds"),
            VerifyResult::Expired => write!(f, "Expired"),
            VerifyResult::InvalidAttribute => write!(f, "InvalidAttribute"),
            VerifyResult::InvalidScript => write!(f, "InvalidScript"),
            VerifyResult::InvalidSignature => write!(f, "InvalidSignature"),
            VerifyResult::InvalidWitness => write!(f, "InvalidWitness"),
            VerifyResult::OverSize => write!(f, "OverSize"),
            VerifyResult::UnableToVerify => write!(f, "UnableToVerify"),
            VerifyResult::HasConflicts => write!(f, "HasConflicts"),
            VerifyResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u8() {
        let all = [
            VerifyResult::Succeed,
            VerifyResult::AlreadyExists,
            VerifyResult::AlreadyInPool,
            VerifyResult::OutOfMemory,
            VerifyResult::UnableToVerify,
            VerifyResult::Invalid,
            VerifyResult::InvalidScript,
            VerifyResult::InvalidAttribute,
            VerifyResult::InvalidSignature,
            VerifyResult::InvalidWitness,
            VerifyResult::OverSize,
            VerifyResult::Expired,
            VerifyResult::InsufficientFunds,
            VerifyResult::PolicyFail,
            VerifyResult::HasConflicts,
        ];
        for result in all {
            assert_eq!(VerifyResult::from(u8::from(result)), result);
        }
    }

    #[test]
    fn unknown_byte_value_maps_to_unknown() {
        assert_eq!(VerifyResult::from(255), VerifyResult::Unknown);
    }

    #[test]
    fn only_succeed_is_success() {
        assert!(VerifyResult::Succeed.is_success());
        assert!(!VerifyResult::Invalid.is_success());
    }
}
