// Copyright (C) 2015-2026 The Neo Project.
//
// priority.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The pool's ordering key: `HighPriority` first, then `FeePerByte`
//! descending, then arrival order ascending (spec.md §4.6). Arrival is
//! tracked as a monotonic sequence number assigned at admission rather
//! than a wall-clock timestamp, so ordering is deterministic regardless
//! of when it's read back.

use std::cmp::Reverse;

/// Orders entries so that `a > b` means "a is evicted after b" (a ranks
/// higher). A [`std::collections::BTreeSet`] of these therefore holds the
/// worst-ranked entry at the front and the best-ranked at the back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityKey {
    high_priority: bool,
    fee_per_byte: i64,
    arrival: Reverse<u64>,
}

impl PriorityKey {
    pub fn new(high_priority: bool, fee_per_byte: i64, sequence: u64) -> Self {
        Self { high_priority, fee_per_byte, arrival: Reverse(sequence) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_priority_outranks_any_fee_per_byte() {
        let high = PriorityKey::new(true, 1, 100);
        let low_fee_but_not_high = PriorityKey::new(false, 1_000_000, 1);
        assert!(high > low_fee_but_not_high);
    }

    #[test]
    fn higher_fee_per_byte_outranks_lower_within_the_same_priority_class() {
        let rich = PriorityKey::new(false, 100, 5);
        let poor = PriorityKey::new(false, 10, 5);
        assert!(rich > poor);
    }

    #[test]
    fn earlier_arrival_outranks_later_arrival_on_a_tie() {
        let earlier = PriorityKey::new(false, 50, 1);
        let later = PriorityKey::new(false, 50, 2);
        assert!(earlier > later);
    }
}
