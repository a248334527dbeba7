// Copyright (C) 2015-2026 The Neo Project.
//
// inventory.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Per-peer relay bookkeeping (spec.md §4.8): which hashes a peer has
//! already been told about, so `Inv` announcements aren't repeated
//! within a rolling window.

use crate::message::{InventoryType, MAX_INVENTORY_HASHES};
use neo_primitives::UInt256;
use std::collections::{HashSet, VecDeque};

/// How many recently-announced hashes a peer's suppression window
/// remembers before the oldest entry is evicted.
const RELAY_WINDOW: usize = 10_000;

/// Tracks, for one peer, which hashes have already been announced to it
/// (or received from it), so repeat `Inv` broadcasts are skipped.
#[derive(Debug, Default)]
pub struct RelayWindow {
    seen: HashSet<(InventoryType, UInt256)>,
    order: VecDeque<(InventoryType, UInt256)>,
}

impl RelayWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `hash` has been announced; returns `true` if it was
    /// not already known (i.e. the announcement should actually be sent).
    pub fn mark(&mut self, kind: InventoryType, hash: UInt256) -> bool {
        let key = (kind, hash);
        if !self.seen.insert(key) {
            return false;
        }
        self.order.push_back(key);
        if self.order.len() > RELAY_WINDOW {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        true
    }

    pub fn contains(&self, kind: InventoryType, hash: &UInt256) -> bool {
        self.seen.contains(&(kind, *hash))
    }
}

/// Splits a batch of hashes from a peer's `Inv` into the subset worth
/// requesting via `GetData` (not already known locally) versus ignoring.
pub fn filter_unknown(hashes: &[UInt256], already_have: impl Fn(&UInt256) -> bool) -> Vec<UInt256> {
    hashes.iter().filter(|h| !already_have(h)).copied().take(MAX_INVENTORY_HASHES).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_suppresses_repeat_announcements() {
        let mut window = RelayWindow::new();
        let hash = UInt256::from_bytes(&[1u8; 32]).unwrap();
        assert!(window.mark(InventoryType::Block, hash));
        assert!(!window.mark(InventoryType::Block, hash));
        assert!(window.mark(InventoryType::Transaction, hash));
    }

    #[test]
    fn filter_unknown_drops_hashes_already_held_and_caps_at_500() {
        let hashes: Vec<UInt256> = (0..600u32)
            .map(|i| {
                let mut b = [0u8; 32];
                b[0..4].copy_from_slice(&i.to_le_bytes());
                UInt256::from_bytes(&b).unwrap()
            })
            .collect();
        let zero = hashes[0];
        let filtered = filter_unknown(&hashes, |h| *h == zero);
        assert_eq!(filtered.len(), MAX_INVENTORY_HASHES);
        assert!(!filtered.contains(&zero));
    }
}
