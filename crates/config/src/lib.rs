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

//! Process-wide configuration (spec.md §6 "Configuration"): network magic,
//! validator/committee counts, seed peers, storage path, hardfork
//! activation heights. Parsed once at startup from TOML; nothing in the
//! core reads configuration lazily or from a global.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Which named network a node is joining. Each carries its own magic
/// number and address version (spec.md §3 address encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NetworkType {
    MainNet,
    #[default]
    TestNet,
    Private,
}

impl NetworkType {
    /// The 4-byte network magic embedded in every P2P message header and
    /// mixed into the signed message hash for `CheckSig` (spec.md §4.3).
    pub fn magic(&self) -> u32 {
        match self {
            NetworkType::MainNet => 0x334f_454e,
            NetworkType::TestNet => 0x3254_334e,
            NetworkType::Private => 0x0000_0000,
        }
    }

    /// Base58Check address version byte.
    pub fn address_version(&self) -> u8 {
        0x35
    }

    /// Default P2P port.
    pub fn default_port(&self) -> u16 {
        match self {
            NetworkType::MainNet => 10333,
            NetworkType::TestNet => 20333,
            NetworkType::Private => 30333,
        }
    }
}

/// A named hardfork gate (spec.md §9 "hardfork transitions").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Hardfork {
    Aspidochelone,
    Basilisk,
    Cockatrice,
    Domovoi,
}

/// Chain-wide protocol parameters every subsystem must agree on.
///
/// These are the defaults spec.md §4.4 `PolicyContract` names; the on-chain
/// `PolicyContract` can subsequently override the mutable ones (FeePerByte,
/// ExecFeeFactor, ...) but the node boots from this table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolSettings {
    pub network: NetworkType,
    pub validators_count: u32,
    pub committee_members_count: u32,
    pub milliseconds_per_block: u64,
    pub max_transactions_per_block: u32,
    pub max_traceable_blocks: u32,
    pub max_valid_until_block_increment: u32,
    pub initial_gas_distribution: i64,
    pub seed_list: Vec<String>,
    pub hardfork_heights: BTreeMap<Hardfork, u32>,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        let mut hardfork_heights = BTreeMap::new();
        hardfork_heights.insert(Hardfork::Aspidochelone, 0);
        hardfork_heights.insert(Hardfork::Basilisk, 0);
        hardfork_heights.insert(Hardfork::Cockatrice, 0);
        hardfork_heights.insert(Hardfork::Domovoi, 0);
        Self {
            network: NetworkType::TestNet,
            validators_count: 7,
            committee_members_count: 21,
            milliseconds_per_block: 15_000,
            max_transactions_per_block: 512,
            max_traceable_blocks: 2_102_400,
            max_valid_until_block_increment: 5760,
            initial_gas_distribution: 52_000_000 * 100_000_000,
            seed_list: vec![
                "seed1t5.neo.org:20333".to_string(),
                "seed2t5.neo.org:20333".to_string(),
                "seed3t5.neo.org:20333".to_string(),
            ],
            hardfork_heights,
        }
    }
}

impl ProtocolSettings {
    /// True if `hardfork` is active at `height`.
    pub fn is_hardfork_active(&self, hardfork: Hardfork, height: u32) -> bool {
        self.hardfork_heights
            .get(&hardfork)
            .is_some_and(|&activation| height >= activation)
    }
}

/// Process-level node configuration: everything outside the chain-wide
/// protocol parameters (storage location, RPC bind address — accepted and
/// stored even though the RPC server itself is out of scope per spec.md §1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub protocol: ProtocolSettings,
    pub storage_path: PathBuf,
    /// Free-form selector for the concrete KV engine (e.g. "rocksdb",
    /// "memory"); this crate never constructs the engine itself.
    pub storage_engine: String,
    pub rpc_bind_address: Option<String>,
    pub p2p_bind_address: String,
    pub max_peers: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolSettings::default(),
            storage_path: PathBuf::from("./data"),
            storage_engine: "memory".to_string(),
            rpc_bind_address: None,
            p2p_bind_address: "0.0.0.0:20333".to_string(),
            max_peers: 40,
        }
    }
}

impl NodeConfig {
    /// Parses configuration from a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Serializes this configuration back to TOML (used to write out a
    /// default config file on first run).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = NodeConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.protocol.network, config.protocol.network);
        assert_eq!(parsed.storage_path, config.storage_path);
    }

    #[test]
    fn hardfork_activation_is_height_gated() {
        let mut settings = ProtocolSettings::default();
        settings.hardfork_heights.insert(Hardfork::Domovoi, 100);
        assert!(!settings.is_hardfork_active(Hardfork::Domovoi, 99));
        assert!(settings.is_hardfork_active(Hardfork::Domovoi, 100));
    }
}
