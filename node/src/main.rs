// Copyright (C) 2015-2026 The Neo Project.
//
// main.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Neo N3 node daemon: wires the ledger, mempool, and P2P engines
//! together and serves connections until interrupted.
//!
//! Usage:
//!   neo-node --config node.toml

mod server;

use anyhow::Context;
use clap::Parser;
use neo_config::NodeConfig;
use neo_consensus::ConsensusContext;
use neo_ledger::{genesis_block, initialize_genesis_state, persist_block};
use neo_mempool::{Mempool, MempoolConfig};
use neo_network::AddressBook;
use neo_persistence::{MemoryStore, Store};
use neo_primitives::UInt160;
use server::ServerState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "neo-node", about = "Neo N3 blockchain node daemon", version)]
struct Cli {
    /// Path to a TOML configuration file; defaults are used if absent.
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides the configured P2P bind address.
    #[arg(long, value_name = "HOST:PORT")]
    listen: Option<String>,

    /// Overrides the maximum number of tracked peer addresses.
    #[arg(long, value_name = "N")]
    max_peers: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.p2p_bind_address = listen;
    }
    if let Some(max_peers) = cli.max_peers {
        config.max_peers = max_peers;
    }

    info!(network = ?config.protocol.network, "starting node");

    let store = MemoryStore::new();
    let mut snapshot = store.snapshot();
    let committee = deterministic_committee(config.protocol.committee_members_count);
    initialize_genesis_state(snapshot.as_mut(), &committee).context("seeding genesis state")?;
    let genesis = genesis_block(1_468_595_301, committee[0]);
    persist_block(snapshot.as_mut(), &genesis, config.protocol.network.magic()).context("persisting genesis block")?;
    snapshot.commit().context("committing genesis snapshot")?;
    info!(hash = %genesis.hash(), "genesis block persisted");

    let mempool = Mempool::new(MempoolConfig::default());

    let consensus_context = ConsensusContext::new(genesis.index() + 1, committee.clone(), -1, genesis.hash(), committee[0]);
    info!(
        block_index = consensus_context.block_index,
        quorum = consensus_context.quorum(),
        primary = consensus_context.primary_index(),
        "consensus context ready for the next block"
    );

    let addresses = AddressBook::new(config.max_peers);
    for seed in &config.protocol.seed_list {
        info!(seed, "configured seed node (resolved at dial time)");
    }

    let state = Arc::new(ServerState {
        peers: Mutex::new(neo_network::PeerTable::new()),
        addresses: Mutex::new(addresses),
        mempool,
        magic: config.protocol.network.magic(),
        start_height: genesis.index(),
        nonce: process_nonce(),
    });

    let bind_address = config.p2p_bind_address.clone();
    let server_state = Arc::clone(&state);
    let server_handle = tokio::spawn(async move { server::run(&bind_address, server_state).await });

    tokio::select! {
        result = server_handle => {
            result.context("P2P listener task panicked")??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<NodeConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            NodeConfig::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(NodeConfig::default()),
    }
}

/// Wallet and key management are out of scope (spec.md §1), so the node
/// bootstraps a deterministic placeholder committee rather than reading
/// real validator keys from a wallet file.
fn deterministic_committee(count: u32) -> Vec<UInt160> {
    (0..count)
        .map(|i| {
            let mut bytes = [0u8; 20];
            bytes[0] = (i + 1) as u8;
            UInt160::from_bytes(&bytes).expect("20-byte array is always a valid UInt160")
        })
        .collect()
}

fn process_nonce() -> u32 {
    std::process::id()
}
