// Copyright (C) 2015-2026 The Neo Project.
//
// server.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The P2P listener: accepts connections, runs the version/verack
//! handshake, and answers the handful of messages that don't require
//! touching the ledger or mempool (spec.md §4.8 "Connection model").

use neo_io::SerializableExt;
use neo_mempool::Mempool;
use neo_network::{AddressBook, Command, Message, PeerIdentity, PeerTable, VersionPayload, PAYLOAD_MAX_SIZE};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct ServerState {
    pub peers: Mutex<PeerTable>,
    pub addresses: Mutex<AddressBook>,
    pub mempool: Mempool,
    pub magic: u32,
    pub start_height: u32,
    pub nonce: u32,
}

/// Binds `bind_address` and serves connections until the process exits.
pub async fn run(bind_address: &str, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    info!(bind_address, "P2P listener bound");
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(error) = handle_connection(stream, state).await {
                debug!(%peer_addr, %error, "connection closed");
            }
        });
    }
}

async fn handle_connection(mut stream: TcpStream, state: Arc<ServerState>) -> anyhow::Result<()> {
    let peer_addr = stream.peer_addr()?;
    info!(%peer_addr, "inbound connection accepted");

    loop {
        let message = match read_message(&mut stream, state.magic).await {
            Ok(Some(message)) => message,
            Ok(None) => return Ok(()),
            Err(error) => {
                warn!(%peer_addr, %error, "disconnecting peer after malformed frame");
                return Err(error);
            }
        };

        match message.command {
            Command::Version => {
                let version = VersionPayload::from_array(&message.payload)?;
                let identity = PeerIdentity {
                    user_agent: version.user_agent.clone(),
                    version: version.version,
                    capabilities: version.services,
                    last_block_index: version.start_height,
                    nonce: version.nonce,
                };
                state.peers.lock().await.insert(neo_network::Peer::new(peer_addr, now_secs()));
                if let Some(peer) = state.peers.lock().await.get_mut(&peer_addr) {
                    peer.complete_handshake(identity);
                }
                info!(%peer_addr, user_agent = %version.user_agent, height = version.start_height, "handshake: received Version");
                let our_version = VersionPayload {
                    version: version.version,
                    services: 1,
                    timestamp: now_secs(),
                    port: peer_addr.port(),
                    nonce: state.nonce,
                    user_agent: "/neo-rs:0.1.0/".to_string(),
                    start_height: state.start_height,
                    allow_relay: true,
                };
                send(&mut stream, Command::Version, &our_version.to_array(), state.magic).await?;
                send(&mut stream, Command::Verack, &[], state.magic).await?;
            }
            Command::Verack => {
                debug!(%peer_addr, "handshake: received Verack");
            }
            Command::Ping => {
                send(&mut stream, Command::Pong, &message.payload, state.magic).await?;
            }
            Command::GetAddr => {
                let known = state.addresses.lock().await.len();
                debug!(%peer_addr, known, "peer requested address book");
            }
            Command::Mempool => {
                debug!(%peer_addr, pending = state.mempool.len(), "peer requested mempool contents");
            }
            other => {
                debug!(%peer_addr, command = ?other, "message not handled by this listener");
            }
        }
    }
}

async fn send(stream: &mut TcpStream, command: Command, payload: &[u8], magic: u32) -> anyhow::Result<()> {
    let message = Message::new(command, payload.to_vec())?;
    stream.write_all(&message.encode(magic)).await?;
    Ok(())
}

/// Reads one framed message: a fixed 14-byte header, then its payload.
async fn read_message(stream: &mut TcpStream, magic: u32) -> anyhow::Result<Option<Message>> {
    let mut header = [0u8; 14];
    match stream.read_exact(&mut header).await {
        Ok(_) => {}
        Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(error) => return Err(error.into()),
    }
    let payload_length = u32::from_le_bytes([header[6], header[7], header[8], header[9]]);
    if payload_length > PAYLOAD_MAX_SIZE {
        anyhow::bail!("payload length {payload_length} exceeds the protocol maximum");
    }
    let mut payload = vec![0u8; payload_length as usize];
    stream.read_exact(&mut payload).await?;
    let mut full = header.to_vec();
    full.extend_from_slice(&payload);
    Ok(Some(Message::decode(&full, magic)?))
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
