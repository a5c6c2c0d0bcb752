//! Daemon Wire Contract
//!
//! Typed request and response bodies for the daemon's control interface.
//! JSON-RPC methods (`getblockcount`, `getblockheaderbyhash`, ...) travel in
//! the envelope from [`crate::protocol::jsonrpc`]; direct endpoints
//! (`/get_info`, `/stop_daemon`, ...) take these bodies raw.
//!
//! Field names and shapes mirror the daemon and must not be renamed. List
//! fields carry `#[serde(default)]` because the daemon omits empty lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// `status` value the daemon reports on success.
pub const STATUS_OK: &str = "OK";

/// 32-byte block or transaction digest, transmitted as 64 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hash256([u8; 32]);

/// Length of a digest in hex characters.
pub const HASH_HEX_LEN: usize = 64;

#[derive(Error, Debug, PartialEq)]
#[error("invalid hash '{0}': expected {HASH_HEX_LEN} hex characters")]
pub struct HashParseError(pub String);

impl Hash256 {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Hash256 {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HASH_HEX_LEN {
            return Err(HashParseError(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| HashParseError(s.to_string()))?;
        Ok(Hash256(bytes))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Empty request body for parameterless calls.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmptyRequest {}

/// Response carrying nothing but the daemon status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

// --- JSON-RPC methods ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetBlockCountResponse {
    pub count: u64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetBlockHeaderByHashRequest {
    pub hash: Hash256,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetBlockHeaderByHeightRequest {
    pub height: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockHeaderResponse {
    pub block_header: BlockHeader,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetBlockHeadersRangeRequest {
    pub start_height: u64,
    pub end_height: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetBlockHeadersRangeResponse {
    #[serde(default)]
    pub headers: Vec<BlockHeader>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockHeader {
    pub major_version: u8,
    pub minor_version: u8,
    pub timestamp: u64,
    pub prev_hash: Hash256,
    pub nonce: u32,
    pub orphan_status: bool,
    pub height: u64,
    pub depth: u64,
    pub hash: Hash256,
    pub difficulty: u64,
    pub reward: u64,
}

// --- Direct HTTP endpoints ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetInfoResponse {
    pub height: u64,
    pub difficulty: u64,
    pub tx_count: u64,
    pub tx_pool_size: u64,
    pub alt_blocks_count: u64,
    pub outgoing_connections_count: u64,
    pub incoming_connections_count: u64,
    pub white_peerlist_size: u64,
    pub grey_peerlist_size: u64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerEntry {
    pub id: u64,
    pub host: String,
    pub port: u16,
    pub last_seen: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetPeerListResponse {
    #[serde(default)]
    pub white_list: Vec<PeerEntry>,
    #[serde(default)]
    pub gray_list: Vec<PeerEntry>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionInfo {
    pub incoming: bool,
    pub address: String,
    pub peer_id: u64,
    pub recv_count: u64,
    pub send_count: u64,
    pub state: String,
    pub live_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetConnectionsResponse {
    #[serde(default)]
    pub connections: Vec<ConnectionInfo>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetLogLevelRequest {
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetLogHashRateRequest {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetTransactionsRequest {
    pub txs_hashes: Vec<Hash256>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetTransactionsResponse {
    #[serde(default)]
    pub txs_as_hex: Vec<String>,
    #[serde(default)]
    pub missed_tx: Vec<Hash256>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TxPoolEntry {
    pub id_hash: Hash256,
    pub blob_size: u64,
    pub fee: u64,
    pub receive_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetTransactionPoolResponse {
    #[serde(default)]
    pub transactions: Vec<TxPoolEntry>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MiningStatusResponse {
    pub active: bool,
    pub speed: u64,
    pub threads_count: u64,
    pub address: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartMiningRequest {
    pub miner_address: String,
    pub threads_count: u64,
}
