//! nodectl Common Types
//!
//! Shared protocol definitions for the nodectl administration console.
//!
//! # Overview
//!
//! nodectl is an interactive console for administering a long-running
//! blockchain node daemon over its HTTP control interface. This crate contains
//! the pieces shared by the client and the console binary:
//!
//! - **Protocol Layer**: the JSON-RPC 2.0 envelope and the RPC failure
//!   taxonomy used to classify every call outcome
//! - **Wire Contract**: typed request/response bodies for the daemon's
//!   JSON-RPC methods and direct HTTP endpoints
//!
//! The daemon's method names, paths and payload shapes are an external
//! contract and are reproduced here verbatim, not redesigned.
//!
//! # Example
//!
//! ```
//! use nodectl_common::protocol::JsonRpcRequest;
//! use nodectl_common::rpc::EmptyRequest;
//!
//! let params = EmptyRequest::default();
//! let request = JsonRpcRequest::new("getblockcount", &params, 1);
//! let encoded = serde_json::to_vec(&request).unwrap();
//! assert!(!encoded.is_empty());
//! ```

pub mod protocol;
pub mod rpc;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcError, RpcFailure};
