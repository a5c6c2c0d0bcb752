//! nodectl Client
//!
//! The RPC side of the nodectl console: an HTTP transport bound to a single
//! daemon address and an executor exposing the two calling shapes of the
//! daemon's control interface.
//!
//! # Components
//!
//! - [`transport::HttpTransport`] - owns the connection to the daemon:
//!   lazy connect, connection reuse, per-call timeout, and exactly one
//!   transparent reconnect when a previously working connection breaks
//! - [`executor::RpcExecutor`] - typed `call_json_rpc` / `call_http`
//!   primitives with uniform failure classification
//!
//! # Example
//!
//! ```no_run
//! use nodectl_client::{HttpTransport, RpcExecutor};
//! use nodectl_common::rpc::{EmptyRequest, GetBlockCountResponse};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("127.0.0.1:8081".parse()?);
//! let executor = RpcExecutor::new(transport);
//!
//! let response: GetBlockCountResponse = executor
//!     .call_json_rpc("getblockcount", &EmptyRequest::default(), "Failed to get height")
//!     .await?;
//! println!("{}", response.count);
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod transport;

pub use executor::RpcExecutor;
pub use transport::{HttpTransport, TransportError};
