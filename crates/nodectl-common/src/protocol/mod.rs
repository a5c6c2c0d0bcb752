pub mod error;
pub mod jsonrpc;

pub use error::{Result, RpcError, RpcFailure};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
