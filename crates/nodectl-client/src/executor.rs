//! Typed RPC call primitives on top of [`HttpTransport`].
//!
//! The daemon exposes two calling shapes:
//!
//! - **JSON-RPC**: methods multiplexed behind `POST /json_rpc` inside the
//!   2.0 envelope ([`call_json_rpc`](RpcExecutor::call_json_rpc))
//! - **Direct HTTP**: one path per operation, raw JSON bodies both ways
//!   ([`call_http`](RpcExecutor::call_http))
//!
//! Both classify failures identically ([`RpcFailure`]) and attach the
//! caller's fail message, so a command handler renders what operation failed
//! rather than a bare transport detail. Business-level errors are never
//! retried here; the only retry in the stack is the transport's single
//! reconnect for a broken connection.

use std::sync::atomic::{AtomicU64, Ordering};

use hyper::body::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use nodectl_common::protocol::{JsonRpcRequest, JsonRpcResponse, Result, RpcError, RpcFailure};

use crate::transport::{HttpTransport, TransportError};

/// Path the daemon serves JSON-RPC methods under.
pub const JSON_RPC_PATH: &str = "/json_rpc";

/// Executes typed RPC calls against one daemon.
pub struct RpcExecutor {
    transport: HttpTransport,
    next_id: AtomicU64,
}

impl RpcExecutor {
    pub fn new(transport: HttpTransport) -> Self {
        RpcExecutor {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    /// The transport this executor sends through.
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Invokes a JSON-RPC method and decodes the enveloped result.
    ///
    /// The envelope's `error` field is checked before `result`, and the
    /// response id must match the request id issued here; see
    /// [`JsonRpcResponse::into_result`].
    pub async fn call_json_rpc<Req, Res>(
        &self,
        method: &str,
        request: &Req,
        fail_msg: &str,
    ) -> Result<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = JsonRpcRequest::new(method, request, id);
        let body = encode(&envelope, fail_msg)?;

        let response = self
            .transport
            .post(JSON_RPC_PATH, body)
            .await
            .map_err(|e| RpcError::new(fail_msg, classify(e)))?;

        JsonRpcResponse::decode(&response)
            .and_then(|envelope| envelope.into_result(id))
            .map_err(|failure| RpcError::new(fail_msg, failure))
    }

    /// Invokes a direct HTTP endpoint and decodes the raw JSON response.
    pub async fn call_http<Req, Res>(&self, path: &str, request: &Req, fail_msg: &str) -> Result<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let body = encode(request, fail_msg)?;

        let response = self
            .transport
            .post(path, body)
            .await
            .map_err(|e| RpcError::new(fail_msg, classify(e)))?;

        serde_json::from_slice(&response).map_err(|e| {
            RpcError::new(
                fail_msg,
                RpcFailure::MalformedResponse(format!("unexpected response shape: {e}")),
            )
        })
    }
}

fn encode<T: Serialize>(value: &T, fail_msg: &str) -> Result<Bytes> {
    let body = serde_json::to_vec(value).map_err(|e| {
        RpcError::new(
            fail_msg,
            RpcFailure::MalformedResponse(format!("request encoding failed: {e}")),
        )
    })?;
    Ok(Bytes::from(body))
}

fn classify(error: TransportError) -> RpcFailure {
    match error {
        TransportError::Connect(msg) | TransportError::Broken(msg) => {
            RpcFailure::ConnectionRefused(msg)
        }
        TransportError::Timeout(ms) => RpcFailure::Timeout(ms),
        TransportError::Status(code) => {
            RpcFailure::MalformedResponse(format!("unexpected HTTP status {code}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(matches!(
            classify(TransportError::Connect("refused".into())),
            RpcFailure::ConnectionRefused(_)
        ));
        assert!(matches!(
            classify(TransportError::Broken("reset".into())),
            RpcFailure::ConnectionRefused(_)
        ));
        assert!(matches!(
            classify(TransportError::Timeout(500)),
            RpcFailure::Timeout(500)
        ));
        assert!(matches!(
            classify(TransportError::Status(500)),
            RpcFailure::MalformedResponse(_)
        ));
    }

    #[test]
    fn test_fail_message_is_attached() {
        let err = RpcError::new("Failed to get connections", classify(TransportError::Connect("refused".into())));
        let rendered = err.to_string();
        assert!(rendered.starts_with("Failed to get connections: "));
        assert!(rendered.contains("Unable to connect to daemon"));
    }
}
