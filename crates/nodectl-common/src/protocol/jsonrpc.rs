//! JSON-RPC 2.0 Envelope Types
//!
//! The daemon exposes part of its control surface as JSON-RPC 2.0 methods
//! behind a single `POST /json_rpc` endpoint. This module implements the
//! request and response envelopes for that calling shape.
//!
//! # Envelope Format
//!
//! - Request: `{"jsonrpc": "2.0", "method": "...", "params": ..., "id": ...}`
//! - Response: `{"jsonrpc": "2.0", "result": ..., "error": ..., "id": ...}`
//! - Error object: `{"code": ..., "message": "..."}`
//!
//! # Decode Order
//!
//! [`JsonRpcResponse::into_result`] checks the `error` field before touching
//! `result`: a populated `error` always maps to [`RpcFailure::Remote`] and the
//! `result` payload is never deserialized. The envelope `id` is then matched
//! against the originating request's id, so a late response from an abandoned
//! call can never be attributed to a different request.
//!
//! # Example
//!
//! ```
//! use nodectl_common::protocol::{JsonRpcRequest, JsonRpcResponse};
//! use serde_json::json;
//!
//! let params = json!({});
//! let request = JsonRpcRequest::new("getblockcount", &params, 7);
//! assert_eq!(request.method, "getblockcount");
//!
//! let body = br#"{"jsonrpc":"2.0","result":{"count":42,"status":"OK"},"id":7}"#;
//! let response = JsonRpcResponse::decode(body).unwrap();
//! let result: serde_json::Value = response.into_result(7).unwrap();
//! assert_eq!(result["count"], 42);
//! ```

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::error::RpcFailure;

/// Protocol version stamped on every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope.
///
/// Borrows the method name and params from the caller; the executor builds
/// one per invocation and discards it after serialization.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, P: Serialize> {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: &'static str,
    /// Name of the daemon method to invoke
    pub method: &'a str,
    /// Typed parameter payload
    pub params: &'a P,
    /// Request identifier, echoed back in the response
    pub id: u64,
}

impl<'a, P: Serialize> JsonRpcRequest<'a, P> {
    pub fn new(method: &'a str, params: &'a P, id: u64) -> Self {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id,
        }
    }
}

/// JSON-RPC 2.0 response envelope.
///
/// `result` is kept as a raw [`Value`] until the `error` field has been
/// inspected; see [`JsonRpcResponse::into_result`].
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version
    pub jsonrpc: String,
    /// Result value on success
    pub result: Option<Value>,
    /// Error object on failure
    pub error: Option<JsonRpcError>,
    /// Request identifier this response answers
    pub id: u64,
}

/// JSON-RPC 2.0 error object returned by the daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// Error code (standard codes are negative integers)
    pub code: i64,
    /// Short description of the error
    pub message: String,
}

impl JsonRpcResponse {
    /// Decodes a response envelope from a raw HTTP body.
    ///
    /// A body that is not a well-formed envelope maps to
    /// [`RpcFailure::MalformedResponse`]; it never propagates as a fault.
    pub fn decode(body: &[u8]) -> Result<Self, RpcFailure> {
        serde_json::from_slice(body)
            .map_err(|e| RpcFailure::MalformedResponse(format!("invalid JSON-RPC envelope: {e}")))
    }

    /// Extracts the typed result, enforcing the decode order documented on
    /// this module: `error` first, then the request-id match, then `result`.
    pub fn into_result<R: DeserializeOwned>(self, expected_id: u64) -> Result<R, RpcFailure> {
        if let Some(err) = self.error {
            return Err(RpcFailure::Remote {
                code: err.code,
                message: err.message,
            });
        }

        if self.id != expected_id {
            return Err(RpcFailure::MalformedResponse(format!(
                "response id {} does not match request id {}",
                self.id, expected_id
            )));
        }

        let result = self.result.ok_or_else(|| {
            RpcFailure::MalformedResponse("response carries neither result nor error".into())
        })?;

        serde_json::from_value(result)
            .map_err(|e| RpcFailure::MalformedResponse(format!("unexpected result shape: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let params = json!({"height": 12});
        let req = JsonRpcRequest::new("getblockheaderbyheight", &params, 3);
        let serialized = serde_json::to_string(&req).unwrap();
        assert!(serialized.contains("\"jsonrpc\":\"2.0\""));
        assert!(serialized.contains("\"method\":\"getblockheaderbyheight\""));
        assert!(serialized.contains("\"params\":{\"height\":12}"));
        assert!(serialized.contains("\"id\":3"));
    }

    #[test]
    fn test_success_response_decodes_result() {
        let body = br#"{"jsonrpc":"2.0","result":{"count":12345,"status":"OK"},"id":1}"#;
        let response = JsonRpcResponse::decode(body).unwrap();
        let result: Value = response.into_result(1).unwrap();
        assert_eq!(result["count"], 12345);
    }

    #[test]
    fn test_error_field_wins_over_result() {
        // The result payload is garbage on purpose: with a populated error it
        // must never be deserialized.
        let body = br#"{"jsonrpc":"2.0","result":"not an object","error":{"code":-5,"message":"block not found"},"id":1}"#;
        let response = JsonRpcResponse::decode(body).unwrap();
        let outcome = response.into_result::<std::collections::HashMap<String, u64>>(1);
        match outcome {
            Err(RpcFailure::Remote { code, message }) => {
                assert_eq!(code, -5);
                assert_eq!(message, "block not found");
            }
            other => panic!("expected Remote failure, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_id_is_malformed() {
        let body = br#"{"jsonrpc":"2.0","result":{"status":"OK"},"id":9}"#;
        let response = JsonRpcResponse::decode(body).unwrap();
        let outcome = response.into_result::<Value>(1);
        assert!(matches!(outcome, Err(RpcFailure::MalformedResponse(_))));
    }

    #[test]
    fn test_missing_result_and_error_is_malformed() {
        let body = br#"{"jsonrpc":"2.0","id":1}"#;
        let response = JsonRpcResponse::decode(body).unwrap();
        let outcome = response.into_result::<Value>(1);
        assert!(matches!(outcome, Err(RpcFailure::MalformedResponse(_))));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let outcome = JsonRpcResponse::decode(b"{not json");
        assert!(matches!(outcome, Err(RpcFailure::MalformedResponse(_))));
    }
}
