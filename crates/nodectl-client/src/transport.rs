//! HTTP transport bound to the daemon's control address.
//!
//! The transport owns the one shared, mutable resource of a console session:
//! the connection to the daemon. All access is serialized through an async
//! mutex, so commands can never interleave requests on the same socket.
//!
//! # Connection lifecycle
//!
//! - The address is fixed at construction and immutable for the transport's
//!   lifetime.
//! - The connection is established lazily on the first request and reused
//!   across calls.
//! - If a previously working connection breaks mid-call, the transport
//!   reconnects and resends exactly once before failing the call.
//! - A call abandoned on timeout marks the connection for reconnect on next
//!   use, so a late response can never be read by a later request.

use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1::{self, SendRequest};
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::debug;

/// Default per-call timeout, covering connect, send and receive.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A transport-level failure for a single request.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("{0}")]
    Connect(String),

    /// The deadline elapsed with no complete response.
    #[error("no response within {0}ms")]
    Timeout(u64),

    /// An established connection broke during the exchange.
    #[error("{0}")]
    Broken(String),

    /// The daemon answered outside the expected protocol.
    #[error("daemon answered with HTTP status {0}")]
    Status(u16),
}

/// HTTP/1.1 client for a single daemon address.
pub struct HttpTransport {
    addr: SocketAddr,
    timeout: Duration,
    conn: Mutex<Option<SendRequest<Full<Bytes>>>>,
}

impl HttpTransport {
    /// Creates a transport for `addr` with the default timeout. No connection
    /// is opened until the first request.
    pub fn new(addr: SocketAddr) -> Self {
        HttpTransport {
            addr,
            timeout: DEFAULT_TIMEOUT,
            conn: Mutex::new(None),
        }
    }

    /// Overrides the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The daemon address this transport was constructed with.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Sends a JSON body to `path` and returns the raw response body.
    ///
    /// One call, one network round trip; the only retry is the single
    /// reconnect-and-resend for a broken connection.
    pub async fn post(&self, path: &str, body: Bytes) -> Result<Bytes, TransportError> {
        match tokio::time::timeout(self.timeout, self.post_inner(path, body)).await {
            Ok(result) => result,
            Err(_) => {
                // The in-flight exchange was abandoned; whatever arrives late
                // on that socket must not be seen by the next call.
                self.conn.lock().await.take();
                Err(TransportError::Timeout(self.timeout.as_millis() as u64))
            }
        }
    }

    async fn post_inner(&self, path: &str, body: Bytes) -> Result<Bytes, TransportError> {
        let mut conn = self.conn.lock().await;

        for attempt in 0..2 {
            if conn.as_ref().map_or(true, |sender| sender.is_closed()) {
                *conn = Some(self.handshake().await?);
            }
            let sender = match conn.as_mut() {
                Some(sender) => sender,
                None => return Err(TransportError::Broken("connection unavailable".into())),
            };

            let request = Request::builder()
                .method("POST")
                .uri(path)
                .header(hyper::header::HOST, self.addr.to_string())
                .header(hyper::header::CONTENT_TYPE, "application/json")
                .body(Full::new(body.clone()))
                .map_err(|e| TransportError::Broken(format!("building request: {e}")))?;

            match sender.send_request(request).await {
                Ok(response) => {
                    let status = response.status();
                    let collected = match response.into_body().collect().await {
                        Ok(collected) => collected,
                        Err(e) => {
                            conn.take();
                            return Err(TransportError::Broken(format!(
                                "reading response body: {e}"
                            )));
                        }
                    };
                    if status != StatusCode::OK {
                        return Err(TransportError::Status(status.as_u16()));
                    }
                    return Ok(collected.to_bytes());
                }
                Err(e) => {
                    conn.take();
                    if attempt == 0 {
                        debug!(error = %e, "daemon connection broken, reconnecting");
                        continue;
                    }
                    return Err(TransportError::Broken(format!("request failed: {e}")));
                }
            }
        }

        Err(TransportError::Broken("connection unavailable".into()))
    }

    async fn handshake(&self) -> Result<SendRequest<Full<Bytes>>, TransportError> {
        let stream = TcpStream::connect(self.addr)
            .await
            .map_err(|e| TransportError::Connect(format!("{} ({e})", self.addr)))?;

        let io = TokioIo::new(stream);
        let (sender, connection) = http1::handshake(io)
            .await
            .map_err(|e| TransportError::Connect(format!("{} ({e})", self.addr)))?;

        // The connection task owns the socket; it finishes when the sender is
        // dropped or the peer goes away.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!(error = %e, "daemon connection closed");
            }
        });

        debug!(addr = %self.addr, "connected to daemon");
        Ok(sender)
    }
}
