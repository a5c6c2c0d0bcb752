//! Minimal HTTP/1.1 mock of the daemon's control interface.
//!
//! Accepts connections on a random local port, parses each request enough to
//! recover the path and body, and answers according to the test's responder.
//! Connection accepts and parsed requests are counted so tests can observe
//! reconnect behavior and assert that no RPC was made.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub enum Reply {
    /// Answer with `200 OK` and the given JSON body.
    Json(String),
    /// Drop the connection without answering.
    Close,
    /// Hold the connection open without answering.
    Hang,
}

pub type Responder = dyn Fn(&str, &str) -> Reply + Send + Sync;

pub struct MockDaemon {
    pub addr: SocketAddr,
    /// TCP connections accepted.
    pub accepts: Arc<AtomicUsize>,
    /// HTTP requests parsed, across all connections.
    pub requests: Arc<AtomicUsize>,
}

pub async fn spawn(responder: Arc<Responder>) -> MockDaemon {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(AtomicUsize::new(0));

    let task_accepts = accepts.clone();
    let task_requests = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            task_accepts.fetch_add(1, Ordering::SeqCst);
            let responder = responder.clone();
            let requests = task_requests.clone();
            tokio::spawn(serve(stream, responder, requests));
        }
    });

    MockDaemon {
        addr,
        accepts,
        requests,
    }
}

async fn serve(mut stream: TcpStream, responder: Arc<Responder>, requests: Arc<AtomicUsize>) {
    while let Some((path, body)) = read_request(&mut stream).await {
        requests.fetch_add(1, Ordering::SeqCst);
        match responder(&path, &body) {
            Reply::Json(json) => {
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                    json.len(),
                    json
                );
                if stream.write_all(response.as_bytes()).await.is_err() {
                    return;
                }
            }
            Reply::Close => return,
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                return;
            }
        }
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let mut header_end = None;
    while header_end.is_none() {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        header_end = buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4);
    }
    let header_end = header_end?;

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let path = headers.lines().next()?.split_whitespace().nth(1)?.to_string();
    let content_length: usize = headers
        .lines()
        .filter(|line| line.to_ascii_lowercase().starts_with("content-length:"))
        .filter_map(|line| line.split(':').nth(1))
        .filter_map(|value| value.trim().parse().ok())
        .next()
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..header_end + content_length]).to_string();
    Some((path, body))
}

/// Builds a JSON-RPC success envelope echoing the id of `request_body`.
pub fn rpc_result(request_body: &str, result: serde_json::Value) -> String {
    let request: serde_json::Value = serde_json::from_str(request_body).unwrap();
    serde_json::json!({"jsonrpc": "2.0", "result": result, "id": request["id"]}).to_string()
}

/// Builds a JSON-RPC error envelope echoing the id of `request_body`.
pub fn rpc_error(request_body: &str, code: i64, message: &str) -> String {
    let request: serde_json::Value = serde_json::from_str(request_body).unwrap();
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": {"code": code, "message": message},
        "id": request["id"],
    })
    .to_string()
}
