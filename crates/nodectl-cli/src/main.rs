//! # nodectl Entry Point
//!
//! Interactive administration console for a blockchain node daemon.
//!
//! ## Usage
//!
//! ```bash
//! # Connect to a daemon on the default control port
//! nodectl
//!
//! # Connect to a specific daemon
//! nodectl -a 192.168.1.10:8081
//!
//! # Shorter per-request deadline
//! nodectl --timeout-ms 5000
//! ```
//!
//! Commands are typed at the prompt; `help` lists them. A failed command is
//! reported and the prompt returns; only `exit` (or EOF) leaves the console.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use argh::FromArgs;

use nodectl_cli::{default_registry, CommandServer, ConsoleSession};
use nodectl_client::{HttpTransport, RpcExecutor};

/// nodectl - interactive administration console for a node daemon
#[derive(FromArgs)]
struct Args {
    /// address of the daemon's RPC interface (ip:port)
    #[argh(option, short = 'a', default = "\"127.0.0.1:8081\".into()")]
    address: String,

    /// per-request timeout in milliseconds
    #[argh(option, long = "timeout-ms", default = "30000")]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    // Logs go to stderr at WARN by default so they never mix with command
    // output; RUST_LOG overrides for debugging.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Invalid connection parameters are the one fatal startup condition.
    let addr: SocketAddr = args
        .address
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid daemon address '{}': {}", args.address, e))?;

    let transport = HttpTransport::new(addr).with_timeout(Duration::from_millis(args.timeout_ms));
    let session = ConsoleSession::new(RpcExecutor::new(transport));
    let mut server = CommandServer::new(session, default_registry());
    tracing::debug!(%addr, timeout_ms = args.timeout_ms, "console session configured");

    println!("nodectl console, daemon at {addr}; type 'help' for the command list");
    server.run().await?;

    Ok(())
}
