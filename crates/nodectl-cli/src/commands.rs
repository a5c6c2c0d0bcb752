//! Command handlers.
//!
//! One handler per administrative operation. Every handler follows the same
//! shape: derive a typed request from the string arguments (parse failures
//! are local and never reach the wire), invoke the executor, check the
//! daemon's `status` field, and render one block of operator-visible output.
//!
//! `stop_mining` is the one check-then-act handler: it verifies mining is
//! active before asking the daemon to stop, and a failure of the second call
//! after a successful check is reported as an explicit partial failure so the
//! daemon's state is never left ambiguous to the operator.

use std::fmt::Write as _;

use thiserror::Error;

use nodectl_common::protocol::RpcError;
use nodectl_common::rpc::{
    BlockHeader, BlockHeaderResponse, ConnectionInfo, EmptyRequest, GetBlockCountResponse,
    GetBlockHeaderByHashRequest, GetBlockHeaderByHeightRequest, GetBlockHeadersRangeRequest,
    GetBlockHeadersRangeResponse, GetConnectionsResponse, GetInfoResponse, GetPeerListResponse,
    GetTransactionPoolResponse, GetTransactionsRequest, GetTransactionsResponse, Hash256,
    MiningStatusResponse, SetLogHashRateRequest, SetLogLevelRequest, StartMiningRequest,
    StatusResponse, HASH_HEX_LEN, STATUS_OK,
};

use crate::console::ConsoleSession;

/// Target spacing between blocks, used to estimate network hash rate from
/// the reported difficulty.
const DIFFICULTY_TARGET_SECS: u64 = 120;

/// Highest daemon log level.
const MAX_LOG_LEVEL: u8 = 4;

/// Handler tag stored in the registry; dispatched in [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Status,
    PrintHeight,
    PrintPeerList,
    PrintConnections,
    PrintBlockchain,
    PrintBlock,
    PrintTransaction,
    PrintPool,
    PrintPoolShort,
    ShowHashRate,
    HideHashRate,
    ShowDifficulty,
    SaveBlockchain,
    SetLogLevel,
    StartMining,
    StopMining,
    StopDaemon,
    Exit,
}

#[derive(Error, Debug)]
pub enum CommandError {
    /// Bad argument value; resolved locally, no RPC is made.
    #[error("{0}")]
    Parse(String),

    /// Classified RPC failure with the operation's fail message attached.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The call went through but the daemon reported a non-OK status.
    #[error("{context}: daemon returned status '{status}'")]
    Status { context: String, status: String },

    /// A check-then-act sequence failed after the check succeeded.
    #[error("{0}")]
    Partial(String),
}

/// Executes one handler to completion and returns its rendered output.
///
/// `Help` and `Exit` are resolved by the console loop itself and never reach
/// this function through normal dispatch.
pub async fn run(
    kind: CommandKind,
    session: &ConsoleSession,
    args: &[String],
) -> Result<String, CommandError> {
    match kind {
        CommandKind::Help | CommandKind::Exit => Ok(String::new()),
        CommandKind::Status => status(session).await,
        CommandKind::PrintHeight => print_height(session).await,
        CommandKind::PrintPeerList => print_peer_list(session).await,
        CommandKind::PrintConnections => print_connections(session).await,
        CommandKind::PrintBlockchain => print_blockchain(session, args).await,
        CommandKind::PrintBlock => print_block(session, args).await,
        CommandKind::PrintTransaction => print_transaction(session, args).await,
        CommandKind::PrintPool => print_pool(session, false).await,
        CommandKind::PrintPoolShort => print_pool(session, true).await,
        CommandKind::ShowHashRate => set_hash_rate_visibility(session, true).await,
        CommandKind::HideHashRate => set_hash_rate_visibility(session, false).await,
        CommandKind::ShowDifficulty => show_difficulty(session).await,
        CommandKind::SaveBlockchain => save_blockchain(session).await,
        CommandKind::SetLogLevel => set_log_level(session, args).await,
        CommandKind::StartMining => start_mining(session, args).await,
        CommandKind::StopMining => stop_mining(session).await,
        CommandKind::StopDaemon => stop_daemon(session).await,
    }
}

fn check_status(status: &str, context: &str) -> Result<(), CommandError> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(CommandError::Status {
            context: context.into(),
            status: status.into(),
        })
    }
}

async fn status(session: &ConsoleSession) -> Result<String, CommandError> {
    let context = "Failed to get daemon info";
    let info: GetInfoResponse = session
        .executor()
        .call_http("/get_info", &EmptyRequest::default(), context)
        .await?;
    check_status(&info.status, context)?;

    Ok(format!(
        "height {}, difficulty {}, tx count {}, pool size {}, alt blocks {}, connections in {}/out {}",
        info.height,
        info.difficulty,
        info.tx_count,
        info.tx_pool_size,
        info.alt_blocks_count,
        info.incoming_connections_count,
        info.outgoing_connections_count,
    ))
}

async fn print_height(session: &ConsoleSession) -> Result<String, CommandError> {
    let context = "Failed to get blockchain height";
    let response: GetBlockCountResponse = session
        .executor()
        .call_json_rpc("getblockcount", &EmptyRequest::default(), context)
        .await?;
    check_status(&response.status, context)?;

    Ok(response.count.to_string())
}

async fn print_peer_list(session: &ConsoleSession) -> Result<String, CommandError> {
    let context = "Failed to get peer list";
    let response: GetPeerListResponse = session
        .executor()
        .call_http("/get_peer_list", &EmptyRequest::default(), context)
        .await?;
    check_status(&response.status, context)?;

    if response.white_list.is_empty() && response.gray_list.is_empty() {
        return Ok("Peer list is empty".into());
    }

    let mut out = String::new();
    let _ = writeln!(out, "white list ({} peers):", response.white_list.len());
    for peer in &response.white_list {
        let _ = writeln!(
            out,
            "{:016x}\t{}:{}\tlast seen {}",
            peer.id, peer.host, peer.port, peer.last_seen
        );
    }
    let _ = writeln!(out, "gray list ({} peers):", response.gray_list.len());
    for peer in &response.gray_list {
        let _ = writeln!(
            out,
            "{:016x}\t{}:{}\tlast seen {}",
            peer.id, peer.host, peer.port, peer.last_seen
        );
    }
    Ok(out.trim_end().to_string())
}

fn render_connection(conn: &ConnectionInfo) -> String {
    let direction = if conn.incoming { "INC" } else { "OUT" };
    format!(
        "{} {} id {:016x} state {} up {}s recv {} sent {}",
        direction, conn.address, conn.peer_id, conn.state, conn.live_time, conn.recv_count,
        conn.send_count
    )
}

async fn print_connections(session: &ConsoleSession) -> Result<String, CommandError> {
    let context = "Failed to get connections";
    let response: GetConnectionsResponse = session
        .executor()
        .call_http("/get_connections", &EmptyRequest::default(), context)
        .await?;
    check_status(&response.status, context)?;

    if response.connections.is_empty() {
        return Ok("No active connections".into());
    }

    let lines: Vec<String> = response.connections.iter().map(render_connection).collect();
    Ok(lines.join("\n"))
}

fn parse_height(arg: &str, what: &str) -> Result<u64, CommandError> {
    arg.parse()
        .map_err(|_| CommandError::Parse(format!("{what} must be an unsigned integer, got '{arg}'")))
}

async fn print_blockchain(session: &ConsoleSession, args: &[String]) -> Result<String, CommandError> {
    let start = parse_height(&args[0], "start height")?;
    let end = match args.get(1) {
        Some(arg) => parse_height(arg, "end height")?,
        None => start,
    };
    if end < start {
        return Err(CommandError::Parse(format!(
            "end height {end} is below start height {start}"
        )));
    }

    let context = "Failed to get block headers";
    let request = GetBlockHeadersRangeRequest {
        start_height: start,
        end_height: end,
    };
    let response: GetBlockHeadersRangeResponse = session
        .executor()
        .call_json_rpc("getblockheadersrange", &request, context)
        .await?;
    check_status(&response.status, context)?;

    if response.headers.is_empty() {
        return Ok(format!("No blocks in range {start}-{end}"));
    }

    let lines: Vec<String> = response
        .headers
        .iter()
        .map(|header| {
            format!(
                "height {} ts {} diff {} nonce {} hash {}",
                header.height, header.timestamp, header.difficulty, header.nonce, header.hash
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

/// What `print_block`'s single argument resolved to.
#[derive(Debug, PartialEq)]
enum BlockSelector {
    Hash(Hash256),
    Height(u64),
}

fn parse_block_selector(arg: &str) -> Result<BlockSelector, CommandError> {
    if arg.len() == HASH_HEX_LEN {
        let hash = arg.parse().map_err(|_| {
            CommandError::Parse(format!("'{arg}' is not a valid block hash"))
        })?;
        return Ok(BlockSelector::Hash(hash));
    }
    if let Ok(height) = arg.parse() {
        return Ok(BlockSelector::Height(height));
    }
    Err(CommandError::Parse(format!(
        "expected a block height or a {HASH_HEX_LEN}-character hex hash, got '{arg}'"
    )))
}

fn render_block_header(header: &BlockHeader) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "hash: {}", header.hash);
    let _ = writeln!(out, "height: {} (depth {})", header.height, header.depth);
    let _ = writeln!(
        out,
        "version: {}.{}",
        header.major_version, header.minor_version
    );
    let _ = writeln!(out, "timestamp: {}", header.timestamp);
    let _ = writeln!(out, "previous: {}", header.prev_hash);
    let _ = writeln!(out, "nonce: {}", header.nonce);
    let _ = writeln!(out, "difficulty: {}", header.difficulty);
    let _ = writeln!(out, "reward: {}", header.reward);
    let _ = write!(out, "orphan: {}", header.orphan_status);
    out
}

async fn print_block(session: &ConsoleSession, args: &[String]) -> Result<String, CommandError> {
    let context = "Failed to get block";
    let response: BlockHeaderResponse = match parse_block_selector(&args[0])? {
        BlockSelector::Hash(hash) => {
            let request = GetBlockHeaderByHashRequest { hash };
            session
                .executor()
                .call_json_rpc("getblockheaderbyhash", &request, context)
                .await?
        }
        BlockSelector::Height(height) => {
            let request = GetBlockHeaderByHeightRequest { height };
            session
                .executor()
                .call_json_rpc("getblockheaderbyheight", &request, context)
                .await?
        }
    };
    check_status(&response.status, context)?;

    Ok(render_block_header(&response.block_header))
}

fn parse_tx_hash(arg: &str) -> Result<Hash256, CommandError> {
    arg.parse().map_err(|_| {
        CommandError::Parse(format!(
            "expected a {HASH_HEX_LEN}-character hex transaction hash, got '{arg}'"
        ))
    })
}

async fn print_transaction(session: &ConsoleSession, args: &[String]) -> Result<String, CommandError> {
    let hash = parse_tx_hash(&args[0])?;

    let context = "Failed to get transaction";
    let request = GetTransactionsRequest {
        txs_hashes: vec![hash],
    };
    let response: GetTransactionsResponse = session
        .executor()
        .call_http("/gettransactions", &request, context)
        .await?;
    check_status(&response.status, context)?;

    if response.missed_tx.contains(&hash) || response.txs_as_hex.is_empty() {
        return Ok(format!("Transaction {hash} not found"));
    }
    let blob = &response.txs_as_hex[0];
    Ok(format!("tx {} ({} bytes):\n{}", hash, blob.len() / 2, blob))
}

async fn print_pool(session: &ConsoleSession, short: bool) -> Result<String, CommandError> {
    let context = "Failed to get transaction pool";
    let response: GetTransactionPoolResponse = session
        .executor()
        .call_http("/get_transaction_pool", &EmptyRequest::default(), context)
        .await?;
    check_status(&response.status, context)?;

    if response.transactions.is_empty() {
        return Ok("Transaction pool is empty".into());
    }

    if short {
        let lines: Vec<String> = response
            .transactions
            .iter()
            .map(|tx| format!("{} size {} fee {}", tx.id_hash, tx.blob_size, tx.fee))
            .collect();
        return Ok(lines.join("\n"));
    }

    let mut out = String::new();
    let _ = writeln!(out, "Pool state ({} transactions):", response.transactions.len());
    for tx in &response.transactions {
        let _ = writeln!(out, "id: {}", tx.id_hash);
        let _ = writeln!(
            out,
            "  size: {} bytes, fee: {}, received: {}",
            tx.blob_size, tx.fee, tx.receive_time
        );
    }
    Ok(out.trim_end().to_string())
}

async fn set_hash_rate_visibility(
    session: &ConsoleSession,
    visible: bool,
) -> Result<String, CommandError> {
    let context = if visible {
        "Failed to enable hash rate display"
    } else {
        "Failed to disable hash rate display"
    };
    let request = SetLogHashRateRequest { visible };
    let response: StatusResponse = session
        .executor()
        .call_http("/set_log_hash_rate", &request, context)
        .await?;
    check_status(&response.status, context)?;

    Ok(if visible {
        "Hash rate display enabled".into()
    } else {
        "Hash rate display disabled".into()
    })
}

async fn show_difficulty(session: &ConsoleSession) -> Result<String, CommandError> {
    let context = "Failed to get difficulty";
    let info: GetInfoResponse = session
        .executor()
        .call_http("/get_info", &EmptyRequest::default(), context)
        .await?;
    check_status(&info.status, context)?;

    Ok(format!(
        "height {}, difficulty {}, ~{} H/s network",
        info.height,
        info.difficulty,
        info.difficulty / DIFFICULTY_TARGET_SECS
    ))
}

async fn save_blockchain(session: &ConsoleSession) -> Result<String, CommandError> {
    let context = "Failed to save blockchain";
    let response: StatusResponse = session
        .executor()
        .call_http("/save_bc", &EmptyRequest::default(), context)
        .await?;
    check_status(&response.status, context)?;

    Ok("Blockchain save requested".into())
}

fn parse_log_level(arg: &str) -> Result<u8, CommandError> {
    let level: u8 = arg.parse().map_err(|_| {
        CommandError::Parse(format!(
            "log level must be a number between 0 and {MAX_LOG_LEVEL}, got '{arg}'"
        ))
    })?;
    if level > MAX_LOG_LEVEL {
        return Err(CommandError::Parse(format!(
            "log level must be between 0 and {MAX_LOG_LEVEL}, got {level}"
        )));
    }
    Ok(level)
}

async fn set_log_level(session: &ConsoleSession, args: &[String]) -> Result<String, CommandError> {
    let level = parse_log_level(&args[0])?;

    let context = "Failed to set log level";
    let request = SetLogLevelRequest { level };
    let response: StatusResponse = session
        .executor()
        .call_http("/set_log_level", &request, context)
        .await?;
    check_status(&response.status, context)?;

    Ok(format!("Log level set to {level}"))
}

async fn start_mining(session: &ConsoleSession, args: &[String]) -> Result<String, CommandError> {
    let address = args[0].clone();
    let threads: u64 = args[1].parse().map_err(|_| {
        CommandError::Parse(format!(
            "thread count must be a positive integer, got '{}'",
            args[1]
        ))
    })?;
    if threads == 0 {
        return Err(CommandError::Parse(
            "thread count must be a positive integer, got '0'".into(),
        ));
    }

    let context = "Failed to start mining";
    let request = StartMiningRequest {
        miner_address: address,
        threads_count: threads,
    };
    let response: StatusResponse = session
        .executor()
        .call_http("/start_mining", &request, context)
        .await?;
    check_status(&response.status, context)?;

    Ok(format!("Mining started with {threads} thread(s)"))
}

async fn stop_mining(session: &ConsoleSession) -> Result<String, CommandError> {
    let check_context = "Failed to get mining status";
    let mining: MiningStatusResponse = session
        .executor()
        .call_http("/mining_status", &EmptyRequest::default(), check_context)
        .await?;
    check_status(&mining.status, check_context)?;

    if !mining.active {
        return Ok("Mining is not active".into());
    }

    // The check said mining is running; from here on a failure leaves the
    // daemon possibly still mining, which the operator must be told.
    let stop_context = "Failed to stop mining";
    let outcome: Result<StatusResponse, _> = session
        .executor()
        .call_http("/stop_mining", &EmptyRequest::default(), stop_context)
        .await;
    match outcome {
        Ok(response) if response.status == STATUS_OK => Ok("Mining stopped".into()),
        Ok(response) => Err(CommandError::Partial(format!(
            "mining was reported active but the stop request returned status '{}'; the daemon may still be mining",
            response.status
        ))),
        Err(e) => Err(CommandError::Partial(format!(
            "mining was reported active but the stop request failed ({e}); the daemon may still be mining"
        ))),
    }
}

async fn stop_daemon(session: &ConsoleSession) -> Result<String, CommandError> {
    let context = "Failed to stop daemon";
    let response: StatusResponse = session
        .executor()
        .call_http("/stop_daemon", &EmptyRequest::default(), context)
        .await?;
    check_status(&response.status, context)?;

    Ok("Stop signal sent to daemon".into())
}
