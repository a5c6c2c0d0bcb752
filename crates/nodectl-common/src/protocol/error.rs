use thiserror::Error;

/// Classified outcome of a single failed RPC attempt against the daemon.
#[derive(Error, Debug)]
pub enum RpcFailure {
    #[error("Unable to connect to daemon: {0}")]
    ConnectionRefused(String),

    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("malformed daemon response: {0}")]
    MalformedResponse(String),

    #[error("daemon returned error {code}: {message}")]
    Remote { code: i64, message: String },
}

/// An [`RpcFailure`] tagged with the operator-facing fail message supplied by
/// the calling command, so the operator sees which operation failed and not
/// just the transport detail.
#[derive(Error, Debug)]
#[error("{context}: {failure}")]
pub struct RpcError {
    pub context: String,
    pub failure: RpcFailure,
}

impl RpcError {
    pub fn new(context: impl Into<String>, failure: RpcFailure) -> Self {
        RpcError {
            context: context.into(),
            failure,
        }
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
