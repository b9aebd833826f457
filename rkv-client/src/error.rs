//! Errors surfaced by the client.

use rkv_common::AppError;

/// Result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the client.
///
/// `Validation` is raised locally before any network call. Everything else
/// comes from the round trip or from decoding its reply.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network or IO failure while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// RESP2 framing or parse error.
    #[error("protocol error")]
    Protocol,
    /// Server returned an error reply.
    #[error("server error: {}", String::from_utf8_lossy(.message))]
    Server { message: Vec<u8> },
    /// Reply type did not match the command's documented reply.
    #[error("unexpected response to {command}: expected {expected}, got {actual}")]
    UnexpectedResponse {
        command: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    /// Reply had the right type but the wrong shape or contents.
    #[error("decode error: {0}")]
    Decode(String),
    /// Arguments were rejected before anything was sent.
    #[error("validation error: {0}")]
    Validation(#[source] AppError),
    /// Pool is at capacity and no idle connections are available.
    #[error("connection pool exhausted (max total: {max_total})")]
    PoolExhausted { max_total: usize },
    /// Address could not be parsed into a socket address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ClientError {
    /// True for errors raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// True when the reply came back but could not be interpreted.
    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode(_) | ClientError::UnexpectedResponse { .. })
    }
}
