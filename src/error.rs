/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum VaiaError {
    /// Connection-level failure from `reqwest` (refused, reset, DNS, ...).
    #[error("network error: {0}")]
    Network(reqwest::Error),
    /// Connect or total-request deadline exceeded.
    #[error("timeout: {0}")]
    Timeout(reqwest::Error),
    /// Remote returned a server-side failure status (5xx).
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
    /// Remote rejected the request as invalid (4xx). Never retried.
    #[error("client error {status}: {body}")]
    Client { status: u16, body: String },
    /// The caller aborted the request via its cancellation token.
    #[error("request cancelled")]
    Cancelled,
    /// All retry attempts failed; wraps the last underlying error.
    #[error("retries exhausted after {attempts} attempt(s): {source}")]
    Exhausted {
        /// Total attempts made, including the initial one.
        attempts: usize,
        source: Box<VaiaError>,
    },
    /// Response payload decoding error.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Classification of a failure, used by the retry engine and reported on
/// observability events.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Network,
    Timeout,
    Server,
    Client,
    Cancelled,
}

impl ErrorKind {
    /// Whether a failure of this kind is likely to succeed on retry.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::Server)
    }
}

impl VaiaError {
    /// Classifies this error for retry decisions and event reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Server { .. } => ErrorKind::Server,
            // Malformed payloads are never retried; they classify with the
            // non-transient client-side failures.
            Self::Client { .. } | Self::Decode(_) => ErrorKind::Client,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Exhausted { source, .. } => source.kind(),
        }
    }
}
