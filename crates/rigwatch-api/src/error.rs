use thiserror::Error;

/// Top-level error type for the `rigwatch-api` crate.
///
/// Every failure of a single request/response exchange with the
/// Excavator daemon is one of these values. The transport never panics
/// and never retries; `rigwatch-core` absorbs them at fetch granularity.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The normalized host/port did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The daemon answered with something other than HTTP 200.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not valid JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A successful response lacked the expected top-level member.
    #[error("Response is missing the `{key}` member")]
    MissingKey { key: &'static str },

    /// The daemon reported a JSON-RPC level error (`"error": "..."`).
    #[error("Excavator error: {message}")]
    Rpc { message: String },
}

impl Error {
    /// Returns `true` if the exchange succeeded but the payload lacked
    /// the expected member (a decode gap rather than a transport fault).
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next scheduled poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, if the daemon answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
