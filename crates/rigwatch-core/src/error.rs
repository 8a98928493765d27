// ── Core error types ──
//
// Errors that reach callers of rigwatch-core. Steady-state refresh never
// produces one: fetch failures are absorbed into the snapshot. These only
// surface while building a controller or validating a rig setup.

use thiserror::Error;

use crate::config::SetupIssue;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to rig at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Rig connection timed out")]
    Timeout,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid rig setup: {}", join_issues(issues))]
    InvalidSetup { issues: Vec<SetupIssue> },

    #[error("Invalid rig address: {message}")]
    InvalidAddress { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the daemon answered).
        status: Option<u16>,
    },
}

impl CoreError {
    /// Setup issue codes carried by this error, if it is a setup failure.
    pub fn setup_issues(&self) -> &[SetupIssue] {
        match self {
            Self::InvalidSetup { issues } => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[SetupIssue]) -> String {
    issues
        .iter()
        .map(AsRef::<str>::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rigwatch_api::Error> for CoreError {
    fn from(err: rigwatch_api::Error) -> Self {
        match err {
            rigwatch_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            rigwatch_api::Error::Transport(ref e) if e.is_connect() => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            rigwatch_api::Error::InvalidUrl(e) => CoreError::InvalidAddress {
                message: e.to_string(),
            },
            other => CoreError::Api {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_setup_lists_issue_codes() {
        let err = CoreError::InvalidSetup {
            issues: vec![SetupIssue::InvalidPort, SetupIssue::InvalidUpdateIntervalFast],
        };
        assert_eq!(
            err.to_string(),
            "Invalid rig setup: invalid_port, invalid_update_interval_fast"
        );
        assert_eq!(err.setup_issues().len(), 2);
    }

    #[test]
    fn api_status_is_preserved() {
        let err = CoreError::from(rigwatch_api::Error::Status {
            status: 502,
            body: "bad gateway".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(502), .. }));
    }

    #[test]
    fn url_errors_become_invalid_address() {
        let Err(api_err) = rigwatch_api::api_endpoint("", 18000) else {
            panic!("empty host must not form an endpoint");
        };
        let err = CoreError::from(api_err);
        assert!(matches!(err, CoreError::InvalidAddress { .. }), "got: {err:?}");
    }
}
