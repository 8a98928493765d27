//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use rigwatch_config::ConfigError;
use rigwatch_core::{CoreError, SetupIssue};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to rig at {url}")]
    #[diagnostic(
        code(rigwatch::connection_failed),
        help(
            "Check that Excavator is running with its HTTP API enabled.\n\
             URL: {url}\n\
             Try: rigwatch probe --host <address> --port <port>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Rig '{rig}' is offline: the info query at {endpoint} failed")]
    #[diagnostic(
        code(rigwatch::offline),
        help("Run `rigwatch probe -r {rig} -v` to see the underlying transport error.")
    )]
    Offline { rig: String, endpoint: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(rigwatch::timeout),
        help("Increase timeout with --timeout or check rig responsiveness.")
    )]
    Timeout,

    // ── Setup ────────────────────────────────────────────────────────
    #[error("Invalid setup for rig '{rig}': {codes}")]
    #[diagnostic(code(rigwatch::invalid_setup), help("{details}"))]
    InvalidSetup {
        rig: String,
        codes: String,
        details: String,
        unreachable: bool,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rigwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Rig profile '{name}' not found in configuration")]
    #[diagnostic(
        code(rigwatch::rig_not_found),
        help(
            "Available rigs: {available}\n\
             Add one with: rigwatch config init --name {name} --host <address>"
        )
    )]
    RigNotFound { name: String, available: String },

    #[error("No rig configured")]
    #[diagnostic(
        code(rigwatch::no_config),
        help(
            "Create one with: rigwatch config init --host <address>\n\
             Or pass --host directly. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(rigwatch::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(rigwatch::render))]
    Render { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. }
            | Self::Offline { .. }
            | Self::InvalidSetup {
                unreachable: true, ..
            } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::InvalidSetup { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::RigNotFound { .. } => exit_code::NOT_FOUND,
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap a rejected setup with the rig it belongs to.
    pub fn invalid_setup(rig: &str, issues: &[SetupIssue]) -> Self {
        Self::InvalidSetup {
            rig: rig.into(),
            codes: issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            details: issues
                .iter()
                .map(|issue| format!("{issue}: {}", issue.description()))
                .collect::<Vec<_>>()
                .join("\n"),
            unreachable: issues.contains(&SetupIssue::NoResponse),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::InvalidSetup { issues } => CliError::invalid_setup("current", &issues),

            CoreError::InvalidAddress { message } => CliError::Validation {
                field: "host".into(),
                reason: message,
            },

            CoreError::Api { message, status } => CliError::ConnectionFailed {
                url: status.map_or_else(|| "(unknown)".into(), |s| format!("(HTTP {s})")),
                source: message.into(),
            },
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Render {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Render {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_setup_is_a_connection_failure() {
        let err = CliError::invalid_setup("garage", &[SetupIssue::NoResponse]);
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert_eq!(err.to_string(), "Invalid setup for rig 'garage': no_response");
    }

    #[test]
    fn range_issues_are_usage_errors() {
        let err = CliError::invalid_setup(
            "garage",
            &[SetupIssue::InvalidPort, SetupIssue::InvalidUpdateInterval],
        );
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().ends_with("invalid_port, invalid_update_interval"));
    }
}
