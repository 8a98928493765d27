// ── Runtime rig configuration ──
//
// Describes *which* daemon to poll and how often. Never touches disk:
// the host (CLI, or anything else composing the system) builds a
// `RigConfig` and hands it in.

use std::time::Duration;

use rigwatch_api::{DEFAULT_TIMEOUT, TransportConfig};
use strum::{AsRefStr, Display, EnumIter};

use crate::error::CoreError;

/// Port Excavator's HTTP API listens on unless told otherwise.
pub const DEFAULT_PORT: u32 = 18000;
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_UPDATE_INTERVAL_FAST: Duration = Duration::from_secs(1);
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_secs(1);
pub const MAX_UPDATE_INTERVAL: Duration = Duration::from_secs(3600);

/// A single reason a rig setup was rejected.
///
/// Serialized as the short code the setup form reports next to the
/// offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SetupIssue {
    EmptyHost,
    InvalidPort,
    InvalidUpdateInterval,
    InvalidUpdateIntervalFast,
    NoResponse,
}

impl SetupIssue {
    /// Human-readable explanation for the code.
    pub fn description(self) -> &'static str {
        match self {
            Self::EmptyHost => "host must not be empty",
            Self::InvalidPort => "port must be between 1 and 65535",
            Self::InvalidUpdateInterval => "update interval must be between 1 and 3600 seconds",
            Self::InvalidUpdateIntervalFast => {
                "fast update interval must be between 1 and 3600 seconds"
            }
            Self::NoResponse => "the Excavator API did not answer an info query",
        }
    }
}

/// Configuration for polling a single Excavator daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigConfig {
    /// Display name; its lowercase form is the instance id.
    pub name: String,
    /// Host name or address, with or without a scheme.
    pub host: String,
    /// Wide enough to hold out-of-range input until it is validated.
    pub port: u32,
    pub update_interval: Duration,
    pub update_interval_fast: Duration,
    /// Log every request URL at `info`.
    pub request_logging: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RigConfig {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: DEFAULT_PORT,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            update_interval_fast: DEFAULT_UPDATE_INTERVAL_FAST,
            request_logging: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Key under which the host registers this rig's controller.
    pub fn instance_id(&self) -> String {
        self.name.to_lowercase()
    }

    /// Every range problem in this config, in field order.
    pub fn issues(&self) -> Vec<SetupIssue> {
        let mut issues = Vec::new();
        if self.host.trim().is_empty() {
            issues.push(SetupIssue::EmptyHost);
        }
        if !(1..=u32::from(u16::MAX)).contains(&self.port) {
            issues.push(SetupIssue::InvalidPort);
        }
        if !interval_in_range(self.update_interval) {
            issues.push(SetupIssue::InvalidUpdateInterval);
        }
        if !interval_in_range(self.update_interval_fast) {
            issues.push(SetupIssue::InvalidUpdateIntervalFast);
        }
        issues
    }

    /// Range-check the config without touching the network.
    pub fn validate(&self) -> Result<(), CoreError> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidSetup { issues })
        }
    }

    /// The validated port.
    pub fn port_u16(&self) -> Result<u16, CoreError> {
        u16::try_from(self.port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(CoreError::InvalidSetup {
                issues: vec![SetupIssue::InvalidPort],
            })
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }
}

fn interval_in_range(interval: Duration) -> bool {
    (MIN_UPDATE_INTERVAL..=MAX_UPDATE_INTERVAL).contains(&interval)
}
