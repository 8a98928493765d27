//! Shared configuration for the rigwatch binary.
//!
//! TOML rig profiles, figment loading with an environment overlay, and
//! translation to `rigwatch_core::RigConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rigwatch_core::{DEFAULT_PORT, RigConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no rig named '{name}' in config")]
    UnknownRig { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Rig used when none is named on the command line.
    pub default_rig: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named rig profiles.
    #[serde(default)]
    pub rigs: BTreeMap<String, RigProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_rig: Some("default".into()),
            defaults: Defaults::default(),
            rigs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    10
}

/// One Excavator daemon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RigProfile {
    /// Host name or address; `http://` is assumed without a scheme.
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u32,

    /// Normal refresh interval in seconds.
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,

    /// Fast-mode refresh interval in seconds.
    #[serde(default = "default_update_interval_fast")]
    pub update_interval_fast: u64,

    /// Log every request URL.
    #[serde(default)]
    pub debug: bool,

    /// Override the default timeout.
    pub timeout: Option<u64>,
}

impl RigProfile {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            update_interval: default_update_interval(),
            update_interval_fast: default_update_interval_fast(),
            debug: false,
            timeout: None,
        }
    }
}

fn default_port() -> u32 {
    DEFAULT_PORT
}
fn default_update_interval() -> u64 {
    rigwatch_core::DEFAULT_UPDATE_INTERVAL.as_secs()
}
fn default_update_interval_fast() -> u64 {
    rigwatch_core::DEFAULT_UPDATE_INTERVAL_FAST.as_secs()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "rigwatch", "rigwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rigwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` + environment.
///
/// Environment keys use `__` as the nesting separator, e.g.
/// `RIGWATCH_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("RIGWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Look up a rig profile by name.
    pub fn rig(&self, name: &str) -> Result<&RigProfile, ConfigError> {
        self.rigs.get(name).ok_or_else(|| ConfigError::UnknownRig {
            name: name.into(),
        })
    }
}

/// Build a `RigConfig` from a profile. Ranges are checked later by
/// `RigConfig::validate`, so out-of-range values pass through untouched.
pub fn profile_to_rig_config(profile: &RigProfile, name: &str, defaults: &Defaults) -> RigConfig {
    let mut config = RigConfig::new(name, profile.host.clone());
    config.port = profile.port;
    config.update_interval = Duration::from_secs(profile.update_interval);
    config.update_interval_fast = Duration::from_secs(profile.update_interval_fast);
    config.request_logging = profile.debug;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.default_rig.as_deref(), Some("default"));
        assert_eq!(config.defaults.output, "table");
        assert!(config.rigs.is_empty());
    }

    #[test]
    fn profile_defaults_fill_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_rig = "garage"

[rigs.garage]
host = "192.168.1.20"
update_interval = 30
debug = true
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        let garage = config.rig("garage").unwrap();

        assert_eq!(garage.port, 18000);
        assert_eq!(garage.update_interval, 30);
        assert_eq!(garage.update_interval_fast, 1);
        assert!(garage.debug);
        assert!(matches!(config.rig("attic"), Err(ConfigError::UnknownRig { .. })));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.default_rig = Some("garage".into());
        config.rigs.insert("garage".into(), RigProfile::new("rig.local"));
        save_config_to(&config, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn translates_profile_to_rig_config() {
        let mut profile = RigProfile::new("rig.local");
        profile.port = 70_000;
        profile.debug = true;

        let rig = profile_to_rig_config(&profile, "Garage", &Defaults::default());

        assert_eq!(rig.instance_id(), "garage");
        assert_eq!(rig.port, 70_000);
        assert!(rig.request_logging);
        assert_eq!(rig.timeout, Duration::from_secs(10));
        assert!(rig.validate().is_err());
    }
}
