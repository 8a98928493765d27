//! CLI configuration: thin wrapper around `rigwatch_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--config, --rig, --host, --port, --timeout).

use std::path::PathBuf;
use std::time::Duration;

use rigwatch_core::RigConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use rigwatch_config::{Config, RigProfile, load_config_from, profile_to_rig_config, save_config_to};

/// Name used for a rig given only by `--host`.
const ADHOC_RIG: &str = "adhoc";

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file path: `--config` / `RIGWATCH_CONFIG`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(rigwatch_config::config_path)
}

/// Load the config file selected by the global flags.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&config_path(global))?)
}

/// Resolve the active rig name from CLI flags and config.
pub fn active_rig_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .rig
        .clone()
        .or_else(|| config.default_rig.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve the single rig a command operates on.
///
/// A named profile wins; flag overrides are applied on top. Without a
/// profile, `--host` alone is enough to describe an ad-hoc rig.
pub fn resolve_rig(global: &GlobalOpts, config: &Config) -> Result<RigConfig, CliError> {
    let name = active_rig_name(global, config);

    if let Some(profile) = config.rigs.get(&name) {
        return Ok(apply_overrides(profile_to_rig_config(profile, &name, &config.defaults), global));
    }

    if global.host.is_some() {
        let profile = RigProfile::new(String::new());
        let rig = profile_to_rig_config(&profile, ADHOC_RIG, &config.defaults);
        return Ok(apply_overrides(rig, global));
    }

    if global.rig.is_some() || !config.rigs.is_empty() {
        return Err(CliError::RigNotFound {
            name,
            available: available_rigs(config),
        });
    }

    Err(CliError::NoConfig {
        path: config_path(global).display().to_string(),
    })
}

/// Every configured rig, with flag overrides other than `--host`/`--port`.
pub fn resolve_all_rigs(global: &GlobalOpts, config: &Config) -> Result<Vec<RigConfig>, CliError> {
    if config.rigs.is_empty() {
        return Err(CliError::NoConfig {
            path: config_path(global).display().to_string(),
        });
    }

    Ok(config
        .rigs
        .iter()
        .map(|(name, profile)| {
            let mut rig = profile_to_rig_config(profile, name, &config.defaults);
            if let Some(secs) = global.timeout {
                rig.timeout = Duration::from_secs(secs);
            }
            rig
        })
        .collect())
}

fn apply_overrides(mut rig: RigConfig, global: &GlobalOpts) -> RigConfig {
    if let Some(ref host) = global.host {
        rig.host.clone_from(host);
    }
    if let Some(port) = global.port {
        rig.port = port;
    }
    if let Some(secs) = global.timeout {
        rig.timeout = Duration::from_secs(secs);
    }
    rig
}

fn available_rigs(config: &Config) -> String {
    if config.rigs.is_empty() {
        "(none)".into()
    } else {
        config.rigs.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
