//! Command dispatch: bridges CLI args -> rig controllers -> output formatting.

pub mod config_cmd;
pub mod probe;
pub mod status;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a rig-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(cfg, global).await,
        Command::Watch(args) => watch::handle(args, cfg, global).await,
        Command::Probe => probe::handle(cfg, global).await,
        // Handled in `run` before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Convert a core error, attributing setup problems to the named rig.
pub(crate) fn rig_error(err: rigwatch_core::CoreError, rig: &str) -> CliError {
    match err {
        rigwatch_core::CoreError::InvalidSetup { issues } => CliError::invalid_setup(rig, &issues),
        other => other.into(),
    }
}
