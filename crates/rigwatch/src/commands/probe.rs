//! Probe command: range checks, then a single info query.

use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ProbeResult {
    rig: String,
    endpoint: String,
    reachable: bool,
}

pub async fn handle(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let rig = config::resolve_rig(global, cfg)?;

    rigwatch_core::validate_setup(&rig)
        .await
        .map_err(|e| super::rig_error(e, &rig.name))?;

    let result = ProbeResult {
        rig: rig.name.clone(),
        endpoint: format!("{}:{}", rig.host, rig.port),
        reachable: true,
    };

    let rendered = output::render_single(
        global.output,
        &result,
        |r| format!("Rig '{}' answered at {}", r.rig, r.endpoint),
        |r| r.rig.clone(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
