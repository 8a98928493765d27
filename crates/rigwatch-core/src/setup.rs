// ── Setup validation ──
//
// The only place configuration errors surface. Range checks run first;
// the network is touched only for a config that passes them.

use rigwatch_api::ExcavatorClient;
use tracing::{debug, info};

use crate::config::{RigConfig, SetupIssue};
use crate::error::CoreError;

/// Validate a rig setup end to end.
///
/// Fails with [`CoreError::InvalidSetup`] listing every range issue, or
/// `no_response` when the daemon does not answer an `info` query. No
/// controller is created and nothing is cached.
pub async fn validate_setup(config: &RigConfig) -> Result<(), CoreError> {
    config.validate()?;

    let client = ExcavatorClient::new(&config.host, config.port_u16()?, &config.transport_config())?;
    debug!(endpoint = %client.transport().endpoint(), "probing rig");

    if client.test_connection().await {
        info!(rig = %config.name, "setup validated");
        Ok(())
    } else {
        Err(CoreError::InvalidSetup {
            issues: vec![SetupIssue::NoResponse],
        })
    }
}
