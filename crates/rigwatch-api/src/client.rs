// Excavator JSON-RPC client
//
// Issues the four read-only queries the poller needs and strips each
// response down to the part callers care about. Records stay loosely
// typed (`serde_json::Value`); decoding into domain types happens in
// `rigwatch-core`, which tolerates any missing field.

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::transport::{HttpTransport, Transport, TransportConfig};

/// `info`: rig firmware, uptime and host load.
pub const QUERY_INFO: &str = r#"{"id":1,"method":"info","params":[]}"#;
/// `devices.get`: every GPU with live telemetry.
pub const QUERY_DEVICES: &str = r#"{"id":1,"method":"devices.get","params":[]}"#;
/// `algorithm.list`: rig-wide throughput per algorithm.
pub const QUERY_ALGORITHMS: &str = r#"{"id":1,"method":"algorithm.list","params":[]}"#;
/// `worker.list`: per-device workers with their algorithm speeds.
pub const QUERY_WORKERS: &str = r#"{"id":1,"method":"worker.list","params":[]}"#;

/// Raw client for one Excavator daemon.
///
/// Generic over the [`Transport`] so the cache layer can be driven by a
/// scripted transport in tests. Defaults to [`HttpTransport`].
pub struct ExcavatorClient<T: Transport = HttpTransport> {
    transport: T,
}

impl ExcavatorClient<HttpTransport> {
    /// Create an HTTP client for `host:port`.
    pub fn new(host: &str, port: u16, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_transport(HttpTransport::new(host, port, config)?))
    }
}

impl<T: Transport> ExcavatorClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch rig information.
    ///
    /// The daemon returns the info fields at the top level of the body,
    /// so the whole object is handed back.
    pub async fn rig_info(&self) -> Result<Value, Error> {
        debug!("fetching rig info");
        let body = self.transport.send(QUERY_INFO).await?;
        if body.is_object() {
            Ok(body)
        } else {
            Err(Error::MissingKey { key: "info" })
        }
    }

    /// Fetch the `devices` array.
    pub async fn devices(&self) -> Result<Vec<Value>, Error> {
        debug!("fetching devices");
        let body = self.transport.send(QUERY_DEVICES).await?;
        take_array(body, "devices")
    }

    /// Fetch the rig-wide `algorithms` array.
    pub async fn algorithms(&self) -> Result<Vec<Value>, Error> {
        debug!("fetching algorithms");
        let body = self.transport.send(QUERY_ALGORITHMS).await?;
        take_array(body, "algorithms")
    }

    /// Fetch the `workers` array.
    pub async fn workers(&self) -> Result<Vec<Value>, Error> {
        debug!("fetching workers");
        let body = self.transport.send(QUERY_WORKERS).await?;
        take_array(body, "workers")
    }

    /// Reachability check: `true` iff an `info` query succeeds.
    pub async fn test_connection(&self) -> bool {
        self.rig_info().await.is_ok()
    }
}

/// Move the array under `key` out of a response body.
fn take_array(mut body: Value, key: &'static str) -> Result<Vec<Value>, Error> {
    match body.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(Error::MissingKey { key }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn take_array_extracts_member() {
        let items = take_array(json!({"devices": [{"device_id": 0}], "id": 1}), "devices").unwrap();
        assert_eq!(items, vec![json!({"device_id": 0})]);
    }

    #[test]
    fn take_array_reports_missing_member() {
        let err = take_array(json!({"id": 1}), "workers").unwrap_err();
        assert!(matches!(err, Error::MissingKey { key: "workers" }));
    }

    #[test]
    fn take_array_rejects_non_array_member() {
        let err = take_array(json!({"algorithms": null}), "algorithms").unwrap_err();
        assert!(err.is_missing_key());
    }
}
