// Request/response transport for the Excavator HTTP API.
//
// The daemon exposes a single endpoint: `GET /api?command={json}`. Every
// call is an independent exchange; nothing here holds mutable state that
// a second in-flight request could observe.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, trace};
use url::Url;

use crate::error::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest body excerpt carried inside an error.
const BODY_PREVIEW_CHARS: usize = 200;

/// One request/response exchange against the remote API.
///
/// `query` is an opaque JSON-RPC payload. Implementations return the
/// parsed JSON body or an [`Error`] value; they never panic on I/O.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, query: &str) -> impl Future<Output = Result<Value, Error>> + Send;
}

/// Shared transport configuration for building `reqwest::Client` instances.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("rigwatch/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// Idle connections are not kept, so each request opens a fresh
    /// connection to the daemon.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(Error::Transport)
    }
}

/// Prefix `http://` unless the caller already supplied a scheme.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    }
}

/// Build the `{scheme}://{host}:{port}/api` endpoint for a daemon.
pub fn api_endpoint(host: &str, port: u16) -> Result<Url, Error> {
    let mut url = Url::parse(&normalize_host(host))?;
    url.set_port(Some(port))
        .map_err(|()| Error::InvalidUrl(url::ParseError::EmptyHost))?;
    url.set_path("/api");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// `reqwest`-backed [`Transport`] bound to one daemon endpoint.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    log_requests: AtomicBool,
}

impl HttpTransport {
    /// Create a transport for `host:port`, normalizing the host first.
    pub fn new(host: &str, port: u16, config: &TransportConfig) -> Result<Self, Error> {
        let endpoint = api_endpoint(host, port)?;
        let http = config.build_client()?;
        Ok(Self::with_client(http, endpoint))
    }

    /// Create a transport with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            log_requests: AtomicBool::new(false),
        }
    }

    /// The `/api` endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Log every request URL at `info` instead of `debug`.
    pub fn set_request_logging(&self, enable: bool) {
        self.log_requests.store(enable, Ordering::Relaxed);
    }

    /// Full request URL for a JSON-RPC payload.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().clear().append_pair("command", query);
        url
    }
}

impl Transport for HttpTransport {
    async fn send(&self, query: &str) -> Result<Value, Error> {
        let url = self.request_url(query);
        if self.log_requests.load(Ordering::Relaxed) {
            info!("GET {url}");
        } else {
            debug!("GET {url}");
        }

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(status = status.as_u16(), bytes = body.len(), "response received");

        if status != reqwest::StatusCode::OK {
            return Err(Error::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        parse_body(&body)
    }
}

/// Parse a 200 body, surfacing the daemon's `"error": "..."` member.
pub(crate) fn parse_body(body: &str) -> Result<Value, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })?;

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(Error::Rpc {
            message: message.to_owned(),
        });
    }

    Ok(value)
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_host_adds_missing_scheme() {
        assert_eq!(normalize_host("192.168.1.20"), "http://192.168.1.20");
        assert_eq!(normalize_host(" rig.local "), "http://rig.local");
    }

    #[test]
    fn normalize_host_keeps_explicit_scheme() {
        assert_eq!(normalize_host("http://rig.local"), "http://rig.local");
        assert_eq!(normalize_host("https://rig.local"), "https://rig.local");
    }

    #[test]
    fn api_endpoint_sets_port_and_path() {
        let url = api_endpoint("rig.local", 18000).unwrap();
        assert_eq!(url.as_str(), "http://rig.local:18000/api");

        let url = api_endpoint("https://rig.local:9999/ignored?x=1", 18000).unwrap();
        assert_eq!(url.as_str(), "https://rig.local:18000/api");
    }

    #[test]
    fn api_endpoint_rejects_empty_host() {
        assert!(api_endpoint("", 18000).is_err());
    }

    #[test]
    fn request_url_encodes_payload() {
        let transport = HttpTransport::with_client(
            reqwest::Client::new(),
            api_endpoint("rig.local", 18000).unwrap(),
        );
        let url = transport.request_url(r#"{"id":1,"method":"info","params":[]}"#);
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "command");
        assert_eq!(value, r#"{"id":1,"method":"info","params":[]}"#);
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn parse_body_surfaces_rpc_error() {
        let err = parse_body(r#"{"id":1,"error":"Invalid method"}"#).unwrap_err();
        assert!(matches!(err, Error::Rpc { ref message } if message == "Invalid method"));
    }

    #[test]
    fn parse_body_accepts_null_error() {
        let value = parse_body(r#"{"id":1,"error":null,"uptime":5}"#).unwrap();
        assert_eq!(value["uptime"], 5);
    }

    #[test]
    fn parse_body_rejects_malformed_json() {
        let err = parse_body("{not json").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
