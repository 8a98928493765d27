// rigwatch-api: Async Rust client for the NiceHash Excavator JSON-RPC HTTP API

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ExcavatorClient, QUERY_ALGORITHMS, QUERY_DEVICES, QUERY_INFO, QUERY_WORKERS};
pub use error::Error;
pub use transport::{
    DEFAULT_TIMEOUT, HttpTransport, Transport, TransportConfig, api_endpoint, normalize_host,
};
