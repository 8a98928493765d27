//! Rig state cache between `rigwatch-api` and observers (CLI sinks, exporters).
//!
//! - **[`RigController`]**: owns one rig's [`Snapshot`], runs the refresh
//!   cycle (four concurrent fetches, atomic install, observer fan-out) and a
//!   reschedulable refresh timer with a fast/normal toggle.
//!
//! - **[`RigStore`]**: wait-free holder of the current snapshot built on
//!   `arc-swap`, plus a `watch` channel carrying the last refresh time.
//!
//! - **[`ObserverRegistry`]**: zero-argument listeners notified after each
//!   refresh; safe to mutate from inside a notification.
//!
//! - **Decoding** ([`convert`]): total functions from loose JSON records to
//!   the domain model, where every absent field is [`Field::Unavailable`].
//!
//! - **Setup** ([`RigConfig`], [`validate_setup`]): range checks and a
//!   connectivity probe; the only place configuration errors surface.
//!
//! - **[`RigRegistry`]**: host-owned map of running controllers.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod observer;
pub mod registry;
pub mod setup;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    DEFAULT_PORT, DEFAULT_UPDATE_INTERVAL, DEFAULT_UPDATE_INTERVAL_FAST, MAX_UPDATE_INTERVAL,
    MIN_UPDATE_INTERVAL, RigConfig, SetupIssue,
};
pub use controller::RigController;
pub use error::CoreError;
pub use observer::{Observer, ObserverId, ObserverRegistry};
pub use registry::RigRegistry;
pub use setup::validate_setup;
pub use store::RigStore;

pub use model::{Algorithm, Device, Field, RigInfo, RigKey, RigSummary, Snapshot, Worker, hashrate_mhs};
