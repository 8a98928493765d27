// ── Domain model ──
//
// Value-like records decoded from Excavator responses. Replaced
// wholesale on every refresh; outside code never edits them in place.

pub mod algorithm;
pub mod device;
pub mod field;
pub mod rig_info;
pub mod snapshot;
pub mod summary;
pub mod worker;

pub use algorithm::{Algorithm, hashrate_mhs};
pub use device::Device;
pub use field::{Field, RigKey};
pub use rig_info::RigInfo;
pub use snapshot::Snapshot;
pub use summary::RigSummary;
pub use worker::Worker;
