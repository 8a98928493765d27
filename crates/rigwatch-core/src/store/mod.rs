// ── Rig state store ──

mod refresh;
mod rig_store;

pub(crate) use refresh::{FetchOutcome, build_snapshot};
pub use rig_store::RigStore;
