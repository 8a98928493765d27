// ── Algorithm domain type ──

use serde::Serialize;

use super::field::{Field, RigKey};

const HASHES_PER_MEGAHASH: f64 = 1_000_000.0;

/// A named workload and its current throughput in native units (H/s).
///
/// Appears both rig-wide (`algorithm.list`) and embedded in each
/// [`Worker`](super::Worker).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Algorithm {
    pub id: RigKey,
    pub name: Field<String>,
    pub speed: Field<f64>,
}

impl Algorithm {
    /// Throughput in MH/s, rounded to two decimals.
    pub fn hashrate_mhs(&self) -> Field<f64> {
        hashrate_mhs(self.speed)
    }
}

/// Rescale a native H/s speed to MH/s, rounded to two decimals.
pub fn hashrate_mhs(speed: Field<f64>) -> Field<f64> {
    speed.map(|hs| (hs / HASHES_PER_MEGAHASH * 100.0).round() / 100.0)
}
