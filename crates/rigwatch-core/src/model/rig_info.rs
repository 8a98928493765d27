// ── Rig information ──

use serde::Serialize;

use super::field::Field;

/// Singleton record returned by the `info` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RigInfo {
    pub version: Field<String>,
    pub build_platform: Field<String>,
    pub build_number: Field<i64>,
    pub excavator_cuda_ver: Field<i64>,
    pub driver_cuda_ver: Field<i64>,
    /// Daemon uptime in seconds.
    pub uptime: Field<u64>,
    pub cpu_load: Field<f64>,
    pub ram_load: Field<f64>,
}
