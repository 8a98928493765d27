// ── Device domain type ──

use serde::Serialize;

use super::field::{Field, RigKey};

/// One GPU managed by the rig, as reported by `devices.get`.
///
/// Identity fields come first, live telemetry after. Every field is a
/// [`Field`]: anything the daemon omitted is `Unavailable`, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Device {
    pub id: RigKey,
    pub uuid: Field<String>,
    pub name: Field<String>,
    pub subvendor: Field<String>,

    /// Core temperature, °C.
    pub gpu_temp: Field<f64>,
    /// Memory junction temperature, °C.
    pub vram_temp: Field<f64>,
    /// Hotspot temperature, °C.
    pub hotspot_temp: Field<f64>,
    /// Core load, percent.
    pub gpu_load: Field<f64>,
    /// Memory-controller load, percent.
    pub gpu_load_memctrl: Field<f64>,
    /// Fan speed, percent.
    pub gpu_fan_speed: Field<f64>,
    /// Board power draw, watts.
    pub gpu_power_usage: Field<f64>,
    /// Over-temperature flag raised by the daemon.
    pub too_hot: Field<bool>,
}

impl Device {
    /// Short display label, e.g. `GPU 0`.
    pub fn label(&self) -> String {
        format!("GPU {}", self.id)
    }
}
