// ── Rig-level summary ──
//
// Derived presentation values for a whole rig: the hardware model line,
// firmware string and uptime. Computed on demand from a snapshot.

use indexmap::IndexMap;
use serde::Serialize;

use super::field::Field;
use super::snapshot::Snapshot;

const SECS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RigSummary {
    pub online: bool,
    /// GPU models grouped by name, e.g. `2x RTX 3080; 1x RTX 3070`.
    pub model: String,
    /// `"{version}, Build: {build_number}"`.
    pub sw_version: Field<String>,
    pub uptime_hours: Field<f64>,
    pub device_count: usize,
    pub algorithm_count: usize,
    pub worker_count: usize,
}

impl RigSummary {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let info = snapshot.info.as_ref();

        let sw_version = info.map_or(Field::Unavailable, |info| {
            info.version.as_ref().map(|version| match info.build_number {
                Field::Available(build) => format!("{version}, Build: {build}"),
                Field::Unavailable => version.clone(),
            })
        });

        let uptime_hours = info.map_or(Field::Unavailable, |info| {
            info.uptime.map(|secs| {
                let secs = f64::from(u32::try_from(secs).unwrap_or(u32::MAX));
                (secs / SECS_PER_HOUR * 100.0).round() / 100.0
            })
        });

        Self {
            online: snapshot.online,
            model: model_string(snapshot),
            sw_version,
            uptime_hours,
            device_count: snapshot.devices.len(),
            algorithm_count: snapshot.algorithms.len(),
            worker_count: snapshot.workers.len(),
        }
    }
}

fn model_string(snapshot: &Snapshot) -> String {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for device in snapshot.devices.values() {
        let name = device.name.get().map_or("unknown GPU", String::as_str);
        *counts.entry(name).or_default() += 1;
    }

    counts
        .iter()
        .map(|(name, count)| format!("{count}x {name}"))
        .collect::<Vec<_>>()
        .join("; ")
}
