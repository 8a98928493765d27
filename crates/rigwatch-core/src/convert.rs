// ── Response-to-domain decoding ──
//
// Bridges loosely typed `serde_json::Value` records from `rigwatch_api`
// into `rigwatch_core::model` types. Every function here is total: a
// missing key or a value of the wrong JSON type yields `Field::Unavailable`
// for that field, never an error and never a dropped record.

use std::time::Duration;

use indexmap::IndexMap;
use serde_json::Value;

use crate::model::{Algorithm, Device, Field, RigInfo, RigKey, Worker};

// ── Field extractors ───────────────────────────────────────────────

fn field_str(raw: &Value, key: &str) -> Field<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_owned).into()
}

/// Integers arrive as JSON numbers or, from some firmware, as numeric strings.
fn field_i64(raw: &Value, key: &str) -> Field<i64> {
    match raw.get(key) {
        Some(Value::Number(n)) => n.as_i64().into(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok().into(),
        _ => Field::Unavailable,
    }
}

fn field_f64(raw: &Value, key: &str) -> Field<f64> {
    match raw.get(key) {
        Some(Value::Number(n)) => n.as_f64().into(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).into(),
        _ => Field::Unavailable,
    }
}

fn field_bool(raw: &Value, key: &str) -> Field<bool> {
    match raw.get(key) {
        Some(Value::Bool(b)) => Field::Available(*b),
        Some(Value::String(s)) => s.trim().parse::<bool>().ok().into(),
        _ => Field::Unavailable,
    }
}

/// Whole seconds; fractional uptimes are truncated, negatives rejected.
fn field_secs(raw: &Value, key: &str) -> Field<u64> {
    field_f64(raw, key)
        .into_option()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .map(|d| d.as_secs())
        .into()
}

// ── Records ────────────────────────────────────────────────────────

/// Decode one entry of the `devices` array.
pub fn decode_device(raw: &Value) -> Device {
    Device {
        id: field_i64(raw, "device_id"),
        uuid: field_str(raw, "uuid"),
        name: field_str(raw, "name"),
        subvendor: field_str(raw, "subvendor"),
        gpu_temp: field_f64(raw, "gpu_temp"),
        vram_temp: field_f64(raw, "__vram_temp"),
        hotspot_temp: field_f64(raw, "__hotspot_temp"),
        gpu_load: field_f64(raw, "gpu_load"),
        gpu_load_memctrl: field_f64(raw, "gpu_load_memctrl"),
        gpu_fan_speed: field_f64(raw, "gpu_fan_speed"),
        gpu_power_usage: field_f64(raw, "gpu_power_usage"),
        too_hot: field_bool(raw, "too_hot"),
    }
}

/// Decode an algorithm record, rig-wide or embedded in a worker.
///
/// The rig-wide list names the id `algorithm_id`, worker entries name it
/// `id`; the former wins when both are present.
pub fn decode_algorithm(raw: &Value) -> Algorithm {
    let id = match field_i64(raw, "algorithm_id") {
        Field::Unavailable => field_i64(raw, "id"),
        found => found,
    };

    Algorithm {
        id,
        name: field_str(raw, "name"),
        speed: field_f64(raw, "speed"),
    }
}

/// Decode one entry of the `workers` array.
pub fn decode_worker(raw: &Value) -> Worker {
    let algorithms = match raw.get("algorithms") {
        Some(Value::Array(items)) => Field::Available(decode_algorithms(items)),
        _ => Field::Unavailable,
    };

    Worker {
        id: field_i64(raw, "worker_id"),
        device_id: field_i64(raw, "device_id"),
        device_uuid: field_str(raw, "device_uuid"),
        algorithms,
    }
}

/// Decode the top-level `info` response body.
pub fn decode_rig_info(raw: &Value) -> RigInfo {
    RigInfo {
        version: field_str(raw, "version"),
        build_platform: field_str(raw, "build_platform"),
        build_number: field_i64(raw, "build_number"),
        excavator_cuda_ver: field_i64(raw, "excavator_cuda_ver"),
        driver_cuda_ver: field_i64(raw, "driver_cuda_ver"),
        uptime: field_secs(raw, "uptime"),
        cpu_load: field_f64(raw, "cpu_load"),
        ram_load: field_f64(raw, "ram_load"),
    }
}

// ── Keyed collections ──────────────────────────────────────────────

/// Index decoded records by the id they carry.
///
/// Order follows the response. Records without an id share the
/// `Unavailable` key, so the last such record wins.
fn keyed<T>(items: &[Value], decode: fn(&Value) -> T, key: fn(&T) -> RigKey) -> IndexMap<RigKey, T> {
    items
        .iter()
        .map(|raw| {
            let record = decode(raw);
            (key(&record), record)
        })
        .collect()
}

pub fn decode_devices(items: &[Value]) -> IndexMap<RigKey, Device> {
    keyed(items, decode_device, |d| d.id)
}

pub fn decode_algorithms(items: &[Value]) -> IndexMap<RigKey, Algorithm> {
    keyed(items, decode_algorithm, |a| a.id)
}

pub fn decode_workers(items: &[Value]) -> IndexMap<RigKey, Worker> {
    keyed(items, decode_worker, |w| w.id)
}
