// ── Snapshot assembly for one refresh cycle ──
//
// Combines the outcome of the four fetches with the previously installed
// snapshot. A failed fetch degrades only its own field.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::convert::{decode_algorithms, decode_devices, decode_rig_info, decode_workers};
use crate::model::{RigKey, Snapshot};

/// Raw results of the four fetches issued by one refresh cycle.
pub(crate) struct FetchOutcome {
    pub info: Result<Value, rigwatch_api::Error>,
    pub devices: Result<Vec<Value>, rigwatch_api::Error>,
    pub algorithms: Result<Vec<Value>, rigwatch_api::Error>,
    pub workers: Result<Vec<Value>, rigwatch_api::Error>,
}

/// Build the next snapshot from fetch results and the one currently visible.
///
/// Collections whose fetch failed keep their previous contents (empty on
/// the first cycle). `online` reflects the rig-info fetch alone; a failed
/// rig-info fetch keeps the last known `info`.
pub(crate) fn build_snapshot(previous: &Snapshot, outcome: FetchOutcome) -> Snapshot {
    let online = outcome.info.is_ok();
    let info = match outcome.info {
        Ok(raw) => Some(decode_rig_info(&raw)),
        Err(e) => {
            warn!("info: fetch failed ({e}), rig marked offline");
            previous.info.clone()
        }
    };

    Snapshot {
        devices: decode_or_keep("devices", outcome.devices, decode_devices, &previous.devices),
        algorithms: decode_or_keep(
            "algorithms",
            outcome.algorithms,
            decode_algorithms,
            &previous.algorithms,
        ),
        workers: decode_or_keep("workers", outcome.workers, decode_workers, &previous.workers),
        info,
        online,
    }
}

fn decode_or_keep<T: Clone>(
    what: &str,
    result: Result<Vec<Value>, rigwatch_api::Error>,
    decode: fn(&[Value]) -> IndexMap<RigKey, T>,
    previous: &IndexMap<RigKey, T>,
) -> IndexMap<RigKey, T> {
    match result {
        Ok(items) => decode(&items),
        Err(ref e) if e.is_missing_key() => {
            debug!("{what}: response lacked the expected member, keeping previous values");
            previous.clone()
        }
        Err(e) => {
            warn!("{what}: fetch failed ({e}), keeping previous values");
            previous.clone()
        }
    }
}
