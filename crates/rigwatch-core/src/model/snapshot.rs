// ── Snapshot aggregate ──
//
// One complete view of the rig. Built off to the side by a refresh cycle
// and installed in a single swap; never mutated once visible.

use indexmap::IndexMap;

use super::algorithm::Algorithm;
use super::device::Device;
use super::field::{Field, RigKey};
use super::rig_info::RigInfo;
use super::worker::Worker;

/// The aggregate of all polled state at one point in time.
///
/// Maps keep the order the daemon reported records in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub devices: IndexMap<RigKey, Device>,
    pub algorithms: IndexMap<RigKey, Algorithm>,
    pub workers: IndexMap<RigKey, Worker>,
    pub info: Option<RigInfo>,
    /// `true` iff the most recent rig-info fetch succeeded.
    pub online: bool,
}

impl Snapshot {
    /// The snapshot a cache starts with: no records, offline.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn device(&self, id: i64) -> Option<&Device> {
        self.devices.get(&Field::Available(id))
    }

    pub fn algorithm(&self, id: i64) -> Option<&Algorithm> {
        self.algorithms.get(&Field::Available(id))
    }

    pub fn worker(&self, id: i64) -> Option<&Worker> {
        self.workers.get(&Field::Available(id))
    }

    /// The device a worker is bound to, matched on `device_id`.
    pub fn device_for_worker(&self, worker: &Worker) -> Option<&Device> {
        worker
            .device_id
            .get()
            .and_then(|id| self.devices.values().find(|d| d.id.get() == Some(id)))
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.algorithms.is_empty() && self.workers.is_empty()
    }
}
