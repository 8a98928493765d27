// ── Atomic snapshot store ──
//
// Holds exactly one `Snapshot`. Readers take a cheap `Arc` to whatever
// is installed; writers replace it in a single swap, so no reader can
// observe a half-applied refresh.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{Algorithm, Device, RigInfo, Snapshot, Worker};

/// Wait-free holder of the current rig [`Snapshot`].
pub struct RigStore {
    snapshot: ArcSwap<Snapshot>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl RigStore {
    /// An empty, offline store.
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::empty()),
            last_refresh,
        }
    }

    /// Install a complete snapshot and stamp the refresh time.
    pub(crate) fn install(&self, snapshot: Snapshot) {
        self.snapshot.store(Arc::new(snapshot));
        // `send_replace` updates even with zero receivers.
        self.last_refresh.send_replace(Some(Utc::now()));
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    pub fn is_online(&self) -> bool {
        self.snapshot.load().online
    }

    pub fn info(&self) -> Option<RigInfo> {
        self.snapshot.load().info.clone()
    }

    // ── Single-entity lookups ────────────────────────────────────────
    //
    // Unknown ids return `None`; no placeholder record is ever built.

    pub fn device(&self, id: i64) -> Option<Device> {
        self.snapshot.load().device(id).cloned()
    }

    pub fn algorithm(&self, id: i64) -> Option<Algorithm> {
        self.snapshot.load().algorithm(id).cloned()
    }

    pub fn worker(&self, id: i64) -> Option<Worker> {
        self.snapshot.load().worker(id).cloned()
    }

    // ── Refresh bookkeeping ──────────────────────────────────────────

    /// When the last refresh cycle installed its snapshot.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }
}

impl Default for RigStore {
    fn default() -> Self {
        Self::new()
    }
}
