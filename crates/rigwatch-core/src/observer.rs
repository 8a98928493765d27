// ── Observer registry ──
//
// Zero-argument listeners invoked after every refresh. Observers pull
// current values from the controller's accessors; nothing is pushed.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

/// A listener notified after each completed refresh.
///
/// Implemented for any `Fn() + Send + Sync` closure.
pub trait Observer: Send + Sync {
    fn notify(&self);
}

impl<F: Fn() + Send + Sync> Observer for F {
    fn notify(&self) {
        self();
    }
}

/// Handle returned by [`ObserverRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

#[derive(Default)]
struct Entries {
    next_id: u64,
    list: Vec<(ObserverId, Arc<dyn Observer>)>,
}

impl Entries {
    fn contains(&self, id: ObserverId) -> bool {
        self.list.iter().any(|(entry, _)| *entry == id)
    }
}

/// Ordered set of observers keyed by identity.
///
/// Safe to mutate from inside a notification: each pass iterates a copy
/// of the list taken at its start, so observers added mid-pass wait for
/// the next one, and observers removed mid-pass are skipped.
#[derive(Default)]
pub struct ObserverRegistry {
    entries: Mutex<Entries>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer. Registering the same `Arc` twice returns the
    /// existing id instead of adding a second entry.
    pub fn register(&self, observer: Arc<dyn Observer>) -> ObserverId {
        let mut entries = self.lock();
        if let Some((id, _)) = entries.list.iter().find(|(_, o)| Arc::ptr_eq(o, &observer)) {
            return *id;
        }

        let id = ObserverId(entries.next_id);
        entries.next_id += 1;
        entries.list.push((id, observer));
        trace!(%id, "observer registered");
        id
    }

    /// Remove by id. Unknown ids are ignored. Returns whether anything was removed.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut entries = self.lock();
        let before = entries.list.len();
        entries.list.retain(|(entry, _)| *entry != id);
        before != entries.list.len()
    }

    /// Remove by identity. Observers that were never registered are ignored.
    pub fn remove_observer(&self, observer: &Arc<dyn Observer>) -> bool {
        let mut entries = self.lock();
        let before = entries.list.len();
        entries.list.retain(|(_, o)| !Arc::ptr_eq(o, observer));
        before != entries.list.len()
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.lock().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().list.is_empty()
    }

    pub fn clear(&self) {
        self.lock().list.clear();
    }

    /// Invoke every registered observer in registration order.
    ///
    /// The lock is never held while an observer runs. Returns how many
    /// observers were invoked.
    pub fn notify_all(&self) -> usize {
        let pass: Vec<(ObserverId, Arc<dyn Observer>)> = self.lock().list.clone();

        let mut invoked = 0;
        for (id, observer) in pass {
            if !self.contains(id) {
                trace!(%id, "observer removed during pass, skipped");
                continue;
            }
            observer.notify();
            invoked += 1;
        }
        invoked
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("len", &self.len())
            .finish()
    }
}
