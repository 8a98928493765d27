// ── Rig registry ──
//
// Host-owned map of running controllers keyed by instance id. Whatever
// composes the system creates one and passes it around by reference.

use std::collections::HashMap;

use rigwatch_api::{HttpTransport, Transport};
use tracing::debug;

use crate::controller::RigController;

pub struct RigRegistry<T: Transport = HttpTransport> {
    rigs: HashMap<String, RigController<T>>,
}

impl<T: Transport> RigRegistry<T> {
    pub fn new() -> Self {
        Self {
            rigs: HashMap::new(),
        }
    }

    /// Register a controller under its config's instance id and return
    /// that id. A controller previously stored under the same id is
    /// handed back so the caller can shut it down.
    pub fn insert(&mut self, controller: RigController<T>) -> (String, Option<RigController<T>>) {
        let id = controller.config().instance_id();
        let previous = self.rigs.insert(id.clone(), controller);
        debug!(%id, replaced = previous.is_some(), "rig registered");
        (id, previous)
    }

    pub fn get(&self, id: &str) -> Option<&RigController<T>> {
        self.rigs.get(id)
    }

    /// Remove a rig and shut its controller down.
    pub async fn remove(&mut self, id: &str) -> bool {
        match self.rigs.remove(id) {
            Some(controller) => {
                controller.shutdown().await;
                true
            }
            None => false,
        }
    }

    /// Registered instance ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rigs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RigController<T>)> {
        self.rigs.iter().map(|(id, c)| (id.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.rigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rigs.is_empty()
    }

    /// Shut down and drop every controller.
    pub async fn shutdown_all(&mut self) {
        for (id, controller) in self.rigs.drain() {
            controller.shutdown().await;
            debug!(%id, "rig removed");
        }
    }
}

impl<T: Transport> Default for RigRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
