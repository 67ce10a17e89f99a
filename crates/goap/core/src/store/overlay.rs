//! Search-local hypothetical state layered over a snapshot.

use super::{FactMap, Snapshot, WorldView};
use crate::fact::{FactValue, PropertyId};

/// Hypothetical future state: a snapshot plus proposed changes.
///
/// Changes that restore the snapshot's value are dropped, so two overlays
/// describing the same world compare equal through [`Overlay::changes`].
/// An overlay is never written back to the store.
#[derive(Clone, Debug)]
pub struct Overlay {
    base: Snapshot,
    changes: FactMap,
}

impl Overlay {
    pub fn new(base: Snapshot) -> Self {
        Self {
            base,
            changes: FactMap::new(),
        }
    }

    /// Sets one hypothetical value. Returns true if the view changed.
    pub fn set(&mut self, id: PropertyId, value: FactValue) -> bool {
        if self.fact(&id) == Some(&value) {
            return false;
        }
        if self.base.fact(&id) == Some(&value) {
            self.changes.remove(&id);
        } else {
            self.changes.insert(id, value);
        }
        true
    }

    /// Applies a set of effects. Returns true if any of them changed the view.
    pub fn apply(&mut self, effects: &FactMap) -> bool {
        let mut changed = false;
        for (id, value) in effects {
            changed |= self.set(*id, *value);
        }
        changed
    }

    /// Differences from the base snapshot, in deterministic order.
    pub fn changes(&self) -> &FactMap {
        &self.changes
    }

    pub fn base(&self) -> &Snapshot {
        &self.base
    }

    /// True while no change differs from the base snapshot.
    pub fn is_pristine(&self) -> bool {
        self.changes.is_empty()
    }
}

impl WorldView for Overlay {
    fn fact(&self, id: &PropertyId) -> Option<&FactValue> {
        self.changes.get(id).or_else(|| self.base.fact(id))
    }
}
