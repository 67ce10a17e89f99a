//! The WorldProperty store and the read-only views the planner consumes.
//!
//! [`WorldStore`] is the single source of truth. It is shared by every
//! planner reading it and by the one writer that applies confirmed effects
//! or syncs facts from the simulation. Planning never reads the live store:
//! each cycle takes a [`Snapshot`], and search works on an [`Overlay`] of
//! that snapshot.

mod overlay;

pub use overlay::Overlay;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::error::{ErrorSeverity, GoapError};
use crate::fact::{Expectation, FactKind, FactValue, PropertyId};

/// Facts keyed by property, in deterministic order.
pub type FactMap = BTreeMap<PropertyId, FactValue>;

/// Read access to a set of facts.
pub trait WorldView {
    /// Returns the live value of a property, if any.
    fn fact(&self, id: &PropertyId) -> Option<&FactValue>;

    /// Checks a single expectation against this view.
    fn satisfies(&self, id: &PropertyId, expectation: &Expectation) -> bool {
        expectation.is_met_by(self.fact(id))
    }
}

/// Source of facts owned by the simulation.
///
/// The store pulls from a source through [`WorldStore::refresh`]; the
/// planner never talks to the simulation directly.
pub trait FactSource {
    /// Reads the current value of a property, or `None` if it does not hold.
    fn read_property(&self, id: &PropertyId) -> Option<FactValue>;
}

/// Errors surfaced by the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("world store lock was poisoned")]
    LockPoisoned,

    #[error("fact {id} expects a {expected} value, found {found}")]
    KindMismatch {
        id: PropertyId,
        expected: FactKind,
        found: FactKind,
    },
}

impl GoapError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StoreError::LockPoisoned => ErrorSeverity::Internal,
            StoreError::KindMismatch { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StoreError::LockPoisoned => "store_lock_poisoned",
            StoreError::KindMismatch { .. } => "store_kind_mismatch",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Rejects values whose kind disagrees with the key.
pub fn check_kind(id: &PropertyId, value: &FactValue) -> Result<()> {
    let expected = id.kind();
    let found = value.kind();
    if expected == found {
        Ok(())
    } else {
        Err(StoreError::KindMismatch {
            id: *id,
            expected,
            found,
        })
    }
}

/// Immutable view of the store at one instant.
///
/// Cloning is cheap: all clones share the same fact map.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    facts: Arc<FactMap>,
    version: u64,
}

impl Snapshot {
    /// Builds a standalone snapshot, mostly useful in tests.
    pub fn from_facts(facts: FactMap) -> Self {
        Self {
            facts: Arc::new(facts),
            version: 0,
        }
    }

    /// Store version this snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyId, &FactValue)> {
        self.facts.iter()
    }
}

impl WorldView for Snapshot {
    fn fact(&self, id: &PropertyId) -> Option<&FactValue> {
        self.facts.get(id)
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    facts: Arc<FactMap>,
    version: u64,
}

/// Shared, thread-safe WorldProperty store.
///
/// Reads take a shared lock; writes are serialized by the exclusive lock so
/// each property holds at most one live value. Writes copy the map only
/// while a snapshot of the previous version is still alive.
#[derive(Debug, Default)]
pub struct WorldStore {
    inner: RwLock<StoreInner>,
}

impl WorldStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given facts.
    pub fn with_facts(facts: impl IntoIterator<Item = (PropertyId, FactValue)>) -> Result<Self> {
        let mut map = FactMap::new();
        for (id, value) in facts {
            check_kind(&id, &value)?;
            map.insert(id, value);
        }
        Ok(Self {
            inner: RwLock::new(StoreInner {
                facts: Arc::new(map),
                version: 0,
            }),
        })
    }

    /// Reads a single property.
    pub fn get(&self, id: &PropertyId) -> Result<Option<FactValue>> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.facts.get(id).copied())
    }

    /// Overwrites a property, returning the previous value.
    pub fn set(&self, id: PropertyId, value: FactValue) -> Result<Option<FactValue>> {
        check_kind(&id, &value)?;
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let previous = inner.facts.get(&id).copied();
        if previous != Some(value) {
            Arc::make_mut(&mut inner.facts).insert(id, value);
            inner.version += 1;
        }
        Ok(previous)
    }

    /// Removes a property, returning the previous value.
    pub fn remove(&self, id: &PropertyId) -> Result<Option<FactValue>> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if !inner.facts.contains_key(id) {
            return Ok(None);
        }
        let previous = Arc::make_mut(&mut inner.facts).remove(id);
        inner.version += 1;
        Ok(previous)
    }

    /// Applies a set of confirmed effects atomically.
    ///
    /// Every value is kind-checked before anything is written, so a bad
    /// effect leaves the store untouched.
    pub fn apply_effects(&self, effects: &FactMap) -> Result<usize> {
        for (id, value) in effects {
            check_kind(id, value)?;
        }
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let changed = write_all(&mut inner, effects.iter().map(|(id, v)| (*id, Some(*v))));
        Ok(changed)
    }

    /// Pulls the listed properties from the simulation.
    ///
    /// Properties the source reports as absent are removed. Returns the
    /// number of properties whose value changed.
    pub fn refresh(
        &self,
        source: &dyn FactSource,
        ids: impl IntoIterator<Item = PropertyId>,
    ) -> Result<usize> {
        let mut updates = Vec::new();
        for id in ids {
            let value = source.read_property(&id);
            if let Some(value) = &value {
                check_kind(&id, value)?;
            }
            updates.push((id, value));
        }
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(write_all(&mut inner, updates))
    }

    /// Takes an immutable snapshot of the current facts.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(Snapshot {
            facts: Arc::clone(&inner.facts),
            version: inner.version,
        })
    }

    /// Monotonic write counter; bumps on every change.
    pub fn version(&self) -> Result<u64> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.version)
    }
}

fn write_all(
    inner: &mut StoreInner,
    updates: impl IntoIterator<Item = (PropertyId, Option<FactValue>)>,
) -> usize {
    let mut changed = 0;
    for (id, value) in updates {
        if inner.facts.get(&id) == value.as_ref() {
            continue;
        }
        let facts = Arc::make_mut(&mut inner.facts);
        match value {
            Some(value) => {
                facts.insert(id, value);
            }
            None => {
                facts.remove(&id);
            }
        }
        changed += 1;
    }
    if changed > 0 {
        inner.version += 1;
    }
    changed
}
