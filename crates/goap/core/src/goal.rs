//! Goals: named sets of facts that must hold together.
//!
//! A goal is immutable once built. When the agent's intent changes (expand,
//! defend, ...) the policy layer builds a new goal rather than editing one.
//! Ranking between goals is also the policy layer's business; the planner
//! only receives them as an ordered slice.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::fact::{Expectation, FactValue, PropertyId};
use crate::store::WorldView;

/// A desired world state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    name: Arc<str>,
    requirements: Arc<BTreeMap<PropertyId, Expectation>>,
}

impl Goal {
    /// Starts building a goal with the given name.
    pub fn builder(name: impl Into<Arc<str>>) -> GoalBuilder {
        GoalBuilder {
            name: name.into(),
            requirements: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requirements in deterministic property order.
    pub fn requirements(&self) -> impl Iterator<Item = (&PropertyId, &Expectation)> {
        self.requirements.iter()
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// True when every requirement holds in `view`.
    ///
    /// An empty goal is trivially satisfied.
    pub fn is_satisfied(&self, view: &dyn WorldView) -> bool {
        self.requirements
            .iter()
            .all(|(id, expectation)| view.satisfies(id, expectation))
    }

    /// Requirements that do not hold in `view`.
    pub fn unsatisfied(&self, view: &dyn WorldView) -> Vec<(PropertyId, Expectation)> {
        self.requirements
            .iter()
            .filter(|(id, expectation)| !view.satisfies(id, expectation))
            .map(|(id, expectation)| (*id, *expectation))
            .collect()
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for [`Goal`].
#[derive(Debug)]
pub struct GoalBuilder {
    name: Arc<str>,
    requirements: BTreeMap<PropertyId, Expectation>,
}

impl GoalBuilder {
    /// Requires `id` to hold exactly `value`.
    pub fn expect(self, id: PropertyId, value: impl Into<FactValue>) -> Self {
        self.require(id, Expectation::Equals(value.into()))
    }

    /// Requires `id` to satisfy an arbitrary expectation.
    ///
    /// A later requirement on the same property replaces the earlier one.
    pub fn require(mut self, id: PropertyId, expectation: Expectation) -> Self {
        self.requirements.insert(id, expectation);
        self
    }

    pub fn build(self) -> Goal {
        Goal {
            name: self.name,
            requirements: Arc::new(self.requirements),
        }
    }
}
