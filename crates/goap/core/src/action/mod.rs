//! Actions: schedulable units with preconditions, effects, cost, and a command.
//!
//! # Structure
//!
//! - [`ActionDef`]: catalogue entry supplied by the simulation at setup time
//! - [`ActionInstance`]: one per action per planning cycle, carries the lifecycle
//! - [`ActionState`]: guarded lifecycle state machine
//!
//! Effects are promises. The planner applies them to a search overlay only;
//! the store reflects them once the coordinator confirms real success.

mod instance;
mod state;

pub use instance::{ActionInstance, InstanceId};
pub use state::{ActionState, Outcome, TransitionError};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::fact::{Expectation, FactValue, PropertyId};
use crate::store::{FactMap, Overlay, WorldView};

/// Non-negative action cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost(pub u32);

impl Cost {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cost function evaluated against an immutable view.
///
/// Returning `None` declines the action for this cycle.
pub type CostFn = Arc<dyn Fn(&dyn WorldView) -> Option<Cost> + Send + Sync>;

/// Zero-argument side-effecting operation run by the coordinator.
pub type Command = Arc<dyn Fn() + Send + Sync>;

/// Result of evaluating an action against a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
    Eligible(Cost),
    Ineligible(IneligibleReason),
}

impl Evaluation {
    pub fn cost(&self) -> Option<Cost> {
        match self {
            Evaluation::Eligible(cost) => Some(*cost),
            Evaluation::Ineligible(_) => None,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, Evaluation::Eligible(_))
    }
}

/// Why an action was excluded from the candidate set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IneligibleReason {
    /// A precondition does not hold in the evaluated view.
    PreconditionUnmet(PropertyId),
    /// The cost function declined the action.
    Declined,
}

/// Catalogue entry describing one action.
pub struct ActionDef {
    name: Arc<str>,
    preconditions: BTreeMap<PropertyId, Expectation>,
    effects: FactMap,
    cost: CostFn,
    command: Command,
}

impl ActionDef {
    /// Starts building an action definition.
    pub fn builder(name: impl Into<Arc<str>>) -> ActionBuilder {
        ActionBuilder {
            name: name.into(),
            preconditions: BTreeMap::new(),
            effects: FactMap::new(),
            cost: Arc::new(|_: &dyn WorldView| Some(Cost::ONE)),
            command: Arc::new(|| {}),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &BTreeMap<PropertyId, Expectation> {
        &self.preconditions
    }

    pub fn effects(&self) -> &FactMap {
        &self.effects
    }

    /// Shared handle to the command; the action keeps ownership.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// First precondition that does not hold in `view`, if any.
    pub fn unmet_precondition(&self, view: &dyn WorldView) -> Option<PropertyId> {
        self.preconditions
            .iter()
            .find(|(id, expectation)| !view.satisfies(id, expectation))
            .map(|(id, _)| *id)
    }

    pub fn preconditions_hold(&self, view: &dyn WorldView) -> bool {
        self.unmet_precondition(view).is_none()
    }

    /// Runs the cost function only, without checking preconditions.
    pub fn cost(&self, view: &dyn WorldView) -> Option<Cost> {
        (self.cost)(view)
    }

    /// Cost function result as an [`Evaluation`]; a decline becomes
    /// [`IneligibleReason::Declined`].
    pub fn cost_evaluation(&self, view: &dyn WorldView) -> Evaluation {
        match self.cost(view) {
            Some(cost) => Evaluation::Eligible(cost),
            None => Evaluation::Ineligible(IneligibleReason::Declined),
        }
    }

    /// Full eligibility check: preconditions first, then cost.
    pub fn evaluate(&self, view: &dyn WorldView) -> Evaluation {
        if let Some(id) = self.unmet_precondition(view) {
            return Evaluation::Ineligible(IneligibleReason::PreconditionUnmet(id));
        }
        self.cost_evaluation(view)
    }

    /// Whether any effect would satisfy `expectation` on `id`.
    pub fn achieves(&self, id: &PropertyId, expectation: &Expectation) -> bool {
        self.effects
            .get(id)
            .is_some_and(|value| expectation.is_met_by(Some(value)))
    }

    /// Applies the promised effects to a hypothetical overlay.
    pub fn apply_effects(&self, overlay: &mut Overlay) -> bool {
        overlay.apply(&self.effects)
    }
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("name", &self.name)
            .field("preconditions", &self.preconditions)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ActionDef`].
///
/// Defaults: no preconditions, no effects, constant cost of 1, no-op command.
pub struct ActionBuilder {
    name: Arc<str>,
    preconditions: BTreeMap<PropertyId, Expectation>,
    effects: FactMap,
    cost: CostFn,
    command: Command,
}

impl ActionBuilder {
    /// Requires `id` to hold exactly `value` before the action can run.
    pub fn precondition(self, id: PropertyId, value: impl Into<FactValue>) -> Self {
        self.requires(id, Expectation::Equals(value.into()))
    }

    /// Requires `id` to satisfy an arbitrary expectation before the action can run.
    pub fn requires(mut self, id: PropertyId, expectation: Expectation) -> Self {
        self.preconditions.insert(id, expectation);
        self
    }

    /// Declares that the action sets `id` to `value`.
    pub fn effect(mut self, id: PropertyId, value: impl Into<FactValue>) -> Self {
        self.effects.insert(id, value.into());
        self
    }

    /// Uses a constant cost.
    pub fn cost(mut self, cost: Cost) -> Self {
        self.cost = Arc::new(move |_: &dyn WorldView| Some(cost));
        self
    }

    /// Uses a cost function evaluated once per planning cycle.
    pub fn cost_fn<F>(mut self, cost: F) -> Self
    where
        F: Fn(&dyn WorldView) -> Option<Cost> + Send + Sync + 'static,
    {
        self.cost = Arc::new(cost);
        self
    }

    /// Sets the command the coordinator runs on dispatch.
    pub fn command<F>(mut self, command: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.command = Arc::new(command);
        self
    }

    pub fn build(self) -> ActionDef {
        ActionDef {
            name: self.name,
            preconditions: self.preconditions,
            effects: self.effects,
            cost: self.cost,
            command: self.command,
        }
    }
}
