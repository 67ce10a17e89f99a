use std::fmt;
use std::sync::Arc;

use super::{ActionDef, ActionState, Cost, Evaluation, Outcome, TransitionError};
use crate::store::WorldView;

/// Unique identifier of an action instance.
///
/// Identifiers are never reused, so an instance from an earlier cycle can
/// always be told apart from its replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One action within one planning/execution cycle.
///
/// Instances are not `Clone`: whoever holds the instance is the
/// only party that can move it to `Running`.
#[derive(Debug)]
pub struct ActionInstance {
    id: InstanceId,
    cycle: u64,
    def: Arc<ActionDef>,
    state: ActionState,
    evaluation: Option<Evaluation>,
}

impl ActionInstance {
    pub fn new(id: InstanceId, cycle: u64, def: Arc<ActionDef>) -> Self {
        Self {
            id,
            cycle,
            def,
            state: ActionState::Ready,
            evaluation: None,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Planning cycle that created this instance.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn def(&self) -> &Arc<ActionDef> {
        &self.def
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Result of the cycle's cost evaluation, once finished.
    pub fn evaluation(&self) -> Option<Evaluation> {
        self.evaluation
    }

    pub fn cost(&self) -> Option<Cost> {
        self.evaluation.and_then(|e| e.cost())
    }

    /// `Ready -> Evaluating`.
    pub fn begin_evaluation(&mut self) -> Result<(), TransitionError> {
        self.state = self.state.transition(ActionState::Evaluating)?;
        Ok(())
    }

    /// `Evaluating -> Ready`, recording the result.
    pub fn finish_evaluation(&mut self, evaluation: Evaluation) -> Result<(), TransitionError> {
        self.state = self.state.transition(ActionState::Ready)?;
        self.evaluation = Some(evaluation);
        Ok(())
    }

    /// Runs the cost function against `view` inside an evaluation bracket.
    ///
    /// Preconditions are not checked here: during planning they are checked
    /// against the search overlay, where earlier steps may have met them.
    pub fn evaluate_cost(&mut self, view: &dyn WorldView) -> Result<Evaluation, TransitionError> {
        self.begin_evaluation()?;
        let evaluation = self.def.cost_evaluation(view);
        self.finish_evaluation(evaluation)?;
        Ok(evaluation)
    }

    /// `Ready -> Running`. Only legal once per instance.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.state = self.state.transition(ActionState::Running)?;
        Ok(())
    }

    /// `Running -> Successful | Failed`.
    pub fn resolve(&mut self, outcome: Outcome) -> Result<(), TransitionError> {
        self.state = self.state.transition(outcome.state())?;
        Ok(())
    }
}
