//! Plans handed from the planner to the execution coordinator.

use std::fmt;

use goap_core::{ActionInstance, Command, Cost, Goal};

/// One scheduled action: its instance for this cycle and its command handle.
pub struct PlanStep {
    instance: ActionInstance,
    command: Command,
}

impl PlanStep {
    pub(crate) fn new(instance: ActionInstance) -> Self {
        let command = instance.def().command().clone();
        Self { instance, command }
    }

    pub fn instance(&self) -> &ActionInstance {
        &self.instance
    }

    pub fn name(&self) -> &str {
        self.instance.name()
    }

    /// Cost computed for this action in the planning cycle.
    pub fn cost(&self) -> Cost {
        self.instance.cost().unwrap_or_default()
    }

    /// Command to run. The action definition still owns it.
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn into_parts(self) -> (ActionInstance, Command) {
        (self.instance, self.command)
    }
}

impl fmt::Debug for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanStep")
            .field("instance", &self.instance.id())
            .field("name", &self.name())
            .field("cost", &self.cost())
            .finish()
    }
}

/// Ordered actions expected to move the world into a goal state.
///
/// Steps are in execution order.
#[derive(Debug)]
pub struct Plan {
    goal: Goal,
    cycle: u64,
    steps: Vec<PlanStep>,
    total_cost: u64,
}

impl Plan {
    pub(crate) fn new(goal: Goal, cycle: u64, steps: Vec<PlanStep>) -> Self {
        let total_cost = steps.iter().map(|s| u64::from(s.cost().value())).sum();
        Self {
            goal,
            cycle,
            steps,
            total_cost,
        }
    }

    /// Goal this plan was built for.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Planning cycle that produced this plan.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Sum of the step costs.
    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.steps.iter().map(PlanStep::name).collect()
    }

    /// Command handles in execution order.
    pub fn commands(&self) -> Vec<Command> {
        self.steps.iter().map(|s| s.command.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<PlanStep> {
        self.steps
    }
}
