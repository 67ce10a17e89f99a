//! Goal-oriented planner.
//!
//! A planning cycle reads one immutable snapshot from the shared store, costs
//! every catalogue action against it, and searches for the cheapest action
//! sequence that satisfies the highest-ranked unsatisfied goal.
//!
//! ```text
//! run(goals)
//!   ├─ snapshot = store.snapshot()
//!   ├─ pending  = goals not satisfied by snapshot   (none → Satisfied)
//!   ├─ instances = one fresh ActionInstance per catalogue entry
//!   ├─ evaluate instances (sequential or spawn_blocking)
//!   └─ for goal in pending:
//!        search(goal) → Planned(plan)
//!        no plan     → record failure; next goal if fallback is enabled
//! ```
//!
//! The planner never writes to the store. Effects are applied to search
//! overlays only; the coordinator writes confirmed effects after execution.

mod evaluation;
mod search;

pub use evaluation::{evaluate_catalogue, evaluate_catalogue_parallel};

use std::sync::Arc;

use goap_core::{
    ActionCatalogue, ActionInstance, Command, Cost, Evaluation, Goal, InstanceId, PlannerConfig,
    Snapshot, WorldStore,
};
use tracing::{debug, warn};

use crate::error::{Result, RuntimeError};
use crate::plan::{Plan, PlanStep};
use search::{SearchInput, SearchResult};

/// Why a goal produced no plan this cycle. None of these are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoPlanReason {
    /// No catalogue action contributes to the goal.
    NoRelevantActions,
    /// Every reachable state was explored.
    Exhausted,
    /// A plan may exist but needs more steps than `max_plan_length`.
    DepthBound,
    /// The search gave up after `max_expansions` expansions.
    ExpansionBound,
}

/// One goal the planner tried and could not plan for.
#[derive(Clone, Debug)]
pub struct GoalFailure {
    pub goal: Goal,
    pub reason: NoPlanReason,
    pub expansions: usize,
}

/// Result of one planning cycle.
#[derive(Debug)]
pub enum PlanOutcome {
    /// Every goal already holds; nothing to do.
    Satisfied,
    /// A plan for the highest-ranked goal that could be planned.
    Planned(Plan),
    /// No pending goal could be planned. Failures are in the order tried.
    NoPlan(Vec<GoalFailure>),
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            PlanOutcome::Planned(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn into_plan(self) -> Option<Plan> {
        match self {
            PlanOutcome::Planned(plan) => Some(plan),
            _ => None,
        }
    }

    /// Command handles in execution order; empty unless a plan was found.
    pub fn commands(&self) -> Vec<Command> {
        self.plan().map(Plan::commands).unwrap_or_default()
    }

    /// True when there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.plan().is_none_or(Plan::is_empty)
    }
}

/// Plans action sequences for one agent.
///
/// The catalogue and store are shared; the cycle counter and instance ids
/// belong to this planner.
pub struct Planner {
    catalogue: Arc<ActionCatalogue>,
    store: Arc<WorldStore>,
    config: PlannerConfig,
    cycle: u64,
    next_instance: u64,
}

impl Planner {
    /// Create a new planner builder
    pub fn builder() -> PlannerBuilder {
        PlannerBuilder::new()
    }

    pub fn store(&self) -> &Arc<WorldStore> {
        &self.store
    }

    pub fn catalogue(&self) -> &Arc<ActionCatalogue> {
        &self.catalogue
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Number of planning cycles run so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Plans for the highest-ranked unsatisfied goal.
    ///
    /// `goals` is ordered by priority, index 0 first.
    pub fn run(&mut self, goals: &[Goal]) -> Result<PlanOutcome> {
        let snapshot = self.store.snapshot()?;
        let cycle = self.next_cycle();
        let pending = pending_goals(goals, &snapshot);
        if pending.is_empty() {
            debug!(cycle, "all goals satisfied");
            return Ok(PlanOutcome::Satisfied);
        }

        let mut instances = self.instantiate(cycle);
        let evaluations = evaluate_catalogue(&mut instances, &snapshot)?;
        self.plan(cycle, &pending, &snapshot, instances, &evaluations)
    }

    /// Same as [`Planner::run`], but costs actions concurrently on the
    /// blocking pool. The resulting plan is identical.
    pub async fn run_parallel(&mut self, goals: &[Goal]) -> Result<PlanOutcome> {
        let snapshot = self.store.snapshot()?;
        let cycle = self.next_cycle();
        let pending = pending_goals(goals, &snapshot);
        if pending.is_empty() {
            debug!(cycle, "all goals satisfied");
            return Ok(PlanOutcome::Satisfied);
        }

        let mut instances = self.instantiate(cycle);
        let evaluations = evaluate_catalogue_parallel(&mut instances, &snapshot).await?;
        self.plan(cycle, &pending, &snapshot, instances, &evaluations)
    }

    fn next_cycle(&mut self) -> u64 {
        self.cycle += 1;
        self.cycle
    }

    fn next_instance_id(&mut self) -> InstanceId {
        self.next_instance += 1;
        InstanceId(self.next_instance)
    }

    fn instantiate(&mut self, cycle: u64) -> Vec<ActionInstance> {
        let catalogue = Arc::clone(&self.catalogue);
        catalogue
            .iter()
            .map(|def| ActionInstance::new(self.next_instance_id(), cycle, Arc::clone(def)))
            .collect()
    }

    fn plan(
        &mut self,
        cycle: u64,
        pending: &[&Goal],
        snapshot: &Snapshot,
        instances: Vec<ActionInstance>,
        evaluations: &[Evaluation],
    ) -> Result<PlanOutcome> {
        let costs: Vec<Option<Cost>> = evaluations.iter().map(Evaluation::cost).collect();
        debug!(
            cycle,
            pending = pending.len(),
            eligible = costs.iter().flatten().count(),
            "planning cycle"
        );

        let mut failures = Vec::new();
        for &goal in pending {
            let result = search::search(&SearchInput {
                goal,
                snapshot,
                catalogue: &self.catalogue,
                costs: &costs,
                config: &self.config,
            });

            match result {
                SearchResult::Found {
                    steps,
                    total_cost,
                    expansions,
                } => {
                    debug!(
                        cycle,
                        goal = goal.name(),
                        steps = steps.len(),
                        total_cost,
                        expansions,
                        "plan found"
                    );
                    let steps = self.assemble(cycle, &steps, instances, evaluations)?;
                    return Ok(PlanOutcome::Planned(Plan::new(goal.clone(), cycle, steps)));
                }
                SearchResult::NotFound { reason, expansions } => {
                    if matches!(reason, NoPlanReason::ExpansionBound) {
                        warn!(
                            cycle,
                            goal = goal.name(),
                            expansions,
                            "search bound exhausted"
                        );
                    } else {
                        debug!(
                            cycle,
                            goal = goal.name(),
                            ?reason,
                            expansions,
                            "no plan for goal"
                        );
                    }
                    failures.push(GoalFailure {
                        goal: goal.clone(),
                        reason,
                        expansions,
                    });
                    if !self.config.fallback_to_lower_goals {
                        break;
                    }
                }
            }
        }

        Ok(PlanOutcome::NoPlan(failures))
    }

    /// Turns catalogue indices into plan steps.
    ///
    /// An action that appears more than once gets a separate instance per
    /// occurrence, sharing the cycle's evaluation.
    fn assemble(
        &mut self,
        cycle: u64,
        indices: &[usize],
        instances: Vec<ActionInstance>,
        evaluations: &[Evaluation],
    ) -> Result<Vec<PlanStep>> {
        let mut slots: Vec<Option<ActionInstance>> = instances.into_iter().map(Some).collect();
        let mut steps = Vec::with_capacity(indices.len());

        for &index in indices {
            let instance = match slots.get_mut(index).and_then(Option::take) {
                Some(instance) => instance,
                None => {
                    let def = self
                        .catalogue
                        .get(index)
                        .cloned()
                        .ok_or(RuntimeError::MissingCatalogue)?;
                    let evaluation = evaluations
                        .get(index)
                        .copied()
                        .ok_or(RuntimeError::MissingCatalogue)?;
                    let mut repeat = ActionInstance::new(self.next_instance_id(), cycle, def);
                    repeat.begin_evaluation()?;
                    repeat.finish_evaluation(evaluation)?;
                    repeat
                }
            };
            steps.push(PlanStep::new(instance));
        }

        Ok(steps)
    }
}

fn pending_goals<'a>(goals: &'a [Goal], snapshot: &Snapshot) -> Vec<&'a Goal> {
    goals.iter().filter(|g| !g.is_satisfied(snapshot)).collect()
}

/// Builder for [`Planner`].
pub struct PlannerBuilder {
    config: PlannerConfig,
    catalogue: Option<Arc<ActionCatalogue>>,
    store: Option<Arc<WorldStore>>,
}

impl PlannerBuilder {
    fn new() -> Self {
        Self {
            config: PlannerConfig::default(),
            catalogue: None,
            store: None,
        }
    }

    /// Override planner configuration
    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the action catalogue (required)
    pub fn catalogue(mut self, catalogue: impl Into<Arc<ActionCatalogue>>) -> Self {
        self.catalogue = Some(catalogue.into());
        self
    }

    /// Set the shared world store (required)
    pub fn store(mut self, store: Arc<WorldStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate the catalogue and build the planner.
    pub fn build(self) -> Result<Planner> {
        if let Some(catalogue) = &self.catalogue {
            catalogue.validate().map_err(RuntimeError::Catalogue)?;
        }
        self.finish()
    }

    /// Builds without validating, so tests can reach store-side rejections.
    #[cfg(test)]
    pub(crate) fn build_unchecked(self) -> Result<Planner> {
        self.finish()
    }

    fn finish(self) -> Result<Planner> {
        let catalogue = self.catalogue.ok_or(RuntimeError::MissingCatalogue)?;
        let store = self.store.ok_or(RuntimeError::MissingStore)?;

        Ok(Planner {
            catalogue,
            store,
            config: self.config,
            cycle: 0,
            next_instance: 0,
        })
    }
}
