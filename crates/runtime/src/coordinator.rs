//! Reference execution coordinator.
//!
//! Drives one agent's plan step by step: dispatch the next action, wait for
//! the simulation to report the outcome, write confirmed effects, replan when
//! something goes wrong. At most one plan is live and at most one instance is
//! in flight.
//!
//! ```text
//! set_goals ──► dispatch ──► Dispatched(ticket) ──► report(ticket, outcome)
//!                  │                                    │
//!                  ├─ no live plan → planner.run        ├─ Successful → store.apply_effects
//!                  └─ live goal now holds → cancel      └─ Failed     → drop plan, replan next dispatch
//! ```

use std::collections::VecDeque;

use goap_core::{ActionInstance, Goal, InstanceId, Outcome};
use tracing::{debug, warn};

use crate::config::CoordinatorConfig;
use crate::error::{Result, RuntimeError};
use crate::plan::{Plan, PlanStep};
use crate::planner::{GoalFailure, PlanOutcome, Planner};

/// Receipt for a dispatched action, handed back in [`ExecutionCoordinator::report`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    instance: InstanceId,
    cycle: u64,
}

impl Ticket {
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

/// Why [`ExecutionCoordinator::dispatch`] had nothing to run.
#[derive(Debug)]
pub enum IdleReason {
    NoGoals,
    GoalsSatisfied,
    /// No goal could be planned this cycle.
    NoPlan(Vec<GoalFailure>),
}

#[derive(Debug)]
pub enum Dispatch {
    Dispatched(Ticket),
    Idle(IdleReason),
}

impl Dispatch {
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Dispatch::Dispatched(ticket) => Some(*ticket),
            Dispatch::Idle(_) => None,
        }
    }
}

#[derive(Debug)]
struct LivePlan {
    goal: Goal,
    cycle: u64,
    steps: VecDeque<PlanStep>,
}

impl From<Plan> for LivePlan {
    fn from(plan: Plan) -> Self {
        let goal = plan.goal().clone();
        let cycle = plan.cycle();
        Self {
            goal,
            cycle,
            steps: plan.into_steps().into(),
        }
    }
}

/// Executes plans produced by a [`Planner`] one action at a time.
pub struct ExecutionCoordinator {
    planner: Planner,
    config: CoordinatorConfig,
    goals: Vec<Goal>,
    live: Option<LivePlan>,
    in_flight: Option<ActionInstance>,
}

impl ExecutionCoordinator {
    pub fn new(planner: Planner) -> Self {
        Self::with_config(planner, CoordinatorConfig::default())
    }

    pub fn with_config(planner: Planner, config: CoordinatorConfig) -> Self {
        Self {
            planner,
            config,
            goals: Vec::new(),
            live: None,
            in_flight: None,
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Instance currently running, if any.
    pub fn in_flight(&self) -> Option<&ActionInstance> {
        self.in_flight.as_ref()
    }

    /// Steps of the live plan not yet dispatched.
    pub fn remaining_steps(&self) -> usize {
        self.live.as_ref().map_or(0, |live| live.steps.len())
    }

    /// Goal the live plan is working toward.
    pub fn live_goal(&self) -> Option<&Goal> {
        self.live.as_ref().map(|live| &live.goal)
    }

    /// Replaces the ranked goal list. A different list invalidates the live plan.
    pub fn set_goals(&mut self, goals: Vec<Goal>) {
        if goals == self.goals {
            return;
        }
        if let Some(live) = self.live.take() {
            debug!(
                    goal = live.goal.name(),
                cycle = live.cycle,
                dropped = live.steps.len(),
                "goals superseded, plan discarded"
            );
        }
        self.goals = goals;
    }

    /// Starts the next action of the live plan, planning first if needed.
    ///
    /// The command runs before this returns. Report its outcome with the
    /// returned ticket before dispatching again.
    pub fn dispatch(&mut self) -> Result<Dispatch> {
        if let Some(instance) = &self.in_flight {
            return Err(RuntimeError::DispatchInFlight {
                instance: instance.id(),
            });
        }
        if self.goals.is_empty() {
            self.live = None;
            return Ok(Dispatch::Idle(IdleReason::NoGoals));
        }

        if self.config.revalidate_before_dispatch
            && let Some(live) = &self.live
        {
            let snapshot = self.planner.store().snapshot()?;
            if live.goal.is_satisfied(&snapshot) {
                debug!(
                            goal = live.goal.name(),
                    cancelled = live.steps.len(),
                    "goal already satisfied, plan cancelled"
                );
                self.live = None;
            }
        }

        if self.live.as_ref().is_some_and(|live| live.steps.is_empty()) {
            self.live = None;
        }

        if self.live.is_none() {
            match self.planner.run(&self.goals)? {
                PlanOutcome::Satisfied => return Ok(Dispatch::Idle(IdleReason::GoalsSatisfied)),
                PlanOutcome::NoPlan(failures) => {
                    return Ok(Dispatch::Idle(IdleReason::NoPlan(failures)));
                }
                PlanOutcome::Planned(plan) => {
                    debug!(
                                    goal = plan.goal().name(),
                        cycle = plan.cycle(),
                        actions = ?plan.action_names(),
                        total_cost = plan.total_cost(),
                        "plan adopted"
                    );
                    self.live = Some(plan.into());
                }
            }
        }

        let Some(step) = self.live.as_mut().and_then(|live| live.steps.pop_front()) else {
            return Ok(Dispatch::Idle(IdleReason::GoalsSatisfied));
        };

        let (mut instance, command) = step.into_parts();
        instance.start()?;
        let ticket = Ticket {
            instance: instance.id(),
            cycle: instance.cycle(),
        };
        debug!(
            action = instance.name(),
            instance = %ticket.instance,
            cycle = ticket.cycle,
            "dispatching action"
        );

        self.in_flight = Some(instance);
        command();
        Ok(Dispatch::Dispatched(ticket))
    }

    /// Resolves the in-flight instance and returns it in its terminal state.
    ///
    /// On success the action's effects are written to the store (when
    /// enabled) before the instance resolves. If that write fails the
    /// instance stays in flight under the same ticket, the live plan is
    /// dropped, and the store error is returned. On failure the rest of the
    /// plan is dropped; the next dispatch plans again from the post-failure
    /// snapshot.
    pub fn report(&mut self, ticket: Ticket, outcome: Outcome) -> Result<ActionInstance> {
        let Some(mut instance) = self
            .in_flight
            .take_if(|i| i.id() == ticket.instance && i.cycle() == ticket.cycle)
        else {
            return Err(RuntimeError::UnknownTicket {
                instance: ticket.instance,
                cycle: ticket.cycle,
            });
        };

        match outcome {
            Outcome::Successful => {
                if self.config.apply_confirmed_effects {
                    match self.planner.store().apply_effects(instance.def().effects()) {
                        Ok(changed) => debug!(
                            action = instance.name(),
                            changed,
                            "effects confirmed"
                        ),
                        Err(err) => {
                            let dropped = self.live.take().map_or(0, |live| live.steps.len());
                            warn!(
                                action = instance.name(),
                                instance = %instance.id(),
                                dropped,
                                error = %err,
                                "confirmed effects rejected, plan discarded"
                            );
                            self.in_flight = Some(instance);
                            return Err(err.into());
                        }
                    }
                }
                instance.resolve(outcome)?;
            }
            Outcome::Failed => {
                instance.resolve(outcome)?;
                let dropped = self.live.take().map_or(0, |live| live.steps.len());
                warn!(
                    action = instance.name(),
                    instance = %instance.id(),
                    dropped,
                    "action failed, plan discarded"
                );
            }
        }

        Ok(instance)
    }
}
