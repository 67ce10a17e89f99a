//! Planning and execution for goal-oriented agents.
//!
//! This crate turns the data model in `goap-core` into behaviour. A
//! [`Planner`] costs the action catalogue against a store snapshot and searches
//! for the cheapest plan toward the highest-ranked unsatisfied goal. An
//! [`ExecutionCoordinator`] runs that plan one action at a time and feeds
//! confirmed effects back into the store.
//!
//! Modules are organized by responsibility:
//! - [`planner`] hosts the planner, its builder, and cost evaluation
//! - [`plan`] holds the plan types handed to execution
//! - [`coordinator`] dispatches actions and handles outcome reports
//! - [`config`] and [`loader`] describe and read TOML configuration
pub mod config;
pub mod coordinator;
pub mod error;
pub mod loader;
pub mod plan;
pub mod planner;

pub use config::{CoordinatorConfig, RuntimeConfig};
pub use coordinator::{Dispatch, ExecutionCoordinator, IdleReason, Ticket};
pub use error::{Result, RuntimeError};
pub use loader::{ConfigLoader, LoadResult};
pub use plan::{Plan, PlanStep};
pub use planner::{
    GoalFailure, NoPlanReason, PlanOutcome, Planner, PlannerBuilder, evaluate_catalogue,
    evaluate_catalogue_parallel,
};
