//! Deterministic data model for goal-oriented action planning.
//!
//! `goap-core` defines the world facts a strategic agent reasons about, the
//! goals it pursues, and the actions it can schedule. Everything here is pure:
//! no I/O, no logging, no threads. Planning and execution live in the
//! `goap-runtime` crate, which depends on the types re-exported here.
//!
//! - [`fact`]: typed fact keys, subjects, values, and expectations
//! - [`store`]: the shared [`WorldStore`], immutable [`Snapshot`]s, search [`Overlay`]s
//! - [`goal`]: immutable [`Goal`]s
//! - [`action`]: [`ActionDef`] catalogue entries and per-cycle [`ActionInstance`]s
//! - [`catalogue`]: ordered, validated [`ActionCatalogue`]
pub mod action;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod fact;
pub mod goal;
pub mod store;

pub use action::{
    ActionBuilder, ActionDef, ActionInstance, ActionState, Command, Cost, CostFn, Evaluation,
    IneligibleReason, InstanceId, Outcome, TransitionError,
};
pub use catalogue::{ActionCatalogue, CatalogueError};
pub use config::PlannerConfig;
pub use error::{ErrorSeverity, GoapError};
pub use fact::{
    EmpireId, EntityRef, Expectation, FactKey, FactKind, FactValue, FleetId, Level, PlanetId,
    PropertyId,
};
pub use goal::{Goal, GoalBuilder};
pub use store::{FactMap, FactSource, Overlay, Snapshot, StoreError, WorldStore, WorldView};
