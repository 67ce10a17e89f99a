//! Unified error type surfaced by the planning runtime.
//!
//! Planning outcomes (no plan, ineligible actions, exhausted search bounds)
//! are not errors; they are reported through
//! [`crate::planner::PlanOutcome`]. Errors here mean the caller misused the
//! coordinator contract or the shared store is broken.
use goap_core::{
    CatalogueError, ErrorSeverity, GoapError, InstanceId, StoreError, TransitionError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("action catalogue failed validation")]
    Catalogue(#[source] CatalogueError),

    #[error("planner requires an action catalogue before building")]
    MissingCatalogue,

    #[error("planner requires a world store before building")]
    MissingStore,

    #[error("action instance {instance} is still in flight")]
    DispatchInFlight { instance: InstanceId },

    #[error("no in-flight action matches instance {instance} from cycle {cycle}")]
    UnknownTicket { instance: InstanceId, cycle: u64 },

    #[error("cost evaluation task failed")]
    EvaluationJoin(#[source] tokio::task::JoinError),
}

impl GoapError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Store(err) => err.severity(),
            RuntimeError::Transition(err) => err.severity(),
            RuntimeError::Catalogue(err) => err.severity(),
            RuntimeError::MissingCatalogue | RuntimeError::MissingStore => {
                ErrorSeverity::Validation
            }
            RuntimeError::DispatchInFlight { .. } | RuntimeError::UnknownTicket { .. } => {
                ErrorSeverity::Recoverable
            }
            RuntimeError::EvaluationJoin(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Store(err) => err.error_code(),
            RuntimeError::Transition(err) => err.error_code(),
            RuntimeError::Catalogue(err) => err.error_code(),
            RuntimeError::MissingCatalogue => "runtime_missing_catalogue",
            RuntimeError::MissingStore => "runtime_missing_store",
            RuntimeError::DispatchInFlight { .. } => "coordinator_dispatch_in_flight",
            RuntimeError::UnknownTicket { .. } => "coordinator_unknown_ticket",
            RuntimeError::EvaluationJoin(_) => "planner_evaluation_join",
        }
    }
}
