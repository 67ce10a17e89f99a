//! Lifecycle of a single action instance within one planning/execution cycle.

use thiserror::Error;

use crate::error::{ErrorSeverity, GoapError};

/// Lifecycle state of an [`super::ActionInstance`].
///
/// ```text
/// Ready ──► Evaluating ──► Ready ──► Running ──► Successful
///                                        └─────► Failed
/// ```
///
/// `Successful` and `Failed` are terminal. The next planning cycle creates a
/// fresh instance instead of reviving a resolved one.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionState {
    #[default]
    Ready,
    Evaluating,
    Running,
    Failed,
    Successful,
}

impl ActionState {
    /// Returns `true` for `Successful` and `Failed`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, ActionState::Successful | ActionState::Failed)
    }

    /// Checks whether `self -> to` is a legal edge.
    pub fn can_transition_to(self, to: ActionState) -> bool {
        matches!(
            (self, to),
            (ActionState::Ready, ActionState::Evaluating)
                | (ActionState::Evaluating, ActionState::Ready)
                | (ActionState::Ready, ActionState::Running)
                | (ActionState::Running, ActionState::Successful)
                | (ActionState::Running, ActionState::Failed)
        )
    }

    /// Returns the target state if the edge is legal.
    pub fn transition(self, to: ActionState) -> Result<ActionState, TransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(TransitionError { from: self, to })
        }
    }
}

/// Real-world result the coordinator reports for a dispatched action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Successful,
    Failed,
}

impl Outcome {
    /// Terminal lifecycle state this outcome resolves to.
    pub const fn state(self) -> ActionState {
        match self {
            Outcome::Successful => ActionState::Successful,
            Outcome::Failed => ActionState::Failed,
        }
    }
}

/// An illegal lifecycle edge was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("illegal action transition {from} -> {to}")]
pub struct TransitionError {
    pub from: ActionState,
    pub to: ActionState,
}

impl GoapError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "action_illegal_transition"
    }
}
