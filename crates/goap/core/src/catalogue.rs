//! The ordered action catalogue.
//!
//! Declaration order matters: it is the planner's tie-break when two plans
//! cost the same. Validation runs once at configuration time; the planner
//! assumes a validated catalogue afterwards.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::action::ActionDef;
use crate::error::{ErrorSeverity, GoapError};
use crate::fact::{FactKind, PropertyId};

/// Configuration-time catalogue problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    #[error("action `{name}` is declared more than once")]
    DuplicateName { name: String },

    #[error("action `{name}` has no effects and can never make progress")]
    NoEffects { name: String },

    #[error("action `{name}` sets {id} to a {found} value, key expects {expected}")]
    EffectKind {
        name: String,
        id: PropertyId,
        expected: FactKind,
        found: FactKind,
    },

    #[error("action `{name}` constrains {id} with a {found} bound, key expects {expected}")]
    PreconditionKind {
        name: String,
        id: PropertyId,
        expected: FactKind,
        found: FactKind,
    },

    #[error("action `{name}` has a malformed range on {id}")]
    MalformedRange { name: String, id: PropertyId },
}

impl GoapError for CatalogueError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogueError::DuplicateName { .. } => "catalogue_duplicate_name",
            CatalogueError::NoEffects { .. } => "catalogue_no_effects",
            CatalogueError::EffectKind { .. } => "catalogue_effect_kind",
            CatalogueError::PreconditionKind { .. } => "catalogue_precondition_kind",
            CatalogueError::MalformedRange { .. } => "catalogue_malformed_range",
        }
    }
}

/// Read-only (per cycle) list of actions in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalogue {
    actions: Vec<Arc<ActionDef>>,
}

impl ActionCatalogue {
    pub fn new(actions: impl IntoIterator<Item = ActionDef>) -> Self {
        Self {
            actions: actions.into_iter().map(Arc::new).collect(),
        }
    }

    /// Registers one more action at the end of the declaration order.
    pub fn push(&mut self, action: ActionDef) {
        self.actions.push(Arc::new(action));
    }

    pub fn get(&self, index: usize) -> Option<&Arc<ActionDef>> {
        self.actions.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Arc<ActionDef>> {
        self.actions.iter().find(|a| a.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ActionDef>> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Checks the catalogue for problems no planning cycle can recover from.
    pub fn validate(&self) -> Result<(), CatalogueError> {
        let mut seen = HashSet::new();
        for action in &self.actions {
            let name = action.name();
            if !seen.insert(name) {
                return Err(CatalogueError::DuplicateName { name: name.into() });
            }
            if action.effects().is_empty() {
                return Err(CatalogueError::NoEffects { name: name.into() });
            }
            for (id, value) in action.effects() {
                if value.kind() != id.kind() {
                    return Err(CatalogueError::EffectKind {
                        name: name.into(),
                        id: *id,
                        expected: id.kind(),
                        found: value.kind(),
                    });
                }
            }
            for (id, expectation) in action.preconditions() {
                if let Some(found) = expectation.kind()
                    && found != id.kind()
                {
                    return Err(CatalogueError::PreconditionKind {
                        name: name.into(),
                        id: *id,
                        expected: id.kind(),
                        found,
                    });
                }
                if !expectation.is_well_formed() {
                    return Err(CatalogueError::MalformedRange {
                        name: name.into(),
                        id: *id,
                    });
                }
            }
        }
        Ok(())
    }
}

impl FromIterator<ActionDef> for ActionCatalogue {
    fn from_iter<T: IntoIterator<Item = ActionDef>>(iter: T) -> Self {
        Self::new(iter)
    }
}
