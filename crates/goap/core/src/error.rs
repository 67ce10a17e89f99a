//! Common error infrastructure for goap-core.
//!
//! Domain-specific errors (`StoreError`, `TransitionError`, `CatalogueError`)
//! live next to the types they guard. This module provides the shared
//! severity classification and the [`GoapError`] trait they all implement.
//!
//! Planning failures have no type here: an ineligible action or a
//! goal without a plan is a normal outcome, not an error.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller can retry or replan.
    ///
    /// Examples: illegal lifecycle transition on a stale instance
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: fact value of the wrong kind, duplicate action names
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: poisoned store lock
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all goap-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GoapError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for categorization in logs and for assertions in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(!ErrorSeverity::Recoverable.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
