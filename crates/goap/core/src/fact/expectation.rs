//! Required values and ranges for preconditions and goals.

use std::cmp::Ordering;
use std::fmt;

use super::{FactKind, FactValue};

/// A constraint on a single fact.
///
/// Ordered comparisons (`AtLeast`, `AtMost`, `Between`) only ever match
/// numbers and levels of the same kind as the bound. A value of a different
/// kind never satisfies an expectation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expectation {
    /// The fact must hold exactly this value.
    Equals(FactValue),

    /// The fact must be present with any other value.
    NotEquals(FactValue),

    /// The fact must be present and `>=` the bound.
    AtLeast(FactValue),

    /// The fact must be present and `<=` the bound.
    AtMost(FactValue),

    /// The fact must be present and within `[min, max]`.
    Between { min: FactValue, max: FactValue },

    /// The fact must be present, any value.
    Present,

    /// The fact must be absent.
    Absent,
}

impl Expectation {
    /// Returns whether `value` (or its absence) satisfies this expectation.
    pub fn is_met_by(&self, value: Option<&FactValue>) -> bool {
        match (self, value) {
            (Expectation::Absent, None) => true,
            (Expectation::Absent, Some(_)) => false,
            (_, None) => false,
            (Expectation::Present, Some(_)) => true,
            (Expectation::Equals(expected), Some(actual)) => expected == actual,
            (Expectation::NotEquals(expected), Some(actual)) => {
                expected.kind() == actual.kind() && expected != actual
            }
            (Expectation::AtLeast(bound), Some(actual)) => matches!(
                actual.compare(bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            (Expectation::AtMost(bound), Some(actual)) => matches!(
                actual.compare(bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            (Expectation::Between { min, max }, Some(actual)) => {
                matches!(
                    actual.compare(min),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    actual.compare(max),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }
        }
    }

    /// Value kind this expectation constrains, if it names one.
    pub fn kind(&self) -> Option<FactKind> {
        match self {
            Expectation::Equals(v)
            | Expectation::NotEquals(v)
            | Expectation::AtLeast(v)
            | Expectation::AtMost(v)
            | Expectation::Between { min: v, .. } => Some(v.kind()),
            Expectation::Present | Expectation::Absent => None,
        }
    }

    /// True when the bounds are internally consistent.
    ///
    /// Ordered expectations need an ordered kind, and `Between` needs both
    /// bounds of the same kind with `min <= max`.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Expectation::AtLeast(v) | Expectation::AtMost(v) => {
                matches!(v.kind(), FactKind::Number | FactKind::Level)
            }
            Expectation::Between { min, max } => matches!(
                min.compare(max),
                Some(Ordering::Less | Ordering::Equal)
            ),
            _ => true,
        }
    }
}

impl From<FactValue> for Expectation {
    fn from(value: FactValue) -> Self {
        Expectation::Equals(value)
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Equals(v) => write!(f, "== {v}"),
            Expectation::NotEquals(v) => write!(f, "!= {v}"),
            Expectation::AtLeast(v) => write!(f, ">= {v}"),
            Expectation::AtMost(v) => write!(f, "<= {v}"),
            Expectation::Between { min, max } => write!(f, "in [{min}, {max}]"),
            Expectation::Present => write!(f, "present"),
            Expectation::Absent => write!(f, "absent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Level;

    #[test]
    fn equals_matches_exact_value_only() {
        let exp = Expectation::Equals(FactValue::Level(Level::High));
        assert!(exp.is_met_by(Some(&FactValue::Level(Level::High))));
        assert!(!exp.is_met_by(Some(&FactValue::Level(Level::Medium))));
        assert!(!exp.is_met_by(None));
    }

    #[test]
    fn ranges_respect_level_order() {
        let exp = Expectation::AtLeast(FactValue::Level(Level::Medium));
        assert!(exp.is_met_by(Some(&FactValue::Level(Level::Medium))));
        assert!(exp.is_met_by(Some(&FactValue::Level(Level::High))));
        assert!(!exp.is_met_by(Some(&FactValue::Level(Level::Low))));

        let exp = Expectation::Between {
            min: FactValue::Number(10),
            max: FactValue::Number(20),
        };
        assert!(exp.is_met_by(Some(&FactValue::Number(10))));
        assert!(exp.is_met_by(Some(&FactValue::Number(20))));
        assert!(!exp.is_met_by(Some(&FactValue::Number(21))));
    }

    #[test]
    fn kind_mismatch_never_matches() {
        let exp = Expectation::AtMost(FactValue::Number(5));
        assert!(!exp.is_met_by(Some(&FactValue::Flag(false))));

        let exp = Expectation::NotEquals(FactValue::Number(5));
        assert!(!exp.is_met_by(Some(&FactValue::Flag(false))));
        assert!(exp.is_met_by(Some(&FactValue::Number(4))));
    }

    #[test]
    fn presence_checks() {
        assert!(Expectation::Present.is_met_by(Some(&FactValue::Flag(false))));
        assert!(!Expectation::Present.is_met_by(None));
        assert!(Expectation::Absent.is_met_by(None));
        assert!(!Expectation::Absent.is_met_by(Some(&FactValue::Number(0))));
    }

    #[test]
    fn malformed_bounds_are_detected() {
        assert!(!Expectation::AtLeast(FactValue::Flag(true)).is_well_formed());
        assert!(
            !Expectation::Between {
                min: FactValue::Number(9),
                max: FactValue::Number(1),
            }
            .is_well_formed()
        );
        assert!(Expectation::Equals(FactValue::Flag(true)).is_well_formed());
    }
}
