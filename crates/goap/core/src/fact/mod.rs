//! World facts: the typed (key, subject, value) triples the planner reasons about.
//!
//! A fact is addressed by a [`PropertyId`] (a [`FactKey`] plus an optional
//! [`EntityRef`] subject) and carries a [`FactValue`]. The value kind is
//! implied by the key; [`FactKey::kind`] is the single place that mapping is
//! declared, and the store rejects values of the wrong kind.

mod expectation;

pub use expectation::Expectation;

use std::cmp::Ordering;
use std::fmt;

/// Identifier of a planet in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanetId(pub u32);

/// Identifier of a fleet in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetId(pub u32);

/// Identifier of an empire (including the one the planner acts for).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmpireId(pub u32);

/// Opaque reference to a simulation entity.
///
/// Used both as the subject of a fact and as a fact value
/// (e.g. the owner of a planet, the location of a fleet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityRef {
    Planet(PlanetId),
    Fleet(FleetId),
    Empire(EmpireId),
}

impl EntityRef {
    pub const fn planet(id: u32) -> Self {
        Self::Planet(PlanetId(id))
    }

    pub const fn fleet(id: u32) -> Self {
        Self::Fleet(FleetId(id))
    }

    pub const fn empire(id: u32) -> Self {
        Self::Empire(EmpireId(id))
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Planet(PlanetId(id)) => write!(f, "planet#{id}"),
            EntityRef::Fleet(FleetId(id)) => write!(f, "fleet#{id}"),
            EntityRef::Empire(EmpireId(id)) => write!(f, "empire#{id}"),
        }
    }
}

/// Ordered enumerated state shared by level-valued facts.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Level {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// The kind of value a fact carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FactKind {
    Number,
    Flag,
    Level,
    Entity,
}

/// Closed set of fact identifiers.
///
/// Adding a key requires recompilation; the value kind of each key is fixed
/// by [`FactKey::kind`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FactKey {
    // ========================================================================
    // Planet facts
    // ========================================================================
    PlanetPopulation,
    PlanetDevelopment,
    PlanetDefense,
    PlanetColonized,
    PlanetOwner,
    PlanetUnrest,

    // ========================================================================
    // Fleet facts
    // ========================================================================
    FleetStrength,
    FleetLocation,
    FleetSupplied,

    // ========================================================================
    // Empire facts
    // ========================================================================
    EmpireTreasury,
    EmpireResearch,
    EmpireAtWar,
    EmpireCapital,
}

impl FactKey {
    /// Returns the value kind every fact with this key must carry.
    pub const fn kind(self) -> FactKind {
        match self {
            FactKey::PlanetPopulation | FactKey::PlanetDevelopment | FactKey::PlanetDefense => {
                FactKind::Level
            }
            FactKey::PlanetColonized | FactKey::FleetSupplied | FactKey::EmpireAtWar => {
                FactKind::Flag
            }
            FactKey::PlanetOwner | FactKey::FleetLocation | FactKey::EmpireCapital => {
                FactKind::Entity
            }
            FactKey::PlanetUnrest
            | FactKey::FleetStrength
            | FactKey::EmpireTreasury
            | FactKey::EmpireResearch => FactKind::Number,
        }
    }
}

/// Address of a single fact: key plus subject.
///
/// A `None` subject denotes a global fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyId {
    pub key: FactKey,
    pub subject: Option<EntityRef>,
}

impl PropertyId {
    pub const fn new(key: FactKey, subject: EntityRef) -> Self {
        Self {
            key,
            subject: Some(subject),
        }
    }

    pub const fn global(key: FactKey) -> Self {
        Self { key, subject: None }
    }

    /// Value kind implied by the key.
    pub const fn kind(&self) -> FactKind {
        self.key.kind()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "{}({})", self.key, subject),
            None => write!(f, "{}", self.key),
        }
    }
}

/// Tagged fact value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FactValue {
    Number(i64),
    Flag(bool),
    Level(Level),
    Entity(EntityRef),
}

impl FactValue {
    pub const fn kind(&self) -> FactKind {
        match self {
            FactValue::Number(_) => FactKind::Number,
            FactValue::Flag(_) => FactKind::Flag,
            FactValue::Level(_) => FactKind::Level,
            FactValue::Entity(_) => FactKind::Entity,
        }
    }

    pub const fn as_number(&self) -> Option<i64> {
        match self {
            FactValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            FactValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_level(&self) -> Option<Level> {
        match self {
            FactValue::Level(l) => Some(*l),
            _ => None,
        }
    }

    pub const fn as_entity(&self) -> Option<EntityRef> {
        match self {
            FactValue::Entity(e) => Some(*e),
            _ => None,
        }
    }

    /// Orders two values of the same ordered kind.
    ///
    /// Only numbers and levels have a meaningful order. Any other pairing,
    /// including values of different kinds, returns `None`.
    pub fn compare(&self, other: &FactValue) -> Option<Ordering> {
        match (self, other) {
            (FactValue::Number(a), FactValue::Number(b)) => Some(a.cmp(b)),
            (FactValue::Level(a), FactValue::Level(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Number(value)
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Flag(value)
    }
}

impl From<Level> for FactValue {
    fn from(value: Level) -> Self {
        FactValue::Level(value)
    }
}

impl From<EntityRef> for FactValue {
    fn from(value: EntityRef) -> Self {
        FactValue::Entity(value)
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Number(n) => write!(f, "{n}"),
            FactValue::Flag(b) => write!(f, "{b}"),
            FactValue::Level(l) => write!(f, "{l}"),
            FactValue::Entity(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn every_key_declares_a_kind() {
        for key in FactKey::iter() {
            // kind() is total; this also pins the snake_case names round-trip
            let _ = key.kind();
            assert_eq!(FactKey::from_str(key.as_ref()).unwrap(), key);
        }
    }

    #[test]
    fn key_names_are_snake_case() {
        assert_eq!(FactKey::PlanetPopulation.to_string(), "planet_population");
        assert_eq!(
            FactKey::from_str("FLEET_STRENGTH").unwrap(),
            FactKey::FleetStrength
        );
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Level::Low < Level::Medium);
        assert!(Level::Medium < Level::High);
        assert_eq!(
            FactValue::Level(Level::High).compare(&FactValue::Level(Level::Low)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn mixed_kinds_do_not_compare() {
        assert_eq!(FactValue::Number(3).compare(&FactValue::Flag(true)), None);
        assert_eq!(FactValue::Flag(false).compare(&FactValue::Flag(true)), None);
    }

    #[test]
    fn typed_accessors_reject_other_kinds() {
        let value = FactValue::from(Level::Medium);
        assert_eq!(value.kind(), FactKind::Level);
        assert_eq!(value.as_level(), Some(Level::Medium));
        assert_eq!(value.as_number(), None);
        assert_eq!(value.as_entity(), None);
    }

    #[test]
    fn property_display_includes_subject() {
        let id = PropertyId::new(FactKey::PlanetPopulation, EntityRef::planet(4));
        assert_eq!(id.to_string(), "planet_population(planet#4)");
        assert_eq!(
            PropertyId::global(FactKey::EmpireAtWar).to_string(),
            "empire_at_war"
        );
    }
}
