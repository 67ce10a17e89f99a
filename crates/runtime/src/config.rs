//! Runtime configuration shared by the planner and the coordinator.

use goap_core::PlannerConfig;
use serde::{Deserialize, Serialize};

/// Coordinator behaviour switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Write an action's effects into the store once it reports success.
    /// Disable when the simulation syncs the store on its own.
    pub apply_confirmed_effects: bool,
    /// Re-check the live goal against a fresh snapshot before every dispatch.
    pub revalidate_before_dispatch: bool,
}

impl CoordinatorConfig {
    pub const DEFAULT_APPLY_CONFIRMED_EFFECTS: bool = true;
    pub const DEFAULT_REVALIDATE_BEFORE_DISPATCH: bool = true;
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            apply_confirmed_effects: Self::DEFAULT_APPLY_CONFIRMED_EFFECTS,
            revalidate_before_dispatch: Self::DEFAULT_REVALIDATE_BEFORE_DISPATCH,
        }
    }
}

/// Top-level configuration file layout.
///
/// ```toml
/// [planner]
/// max_plan_length = 8
/// max_expansions = 4096
/// fallback_to_lower_goals = true
///
/// [coordinator]
/// apply_confirmed_effects = true
/// revalidate_before_dispatch = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub planner: PlannerConfig,
    pub coordinator: CoordinatorConfig,
}
