/// Planner tunables: search bounds and goal fallback policy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Maximum number of actions in a single plan (search depth bound).
    /// Guards against contradictory or cyclic effect graphs.
    pub max_plan_length: usize,

    /// Maximum number of search nodes expanded per goal before giving up.
    pub max_expansions: usize,

    /// When the highest-ranked unsatisfied goal has no plan, try the next one
    /// instead of returning an empty plan immediately.
    pub fallback_to_lower_goals: bool,
}

impl PlannerConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_PLAN_LENGTH: usize = 8;
    pub const DEFAULT_MAX_EXPANSIONS: usize = 4096;
    pub const DEFAULT_FALLBACK_TO_LOWER_GOALS: bool = true;

    pub fn new() -> Self {
        Self {
            max_plan_length: Self::DEFAULT_MAX_PLAN_LENGTH,
            max_expansions: Self::DEFAULT_MAX_EXPANSIONS,
            fallback_to_lower_goals: Self::DEFAULT_FALLBACK_TO_LOWER_GOALS,
        }
    }

    pub fn with_max_plan_length(mut self, max_plan_length: usize) -> Self {
        self.max_plan_length = max_plan_length;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_fallback(mut self, fallback_to_lower_goals: bool) -> Self {
        self.fallback_to_lower_goals = fallback_to_lower_goals;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}
