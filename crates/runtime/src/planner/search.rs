//! Cost-directed plan search over hypothetical overlays.
//!
//! The search runs in two passes:
//!
//! 1. **Regression relevance**: walk backwards from the goal requirements.
//!    An action is relevant if one of its effects satisfies a needed
//!    requirement; its preconditions then become needed too. Iterate to a
//!    fixpoint. Irrelevant actions are never expanded.
//! 2. **Uniform-cost search**: expand overlays in order of
//!    `(total cost, plan length, catalogue indices)`. The first overlay popped
//!    that satisfies the goal is the cheapest plan within the depth bound,
//!    and ties resolve toward actions declared earlier.
//!
//! Each expansion checks preconditions against the current overlay, so an
//! action that is ineligible in the real snapshot can still follow an action
//! that makes it eligible.
//!
//! The closed set remembers the shallowest depth each state was expanded at.
//! A costlier path that reaches a known state with more steps to spare is
//! expanded again, so a cheap route that runs out of depth never hides a
//! plan that fits the bound.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use goap_core::{ActionCatalogue, Cost, FactMap, Goal, Overlay, PlannerConfig, Snapshot};
use tracing::trace;

use super::NoPlanReason;

/// Inputs for one goal's search.
pub(crate) struct SearchInput<'a> {
    pub goal: &'a Goal,
    pub snapshot: &'a Snapshot,
    pub catalogue: &'a ActionCatalogue,
    /// Cycle cost per catalogue index; `None` marks an ineligible action.
    pub costs: &'a [Option<Cost>],
    pub config: &'a PlannerConfig,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SearchResult {
    Found {
        steps: Vec<usize>,
        total_cost: u64,
        expansions: usize,
    },
    NotFound {
        reason: NoPlanReason,
        expansions: usize,
    },
}

/// Marks the catalogue entries that can contribute to `goal`.
pub(crate) fn relevant_actions(goal: &Goal, catalogue: &ActionCatalogue) -> Vec<bool> {
    let mut needed: Vec<_> = goal.requirements().map(|(id, exp)| (*id, *exp)).collect();
    let mut relevant = vec![false; catalogue.len()];
    let mut cursor = 0;

    while let Some((id, expectation)) = needed.get(cursor).copied() {
        cursor += 1;
        for (index, action) in catalogue.iter().enumerate() {
            if relevant[index] || !action.achieves(&id, &expectation) {
                continue;
            }
            relevant[index] = true;
            needed.extend(action.preconditions().iter().map(|(id, exp)| (*id, *exp)));
        }
    }

    relevant
}

#[derive(Debug, PartialEq, Eq)]
struct Frontier {
    cost: u64,
    steps: Vec<usize>,
    node: usize,
}

// BinaryHeap is a max-heap; invert so the cheapest, shortest, earliest-declared
// path pops first.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.steps.len().cmp(&self.steps.len()))
            .then_with(|| other.steps.cmp(&self.steps))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Searches for the cheapest action sequence that satisfies the goal.
pub(crate) fn search(input: &SearchInput<'_>) -> SearchResult {
    let SearchInput {
        goal,
        snapshot,
        catalogue,
        costs,
        config,
    } = *input;

    let relevant = relevant_actions(goal, catalogue);
    if !relevant.iter().any(|r| *r) {
        return SearchResult::NotFound {
            reason: NoPlanReason::NoRelevantActions,
            expansions: 0,
        };
    }

    let mut overlays: Vec<Option<Overlay>> = vec![Some(Overlay::new(snapshot.clone()))];
    let mut heap = BinaryHeap::new();
    // state -> shallowest depth it was expanded at
    let mut closed: HashMap<FactMap, usize> = HashMap::new();
    let mut expansions = 0usize;
    let mut depth_pruned = false;

    heap.push(Frontier {
        cost: 0,
        steps: Vec::new(),
        node: 0,
    });

    while let Some(Frontier { cost, steps, node }) = heap.pop() {
        let Some(overlay) = overlays.get_mut(node).and_then(Option::take) else {
            continue;
        };
        let depth = steps.len();
        if expanded_within(&closed, &overlay, depth) {
            continue;
        }

        if goal.is_satisfied(&overlay) {
            return SearchResult::Found {
                steps,
                total_cost: cost,
                expansions,
            };
        }

        if depth >= config.max_plan_length {
            depth_pruned = true;
            continue;
        }
        closed.insert(overlay.changes().clone(), depth);

        if expansions >= config.max_expansions {
            return SearchResult::NotFound {
                reason: NoPlanReason::ExpansionBound,
                expansions,
            };
        }
        expansions += 1;

        for (index, action) in catalogue.iter().enumerate() {
            if !relevant[index] {
                continue;
            }
            let Some(step_cost) = costs.get(index).copied().flatten() else {
                continue;
            };
            if !action.preconditions_hold(&overlay) {
                continue;
            }

            let mut next = overlay.clone();
            if !action.apply_effects(&mut next) || expanded_within(&closed, &next, depth + 1) {
                continue;
            }

            let mut next_steps = steps.clone();
            next_steps.push(index);
            let next_cost = cost.saturating_add(u64::from(step_cost.value()));

            trace!(
                goal = goal.name(),
                action = action.name(),
                depth = next_steps.len(),
                cost = next_cost,
                "frontier push"
            );

            overlays.push(Some(next));
            heap.push(Frontier {
                cost: next_cost,
                steps: next_steps,
                node: overlays.len() - 1,
            });
        }
    }

    let reason = if depth_pruned {
        NoPlanReason::DepthBound
    } else {
        NoPlanReason::Exhausted
    };
    SearchResult::NotFound { reason, expansions }
}

/// True when `overlay` was already expanded with at least as many steps left.
fn expanded_within(closed: &HashMap<FactMap, usize>, overlay: &Overlay, depth: usize) -> bool {
    closed
        .get(overlay.changes())
        .is_some_and(|&seen| seen <= depth)
}
