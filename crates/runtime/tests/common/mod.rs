//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use goap_core::{
    ActionCatalogue, ActionDef, Cost, EntityRef, FactKey, FactValue, Goal, Level, PlannerConfig,
    PropertyId, WorldStore,
};
use goap_runtime::Planner;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const PLANET_A: EntityRef = EntityRef::planet(1);

pub fn population() -> PropertyId {
    PropertyId::new(FactKey::PlanetPopulation, PLANET_A)
}

pub fn development() -> PropertyId {
    PropertyId::new(FactKey::PlanetDevelopment, PLANET_A)
}

pub fn treasury() -> PropertyId {
    PropertyId::global(FactKey::EmpireTreasury)
}

pub fn grow_population() -> Goal {
    Goal::builder("grow_population")
        .expect(population(), Level::High)
        .build()
}

pub fn store_with_population(level: Level) -> Arc<WorldStore> {
    Arc::new(
        WorldStore::with_facts([
            (population(), FactValue::Level(level)),
            (treasury(), FactValue::Number(20)),
        ])
        .expect("fixture facts match their keys"),
    )
}

/// Counts how often each action's command runs.
#[derive(Clone, Default)]
pub struct CommandLog {
    pub build_housing: Arc<AtomicUsize>,
    pub immigrate: Arc<AtomicUsize>,
}

impl CommandLog {
    pub fn count(counter: &Arc<AtomicUsize>) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// BuildHousing (sets population medium, cost 2) and Immigrate (medium to
/// high, cost 1).
pub fn housing_catalogue(log: &CommandLog) -> ActionCatalogue {
    let housing = Arc::clone(&log.build_housing);
    let immigrants = Arc::clone(&log.immigrate);
    ActionCatalogue::new([
        ActionDef::builder("build_housing")
            .effect(population(), Level::Medium)
            .cost(Cost(2))
            .command(move || {
                housing.fetch_add(1, Ordering::SeqCst);
            })
            .build(),
        ActionDef::builder("immigrate")
            .precondition(population(), Level::Medium)
            .effect(population(), Level::High)
            .cost(Cost(1))
            .command(move || {
                immigrants.fetch_add(1, Ordering::SeqCst);
            })
            .build(),
    ])
}

pub fn planner(catalogue: ActionCatalogue, store: Arc<WorldStore>) -> Planner {
    planner_with(catalogue, store, PlannerConfig::default())
}

pub fn planner_with(
    catalogue: ActionCatalogue,
    store: Arc<WorldStore>,
    config: PlannerConfig,
) -> Planner {
    Planner::builder()
        .catalogue(catalogue)
        .store(store)
        .config(config)
        .build()
        .expect("fixture catalogue is valid")
}
