mod common;

use std::io::Write;

use common::*;
use goap_core::Level;
use goap_runtime::{ConfigLoader, Dispatch, ExecutionCoordinator, IdleReason, NoPlanReason};

#[test]
fn loads_planner_and_coordinator_tables() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[planner]
max_plan_length = 1
fallback_to_lower_goals = false

[coordinator]
revalidate_before_dispatch = false
"#
    )
    .unwrap();

    let config = ConfigLoader::load(file.path()).unwrap();

    assert_eq!(config.planner.max_plan_length, 1);
    assert_eq!(config.planner.max_expansions, 4096);
    assert!(!config.planner.fallback_to_lower_goals);
    assert!(config.coordinator.apply_confirmed_effects);
    assert!(!config.coordinator.revalidate_before_dispatch);
}

#[test]
fn loaded_bounds_reach_the_planner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goap.toml");
    std::fs::write(&path, "[planner]\nmax_plan_length = 1\n").unwrap();

    let config = ConfigLoader::load(&path).unwrap();
    let planner = planner_with(
        housing_catalogue(&CommandLog::default()),
        store_with_population(Level::Low),
        config.planner,
    );
    let mut coordinator = ExecutionCoordinator::with_config(planner, config.coordinator);
    coordinator.set_goals(vec![grow_population()]);

    match coordinator.dispatch().unwrap() {
        Dispatch::Idle(IdleReason::NoPlan(failures)) => {
            assert_eq!(failures[0].reason, NoPlanReason::DepthBound);
        }
        other => panic!("expected the depth bound to apply, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}
