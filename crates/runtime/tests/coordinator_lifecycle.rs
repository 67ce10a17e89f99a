mod common;

use common::*;
use goap_core::{ActionState, FactValue, GoapError, Level, Outcome, WorldView};
use goap_runtime::{
    CoordinatorConfig, Dispatch, ExecutionCoordinator, IdleReason, RuntimeError,
};

fn coordinator(log: &CommandLog, level: Level) -> ExecutionCoordinator {
    let planner = planner(housing_catalogue(log), store_with_population(level));
    let mut coordinator = ExecutionCoordinator::new(planner);
    coordinator.set_goals(vec![grow_population()]);
    coordinator
}

fn population_of(coordinator: &ExecutionCoordinator) -> Option<FactValue> {
    coordinator
        .planner()
        .store()
        .snapshot()
        .unwrap()
        .fact(&population())
        .copied()
}

#[test]
fn runs_plan_to_completion() {
    init_tracing();
    let log = CommandLog::default();
    let mut coordinator = coordinator(&log, Level::Low);
    let mut executed = Vec::new();

    loop {
        match coordinator.dispatch().unwrap() {
            Dispatch::Dispatched(ticket) => {
                let done = coordinator.report(ticket, Outcome::Successful).unwrap();
                assert_eq!(done.state(), ActionState::Successful);
                executed.push(done.name().to_string());
            }
            Dispatch::Idle(reason) => {
                assert!(matches!(reason, IdleReason::GoalsSatisfied));
                break;
            }
        }
    }

    assert_eq!(executed, vec!["build_housing", "immigrate"]);
    assert_eq!(CommandLog::count(&log.build_housing), 1);
    assert_eq!(CommandLog::count(&log.immigrate), 1);
    assert_eq!(population_of(&coordinator), Some(FactValue::Level(Level::High)));
    assert_eq!(coordinator.planner().cycle(), 2);
}

#[test]
fn failed_action_is_never_revived() {
    init_tracing();
    let log = CommandLog::default();
    let mut coordinator = coordinator(&log, Level::Low);

    let ticket = coordinator.dispatch().unwrap().ticket().unwrap();
    let failed = coordinator.report(ticket, Outcome::Failed).unwrap();
    assert_eq!(failed.state(), ActionState::Failed);
    assert_eq!(coordinator.remaining_steps(), 0);
    assert_eq!(population_of(&coordinator), Some(FactValue::Level(Level::Low)));

    let retry = coordinator.dispatch().unwrap().ticket().unwrap();
    assert_ne!(retry.instance(), failed.id());
    assert_eq!(retry.cycle(), 2);
    assert_eq!(coordinator.in_flight().unwrap().name(), "build_housing");

    let err = coordinator.report(ticket, Outcome::Successful).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownTicket { .. }));
    assert!(err.severity().is_recoverable());
    assert_eq!(coordinator.in_flight().unwrap().state(), ActionState::Running);
}

#[test]
fn replans_from_post_failure_world() {
    let log = CommandLog::default();
    let mut coordinator = coordinator(&log, Level::Low);

    let ticket = coordinator.dispatch().unwrap().ticket().unwrap();
    // the simulation finished the housing on its own before reporting failure
    coordinator
        .planner()
        .store()
        .set(population(), FactValue::Level(Level::Medium))
        .unwrap();
    coordinator.report(ticket, Outcome::Failed).unwrap();

    coordinator.dispatch().unwrap();
    assert_eq!(coordinator.in_flight().unwrap().name(), "immigrate");
    assert_eq!(coordinator.remaining_steps(), 0);
}

#[test]
fn satisfied_goal_cancels_remaining_steps() {
    let log = CommandLog::default();
    let mut coordinator = coordinator(&log, Level::Low);

    let ticket = coordinator.dispatch().unwrap().ticket().unwrap();
    coordinator.report(ticket, Outcome::Successful).unwrap();
    assert_eq!(coordinator.remaining_steps(), 1);

    coordinator
        .planner()
        .store()
        .set(population(), FactValue::Level(Level::High))
        .unwrap();

    assert!(matches!(
        coordinator.dispatch().unwrap(),
        Dispatch::Idle(IdleReason::GoalsSatisfied)
    ));
    assert_eq!(CommandLog::count(&log.immigrate), 0);
}

#[test]
fn without_revalidation_plan_runs_out() {
    let log = CommandLog::default();
    let config = CoordinatorConfig {
        revalidate_before_dispatch: false,
        ..CoordinatorConfig::default()
    };
    let planner = planner(housing_catalogue(&log), store_with_population(Level::Low));
    let mut coordinator = ExecutionCoordinator::with_config(planner, config);
    coordinator.set_goals(vec![grow_population()]);

    let ticket = coordinator.dispatch().unwrap().ticket().unwrap();
    coordinator.report(ticket, Outcome::Successful).unwrap();
    coordinator
        .planner()
        .store()
        .set(population(), FactValue::Level(Level::High))
        .unwrap();

    let ticket = coordinator.dispatch().unwrap().ticket().unwrap();
    coordinator.report(ticket, Outcome::Successful).unwrap();
    assert_eq!(CommandLog::count(&log.immigrate), 1);
}

#[test]
fn effects_wait_for_confirmation() {
    let log = CommandLog::default();
    let config = CoordinatorConfig {
        apply_confirmed_effects: false,
        ..CoordinatorConfig::default()
    };
    let planner = planner(housing_catalogue(&log), store_with_population(Level::Low));
    let mut coordinator = ExecutionCoordinator::with_config(planner, config);
    coordinator.set_goals(vec![grow_population()]);

    let ticket = coordinator.dispatch().unwrap().ticket().unwrap();
    assert_eq!(population_of(&coordinator), Some(FactValue::Level(Level::Low)));
    coordinator.report(ticket, Outcome::Successful).unwrap();
    assert_eq!(population_of(&coordinator), Some(FactValue::Level(Level::Low)));
}

#[test]
fn unplannable_goal_leaves_coordinator_idle() {
    let log = CommandLog::default();
    let mut coordinator = coordinator(&log, Level::Low);
    coordinator.set_goals(vec![
        goap_core::Goal::builder("depopulate")
            .expect(population(), Level::None)
            .build(),
    ]);

    match coordinator.dispatch().unwrap() {
        Dispatch::Idle(IdleReason::NoPlan(failures)) => {
            assert_eq!(failures[0].goal.name(), "depopulate");
        }
        other => panic!("expected idle, got {other:?}"),
    }
    assert!(coordinator.in_flight().is_none());
}
