//! Per-cycle cost evaluation.
//!
//! Every action in the catalogue gets a fresh instance each cycle, and every
//! instance is evaluated once against the same immutable snapshot. Cost
//! functions only read, so the evaluations are independent and can run on the
//! blocking pool.

use goap_core::{ActionInstance, ActionState, Evaluation, IneligibleReason, Snapshot};
use tokio::task::JoinSet;

use crate::error::{Result, RuntimeError};

/// Evaluates `instances` one after another on the calling thread.
pub fn evaluate_catalogue(
    instances: &mut [ActionInstance],
    snapshot: &Snapshot,
) -> Result<Vec<Evaluation>> {
    ensure_ready(instances)?;
    instances
        .iter_mut()
        .map(|instance| Ok(instance.evaluate_cost(snapshot)?))
        .collect()
}

/// Evaluates `instances` concurrently on tokio's blocking pool.
///
/// Results come back in catalogue order regardless of completion order, so
/// the search that follows sees exactly what [`evaluate_catalogue`] would
/// have produced.
pub async fn evaluate_catalogue_parallel(
    instances: &mut [ActionInstance],
    snapshot: &Snapshot,
) -> Result<Vec<Evaluation>> {
    ensure_ready(instances)?;

    let mut tasks = JoinSet::new();
    for (index, instance) in instances.iter_mut().enumerate() {
        instance.begin_evaluation()?;
        let def = instance.def().clone();
        let snapshot = snapshot.clone();
        tasks.spawn_blocking(move || (index, def.cost_evaluation(&snapshot)));
    }

    let mut results = vec![None; instances.len()];
    let mut join_error = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, evaluation)) => results[index] = Some(evaluation),
            Err(err) => {
                join_error.get_or_insert(err);
            }
        }
    }

    // Every instance leaves Evaluating, even when a task panicked.
    let evaluations = instances
        .iter_mut()
        .zip(results)
        .map(|(instance, evaluation)| {
            let evaluation = evaluation.unwrap_or(Evaluation::Ineligible(IneligibleReason::Declined));
            instance.finish_evaluation(evaluation)?;
            Ok(evaluation)
        })
        .collect::<Result<Vec<_>>>()?;

    match join_error {
        Some(err) => Err(RuntimeError::EvaluationJoin(err)),
        None => Ok(evaluations),
    }
}

/// Fails before any instance moves if one of them cannot start evaluating.
fn ensure_ready(instances: &[ActionInstance]) -> Result<()> {
    for instance in instances {
        instance.state().transition(ActionState::Evaluating)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use goap_core::{
        ActionDef, Cost, FactKey, FactMap, FactValue, InstanceId, PropertyId, TransitionError,
    };

    fn treasury() -> PropertyId {
        PropertyId::global(FactKey::EmpireTreasury)
    }

    fn snapshot() -> Snapshot {
        let mut facts = FactMap::new();
        facts.insert(treasury(), FactValue::Number(30));
        Snapshot::from_facts(facts)
    }

    fn instances(calls: &Arc<AtomicUsize>) -> Vec<ActionInstance> {
        let counted = Arc::clone(calls);
        let defs = [
            ActionDef::builder("levy")
                .effect(treasury(), FactValue::Number(60))
                .cost_fn(move |view| {
                    counted.fetch_add(1, Ordering::SeqCst);
                    let funds = view.fact(&treasury())?.as_number()?;
                    u32::try_from(funds / 10).ok().map(Cost)
                })
                .build(),
            ActionDef::builder("embargo")
                .effect(treasury(), FactValue::Number(0))
                .cost_fn(|_| None)
                .build(),
            ActionDef::builder("trade")
                .effect(treasury(), FactValue::Number(45))
                .cost(Cost(5))
                .build(),
        ];
        defs.into_iter()
            .enumerate()
            .map(|(i, def)| ActionInstance::new(InstanceId(i as u64), 1, Arc::new(def)))
            .collect()
    }

    fn expected() -> Vec<Evaluation> {
        vec![
            Evaluation::Eligible(Cost(3)),
            Evaluation::Ineligible(IneligibleReason::Declined),
            Evaluation::Eligible(Cost(5)),
        ]
    }

    #[test]
    fn sequential_evaluation_runs_each_cost_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut instances = instances(&calls);

        let evaluations = evaluate_catalogue(&mut instances, &snapshot()).unwrap();

        assert_eq!(evaluations, expected());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(instances.iter().all(|i| i.state() == ActionState::Ready));
    }

    #[tokio::test]
    async fn parallel_evaluation_preserves_catalogue_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut instances = instances(&calls);

        let evaluations = evaluate_catalogue_parallel(&mut instances, &snapshot())
            .await
            .unwrap();

        assert_eq!(evaluations, expected());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(instances[2].cost(), Some(Cost(5)));
    }

    #[test]
    fn running_instance_cannot_be_evaluated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut instances = instances(&calls);
        instances[2].start().unwrap();

        assert!(matches!(
            evaluate_catalogue(&mut instances, &snapshot()),
            Err(RuntimeError::Transition(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(instances[0].state(), ActionState::Ready);
        assert_eq!(instances[0].cost(), None);
    }

    #[tokio::test]
    async fn parallel_rejection_leaves_no_instance_evaluating() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut instances = instances(&calls);
        instances[1].start().unwrap();

        let err = evaluate_catalogue_parallel(&mut instances, &snapshot())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Transition(TransitionError {
                from: ActionState::Running,
                to: ActionState::Evaluating,
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(instances[0].state(), ActionState::Ready);
        assert_eq!(instances[1].state(), ActionState::Running);
        assert_eq!(instances[2].state(), ActionState::Ready);
    }

    #[tokio::test]
    async fn panicking_cost_fn_still_finishes_every_evaluation() {
        let mut instances = vec![
            ActionInstance::new(
                InstanceId(0),
                1,
                Arc::new(ActionDef::builder("riot").cost_fn(|_| panic!("bad cost")).build()),
            ),
            ActionInstance::new(
                InstanceId(1),
                1,
                Arc::new(ActionDef::builder("trade").cost(Cost(5)).build()),
            ),
        ];

        let err = evaluate_catalogue_parallel(&mut instances, &snapshot())
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::EvaluationJoin(_)));
        assert!(instances.iter().all(|i| i.state() == ActionState::Ready));
        assert_eq!(instances[0].cost(), None);
        assert_eq!(instances[1].cost(), Some(Cost(5)));
    }
}
