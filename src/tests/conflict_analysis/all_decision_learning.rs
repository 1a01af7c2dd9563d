#![cfg(test)]

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::IntervalSet;
use crate::constraints;
use crate::constraints::Constraint;
use crate::engine::conflict_analysis::ConflictResolutionStrategy;
use crate::engine::cp::propagation::is_valid_explanation;
use crate::engine::variables::VariableId;
use crate::engine::Checkpoint;
use crate::engine::EngineOptions;
use crate::engine::EngineState;
use crate::engine::PropagationEngine;

/// Two clauses `b1 = 1 \/ b2 = 1 \/ x <= 2` and `b1 = 1 \/ b2 = 1 \/ x >= 4`, which conflict once
/// both booleans are decided to be 0.
fn opposing_clauses(engine: &mut PropagationEngine) -> (VariableId, VariableId, VariableId) {
    let b1 = engine.new_variable(0, 1, Some("b1".to_owned()));
    let b2 = engine.new_variable(0, 1, Some("b2".to_owned()));
    let x = engine.new_variable(0, 5, Some("x".to_owned()));

    constraints::clause(vec![
        (b1, IntervalSet::singleton(1)),
        (b2, IntervalSet::singleton(1)),
        (x, IntervalSet::from_range(0, 2)),
    ])
    .post(engine)
    .expect("the clause is well-formed");
    constraints::clause(vec![
        (b1, IntervalSet::singleton(1)),
        (b2, IntervalSet::singleton(1)),
        (x, IntervalSet::from_range(4, 5)),
    ])
    .post(engine)
    .expect("the clause is well-formed");
    engine.propagate().expect("no conflict at the root");

    (b1, b2, x)
}

#[test]
fn learned_clause_contains_only_the_decisions() {
    let mut engine = PropagationEngine::default();
    let (b1, b2, x) = opposing_clauses(&mut engine);

    let _ = engine.checkpoint();
    let _ = engine.instantiate(b1, 0).expect("non-empty domain");
    engine.propagate().expect("no conflict");
    assert!(!engine.is_fixed(b2));
    assert_eq!((0, 5), (engine.lower_bound(x), engine.upper_bound(x)));

    let _ = engine.checkpoint();
    let _ = engine.instantiate(b2, 0).expect("non-empty domain");
    assert!(engine.propagate().is_err());
    assert_eq!(EngineState::Failed, engine.state());

    let learned_clause = engine.analyse_conflict().expect("the failure was propagated");
    assert_eq!(
        &[
            (b1, IntervalSet::singleton(1)),
            (b2, IntervalSet::singleton(1))
        ],
        learned_clause.literals()
    );
}

#[test]
fn learned_clause_is_posted_after_backtracking() {
    let mut engine = PropagationEngine::default();
    let (b1, b2, _) = opposing_clauses(&mut engine);

    let _ = engine.checkpoint();
    let _ = engine.instantiate(b1, 0).expect("non-empty domain");
    engine.propagate().expect("no conflict");

    let checkpoint = engine.checkpoint();
    let _ = engine.instantiate(b2, 0).expect("non-empty domain");
    assert!(engine.propagate().is_err());

    let learned_clause = engine
        .handle_conflict(checkpoint)
        .expect("the clause can be posted")
        .expect("a clause is learned");
    assert_eq!(2, learned_clause.len());
    assert_eq!(3, engine.num_propagators());
    assert_eq!(EngineState::Idle, engine.state());

    engine.propagate().expect("no conflict");
    assert!(engine.is_fixed(b2));
    assert_eq!(1, engine.lower_bound(b2));
}

#[test]
fn learned_clause_survives_backtracking_to_the_root() {
    let mut engine = PropagationEngine::default();
    let (b1, b2, _) = opposing_clauses(&mut engine);

    let first = engine.checkpoint();
    let _ = engine.instantiate(b1, 0).expect("non-empty domain");
    engine.propagate().expect("no conflict");

    let second = engine.checkpoint();
    let _ = engine.instantiate(b2, 0).expect("non-empty domain");
    assert!(engine.propagate().is_err());
    let _ = engine.handle_conflict(second).expect("the clause can be posted");
    engine.propagate().expect("no conflict");

    engine.restore(first);
    engine.propagate().expect("no conflict");
    assert!(!engine.is_fixed(b1));
    assert!(!engine.is_fixed(b2));

    let _ = engine.checkpoint();
    let _ = engine.instantiate(b2, 0).expect("non-empty domain");
    engine.propagate().expect("no conflict");
    assert_eq!(1, engine.lower_bound(b1));
}

#[test]
fn view_literals_are_learned_on_their_base() {
    let mut engine = PropagationEngine::default();
    let x = engine.new_variable(0, 5, Some("x".to_owned()));
    let y = engine.new_variable(0, 1, Some("y".to_owned()));
    let z = engine.new_variable(0, 1, Some("z".to_owned()));
    let is_three = engine.equal_view(x, 3);

    constraints::clause(vec![
        (is_three, IntervalSet::singleton(1)),
        (y, IntervalSet::singleton(1)),
    ])
    .post(&mut engine)
    .expect("the clause is well-formed");
    constraints::clause(vec![
        (y, IntervalSet::singleton(0)),
        (z, IntervalSet::singleton(1)),
    ])
    .post(&mut engine)
    .expect("the clause is well-formed");
    constraints::clause(vec![
        (y, IntervalSet::singleton(0)),
        (z, IntervalSet::singleton(0)),
    ])
    .post(&mut engine)
    .expect("the clause is well-formed");
    engine.propagate().expect("no conflict at the root");

    let checkpoint = engine.checkpoint();
    let _ = engine.instantiate(x, 2).expect("non-empty domain");
    assert!(engine.propagate().is_err());

    let learned_clause = engine
        .handle_conflict(checkpoint)
        .expect("the clause can be posted")
        .expect("a clause is learned");
    assert_eq!(&[(x, IntervalSet::singleton(3))], learned_clause.literals());

    engine.propagate().expect("no conflict");
    assert!(engine.is_fixed(x));
    assert_eq!(3, engine.lower_bound(x));
}

#[test]
fn no_learning_only_backtracks() {
    let mut engine = PropagationEngine::new(EngineOptions {
        conflict_resolver: ConflictResolutionStrategy::NoLearning,
    });
    let (b1, b2, x) = opposing_clauses(&mut engine);

    let _ = engine.checkpoint();
    let _ = engine.instantiate(b1, 0).expect("non-empty domain");
    engine.propagate().expect("no conflict");

    let checkpoint = engine.checkpoint();
    let _ = engine.instantiate(b2, 0).expect("non-empty domain");
    assert!(engine.propagate().is_err());

    let learned_clause = engine
        .handle_conflict(checkpoint)
        .expect("nothing is posted");
    assert!(learned_clause.is_none());
    assert_eq!(2, engine.num_propagators());
    assert_eq!(EngineState::Idle, engine.state());
    assert_eq!(0, engine.upper_bound(b1));
    assert!(!engine.is_fixed(b2));
    assert_eq!(5, engine.upper_bound(x));
}

#[test]
fn restriction_with_holes_is_explained_at_every_step() {
    let mut engine = PropagationEngine::default();
    let b = engine.new_variable(0, 1, Some("b".to_owned()));
    let x = engine.new_variable(0, 10, Some("x".to_owned()));

    constraints::clause(vec![
        (b, IntervalSet::singleton(1)),
        (x, IntervalSet::from_values([2, 4, 6])),
    ])
    .post(&mut engine)
    .expect("the clause is well-formed");
    constraints::clause(vec![
        (b, IntervalSet::singleton(1)),
        (x, IntervalSet::from_range(0, 1)),
    ])
    .post(&mut engine)
    .expect("the clause is well-formed");
    engine.propagate().expect("no conflict at the root");

    let _ = engine.checkpoint();
    let _ = engine.instantiate(b, 0).expect("non-empty domain");
    assert!(engine.propagate().is_err());

    let graph = engine.implication_graph();
    for position in 0..=graph.len() {
        if let Some(explanation) = engine.explain(position) {
            assert!(
                is_valid_explanation(&explanation, &graph, position),
                "invalid explanation {explanation:?} at position {position}"
            );
        }
    }

    let learned_clause = engine.analyse_conflict().expect("the failure was propagated");
    assert_eq!(&[(b, IntervalSet::singleton(1))], learned_clause.literals());
}

#[test]
fn failed_decision_is_not_explained() {
    let mut engine = PropagationEngine::default();
    let x = engine.new_variable(0, 5, None);

    let _ = engine.checkpoint();
    let _ = engine.tighten_upper_bound(x, 2).expect("non-empty domain");
    assert!(engine.tighten_lower_bound(x, 3).is_err());

    assert_eq!(EngineState::Failed, engine.state());
    assert!(engine.analyse_conflict().is_none());
}

#[test]
fn conflict_at_the_root_is_infeasible() {
    let mut engine = PropagationEngine::default();
    let x = engine.new_variable(0, 5, None);

    constraints::member(x, IntervalSet::from_range(7, 9))
        .post(&mut engine)
        .expect("the constraint is well-formed");
    assert!(engine.propagate().is_err());

    let result = engine.handle_conflict(Checkpoint::ROOT);
    assert_eq!(Err(ConstraintOperationError::InfeasibleClause), result);
    assert!(engine.is_infeasible());
}
