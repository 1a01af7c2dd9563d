#![cfg(test)]

use crate::basic_types::Entailment;
use crate::engine::test_helper::TestSolver;
use crate::propagators::CountArgs;

#[test]
fn bounds_of_card_follow_the_variables() {
    let mut solver = TestSolver::default();

    let x1 = solver.new_sparse_variable(&[2, 3]);
    let x2 = solver.new_variable(2, 2);
    let x3 = solver.new_sparse_variable(&[2, 4]);
    let card = solver.new_variable(0, 3);

    let _ = solver
        .new_propagator(CountArgs {
            vars: [x1, x2, x3].into(),
            value: 2,
            card,
        })
        .expect("no empty domain");

    solver.assert_bounds(card, 1, 3);
    solver.assert_domain(x1, vec![2, 3]);
    solver.assert_domain(x3, vec![2, 4]);
}

#[test]
fn reached_lower_bound_removes_the_value_from_the_others() {
    let mut solver = TestSolver::default();

    let x1 = solver.new_sparse_variable(&[2, 3]);
    let x2 = solver.new_variable(2, 2);
    let x3 = solver.new_sparse_variable(&[2, 4]);
    let card = solver.new_variable(1, 1);

    let _ = solver
        .new_propagator(CountArgs {
            vars: [x1, x2, x3].into(),
            value: 2,
            card,
        })
        .expect("no empty domain");

    solver.assert_domain(x1, vec![3]);
    solver.assert_domain(x3, vec![4]);
    solver.assert_domain(x2, vec![2]);
}

#[test]
fn reached_upper_bound_fixes_the_others_to_the_value() {
    let mut solver = TestSolver::default();

    let x1 = solver.new_sparse_variable(&[2, 3]);
    let x2 = solver.new_variable(2, 2);
    let x3 = solver.new_sparse_variable(&[2, 4]);
    let card = solver.new_variable(3, 3);

    let _ = solver
        .new_propagator(CountArgs {
            vars: [x1, x2, x3].into(),
            value: 2,
            card,
        })
        .expect("no empty domain");

    solver.assert_domain(x1, vec![2]);
    solver.assert_domain(x3, vec![2]);
}

#[test]
fn events_on_the_variables_update_card() {
    let mut solver = TestSolver::default();

    let x1 = solver.new_variable(0, 3);
    let x2 = solver.new_variable(0, 3);
    let x3 = solver.new_variable(0, 3);
    let card = solver.new_variable(0, 3);

    let _ = solver
        .new_propagator(CountArgs {
            vars: [x1, x2, x3].into(),
            value: 1,
            card,
        })
        .expect("no empty domain");
    solver.assert_bounds(card, 0, 3);

    let _ = solver.checkpoint();
    let _ = solver.set(x1, 1).expect("non-empty domain");
    let _ = solver.increase_lower_bound(x2, 2).expect("non-empty domain");
    solver.propagate().expect("no conflict");

    solver.assert_bounds(card, 1, 2);

    let _ = solver.checkpoint();
    let _ = solver.decrease_upper_bound(card, 1).expect("non-empty domain");
    solver.propagate().expect("no conflict");

    assert!(!solver.contains(x3, 1));
    solver.assert_domain(x3, vec![0, 2, 3]);
}

#[test]
fn card_which_cannot_be_reached_is_a_conflict() {
    let mut solver = TestSolver::default();

    let x1 = solver.new_variable(0, 1);
    let x2 = solver.new_variable(0, 1);
    let card = solver.new_variable(0, 2);

    let _ = solver
        .new_propagator(CountArgs {
            vars: [x1, x2].into(),
            value: 1,
            card,
        })
        .expect("no empty domain");

    let _ = solver.checkpoint();
    let _ = solver.increase_lower_bound(card, 2).expect("non-empty domain");
    let _ = solver.decrease_upper_bound(x2, 0).expect("non-empty domain");

    assert!(solver.propagate().is_err());
    let explanation = solver.explain(solver.last_position());
    assert!(explanation.pivot().is_some());
}

#[test]
fn entailment_of_count() {
    let mut solver = TestSolver::default();

    let x1 = solver.new_variable(0, 1);
    let x2 = solver.new_variable(0, 1);
    let card = solver.new_variable(0, 2);

    let propagator = solver
        .new_propagator(CountArgs {
            vars: [x1, x2].into(),
            value: 1,
            card,
        })
        .expect("no empty domain");
    assert_eq!(Entailment::Undefined, solver.is_entailed(propagator));

    let checkpoint = solver.checkpoint();
    let _ = solver.set(x1, 1).expect("non-empty domain");
    let _ = solver.set(x2, 0).expect("non-empty domain");
    solver.propagate().expect("no conflict");

    solver.assert_bounds(card, 1, 1);
    assert_eq!(Entailment::True, solver.is_entailed(propagator));

    solver.restore(checkpoint);
    solver.assert_bounds(card, 0, 2);
    assert_eq!(Entailment::Undefined, solver.is_entailed(propagator));
}
