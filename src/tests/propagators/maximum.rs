#![cfg(test)]

use crate::basic_types::Entailment;
use crate::engine::test_helper::TestSolver;
use crate::propagators::MaximumArgs;

#[test]
fn upper_bound_of_rhs_matches_maximum_upper_bound_of_array_at_initialise() {
    let mut solver = TestSolver::default();

    let a = solver.new_variable(1, 3);
    let b = solver.new_variable(1, 4);
    let c = solver.new_variable(1, 5);

    let rhs = solver.new_variable(1, 10);

    let _ = solver
        .new_propagator(MaximumArgs {
            array: [a, b, c].into(),
            rhs,
        })
        .expect("no empty domain");

    solver.assert_bounds(rhs, 1, 5);
}

#[test]
fn lower_bound_of_rhs_matches_maximum_lower_bound_of_array_at_initialise() {
    let mut solver = TestSolver::default();

    let a = solver.new_variable(3, 10);
    let b = solver.new_variable(4, 10);
    let c = solver.new_variable(5, 10);

    let rhs = solver.new_variable(1, 10);

    let _ = solver
        .new_propagator(MaximumArgs {
            array: [a, b, c].into(),
            rhs,
        })
        .expect("no empty domain");

    solver.assert_bounds(rhs, 5, 10);
}

#[test]
fn upper_bound_of_all_array_elements_at_most_rhs_max_at_initialise() {
    let mut solver = TestSolver::default();

    let array = (1..=5)
        .map(|idx| solver.new_variable(1, 4 + idx))
        .collect::<Box<_>>();

    let rhs = solver.new_variable(1, 3);

    let _ = solver
        .new_propagator(MaximumArgs {
            array: array.clone(),
            rhs,
        })
        .expect("no empty domain");

    for var in array.iter() {
        solver.assert_bounds(*var, 1, 3);
    }
}

#[test]
fn single_variable_propagate() {
    let mut solver = TestSolver::default();

    let array = (1..=5)
        .map(|idx| solver.new_variable(1, 1 + 10 * idx))
        .collect::<Box<_>>();

    let rhs = solver.new_variable(45, 60);

    let _ = solver
        .new_propagator(MaximumArgs {
            array: array.clone(),
            rhs,
        })
        .expect("no empty domain");

    solver.assert_bounds(*array.last().unwrap(), 45, 51);
    solver.assert_bounds(rhs, 45, 51);
}

#[test]
fn fixing_the_largest_element_fixes_rhs() {
    let mut solver = TestSolver::default();

    let a = solver.new_variable(1, 5);
    let b = solver.new_variable(3, 7);
    let rhs = solver.new_variable(0, 10);

    let propagator = solver
        .new_propagator(MaximumArgs {
            array: [a, b].into(),
            rhs,
        })
        .expect("no empty domain");
    solver.assert_bounds(rhs, 3, 7);

    let _ = solver.checkpoint();
    let _ = solver.set(b, 7).expect("non-empty domain");
    solver.propagate().expect("no conflict");

    solver.assert_bounds(rhs, 7, 7);
    solver.assert_bounds(a, 1, 5);
    assert_eq!(Entailment::True, solver.is_entailed(propagator));
    assert!(solver.engine.is_passive(propagator));
}

#[test]
fn only_support_is_channeled_with_rhs_through_holes() {
    let mut solver = TestSolver::default();

    let x = solver.new_sparse_variable(&[1, 3, 5, 7]);
    let y = solver.new_variable(1, 2);
    let rhs = solver.new_sparse_variable(&[4, 6, 7, 9]);

    let _ = solver
        .new_propagator(MaximumArgs {
            array: [x, y].into(),
            rhs,
        })
        .expect("no empty domain");

    solver.assert_domain(x, vec![7]);
    solver.assert_domain(rhs, vec![7]);
    solver.assert_bounds(y, 1, 2);
}

#[test]
fn element_above_rhs_is_a_conflict() {
    let mut solver = TestSolver::default();

    let a = solver.new_variable(5, 10);
    let b = solver.new_variable(0, 10);
    let rhs = solver.new_variable(1, 3);

    let result = solver.new_propagator(MaximumArgs {
        array: [a, b].into(),
        rhs,
    });

    assert!(result.is_err());
    let _ = solver.explain(solver.last_position());
}

#[test]
fn entailment_follows_the_bounds() {
    let mut solver = TestSolver::default();

    let a = solver.new_variable(0, 4);
    let b = solver.new_variable(0, 4);
    let rhs = solver.new_variable(0, 10);

    let propagator = solver
        .new_propagator(MaximumArgs {
            array: [a, b].into(),
            rhs,
        })
        .expect("no empty domain");
    assert_eq!(Entailment::Undefined, solver.is_entailed(propagator));

    let _ = solver.checkpoint();
    let _ = solver.set(a, 4).expect("non-empty domain");
    let _ = solver.set(b, 2).expect("non-empty domain");
    solver.propagate().expect("no conflict");

    solver.assert_bounds(rhs, 4, 4);
    assert_eq!(Entailment::True, solver.is_entailed(propagator));
}

#[test]
fn restore_recovers_the_bounds_of_rhs() {
    let mut solver = TestSolver::default();

    let a = solver.new_variable(0, 4);
    let b = solver.new_variable(2, 8);
    let rhs = solver.new_variable(0, 10);

    let _ = solver
        .new_propagator(MaximumArgs {
            array: [a, b].into(),
            rhs,
        })
        .expect("no empty domain");
    solver.assert_bounds(rhs, 2, 8);

    let checkpoint = solver.checkpoint();
    let _ = solver.decrease_upper_bound(b, 3).expect("non-empty domain");
    solver.propagate().expect("no conflict");
    solver.assert_bounds(rhs, 2, 4);

    solver.restore(checkpoint);
    solver.assert_bounds(rhs, 2, 8);
    solver.assert_bounds(b, 2, 8);
}
