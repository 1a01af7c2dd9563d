#![cfg(test)]

use crate::engine::test_helper::TestSolver;
use crate::propagators::CountArgs;
use crate::propagators::MaximumArgs;

#[test]
fn count_over_equality_views_fixes_the_base() {
    let mut solver = TestSolver::default();

    let x = solver.new_variable(0, 5);
    let is_three = solver.new_equal_view(x, 3);
    let y = solver.new_variable(0, 1);
    let card = solver.new_variable(2, 2);

    let _ = solver
        .new_propagator(CountArgs {
            vars: [is_three, y].into(),
            value: 1,
            card,
        })
        .expect("no empty domain");

    solver.assert_domain(x, vec![3]);
    solver.assert_domain(is_three, vec![1]);
    solver.assert_domain(y, vec![1]);
}

#[test]
fn change_of_the_base_reaches_the_count_on_its_view() {
    let mut solver = TestSolver::default();

    let x = solver.new_variable(0, 5);
    let at_most_two = solver.new_less_or_equal_view(x, 2);
    let y = solver.new_variable(0, 1);
    let card = solver.new_variable(0, 2);

    let _ = solver
        .new_propagator(CountArgs {
            vars: [at_most_two, y].into(),
            value: 1,
            card,
        })
        .expect("no empty domain");
    solver.assert_bounds(card, 0, 2);

    let _ = solver.checkpoint();
    let _ = solver.increase_lower_bound(x, 3).expect("non-empty domain");
    solver.propagate().expect("no conflict");

    solver.assert_domain(at_most_two, vec![0]);
    solver.assert_bounds(card, 0, 1);
}

#[test]
fn maximum_over_a_negated_view_reaches_the_base() {
    let mut solver = TestSolver::default();

    let x = solver.new_variable(0, 5);
    let at_most_two = solver.new_less_or_equal_view(x, 2);
    let above_two = solver.new_not_view(at_most_two);
    let rhs = solver.new_variable(0, 1);

    let _ = solver
        .new_propagator(MaximumArgs {
            array: [above_two].into(),
            rhs,
        })
        .expect("no empty domain");
    solver.assert_bounds(rhs, 0, 1);

    let _ = solver.checkpoint();
    let _ = solver.set(rhs, 1).expect("non-empty domain");
    solver.propagate().expect("no conflict");

    solver.assert_bounds(x, 3, 5);
    solver.assert_domain(at_most_two, vec![0]);
}
