#![cfg(test)]

use crate::basic_types::IntervalSet;
use crate::constraints::ClauseBuilder;
use crate::engine::cp::propagation::PropagatorId;
use crate::engine::PropagationEngine;

#[test]
fn single_forbidden_literal_posts_a_member_constraint() {
    let mut engine = PropagationEngine::default();
    let v = engine.new_variable(0, 1, Some("v".to_owned()));

    let mut builder = ClauseBuilder::new(&engine);
    let _ = builder.put_forbidden(v, IntervalSet::singleton(0));
    builder.build_clause(&mut engine).expect("one literal remains");

    assert_eq!(1, engine.num_propagators());
    assert_eq!("Member", engine.propagator_name(PropagatorId(0)));

    engine.propagate().expect("no conflict");
    assert!(engine.is_fixed(v));
    assert_eq!(1, engine.lower_bound(v));
}

#[test]
fn equality_view_is_rewritten_onto_its_base() {
    let mut engine = PropagationEngine::default();
    let base = engine.new_variable(0, 9, Some("base".to_owned()));
    let is_five = engine.equal_view(base, 5);

    let mut builder = ClauseBuilder::new(&engine);
    let _ = builder.put(is_five, IntervalSet::singleton(1));
    builder.build_clause(&mut engine).expect("one literal remains");

    assert_eq!(1, engine.num_propagators());
    engine.propagate().expect("no conflict");
    assert_eq!(IntervalSet::singleton(5), engine.domain(base));
}

#[test]
fn negated_equality_view_removes_the_value_from_its_base() {
    let mut engine = PropagationEngine::default();
    let base = engine.new_variable(0, 9, None);
    let is_five = engine.equal_view(base, 5);
    let other = engine.new_variable(0, 1, None);

    let mut builder = ClauseBuilder::new(&engine);
    let _ = builder
        .put(is_five, IntervalSet::singleton(0))
        .put(other, IntervalSet::singleton(1));
    builder.build_clause(&mut engine).expect("two literals remain");

    assert_eq!(1, engine.num_propagators());
    assert_eq!("SignedClause", engine.propagator_name(PropagatorId(0)));

    engine.propagate().expect("no conflict");
    let _ = engine.checkpoint();
    let _ = engine.instantiate(other, 0).expect("non-empty domain");
    engine.propagate().expect("no conflict");

    assert!(!engine.contains(base, 5));
    assert_eq!((0, 9), (engine.lower_bound(base), engine.upper_bound(base)));
}

#[test]
fn view_literal_is_merged_with_the_literal_on_its_base() {
    let mut engine = PropagationEngine::default();
    let base = engine.new_variable(0, 9, None);
    let at_most_two = engine.less_or_equal_view(base, 2);

    let mut builder = ClauseBuilder::new(&engine);
    let _ = builder
        .put(at_most_two, IntervalSet::singleton(1))
        .put(base, IntervalSet::singleton(7));
    builder.build_clause(&mut engine).expect("one literal remains");

    assert_eq!("Member", engine.propagator_name(PropagatorId(0)));
    engine.propagate().expect("no conflict");
    assert_eq!(IntervalSet::from_values([0, 1, 2, 7]), engine.domain(base));
}
