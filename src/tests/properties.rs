#![cfg(test)]
//! Properties of propagation which must hold for every instance, checked on random instances of
//! count and maximum constraints.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

use crate::basic_types::IntervalSet;
use crate::constraints;
use crate::constraints::Constraint;
use crate::engine::variables::VariableId;
use crate::engine::PropagationEngine;

const NUM_INSTANCES: usize = 50;
const NUM_DECISIONS: usize = 12;

#[derive(Debug, Clone)]
enum Relation {
    Count {
        vars: Vec<usize>,
        value: i32,
        card: usize,
    },
    Maximum {
        array: Vec<usize>,
        rhs: usize,
    },
}

#[derive(Debug, Clone)]
enum Decision {
    Instantiate(usize, i32),
    LowerBound(usize, i32),
    UpperBound(usize, i32),
    Remove(usize, i32),
}

/// A random instance. The first `num_decision_vars` variables are the ones decisions are made on,
/// every other variable is the `card` or `rhs` of exactly one relation.
#[derive(Debug, Clone)]
struct Instance {
    domains: Vec<IntervalSet>,
    num_decision_vars: usize,
    relations: Vec<Relation>,
}

impl Instance {
    fn random(rng: &mut SmallRng, with_count: bool, with_maximum: bool) -> Instance {
        let num_decision_vars = rng.gen_range(4..=7);
        let mut domains = (0..num_decision_vars)
            .map(|_| {
                let lb = rng.gen_range(0..=3);
                let ub = rng.gen_range(lb..=lb + 4);
                IntervalSet::from_range(lb, ub)
            })
            .collect::<Vec<_>>();

        let pool = (0..num_decision_vars).collect::<Vec<_>>();
        let mut relations = vec![];
        for _ in 0..rng.gen_range(1..=3) {
            let size = rng.gen_range(2..=4);
            let vars = pool.choose_multiple(rng, size).copied().collect::<Vec<_>>();

            let use_count = match (with_count, with_maximum) {
                (true, true) => rng.gen_bool(0.5),
                (with_count, _) => with_count,
            };

            if use_count {
                domains.push(IntervalSet::from_range(0, size as i32));
                relations.push(Relation::Count {
                    vars,
                    value: rng.gen_range(0..=5),
                    card: domains.len() - 1,
                });
            } else {
                domains.push(IntervalSet::from_range(0, 8));
                relations.push(Relation::Maximum {
                    array: vars,
                    rhs: domains.len() - 1,
                });
            }
        }

        Instance {
            domains,
            num_decision_vars,
            relations,
        }
    }

    /// Creates the variables with the given domains and posts the relations in the given order.
    fn build(&self, domains: &[IntervalSet], order: &[usize]) -> (PropagationEngine, Vec<VariableId>) {
        let mut engine = PropagationEngine::default();
        let variables = domains
            .iter()
            .map(|domain| engine.new_sparse_variable(&domain.iter().collect::<Vec<_>>(), None))
            .collect::<Vec<_>>();

        for &index in order {
            let result = match &self.relations[index] {
                Relation::Count { vars, value, card } => constraints::count(
                    vars.iter().map(|&var| variables[var]).collect::<Vec<_>>(),
                    *value,
                    variables[*card],
                )
                .post(&mut engine),
                Relation::Maximum { array, rhs } => constraints::maximum(
                    array.iter().map(|&var| variables[var]).collect::<Vec<_>>(),
                    variables[*rhs],
                )
                .post(&mut engine),
            };
            result.expect("the relations are well-formed");
        }

        (engine, variables)
    }

    fn natural_order(&self) -> Vec<usize> {
        (0..self.relations.len()).collect()
    }

    fn random_decisions(&self, rng: &mut SmallRng) -> Vec<Decision> {
        (0..NUM_DECISIONS)
            .map(|_| {
                let var = rng.gen_range(0..self.num_decision_vars);
                let value = rng.gen_range(0..=7);
                match rng.gen_range(0..4) {
                    0 => Decision::Instantiate(var, value),
                    1 => Decision::LowerBound(var, value),
                    2 => Decision::UpperBound(var, value),
                    _ => Decision::Remove(var, value),
                }
            })
            .collect()
    }
}

fn decide(
    engine: &mut PropagationEngine,
    variables: &[VariableId],
    decision: &Decision,
) -> Result<(), ()> {
    let result = match *decision {
        Decision::Instantiate(var, value) => engine.instantiate(variables[var], value),
        Decision::LowerBound(var, value) => engine.tighten_lower_bound(variables[var], value),
        Decision::UpperBound(var, value) => engine.tighten_upper_bound(variables[var], value),
        Decision::Remove(var, value) => engine.remove_value(variables[var], value),
    };
    let _ = result.map_err(|_| ())?;
    engine.propagate().map_err(|_| ())
}

fn domains(engine: &PropagationEngine, variables: &[VariableId]) -> Vec<IntervalSet> {
    variables.iter().map(|&var| engine.domain(var)).collect()
}

/// Makes the decisions one checkpoint at a time, calling `check` at every fixpoint. A failed
/// decision is undone and the search continues with the next decision.
fn dive(
    instance: &Instance,
    decisions: &[Decision],
    mut check: impl FnMut(&PropagationEngine, &[VariableId]),
) {
    let (mut engine, variables) = instance.build(&instance.domains, &instance.natural_order());
    if engine.propagate().is_err() {
        return;
    }
    check(&engine, &variables);

    for decision in decisions {
        let checkpoint = engine.checkpoint();
        if decide(&mut engine, &variables, decision).is_err() {
            engine.restore(checkpoint);
        } else {
            check(&engine, &variables);
        }
    }
}

#[test]
fn fixpoint_is_idempotent() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..NUM_INSTANCES {
        let instance = Instance::random(&mut rng, true, true);
        let decisions = instance.random_decisions(&mut rng);

        dive(&instance, &decisions, |engine, variables| {
            let fixpoint = domains(engine, variables);
            if fixpoint.iter().any(IntervalSet::is_empty) {
                return;
            }

            let (mut fresh, fresh_variables) = instance.build(&fixpoint, &instance.natural_order());
            fresh
                .propagate()
                .expect("a fixpoint does not fail when propagated again");
            assert_eq!(fixpoint, domains(&fresh, &fresh_variables), "{instance:?}");
        });
    }
}

#[test]
fn domains_only_shrink() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..NUM_INSTANCES {
        let instance = Instance::random(&mut rng, true, true);
        let decisions = instance.random_decisions(&mut rng);

        let (mut engine, variables) = instance.build(&instance.domains, &instance.natural_order());
        if engine.propagate().is_err() {
            continue;
        }

        let mut previous = domains(&engine, &variables);
        for decision in &decisions {
            if decide(&mut engine, &variables, decision).is_err() {
                break;
            }
            let current = domains(&engine, &variables);
            for (before, after) in previous.iter().zip(current.iter()) {
                assert!(after.is_subset_of(before), "{before} grew to {after}");
            }
            previous = current;
        }
    }
}

#[test]
fn restore_recovers_the_domains_of_the_checkpoint() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..NUM_INSTANCES {
        let instance = Instance::random(&mut rng, true, true);
        let decisions = instance.random_decisions(&mut rng);

        let (mut engine, variables) = instance.build(&instance.domains, &instance.natural_order());
        if engine.propagate().is_err() {
            continue;
        }

        let mut stack = vec![];
        for decision in &decisions {
            let snapshot = domains(&engine, &variables);
            let checkpoint = engine.checkpoint();
            stack.push((checkpoint, snapshot));

            if decide(&mut engine, &variables, decision).is_err() {
                break;
            }
        }

        while let Some((checkpoint, snapshot)) = stack.pop() {
            engine.restore(checkpoint);
            assert_eq!(snapshot, domains(&engine, &variables));
        }
    }
}

#[test]
fn count_bounds_card_by_the_fixed_and_possible_variables() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..NUM_INSTANCES {
        let instance = Instance::random(&mut rng, true, false);
        let decisions = instance.random_decisions(&mut rng);

        dive(&instance, &decisions, |engine, variables| {
            for relation in &instance.relations {
                let Relation::Count { vars, value, card } = relation else {
                    continue;
                };
                let fixed = vars
                    .iter()
                    .filter(|&&var| {
                        engine.is_fixed(variables[var])
                            && engine.lower_bound(variables[var]) == *value
                    })
                    .count() as i32;
                let possible = vars
                    .iter()
                    .filter(|&&var| engine.contains(variables[var], *value))
                    .count() as i32;

                assert_eq!(fixed, engine.lower_bound(variables[*card]), "{relation:?}");
                assert_eq!(possible, engine.upper_bound(variables[*card]), "{relation:?}");
            }
        });
    }
}

#[test]
fn maximum_bounds_rhs_by_the_elements() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..NUM_INSTANCES {
        let instance = Instance::random(&mut rng, false, true);
        let decisions = instance.random_decisions(&mut rng);

        dive(&instance, &decisions, |engine, variables| {
            for relation in &instance.relations {
                let Relation::Maximum { array, rhs } = relation else {
                    continue;
                };
                let max_lb = array
                    .iter()
                    .map(|&var| engine.lower_bound(variables[var]))
                    .max()
                    .expect("the array is not empty");
                let max_ub = array
                    .iter()
                    .map(|&var| engine.upper_bound(variables[var]))
                    .max()
                    .expect("the array is not empty");

                assert_eq!(max_ub, engine.upper_bound(variables[*rhs]), "{relation:?}");
                assert!(engine.lower_bound(variables[*rhs]) >= max_lb, "{relation:?}");
            }
        });
    }
}

#[test]
fn fixpoint_does_not_depend_on_the_order_of_the_propagators() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..NUM_INSTANCES {
        let instance = Instance::random(&mut rng, true, true);
        let decisions = instance.random_decisions(&mut rng);

        let mut shuffled = instance.natural_order();
        shuffled.shuffle(&mut rng);

        let (mut first, first_variables) =
            instance.build(&instance.domains, &instance.natural_order());
        let (mut second, second_variables) = instance.build(&instance.domains, &shuffled);

        let first_result = first.propagate().is_ok();
        let second_result = second.propagate().is_ok();
        assert_eq!(first_result, second_result, "{instance:?}");
        if !first_result {
            continue;
        }
        assert_eq!(
            domains(&first, &first_variables),
            domains(&second, &second_variables)
        );

        for decision in &decisions {
            let first_checkpoint = first.checkpoint();
            let second_checkpoint = second.checkpoint();

            let first_result = decide(&mut first, &first_variables, decision);
            let second_result = decide(&mut second, &second_variables, decision);
            assert_eq!(first_result, second_result, "{instance:?} {decision:?}");

            if first_result.is_err() {
                first.restore(first_checkpoint);
                second.restore(second_checkpoint);
            }
            assert_eq!(
                domains(&first, &first_variables),
                domains(&second, &second_variables),
                "{instance:?} {decision:?}"
            );
        }
    }
}
