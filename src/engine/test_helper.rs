#![cfg(any(test, doc))]
//! This module exposes helpers that aid testing of CP propagators. The [`TestSolver`] allows
//! setting up specific scenarios under which to test the various operations of a propagator.
use super::Checkpoint;
use super::EngineState;
use super::PropagationEngine;
use crate::basic_types::Entailment;
use crate::basic_types::Inconsistency;
use crate::basic_types::IntervalSet;
use crate::basic_types::PropagationStatusCP;
use crate::engine::cp::propagation::is_valid_explanation;
use crate::engine::cp::propagation::Explanation;
use crate::engine::cp::propagation::PropagatorConstructor;
use crate::engine::cp::propagation::PropagatorId;
use crate::engine::variables::VariableId;

/// A container for CP variables, which can be used to test propagators.
///
/// Every propagation through the test solver checks the explanation of every propagated update on
/// the trail, including the failure if there is one.
#[derive(Default, Debug)]
pub(crate) struct TestSolver {
    pub(crate) engine: PropagationEngine,
}

#[allow(unused, reason = "not every test uses every helper")]
impl TestSolver {
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> VariableId {
        self.engine.new_variable(lb, ub, None)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: &[i32]) -> VariableId {
        assert!(
            !values.is_empty(),
            "cannot create a variable with an empty domain"
        );
        self.engine.new_sparse_variable(values, None)
    }

    pub(crate) fn new_equal_view(&mut self, base: VariableId, constant: i32) -> VariableId {
        self.engine.equal_view(base, constant)
    }

    pub(crate) fn new_less_or_equal_view(&mut self, base: VariableId, constant: i32) -> VariableId {
        self.engine.less_or_equal_view(base, constant)
    }

    pub(crate) fn new_not_view(&mut self, base: VariableId) -> VariableId {
        self.engine.not_view(base)
    }

    /// Adds the propagator and propagates to a fixpoint.
    pub(crate) fn new_propagator(
        &mut self,
        constructor: impl PropagatorConstructor,
    ) -> Result<PropagatorId, Inconsistency> {
        let id = self
            .engine
            .add_propagator(constructor)
            .expect("the propagator should be well-formed");
        self.propagate()?;
        Ok(id)
    }

    pub(crate) fn propagate(&mut self) -> PropagationStatusCP {
        let result = self.engine.propagate();
        self.assert_valid_explanations();
        result
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.engine.checkpoint()
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.engine.restore(checkpoint)
    }

    pub(crate) fn is_entailed(&self, propagator: PropagatorId) -> Entailment {
        self.engine.is_entailed(propagator)
    }

    pub(crate) fn lower_bound(&self, var: VariableId) -> i32 {
        self.engine.lower_bound(var)
    }

    pub(crate) fn upper_bound(&self, var: VariableId) -> i32 {
        self.engine.upper_bound(var)
    }

    pub(crate) fn contains(&self, var: VariableId, value: i32) -> bool {
        self.engine.contains(var, value)
    }

    pub(crate) fn is_fixed(&self, var: VariableId) -> bool {
        self.engine.is_fixed(var)
    }

    pub(crate) fn domain(&self, var: VariableId) -> IntervalSet {
        self.engine.domain(var)
    }

    pub(crate) fn increase_lower_bound(
        &mut self,
        var: VariableId,
        value: i32,
    ) -> Result<bool, Inconsistency> {
        self.engine.tighten_lower_bound(var, value)
    }

    pub(crate) fn decrease_upper_bound(
        &mut self,
        var: VariableId,
        value: i32,
    ) -> Result<bool, Inconsistency> {
        self.engine.tighten_upper_bound(var, value)
    }

    pub(crate) fn remove(&mut self, var: VariableId, value: i32) -> Result<bool, Inconsistency> {
        self.engine.remove_value(var, value)
    }

    pub(crate) fn set(&mut self, var: VariableId, value: i32) -> Result<bool, Inconsistency> {
        self.engine.instantiate(var, value)
    }

    /// The explanation of the update at `position`, which must have been made by a propagator.
    pub(crate) fn explain(&self, position: usize) -> Explanation {
        self.engine
            .explain(position)
            .expect("the update at the position should be propagated")
    }

    /// The position of the failing update, or of the last update on the trail.
    pub(crate) fn last_position(&self) -> usize {
        let graph = self.engine.implication_graph();
        if self.engine.state() == EngineState::Failed {
            graph.len()
        } else {
            graph.len() - 1
        }
    }

    pub(crate) fn assert_valid_explanations(&self) {
        let graph = self.engine.implication_graph();
        let mut positions = (0..graph.len()).collect::<Vec<_>>();
        if self.engine.state() == EngineState::Failed
            && graph.cause_at(graph.len()).is_some()
        {
            positions.push(graph.len());
        }

        for position in positions {
            let Some(explanation) = self.engine.explain(position) else {
                continue;
            };
            assert!(
                is_valid_explanation(&explanation, &graph, position),
                "invalid explanation {explanation:?} for the update {} on {} at position {position}",
                graph.operation_at(position),
                graph.variable_at(position),
            );
        }
    }

    pub(crate) fn assert_domain(&self, var: VariableId, domain: Vec<i32>) {
        if domain.is_empty() {
            panic!("Domain provided to test solver is empty");
        }
        let min_domain = *domain.iter().min().unwrap();
        let max_domain = *domain.iter().max().unwrap();

        self.assert_bounds(var, min_domain, max_domain);
        for value in min_domain..=max_domain {
            if !domain.contains(&value) {
                assert!(
                    !self.contains(var, value),
                    "{value} was in the domain while it should not be (provided domain {domain:?})"
                )
            } else {
                assert!(
                    self.contains(var, value),
                    "{value} was not in the domain while it should be (provided domain {domain:?})"
                )
            }
        }
    }

    pub(crate) fn assert_bounds(&self, var: VariableId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub), (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }
}
