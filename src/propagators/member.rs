use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Entailment;
use crate::basic_types::IntervalSet;
use crate::basic_types::PropagationStatusCP;
use crate::engine::cp::propagation::Explanation;
use crate::engine::cp::propagation::Priority;
use crate::engine::cp::propagation::PropagationContext;
use crate::engine::cp::propagation::PropagationContextMut;
use crate::engine::cp::propagation::Propagator;
use crate::engine::cp::propagation::PropagatorConstructor;
use crate::engine::cp::propagation::PropagatorConstructorContext;
use crate::engine::cp::propagation::ReadDomains;
use crate::engine::cp::ImplicationGraph;
use crate::engine::variables::VariableId;

/// Arguments of the propagator which enforces `var ∈ allowed`.
#[derive(Debug, Clone)]
pub struct MemberArgs {
    pub var: VariableId,
    pub allowed: IntervalSet,
}

impl PropagatorConstructor for MemberArgs {
    type PropagatorImpl = MemberPropagator;

    fn create(
        self,
        _context: &mut PropagatorConstructorContext<'_>,
    ) -> Result<Self::PropagatorImpl, ConstraintOperationError> {
        Ok(MemberPropagator {
            scope: [self.var],
            allowed: self.allowed,
        })
    }
}

/// Unary propagator which restricts a variable to a set of values. It is passive after its first
/// propagation.
#[derive(Debug)]
pub struct MemberPropagator {
    scope: [VariableId; 1],
    allowed: IntervalSet,
}

impl Propagator for MemberPropagator {
    fn name(&self) -> &str {
        "Member"
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate_full(&self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let _ = context.restrict_to(self.scope[0], &self.allowed)?;
        context.set_passive();
        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let domain = context.domain(self.scope[0]);
        if domain.is_subset_of(&self.allowed) {
            Entailment::True
        } else if !domain.intersects(&self.allowed) {
            Entailment::False
        } else {
            Entailment::Undefined
        }
    }

    fn explain(&self, explanation: &mut Explanation, graph: &ImplicationGraph, _position: usize) {
        let mut allowed = graph.root_domain(self.scope[0]);
        allowed.retain_all(&self.allowed);
        explanation.add_pivot(self.scope[0], allowed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cp::propagation::is_valid_explanation;
    use crate::engine::cp::DomainOperation;
    use crate::engine::test_helper::TestSolver;

    #[test]
    fn domain_is_restricted_to_the_allowed_values() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);

        let propagator = solver
            .new_propagator(MemberArgs {
                var: x,
                allowed: IntervalSet::from_values([2, 4, 6, 20]),
            })
            .expect("non-empty domain");

        solver.assert_domain(x, vec![2, 4, 6]);
        assert_eq!(Entailment::True, solver.is_entailed(propagator));
        assert!(solver.engine.is_passive(propagator));
    }

    #[test]
    fn every_step_of_the_restriction_is_explained_by_the_allowed_values() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(MemberArgs {
                var: x,
                allowed: IntervalSet::from_values([2, 4, 6]),
            })
            .expect("non-empty domain");

        let graph = solver.engine.implication_graph();
        assert_eq!(DomainOperation::LowerBound(2), graph.operation_at(0));
        assert_eq!(IntervalSet::from_range(2, 10), graph.domain_after(x, 0));

        let explanation = solver.explain(0);
        assert_eq!(
            Some(&(x, IntervalSet::from_values([2, 4, 6]))),
            explanation.pivot()
        );
        assert!(is_valid_explanation(&explanation, &graph, 0));
        solver.assert_valid_explanations();
    }

    #[test]
    fn disjoint_set_is_a_wipeout() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);

        let result = solver.new_propagator(MemberArgs {
            var: x,
            allowed: IntervalSet::from_range(11, 12),
        });

        assert!(result.is_err());
    }
}
