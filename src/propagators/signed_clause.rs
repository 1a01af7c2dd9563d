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

/// Arguments of the propagator which enforces the disjunction `\/ (var ∈ allowed)`.
#[derive(Debug, Clone)]
pub struct SignedClauseArgs {
    pub literals: Vec<(VariableId, IntervalSet)>,
}

impl PropagatorConstructor for SignedClauseArgs {
    type PropagatorImpl = SignedClausePropagator;

    fn create(
        self,
        _context: &mut PropagatorConstructorContext<'_>,
    ) -> Result<Self::PropagatorImpl, ConstraintOperationError> {
        let mut scope: Vec<VariableId> = vec![];
        let mut allowed: Vec<IntervalSet> = vec![];

        // literals on the same variable are merged into one
        for (var, values) in self.literals {
            match scope.iter().position(|&other| other == var) {
                Some(index) => allowed[index].add_all(&values),
                None => {
                    scope.push(var);
                    allowed.push(values);
                }
            }
        }

        Ok(SignedClausePropagator {
            scope: scope.into(),
            allowed: allowed.into(),
        })
    }
}

/// Propagator for a clause of membership literals. At least one variable must take a value in its
/// allowed set.
///
/// When all but one literal are falsified, the remaining variable is restricted to its allowed
/// set. Every update is explained by the clause itself.
#[derive(Debug)]
pub struct SignedClausePropagator {
    scope: Box<[VariableId]>,
    allowed: Box<[IntervalSet]>,
}

impl Propagator for SignedClausePropagator {
    fn name(&self) -> &str {
        "SignedClause"
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate_full(&self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let mut unfalsified = None;

        for (index, &var) in self.scope.iter().enumerate() {
            let domain = context.domain(var);
            if domain.is_subset_of(&self.allowed[index]) {
                context.set_passive();
                return Ok(());
            }

            if domain.intersects(&self.allowed[index]) {
                if unfalsified.is_some() {
                    return Ok(());
                }
                unfalsified = Some(index);
            }
        }

        // with every literal falsified, restricting the last one fails
        let index = unfalsified.unwrap_or(self.scope.len() - 1);
        let _ = context.restrict_to(self.scope[index], &self.allowed[index])?;
        context.set_passive();

        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let mut can_be_satisfied = false;
        for (var, allowed) in self.scope.iter().zip(self.allowed.iter()) {
            let domain = context.domain(*var);
            if domain.is_subset_of(allowed) {
                return Entailment::True;
            }
            can_be_satisfied |= domain.intersects(allowed);
        }

        if can_be_satisfied {
            Entailment::Undefined
        } else {
            Entailment::False
        }
    }

    fn explain(&self, explanation: &mut Explanation, graph: &ImplicationGraph, position: usize) {
        let pivot = graph.variable_at(position);
        for (var, allowed) in self.scope.iter().zip(self.allowed.iter()) {
            if *var == pivot {
                explanation.add_pivot(*var, allowed.clone());
            } else {
                explanation.add(*var, allowed.clone());
            }
        }
    }
}
