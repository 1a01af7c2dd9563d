use enumset::EnumSet;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Entailment;
use crate::basic_types::IntervalSet;
use crate::basic_types::PropagationStatusCP;
use crate::engine::cp::propagation::explain_by_scope;
use crate::engine::cp::propagation::Explanation;
use crate::engine::cp::propagation::Priority;
use crate::engine::cp::propagation::PropagationContext;
use crate::engine::cp::propagation::PropagationContextMut;
use crate::engine::cp::propagation::Propagator;
use crate::engine::cp::propagation::PropagatorConstructor;
use crate::engine::cp::propagation::PropagatorConstructorContext;
use crate::engine::cp::propagation::ReadDomains;
use crate::engine::cp::DomainEvent;
use crate::engine::cp::DomainEvents;
use crate::engine::cp::ImplicationGraph;
use crate::engine::variables::VariableId;

/// Arguments of the propagator which enforces `max(array) = rhs`.
#[derive(Debug, Clone)]
pub struct MaximumArgs {
    pub array: Box<[VariableId]>,
    pub rhs: VariableId,
}

impl PropagatorConstructor for MaximumArgs {
    type PropagatorImpl = MaximumPropagator;

    fn create(
        self,
        _context: &mut PropagatorConstructorContext<'_>,
    ) -> Result<Self::PropagatorImpl, ConstraintOperationError> {
        if self.array.is_empty() {
            return Err(ConstraintOperationError::MalformedConfiguration(
                "the maximum of an empty array is undefined".to_owned(),
            ));
        }

        let scope = self
            .array
            .iter()
            .copied()
            .chain(std::iter::once(self.rhs))
            .collect();

        Ok(MaximumPropagator { scope })
    }
}

/// Propagator which enforces `max(array) = rhs`. The scope is the array followed by `rhs`.
///
/// Bounds are propagated in both directions until a local fixpoint. When a single element of the
/// array can still reach the lower bound of `rhs`, that element must be the maximum, and its
/// domain is channelled with the domain of `rhs`.
#[derive(Debug)]
pub struct MaximumPropagator {
    scope: Box<[VariableId]>,
}

impl MaximumPropagator {
    fn array(&self) -> &[VariableId] {
        &self.scope[..self.scope.len() - 1]
    }

    fn rhs(&self) -> VariableId {
        self.scope[self.scope.len() - 1]
    }

    /// Make `element` and `rhs` agree on their bounds. Since the domains may have holes, this is
    /// repeated until the bounds of both match exactly.
    fn channel(&self, context: &mut PropagationContextMut, element: VariableId) -> PropagationStatusCP {
        let rhs = self.rhs();

        let _ = context.update_bounds(
            element,
            context.lower_bound(rhs),
            context.upper_bound(rhs),
        )?;

        if context.is_fixed(rhs) {
            context.set_passive();
            return Ok(());
        }

        while context.lower_bound(rhs) != context.lower_bound(element)
            || context.upper_bound(rhs) != context.upper_bound(element)
        {
            let _ = context.update_bounds(
                rhs,
                context.lower_bound(element),
                context.upper_bound(element),
            )?;
            let _ = context.update_bounds(
                element,
                context.lower_bound(rhs),
                context.upper_bound(rhs),
            )?;
        }

        Ok(())
    }
}

impl Propagator for MaximumPropagator {
    fn name(&self) -> &str {
        "Maximum"
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn reacts_to_fine_events(&self) -> bool {
        false
    }

    fn propagation_conditions(&self, _local_index: usize) -> EnumSet<DomainEvent> {
        DomainEvents::BOUNDS_AND_ASSIGN
    }

    fn propagate_full(&self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let rhs = self.rhs();

        loop {
            let mut changed = false;

            let rhs_ub = context.upper_bound(rhs);
            let mut max_lb = i32::MIN;
            let mut max_ub = i32::MIN;
            for &element in self.array() {
                changed |= context.tighten_upper_bound(element, rhs_ub)?;
                max_lb = max_lb.max(context.lower_bound(element));
                max_ub = max_ub.max(context.upper_bound(element));
            }

            changed |= context.tighten_lower_bound(rhs, max_lb)?;
            changed |= context.tighten_upper_bound(rhs, max_ub)?;

            let lb = max_lb.max(context.lower_bound(rhs));
            let mut supports = self
                .array()
                .iter()
                .filter(|&&element| context.upper_bound(element) >= lb);
            let support = supports.next().copied();
            let is_unique = supports.next().is_none();

            if let (Some(element), true) = (support, is_unique) {
                // channelling reaches a fixpoint of the whole constraint
                return self.channel(&mut context, element);
            }

            if !changed {
                return Ok(());
            }
        }
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let rhs = self.rhs();
        let rhs_ub = context.upper_bound(rhs);

        if self
            .array()
            .iter()
            .any(|&element| context.lower_bound(element) > rhs_ub)
        {
            return Entailment::False;
        }

        let max_ub = self
            .array()
            .iter()
            .map(|&element| context.upper_bound(element))
            .max()
            .unwrap_or(i32::MIN);
        if max_ub < context.lower_bound(rhs) {
            return Entailment::False;
        }

        if self
            .array()
            .iter()
            .any(|&element| context.upper_bound(element) > rhs_ub)
        {
            return Entailment::Undefined;
        }

        if context.is_fixed(rhs)
            && self.array().iter().any(|&element| {
                context.is_fixed(element) && context.lower_bound(element) == rhs_ub
            })
        {
            return Entailment::True;
        }

        Entailment::Undefined
    }

    fn explain(&self, explanation: &mut Explanation, graph: &ImplicationGraph, position: usize) {
        let rhs = self.rhs();
        let pivot = graph.variable_at(position);
        let event = graph.event_at(position);
        let m = graph.value_at(position);

        let at_least = |variable: VariableId, bound: i32| {
            let mut set = graph.root_domain(variable);
            set.retain_between(bound, IntervalSet::MAX);
            set
        };
        let at_most = |variable: VariableId, bound: i32| {
            let mut set = graph.root_domain(variable);
            set.retain_between(IntervalSet::MIN, bound);
            set
        };

        match event {
            DomainEvent::LowerBound if pivot == rhs => {
                // rhs >= m because an element is at least m
                explanation.add_pivot(rhs, at_least(rhs, m));
                for &element in self.array() {
                    if graph.lower_bound_at(element, position) >= m {
                        explanation.add(element, at_most(element, m.saturating_sub(1)));
                    }
                }
            }
            DomainEvent::UpperBound if pivot == rhs => {
                // rhs <= m because all elements are at most m
                explanation.add_pivot(rhs, at_most(rhs, m));
                for &element in self.array() {
                    let above = at_least(element, m.saturating_add(1));
                    if !above.is_empty() {
                        explanation.add(element, above);
                    }
                }
            }
            DomainEvent::LowerBound => {
                // the element is the only one which can reach the lower bound of rhs
                explanation.add(rhs, at_most(rhs, m.saturating_sub(1)));
                for &element in self.array() {
                    if element != pivot {
                        let reaching = at_least(element, m);
                        if !reaching.is_empty() {
                            explanation.add(element, reaching);
                        }
                    }
                }
                explanation.add_pivot(pivot, at_least(pivot, m));
            }
            DomainEvent::UpperBound => {
                explanation.add(rhs, at_least(rhs, m.saturating_add(1)));
                explanation.add_pivot(pivot, at_most(pivot, m));
            }
            DomainEvent::Assign | DomainEvent::Removal => {
                explain_by_scope(&self.scope, explanation, graph, position)
            }
        }
    }
}
