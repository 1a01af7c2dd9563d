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
use crate::engine::cp::trailed::TrailedSet;
use crate::engine::cp::DomainEvent;
use crate::engine::cp::ImplicationGraph;
use crate::engine::variables::VariableId;
use crate::kestrel_assert_extreme;

/// Arguments of the propagator which enforces `|{i | vars[i] = value}| = card`.
#[derive(Debug, Clone)]
pub struct CountArgs {
    pub vars: Box<[VariableId]>,
    pub value: i32,
    pub card: VariableId,
}

impl PropagatorConstructor for CountArgs {
    type PropagatorImpl = CountPropagator;

    fn create(
        self,
        context: &mut PropagatorConstructorContext<'_>,
    ) -> Result<Self::PropagatorImpl, ConstraintOperationError> {
        let n = self.vars.len();
        let scope = self
            .vars
            .iter()
            .copied()
            .chain(std::iter::once(self.card))
            .collect();

        Ok(CountPropagator {
            scope,
            n,
            value: self.value,
            possibles: context.new_trailed_set(n),
            mandatories: context.new_trailed_set(n),
        })
    }
}

/// Propagator for the count constraint; the scope is `vars` followed by `card`.
///
/// The indices of the variables which are fixed to the value are kept in `mandatories`, and the
/// indices of those which can still take the value but are not fixed are kept in `possibles`. The
/// two sets are disjoint and backtrackable, and the number of variables taking the value is
/// bounded by `|mandatories|` and `|mandatories| + |possibles|`.
///
/// Once `card` is fixed and either bound is reached, the remaining possible variables are all
/// forced to take the value, or all forced not to.
#[derive(Debug)]
pub struct CountPropagator {
    scope: Box<[VariableId]>,
    n: usize,
    value: i32,
    possibles: TrailedSet,
    mandatories: TrailedSet,
}

impl CountPropagator {
    fn card(&self) -> VariableId {
        self.scope[self.n]
    }

    fn filter(&self, context: &mut PropagationContextMut) -> PropagationStatusCP {
        let card = self.card();
        let num_mandatory = context.set_len(self.mandatories) as i32;
        let num_possible = context.set_len(self.possibles) as i32;

        let _ = context.tighten_lower_bound(card, num_mandatory)?;
        let _ = context.tighten_upper_bound(card, num_mandatory + num_possible)?;

        if !context.is_fixed(card) {
            return Ok(());
        }

        let nb = context.lower_bound(card);
        let possibles = context.set_elements(self.possibles).to_vec();

        if num_mandatory + num_possible == nb {
            for index in possibles {
                let _ = context.insert(self.mandatories, index);
                let _ = context.instantiate(self.scope[index], self.value)?;
            }
            context.clear(self.possibles);
        } else if num_mandatory == nb {
            for index in possibles {
                let _ = context.remove(self.scope[index], self.value)?;
            }
            context.clear(self.possibles);
        }

        kestrel_assert_extreme!((0..self.n).all(|index| {
            !(context.set_contains(self.possibles, index)
                && context.set_contains(self.mandatories, index))
        }));

        Ok(())
    }

    /// The literal `var ∈ root(var) ∩ [lower_bound, upper_bound]`.
    fn between(
        graph: &ImplicationGraph,
        var: VariableId,
        lower_bound: i32,
        upper_bound: i32,
    ) -> IntervalSet {
        let mut set = graph.root_domain(var);
        set.retain_between(lower_bound, upper_bound);
        set
    }

    /// The literal `var ∈ root(var) \ {value}`.
    fn without_value(&self, graph: &ImplicationGraph, var: VariableId) -> IntervalSet {
        let mut set = graph.root_domain(var);
        set.remove(self.value);
        set
    }

    /// The literal `var ∈ root(var) ∩ {value}`.
    fn with_value(&self, graph: &ImplicationGraph, var: VariableId) -> IntervalSet {
        Self::between(graph, var, self.value, self.value)
    }

    /// Adds `var ≠ value` for every variable other than `except` fixed to the value before
    /// `position`.
    fn explain_by_fixed(
        &self,
        explanation: &mut Explanation,
        graph: &ImplicationGraph,
        position: usize,
        except: Option<VariableId>,
    ) {
        for &var in &self.scope[..self.n] {
            if Some(var) != except
                && graph.lower_bound_at(var, position) == self.value
                && graph.upper_bound_at(var, position) == self.value
            {
                explanation.add(var, self.without_value(graph, var));
            }
        }
    }

    /// Adds `var = value` for every variable other than `except` which could no longer take the
    /// value before `position`.
    fn explain_by_excluded(
        &self,
        explanation: &mut Explanation,
        graph: &ImplicationGraph,
        position: usize,
        except: Option<VariableId>,
    ) {
        for &var in &self.scope[..self.n] {
            if Some(var) != except && !graph.domain_at(var, position).contains(self.value) {
                let literal = self.with_value(graph, var);
                if !literal.is_empty() {
                    explanation.add(var, literal);
                }
            }
        }
    }
}

impl Propagator for CountPropagator {
    fn name(&self) -> &str {
        "Count"
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate_full(&self, mut context: PropagationContextMut) -> PropagationStatusCP {
        context.clear(self.mandatories);
        context.clear(self.possibles);

        for (index, &var) in self.scope[..self.n].iter().enumerate() {
            if context.is_fixed(var) {
                if context.lower_bound(var) == self.value {
                    let _ = context.insert(self.mandatories, index);
                }
            } else if context.contains(var, self.value) {
                let _ = context.insert(self.possibles, index);
            }
        }

        self.filter(&mut context)
    }

    fn propagate_event(
        &self,
        mut context: PropagationContextMut,
        local_index: usize,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatusCP {
        if local_index == self.n {
            return self.filter(&mut context);
        }

        if !context.set_contains(self.possibles, local_index) {
            return Ok(());
        }

        let var = self.scope[local_index];
        if !context.contains(var, self.value) {
            let _ = context.remove_element(self.possibles, local_index);
            self.filter(&mut context)
        } else if context.is_fixed(var) {
            let _ = context.remove_element(self.possibles, local_index);
            let _ = context.insert(self.mandatories, local_index);
            self.filter(&mut context)
        } else {
            Ok(())
        }
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let mut min = 0;
        let mut max = 0;
        for &var in &self.scope[..self.n] {
            if context.is_fixed(var) && context.lower_bound(var) == self.value {
                min += 1;
                max += 1;
            } else if context.contains(var, self.value) {
                max += 1;
            }
        }

        let card = self.card();
        if context.lower_bound(card) > max || context.upper_bound(card) < min {
            Entailment::False
        } else if context.is_fixed(card) && min == max {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }

    fn explain(&self, explanation: &mut Explanation, graph: &ImplicationGraph, position: usize) {
        let card = self.card();
        let pivot = graph.variable_at(position);
        let m = graph.value_at(position);

        match graph.event_at(position) {
            DomainEvent::LowerBound if pivot == card => {
                explanation.add_pivot(card, Self::between(graph, card, m, IntervalSet::MAX));
                self.explain_by_fixed(explanation, graph, position, None);
            }
            DomainEvent::UpperBound if pivot == card => {
                explanation.add_pivot(card, Self::between(graph, card, IntervalSet::MIN, m));
                self.explain_by_excluded(explanation, graph, position, None);
            }
            DomainEvent::Assign if pivot != card && m == self.value => {
                // as many variables have to take the value as can take it
                let nb = graph.lower_bound_at(card, position);
                explanation.add(
                    card,
                    Self::between(graph, card, IntervalSet::MIN, nb.saturating_sub(1)),
                );
                self.explain_by_excluded(explanation, graph, position, Some(pivot));
                explanation.add_pivot(pivot, self.with_value(graph, pivot));
            }
            DomainEvent::Removal if pivot != card && m == self.value => {
                // enough variables already take the value
                let nb = graph.upper_bound_at(card, position);
                explanation.add(
                    card,
                    Self::between(graph, card, nb.saturating_add(1), IntervalSet::MAX),
                );
                self.explain_by_fixed(explanation, graph, position, Some(pivot));
                explanation.add_pivot(pivot, self.without_value(graph, pivot));
            }
            _ => explain_by_scope(&self.scope, explanation, graph, position),
        }
    }
}
