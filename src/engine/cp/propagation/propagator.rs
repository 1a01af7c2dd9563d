use enumset::EnumSet;

use super::explain_by_scope;
use super::Explanation;
use super::PropagationContext;
use super::PropagationContextMut;
use crate::basic_types::Entailment;
#[cfg(doc)]
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::cp::DomainEvent;
use crate::engine::cp::DomainEvents;
use crate::engine::cp::ImplicationGraph;
use crate::engine::variables::VariableId;

/// All propagators implement the [`Propagator`] trait. Structs implementing the trait define the
/// main propagator logic with regards to propagation, detecting conflicts, and providing
/// explanations.
///
/// A propagator is created through a [`super::PropagatorConstructor`] and lives for the lifetime of
/// the [`crate::engine::PropagationEngine`]. Its scope is fixed at construction; events on the
/// variables of the scope are reported by their *local index*, the position in [`Self::scope`].
///
/// See the [`crate::engine::cp::propagation`] documentation for more details.
pub trait Propagator {
    /// Return the name of the propagator, this is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// The variables of the propagator, including auxiliary variables such as a cardinality.
    fn scope(&self) -> &[VariableId];

    /// Propagators with a lower priority value are propagated first.
    fn priority(&self) -> Priority {
        Priority::Medium
    }

    /// When `false`, every event causes a call to [`Propagator::propagate_full`] instead of
    /// [`Propagator::propagate_event`].
    fn reacts_to_fine_events(&self) -> bool {
        true
    }

    /// The events on the variable at `local_index` which should wake up this propagator.
    fn propagation_conditions(&self, _local_index: usize) -> EnumSet<DomainEvent> {
        DomainEvents::ANY_INT
    }

    /// Filter the domains from scratch. Called when the propagator is (re)activated.
    ///
    /// Any failure is returned as an [`Inconsistency`]; the domain store keeps the failing update
    /// so that it can be explained.
    fn propagate_full(&self, context: PropagationContextMut) -> PropagationStatusCP;

    /// Filter the domains after the variable at `local_index` changed by `events`.
    ///
    /// Must reach the same result as [`Propagator::propagate_full`], which it calls by default.
    fn propagate_event(
        &self,
        context: PropagationContextMut,
        _local_index: usize,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatusCP {
        self.propagate_full(context)
    }

    /// Whether the constraint is satisfied by every assignment of the current domains, by none of
    /// them, or neither. Does not modify anything.
    fn is_entailed(&self, context: PropagationContext) -> Entailment;

    /// Add the literals which justify the update at `position`, which was made by this
    /// propagator, to `explanation`.
    ///
    /// By default, this explains the update by every value removed from the scope before it.
    fn explain(&self, explanation: &mut Explanation, graph: &ImplicationGraph, position: usize) {
        explain_by_scope(self.scope(), explanation, graph, position)
    }
}

/// The scheduling priority of a propagator; cheaper propagators should have a higher priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    VeryLow = 3,
}

impl Priority {
    pub(crate) const NUM_LEVELS: usize = 4;

    pub(crate) fn level(self) -> usize {
        self as usize
    }
}
