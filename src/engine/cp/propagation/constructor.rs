use super::propagation_context::HasAssignments;
use super::Propagator;
use super::PropagatorId;
use crate::basic_types::ConstraintOperationError;
use crate::engine::cp::trailed::TrailedSet;
use crate::engine::cp::trailed::TrailedValues;
use crate::engine::cp::Assignments;

/// A propagator constructor turns an argument struct into an implementation of [`Propagator`].
///
/// The constructor is the point where a propagator can inspect the domains at the time it is
/// added and allocate its backtrackable state.
pub trait PropagatorConstructor {
    /// The propagator to construct.
    type PropagatorImpl: Propagator + 'static;

    /// The constructor function.
    fn create(
        self,
        context: &mut PropagatorConstructorContext<'_>,
    ) -> Result<Self::PropagatorImpl, ConstraintOperationError>;
}

/// [`PropagatorConstructorContext`] is used when adding propagators to the
/// [`crate::engine::PropagationEngine`].
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    assignments: &'a Assignments,
    trailed_values: &'a mut TrailedValues,
    propagator_id: PropagatorId,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        assignments: &'a Assignments,
        trailed_values: &'a mut TrailedValues,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagatorConstructorContext {
            assignments,
            trailed_values,
            propagator_id,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Allocates a backtrackable set over `0..capacity`, initially empty.
    pub fn new_trailed_set(&mut self, capacity: usize) -> TrailedSet {
        self.trailed_values.grow_set(capacity)
    }
}

impl HasAssignments for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}
