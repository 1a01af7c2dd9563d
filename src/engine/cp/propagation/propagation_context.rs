use super::PropagatorId;
use crate::basic_types::Inconsistency;
use crate::basic_types::IntervalSet;
use crate::engine::cp::trailed::TrailedInteger;
use crate::engine::cp::trailed::TrailedSet;
use crate::engine::cp::trailed::TrailedValues;
use crate::engine::cp::Assignments;
use crate::engine::variables::VariableId;

/// The activity state of a propagator, stored in a trailed integer so that it is restored on
/// backtracking.
pub(crate) const INACTIVE: i64 = 0;
pub(crate) const ACTIVE: i64 = 1;
/// A passive propagator can no longer prune anything and is skipped until it is restored to an
/// earlier state.
pub(crate) const PASSIVE: i64 = 2;

/// [`PropagationContext`] is passed to propagators when they only need to inspect the domains,
/// such as in [`crate::engine::cp::propagation::Propagator::is_entailed`].
#[derive(Clone, Copy, Debug)]
pub struct PropagationContext<'a> {
    assignments: &'a Assignments,
    trailed_values: &'a TrailedValues,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a TrailedValues) -> Self {
        PropagationContext {
            assignments,
            trailed_values,
        }
    }
}

/// [`PropagationContextMut`] is passed to propagators during propagation. It may be queried to
/// retrieve information about the current variable domains, or used to apply changes to the
/// domain of a variable, e.g. set `[x >= 5]`.
///
/// Every change made through the context is attributed to the propagator that owns it, which is
/// what conflict analysis uses to find the explanation of the change.
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    assignments: &'a mut Assignments,
    trailed_values: &'a mut TrailedValues,
    propagator: PropagatorId,
    state: TrailedInteger,
}

impl<'a> PropagationContextMut<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        trailed_values: &'a mut TrailedValues,
        propagator: PropagatorId,
        state: TrailedInteger,
    ) -> Self {
        PropagationContextMut {
            assignments,
            trailed_values,
            propagator,
            state,
        }
    }
}

/// A trait which defines common methods for retrieving the [`Assignments`] and
/// [`TrailedValues`] from the structure which implements this trait.
pub(crate) trait HasAssignments {
    fn assignments(&self) -> &Assignments;

    fn trailed_values(&self) -> &TrailedValues;
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}

impl HasAssignments for PropagationContextMut<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}

pub(crate) trait ReadDomains: HasAssignments {
    /// Returns `true` if the domain of the given variable is singleton.
    fn is_fixed(&self, var: VariableId) -> bool {
        self.assignments().is_fixed(var)
    }

    fn lower_bound(&self, var: VariableId) -> i32 {
        self.assignments().lower_bound(var)
    }

    fn upper_bound(&self, var: VariableId) -> i32 {
        self.assignments().upper_bound(var)
    }

    fn contains(&self, var: VariableId, value: i32) -> bool {
        self.assignments().contains(var, value)
    }

    fn domain(&self, var: VariableId) -> IntervalSet {
        self.assignments().domain(var)
    }

    fn set_len(&self, trailed_set: TrailedSet) -> usize {
        self.trailed_values().set(trailed_set).len()
    }

    fn set_contains(&self, trailed_set: TrailedSet, element: usize) -> bool {
        self.trailed_values().set(trailed_set).contains(element)
    }

    fn set_elements(&self, trailed_set: TrailedSet) -> &[usize] {
        self.trailed_values().set(trailed_set).elements()
    }
}

impl<T: HasAssignments> ReadDomains for T {}

impl PropagationContextMut<'_> {
    pub(crate) fn tighten_lower_bound(
        &mut self,
        var: VariableId,
        bound: i32,
    ) -> Result<bool, Inconsistency> {
        self.assignments
            .tighten_lower_bound(var, bound, Some(self.propagator))
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        var: VariableId,
        bound: i32,
    ) -> Result<bool, Inconsistency> {
        self.assignments
            .tighten_upper_bound(var, bound, Some(self.propagator))
    }

    pub(crate) fn update_bounds(
        &mut self,
        var: VariableId,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<bool, Inconsistency> {
        self.assignments
            .update_bounds(var, lower_bound, upper_bound, Some(self.propagator))
    }

    pub(crate) fn remove(&mut self, var: VariableId, value: i32) -> Result<bool, Inconsistency> {
        self.assignments
            .remove_value(var, value, Some(self.propagator))
    }

    pub(crate) fn instantiate(&mut self, var: VariableId, value: i32) -> Result<bool, Inconsistency> {
        self.assignments
            .instantiate(var, value, Some(self.propagator))
    }

    pub(crate) fn restrict_to(
        &mut self,
        var: VariableId,
        allowed: &IntervalSet,
    ) -> Result<bool, Inconsistency> {
        self.assignments
            .restrict_to(var, allowed, Some(self.propagator))
    }

    pub(crate) fn insert(&mut self, trailed_set: TrailedSet, element: usize) -> bool {
        self.trailed_values.insert(trailed_set, element)
    }

    pub(crate) fn remove_element(&mut self, trailed_set: TrailedSet, element: usize) -> bool {
        self.trailed_values.remove(trailed_set, element)
    }

    pub(crate) fn clear(&mut self, trailed_set: TrailedSet) {
        self.trailed_values.clear(trailed_set)
    }

    /// Marks the propagator as unable to prune anything further. It will not be called again
    /// until the solver backtracks past this point.
    pub(crate) fn set_passive(&mut self) {
        self.trailed_values.assign(self.state, PASSIVE)
    }
}
