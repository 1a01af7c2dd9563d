use super::assignments::TrailEntry;
use super::Assignments;
use super::DomainEvent;
use super::DomainOperation;
use crate::basic_types::IntervalSet;
use crate::engine::cp::propagation::PropagatorId;
use crate::engine::variables::VariableId;
use crate::kestrel_assert_moderate;
use crate::kestrel_assert_simple;

/// A read-only view of the history of the domain store, used to compute explanations.
///
/// Positions index the trail. The pending failure, if any, is located at position [`Self::len`];
/// explaining it means explaining why the failing update was attempted.
#[derive(Clone, Copy, Debug)]
pub struct ImplicationGraph<'a> {
    assignments: &'a Assignments,
}

impl<'a> ImplicationGraph<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        ImplicationGraph { assignments }
    }

    /// The number of applied updates.
    pub fn len(&self) -> usize {
        self.assignments.num_trail_entries()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, position: usize) -> &'a TrailEntry {
        match self.assignments.failure() {
            Some(entry) if position == self.len() => entry,
            _ => {
                kestrel_assert_simple!(
                    position < self.len(),
                    "there is no update at position {position}"
                );
                self.assignments.trail_entry(position)
            }
        }
    }

    /// The variable the update at `position` was requested on.
    ///
    /// # Panics
    /// The accessors of a single update panic when `position` is past the last entry, or when it
    /// equals [`Self::len`] while there is no pending failure.
    pub fn variable_at(&self, position: usize) -> VariableId {
        self.entry(position).requested_variable
    }

    /// The root variable whose domain was changed at `position`.
    pub fn root_variable_at(&self, position: usize) -> VariableId {
        self.entry(position).variable
    }

    /// The operation as requested on [`Self::variable_at`].
    pub fn operation_at(&self, position: usize) -> DomainOperation {
        self.entry(position).requested_operation
    }

    pub fn event_at(&self, position: usize) -> DomainEvent {
        self.operation_at(position).event()
    }

    pub fn value_at(&self, position: usize) -> i32 {
        self.operation_at(position).value()
    }

    pub fn cause_at(&self, position: usize) -> Option<PropagatorId> {
        self.entry(position).cause
    }

    /// Whether the update at `position` is a search decision, i.e. it has no cause and it was
    /// made after the first checkpoint.
    pub fn is_decision(&self, position: usize) -> bool {
        self.cause_at(position).is_none()
            && self.assignments.get_checkpoint() > 0
            && position >= self.assignments.checkpoint_start(1)
    }

    /// Whether the update at `position` was made before the first checkpoint.
    pub fn is_root_level(&self, position: usize) -> bool {
        self.assignments.get_checkpoint() == 0 || position < self.assignments.checkpoint_start(1)
    }

    /// The domain of `variable` just before the update at `position` was applied.
    pub fn domain_at(&self, variable: VariableId, position: usize) -> IntervalSet {
        self.assignments.domain_at(variable, position)
    }

    /// The domain of `variable` just after the update at `position`. A failing update results in
    /// an empty domain.
    pub fn domain_after(&self, variable: VariableId, position: usize) -> IntervalSet {
        kestrel_assert_moderate!(position <= self.len());
        if position == self.len() {
            IntervalSet::new()
        } else {
            self.assignments.domain_at(variable, position + 1)
        }
    }

    pub fn lower_bound_at(&self, variable: VariableId, position: usize) -> i32 {
        self.domain_at(variable, position).min().unwrap_or(i32::MAX)
    }

    pub fn upper_bound_at(&self, variable: VariableId, position: usize) -> i32 {
        self.domain_at(variable, position).max().unwrap_or(i32::MIN)
    }

    /// The domain of `variable` when it was created.
    pub fn root_domain(&self, variable: VariableId) -> IntervalSet {
        self.assignments.initial_domain(variable)
    }

    /// The values removed from the domain of `variable` before `position`.
    pub fn removed_before(&self, variable: VariableId, position: usize) -> IntervalSet {
        let mut removed = self.root_domain(variable);
        removed.remove_all(&self.domain_at(variable, position));
        removed
    }

    pub(crate) fn trail_positions(&self, variable: VariableId) -> &'a [usize] {
        self.assignments.trail_positions(variable)
    }

    pub(crate) fn assignments(&self) -> &'a Assignments {
        self.assignments
    }
}
