use enumset::EnumSet;

use super::DomainEvent;
use crate::basic_types::KeyedVec;
use crate::engine::cp::propagation::PropagatorId;
use crate::engine::variables::VariableId;

/// A subscription of a propagator to the events of one variable of its scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Watcher {
    pub(crate) propagator: PropagatorId,
    /// The index of the variable in the scope of the propagator.
    pub(crate) local_index: usize,
    pub(crate) conditions: EnumSet<DomainEvent>,
}

/// For every variable, the propagators to wake up when its domain changes.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchListCP {
    watchers: KeyedVec<VariableId, Vec<Watcher>>,
}

impl WatchListCP {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(vec![]);
    }

    pub(crate) fn watch(
        &mut self,
        variable: VariableId,
        propagator: PropagatorId,
        local_index: usize,
        conditions: EnumSet<DomainEvent>,
    ) {
        if conditions.is_empty() {
            return;
        }
        self.watchers[variable].push(Watcher {
            propagator,
            local_index,
            conditions,
        });
    }

    /// The watchers of `variable` whose conditions intersect `events`.
    pub(crate) fn get_affected_watchers(
        &self,
        variable: VariableId,
        events: EnumSet<DomainEvent>,
    ) -> impl Iterator<Item = &Watcher> + '_ {
        self.watchers[variable]
            .iter()
            .filter(move |watcher| !watcher.conditions.is_disjoint(events))
    }
}
