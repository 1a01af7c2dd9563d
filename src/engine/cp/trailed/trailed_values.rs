use super::SparseSet;
use super::TrailedChange;
use crate::basic_types::KeyedVec;
use crate::basic_types::StorageKey;
use crate::basic_types::Trail;

/// A handle to an integer whose value is restored on backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}

/// A handle to a set of indices whose membership is restored on backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailedSet {
    id: u32,
}

impl StorageKey for TrailedSet {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}

/// Owns the backtrackable auxiliary state of propagators. Every change is recorded on a single
/// trail, which is undone in reverse order on [`TrailedValues::synchronise`].
#[derive(Default, Debug, Clone)]
pub(crate) struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
    sets: KeyedVec<TrailedSet, SparseSet>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub(crate) fn grow_set(&mut self, capacity: usize) -> TrailedSet {
        self.sets.push(SparseSet::new(capacity))
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }
        self.trail.push(TrailedChange::Integer {
            reference: trailed_integer,
            old_value,
        });
        self.values[trailed_integer] = value;
    }

    pub(crate) fn set(&self, trailed_set: TrailedSet) -> &SparseSet {
        &self.sets[trailed_set]
    }

    pub(crate) fn insert(&mut self, trailed_set: TrailedSet, element: usize) -> bool {
        let inserted = self.sets[trailed_set].insert(element);
        if inserted {
            self.trail.push(TrailedChange::Inserted {
                reference: trailed_set,
                element,
            });
        }
        inserted
    }

    pub(crate) fn remove(&mut self, trailed_set: TrailedSet, element: usize) -> bool {
        let removed = self.sets[trailed_set].remove(element);
        if removed {
            self.trail.push(TrailedChange::Removed {
                reference: trailed_set,
                element,
            });
        }
        removed
    }

    /// Removes every element, recording each removal.
    pub(crate) fn clear(&mut self, trailed_set: TrailedSet) {
        while let Some(&element) = self.sets[trailed_set].elements().last() {
            let _ = self.remove(trailed_set, element);
        }
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        for change in self.trail.synchronise(new_checkpoint) {
            match change {
                TrailedChange::Integer {
                    reference,
                    old_value,
                } => self.values[reference] = old_value,
                TrailedChange::Inserted { reference, element } => {
                    let _ = self.sets[reference].remove(element);
                }
                TrailedChange::Removed { reference, element } => {
                    let _ = self.sets[reference].insert(element);
                }
            }
        }
    }
}
