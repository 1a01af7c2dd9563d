use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use crate::basic_types::HashSet;
use crate::engine::cp::propagation::Priority;
use crate::engine::cp::propagation::PropagatorId;
use crate::kestrel_assert_moderate;

/// Propagators waiting to be propagated, grouped by [`Priority`]. Within a priority level the
/// queue is first-in first-out, and a propagator is present at most once.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    present_propagators: HashSet<PropagatorId>,
    present_priorities: BinaryHeap<Reverse<usize>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        PropagatorQueue {
            queues: vec![VecDeque::new(); Priority::NUM_LEVELS],
            present_propagators: HashSet::default(),
            present_priorities: BinaryHeap::new(),
        }
    }
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.present_propagators.is_empty()
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        let level = priority.level();
        kestrel_assert_moderate!(level < self.queues.len());

        if !self.is_propagator_enqueued(propagator_id) {
            if self.queues[level].is_empty() {
                self.present_priorities.push(Reverse(level));
            }
            self.queues[level].push_back(propagator_id);
            let _ = self.present_propagators.insert(propagator_id);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let top_priority = self.present_priorities.peek()?.0;
        kestrel_assert_moderate!(!self.queues[top_priority].is_empty());

        let next_propagator_id = self.queues[top_priority].pop_front()?;

        let _ = self.present_propagators.remove(&next_propagator_id);

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        Some(next_propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present_priorities.pop() {
            kestrel_assert_moderate!(!self.queues[priority].is_empty());
            self.queues[priority].clear();
        }
        self.present_propagators.clear();
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.present_propagators.contains(&propagator_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priorities_are_popped_first() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(0), Priority::Low);
        queue.enqueue_propagator(PropagatorId(1), Priority::High);
        queue.enqueue_propagator(PropagatorId(2), Priority::Low);

        assert_eq!(queue.pop(), Some(PropagatorId(1)));
        assert_eq!(queue.pop(), Some(PropagatorId(0)));
        assert_eq!(queue.pop(), Some(PropagatorId(2)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn a_propagator_is_enqueued_at_most_once() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(3), Priority::Medium);
        queue.enqueue_propagator(PropagatorId(3), Priority::Medium);

        assert_eq!(queue.pop(), Some(PropagatorId(3)));
        assert!(queue.is_empty());
    }

    #[test]
    fn clearing_empties_all_levels() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue_propagator(PropagatorId(0), Priority::VeryLow);
        queue.enqueue_propagator(PropagatorId(1), Priority::High);

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
        queue.enqueue_propagator(PropagatorId(0), Priority::VeryLow);
        assert_eq!(queue.pop(), Some(PropagatorId(0)));
    }
}
