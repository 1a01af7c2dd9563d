use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::kestrel_assert_simple;

/// A log of inverse operations, split into segments by checkpoints.
///
/// Restoring to a checkpoint drains the entries pushed after it in reverse order, so that callers
/// can undo them one by one.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the position where the i-th checkpoint starts on the trail.
    trail_delimiter: Vec<usize>,
    trail: Vec<T>,
}

// Implemented by hand so that `T` is not required to implement `Default`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: Default::default(),
            trail_delimiter: Default::default(),
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.trail_delimiter.push(self.trail.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// The trail position at which the given checkpoint starts.
    pub(crate) fn checkpoint_start(&self, checkpoint: usize) -> usize {
        kestrel_assert_simple!(checkpoint <= self.current_checkpoint);

        if checkpoint == 0 {
            0
        } else {
            self.trail_delimiter[checkpoint - 1]
        }
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        kestrel_assert_simple!(new_checkpoint <= self.current_checkpoint);

        let new_trail_len = if new_checkpoint == self.current_checkpoint {
            self.trail.len()
        } else {
            self.trail_delimiter[new_checkpoint]
        };

        self.current_checkpoint = new_checkpoint;
        self.trail_delimiter.truncate(new_checkpoint);
        self.trail.drain(new_trail_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_values_are_observed_through_indexing() {
        let mut trail = Trail::default();

        let expected = [1, 2, 3, 4];
        for &elem in expected.iter() {
            trail.push(elem);
        }

        assert_eq!(&expected, trail.deref());
    }

    #[test]
    fn backtracking_removes_elements_beyond_checkpoint() {
        let mut trail = Trail::default();

        trail.new_checkpoint();
        trail.push(1);
        let _ = trail.synchronise(0);

        assert!(trail.is_empty());
    }

    #[test]
    fn backtracking_is_nonchronological() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_checkpoint();
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);
        trail.new_checkpoint();
        trail.push(4);

        let popped = trail.synchronise(1).collect::<Vec<_>>();
        assert_eq!(vec![4, 3], popped);
        assert_eq!(&[1, 2], trail.deref());
        assert_eq!(trail.get_checkpoint(), 1);
    }

    #[test]
    fn synchronising_to_the_current_checkpoint_is_a_no_op() {
        let mut trail = Trail::default();
        trail.new_checkpoint();
        trail.push(1);

        let popped = trail.synchronise(1).collect::<Vec<_>>();
        assert!(popped.is_empty());
        assert_eq!(&[1], trail.deref());
    }

    #[test]
    fn checkpoint_start_points_at_first_entry_of_the_checkpoint() {
        let mut trail = Trail::default();
        trail.push(1);
        trail.new_checkpoint();
        trail.push(2);
        trail.push(3);

        assert_eq!(trail.checkpoint_start(0), 0);
        assert_eq!(trail.checkpoint_start(1), 1);
    }
}
