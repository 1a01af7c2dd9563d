/// A set over `0..capacity` with constant time insertion, removal and membership.
///
/// The members are the first `size` entries of `dense`; `positions[e]` is the index of `e` in
/// `dense`.
#[derive(Debug, Clone)]
pub(crate) struct SparseSet {
    dense: Vec<usize>,
    positions: Vec<usize>,
    size: usize,
}

impl SparseSet {
    pub(crate) fn new(capacity: usize) -> SparseSet {
        SparseSet {
            dense: (0..capacity).collect(),
            positions: (0..capacity).collect(),
            size: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.size
    }

    pub(crate) fn contains(&self, element: usize) -> bool {
        self.positions
            .get(element)
            .is_some_and(|&position| position < self.size)
    }

    /// Returns whether the element was inserted.
    pub(crate) fn insert(&mut self, element: usize) -> bool {
        if self.contains(element) {
            return false;
        }
        self.swap(self.positions[element], self.size);
        self.size += 1;
        true
    }

    /// Returns whether the element was removed.
    pub(crate) fn remove(&mut self, element: usize) -> bool {
        if !self.contains(element) {
            return false;
        }
        self.size -= 1;
        self.swap(self.positions[element], self.size);
        true
    }

    pub(crate) fn elements(&self) -> &[usize] {
        &self.dense[..self.size]
    }

    fn swap(&mut self, left: usize, right: usize) {
        self.dense.swap(left, right);
        self.positions[self.dense[left]] = left;
        self.positions[self.dense[right]] = right;
    }
}

#[cfg(test)]
mod tests {
    use super::SparseSet;

    #[test]
    fn insert_and_remove_update_membership() {
        let mut set = SparseSet::new(5);

        assert!(set.insert(3));
        assert!(set.insert(1));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 2);

        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert!(!set.contains(3));
        assert_eq!(set.elements(), &[1]);
    }

    #[test]
    fn elements_outside_capacity_are_not_members() {
        let set = SparseSet::new(2);
        assert!(!set.contains(7));
    }
}
