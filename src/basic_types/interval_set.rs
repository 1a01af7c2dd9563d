use std::fmt::Display;
use std::fmt::Formatter;

/// A set of integers stored as sorted, disjoint and non-adjacent closed ranges.
///
/// Used for the value sets of literals, where sets such as "everything up to `c`" are common and
/// are represented by a single range.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntervalSet {
    ranges: Vec<(i32, i32)>,
}

impl IntervalSet {
    pub const MIN: i32 = i32::MIN;
    pub const MAX: i32 = i32::MAX;

    pub fn new() -> IntervalSet {
        IntervalSet::default()
    }

    pub fn singleton(value: i32) -> IntervalSet {
        IntervalSet {
            ranges: vec![(value, value)],
        }
    }

    pub fn from_range(lower_bound: i32, upper_bound: i32) -> IntervalSet {
        let mut set = IntervalSet::new();
        set.add_range(lower_bound, upper_bound);
        set
    }

    pub fn from_values(values: impl IntoIterator<Item = i32>) -> IntervalSet {
        let mut set = IntervalSet::new();
        values.into_iter().for_each(|value| set.add(value));
        set
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of values in the set.
    pub fn size(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(lower, upper)| (upper as i64 - lower as i64 + 1) as u64)
            .sum()
    }

    pub fn min(&self) -> Option<i32> {
        self.ranges.first().map(|&(lower, _)| lower)
    }

    pub fn max(&self) -> Option<i32> {
        self.ranges.last().map(|&(_, upper)| upper)
    }

    pub fn contains(&self, value: i32) -> bool {
        let index = self.ranges.partition_point(|&(_, upper)| upper < value);
        self.ranges
            .get(index)
            .is_some_and(|&(lower, _)| lower <= value)
    }

    /// The smallest value in the set which is at least `value`.
    pub fn next_value(&self, value: i32) -> Option<i32> {
        let index = self.ranges.partition_point(|&(_, upper)| upper < value);
        self.ranges.get(index).map(|&(lower, _)| lower.max(value))
    }

    /// The largest value in the set which is at most `value`.
    pub fn previous_value(&self, value: i32) -> Option<i32> {
        let index = self.ranges.partition_point(|&(lower, _)| lower <= value);
        if index == 0 {
            None
        } else {
            Some(self.ranges[index - 1].1.min(value))
        }
    }

    pub fn ranges(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.ranges.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.ranges.iter().flat_map(|&(lower, upper)| lower..=upper)
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    pub fn add(&mut self, value: i32) {
        self.add_range(value, value);
    }

    pub fn add_range(&mut self, lower_bound: i32, upper_bound: i32) {
        if lower_bound > upper_bound {
            return;
        }

        let mut merged_lower = lower_bound;
        let mut merged_upper = upper_bound;
        let mut inserted = false;
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);

        for &(lower, upper) in &self.ranges {
            if (upper as i64) + 1 < merged_lower as i64 {
                ranges.push((lower, upper));
            } else if (merged_upper as i64) + 1 < lower as i64 {
                if !inserted {
                    ranges.push((merged_lower, merged_upper));
                    inserted = true;
                }
                ranges.push((lower, upper));
            } else {
                merged_lower = merged_lower.min(lower);
                merged_upper = merged_upper.max(upper);
            }
        }

        if !inserted {
            ranges.push((merged_lower, merged_upper));
        }

        self.ranges = ranges;
    }

    /// Adds every value of `other` to this set.
    pub fn add_all(&mut self, other: &IntervalSet) {
        other
            .ranges()
            .for_each(|(lower, upper)| self.add_range(lower, upper));
    }

    pub fn remove(&mut self, value: i32) {
        self.remove_between(value, value);
    }

    /// Removes all values in `[lower_bound, upper_bound]`.
    pub fn remove_between(&mut self, lower_bound: i32, upper_bound: i32) {
        if lower_bound > upper_bound {
            return;
        }

        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        for &(lower, upper) in &self.ranges {
            if upper < lower_bound || lower > upper_bound {
                ranges.push((lower, upper));
                continue;
            }
            if lower < lower_bound {
                ranges.push((lower, lower_bound - 1));
            }
            if upper > upper_bound {
                ranges.push((upper_bound + 1, upper));
            }
        }

        self.ranges = ranges;
    }

    /// Removes every value of `other` from this set.
    pub fn remove_all(&mut self, other: &IntervalSet) {
        other
            .ranges()
            .for_each(|(lower, upper)| self.remove_between(lower, upper));
    }

    /// Keeps only the values in `[lower_bound, upper_bound]`.
    pub fn retain_between(&mut self, lower_bound: i32, upper_bound: i32) {
        self.ranges = self
            .ranges
            .iter()
            .filter_map(|&(lower, upper)| {
                let lower = lower.max(lower_bound);
                let upper = upper.min(upper_bound);
                (lower <= upper).then_some((lower, upper))
            })
            .collect();
    }

    /// Keeps only the values which are also in `other`.
    pub fn retain_all(&mut self, other: &IntervalSet) {
        let mut ranges = Vec::new();
        let mut left = 0;
        let mut right = 0;

        while left < self.ranges.len() && right < other.ranges.len() {
            let (lower_left, upper_left) = self.ranges[left];
            let (lower_right, upper_right) = other.ranges[right];

            let lower = lower_left.max(lower_right);
            let upper = upper_left.min(upper_right);
            if lower <= upper {
                ranges.push((lower, upper));
            }

            if upper_left < upper_right {
                left += 1;
            } else {
                right += 1;
            }
        }

        self.ranges = ranges;
    }

    /// Returns whether the two sets share at least one value.
    pub fn intersects(&self, other: &IntervalSet) -> bool {
        let mut left = 0;
        let mut right = 0;

        while left < self.ranges.len() && right < other.ranges.len() {
            let (lower_left, upper_left) = self.ranges[left];
            let (lower_right, upper_right) = other.ranges[right];

            if lower_left.max(lower_right) <= upper_left.min(upper_right) {
                return true;
            }

            if upper_left < upper_right {
                left += 1;
            } else {
                right += 1;
            }
        }

        false
    }

    /// Returns whether every value of this set is in `other`.
    pub fn is_subset_of(&self, other: &IntervalSet) -> bool {
        self.ranges.iter().all(|&(lower, upper)| {
            let index = other.ranges.partition_point(|&(_, other_upper)| other_upper < lower);
            other
                .ranges
                .get(index)
                .is_some_and(|&(other_lower, other_upper)| {
                    other_lower <= lower && upper <= other_upper
                })
        })
    }
}

impl Display for IntervalSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, &(lower, upper)) in self.ranges.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            if lower == upper {
                write!(f, "{lower}")?;
            } else {
                write!(f, "{lower}..{upper}")?;
            }
        }
        write!(f, "}}")
    }
}

impl FromIterator<i32> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        IntervalSet::from_values(iter)
    }
}
