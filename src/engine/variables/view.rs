use std::fmt::Display;
use std::fmt::Formatter;

use super::VariableId;
use crate::basic_types::IntervalSet;

/// Read access to a domain, used to evaluate views on top of either the current domain of their
/// base or a domain reconstructed from the trail.
pub(crate) trait DomainQuery {
    fn lower_bound(&self) -> i32;

    fn upper_bound(&self) -> i32;

    fn contains(&self, value: i32) -> bool;

    fn is_fixed_to(&self, value: i32) -> bool {
        self.lower_bound() == value && self.upper_bound() == value
    }
}

impl DomainQuery for IntervalSet {
    fn lower_bound(&self) -> i32 {
        self.min().unwrap_or(i32::MAX)
    }

    fn upper_bound(&self) -> i32 {
        self.max().unwrap_or(i32::MIN)
    }

    fn contains(&self, value: i32) -> bool {
        IntervalSet::contains(self, value)
    }
}

/// A boolean variable derived from a base variable. A view has no storage of its own; its domain
/// is computed from the domain of its base whenever it is queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum View {
    /// `1` iff `base = constant`.
    Equal { base: VariableId, constant: i32 },
    /// `1` iff `base <= constant`.
    LessOrEqual { base: VariableId, constant: i32 },
    /// `1 - base`, where `base` is boolean.
    Not { base: VariableId },
}

impl View {
    pub fn base(&self) -> VariableId {
        match self {
            View::Equal { base, .. } | View::LessOrEqual { base, .. } | View::Not { base } => {
                *base
            }
        }
    }

    /// The domain of the view given the domain of its base.
    pub(crate) fn image(&self, base: &impl DomainQuery) -> BooleanImage {
        match *self {
            View::Equal { constant, .. } => BooleanImage {
                can_be_zero: !base.is_fixed_to(constant),
                can_be_one: base.contains(constant),
            },
            View::LessOrEqual { constant, .. } => BooleanImage {
                can_be_zero: base.upper_bound() > constant,
                can_be_one: base.lower_bound() <= constant,
            },
            View::Not { .. } => BooleanImage {
                can_be_zero: base.contains(1),
                can_be_one: base.contains(0),
            },
        }
    }

    /// The values of the base, restricted to `base_root`, for which the view takes `value`.
    pub(crate) fn preimage(&self, value: i32, base_root: &IntervalSet) -> IntervalSet {
        let mut result = base_root.clone();
        match (*self, value) {
            (View::Equal { constant, .. }, 1) => result.retain_between(constant, constant),
            (View::Equal { constant, .. }, 0) => result.remove(constant),
            (View::LessOrEqual { constant, .. }, 1) => {
                result.retain_between(IntervalSet::MIN, constant)
            }
            (View::LessOrEqual { constant, .. }, 0) => {
                result.retain_between(constant.saturating_add(1), IntervalSet::MAX)
            }
            (View::Not { .. }, 1) => result.retain_between(0, 0),
            (View::Not { .. }, 0) => result.retain_between(1, 1),
            _ => result.clear(),
        }
        result
    }

    /// The values of the base for which the view takes any value in `values`.
    pub(crate) fn preimage_of_set(&self, values: &IntervalSet, base_root: &IntervalSet) -> IntervalSet {
        let mut result = IntervalSet::new();
        for value in [0, 1] {
            if values.contains(value) {
                result.add_all(&self.preimage(value, base_root));
            }
        }
        result
    }
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Equal { base, constant } => write!(f, "[{base} = {constant}]"),
            View::LessOrEqual { base, constant } => write!(f, "[{base} <= {constant}]"),
            View::Not { base } => write!(f, "!{base}"),
        }
    }
}

/// The domain of a boolean view, as a subset of `{0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BooleanImage {
    pub(crate) can_be_zero: bool,
    pub(crate) can_be_one: bool,
}

impl BooleanImage {
    pub(crate) fn to_interval_set(self) -> IntervalSet {
        let mut set = IntervalSet::new();
        if self.can_be_zero {
            set.add(0);
        }
        if self.can_be_one {
            set.add(1);
        }
        set
    }
}

impl DomainQuery for BooleanImage {
    fn lower_bound(&self) -> i32 {
        if self.can_be_zero {
            0
        } else {
            1
        }
    }

    fn upper_bound(&self) -> i32 {
        if self.can_be_one {
            1
        } else {
            0
        }
    }

    fn contains(&self, value: i32) -> bool {
        (value == 0 && self.can_be_zero) || (value == 1 && self.can_be_one)
    }
}
