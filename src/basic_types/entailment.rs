/// The outcome of an entailment check of a constraint against the current domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entailment {
    /// Every assignment in the current domains satisfies the constraint.
    True,
    /// No assignment in the current domains satisfies the constraint.
    False,
    Undefined,
}

impl Entailment {
    pub fn is_true(self) -> bool {
        self == Entailment::True
    }

    pub fn is_false(self) -> bool {
        self == Entailment::False
    }
}
