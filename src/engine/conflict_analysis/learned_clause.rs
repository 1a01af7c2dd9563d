use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::IntervalSet;
use crate::engine::variables::VariableId;

/// A clause `∨ (var_i ∈ S_i)` over root variables, sorted by variable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LearnedClause {
    literals: Vec<(VariableId, IntervalSet)>,
}

impl LearnedClause {
    pub(crate) fn new(mut literals: Vec<(VariableId, IntervalSet)>) -> Self {
        literals.sort_by_key(|(variable, _)| *variable);
        LearnedClause { literals }
    }

    pub fn literals(&self) -> &[(VariableId, IntervalSet)] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

impl Display for LearnedClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "false");
        }
        let literals = self
            .literals
            .iter()
            .map(|(variable, values)| format!("{variable} in {values}"))
            .collect::<Vec<_>>();
        write!(f, "{}", literals.join(" \\/ "))
    }
}
