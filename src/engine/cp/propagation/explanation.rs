use crate::basic_types::IntervalSet;
use crate::engine::cp::ImplicationGraph;
use crate::engine::variables::VariableId;

/// The literals explaining one update. Every literal `(var, set)` means `var ∈ set`; the
/// explanation is the disjunction of all literals.
///
/// The pivot is the literal on the variable that was updated. Of the values allowed right before
/// the update, it may only allow those which remain after it, while all other literals must be
/// falsified by the domains right before the update. A restriction applied as several updates is
/// explained by the same pivot for each of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Explanation {
    literals: Vec<(VariableId, IntervalSet)>,
    pivot: Option<(VariableId, IntervalSet)>,
}

impl Explanation {
    pub fn add(&mut self, variable: VariableId, allowed: IntervalSet) {
        self.literals.push((variable, allowed));
    }

    pub fn add_pivot(&mut self, variable: VariableId, allowed: IntervalSet) {
        match &mut self.pivot {
            Some((pivot, existing)) if *pivot == variable => existing.add_all(&allowed),
            _ => self.pivot = Some((variable, allowed)),
        }
    }

    pub fn literals(&self) -> &[(VariableId, IntervalSet)] {
        &self.literals
    }

    pub fn pivot(&self) -> Option<&(VariableId, IntervalSet)> {
        self.pivot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.pivot.is_none()
    }

    pub fn clear(&mut self) {
        self.literals.clear();
        self.pivot = None;
    }
}

/// Explains the update at `position` by everything that was removed from the scope before it.
///
/// Each variable of the scope contributes `var ∈ root(var) \ dom_p(var)`; the updated variable
/// additionally allows its domain after the update.
pub fn explain_by_scope(
    scope: &[VariableId],
    explanation: &mut Explanation,
    graph: &ImplicationGraph<'_>,
    position: usize,
) {
    let pivot = graph.variable_at(position);
    for &variable in scope {
        let mut allowed = graph.removed_before(variable, position);
        if variable == pivot {
            allowed.add_all(&graph.domain_after(variable, position));
            explanation.add_pivot(variable, allowed);
        } else {
            explanation.add(variable, allowed);
        }
    }
}

/// Checks that `explanation` can justify the update at `position`: the pivot must not allow any
/// value removed by the update, and every other literal must be falsified by the domains right
/// before the update.
#[cfg(any(test, doc, feature = "explanation-checks"))]
pub(crate) fn is_valid_explanation(
    explanation: &Explanation,
    graph: &ImplicationGraph<'_>,
    position: usize,
) -> bool {
    let falsified_before = explanation
        .literals()
        .iter()
        .all(|(variable, allowed)| !allowed.intersects(&graph.domain_at(*variable, position)));

    let pivot_is_valid = match explanation.pivot() {
        Some((variable, allowed)) => {
            let after = graph.domain_after(*variable, position);
            let mut newly_allowed = graph.domain_at(*variable, position);
            newly_allowed.retain_all(allowed);
            newly_allowed.is_subset_of(&after)
        }
        None => position == graph.len(),
    };

    falsified_before && pivot_is_valid
}
