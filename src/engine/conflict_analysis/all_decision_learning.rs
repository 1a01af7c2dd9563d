use log::debug;

use super::ConflictAnalysisContext;
use super::ConflictResolver;
use super::LearnedClause;
use crate::basic_types::HashMap;
use crate::basic_types::IntervalSet;
use crate::engine::cp::propagation::Explanation;
use crate::engine::cp::ImplicationGraph;
use crate::engine::variables::VariableId;
use crate::kestrel_assert_moderate;

/// Resolves the explanations of propagated updates until every literal of the clause is falsified
/// by a decision. Literals falsified before the first decision hold in every state the engine can
/// backtrack to, so they are dropped.
///
/// The working clause maps every root variable to the values it is allowed to take, i.e. the
/// literal `var ∈ set`. Literals on views are rewritten onto their root as they are added.
#[derive(Debug, Default)]
pub(crate) struct AllDecisionLearning {
    clause: HashMap<VariableId, IntervalSet>,
}

impl ConflictResolver for AllDecisionLearning {
    fn resolve_conflict(&mut self, context: &ConflictAnalysisContext) -> Option<LearnedClause> {
        self.clause.clear();

        let graph = &context.graph;
        let explanation = context.explain(graph.len())?;
        self.add_explanation(&explanation, graph, None);

        loop {
            let mut latest: Option<(usize, VariableId)> = None;
            let mut falsified_at_root = vec![];

            for (&variable, allowed) in &self.clause {
                match falsifying_position(graph, variable, allowed) {
                    Some(position) if !graph.is_root_level(position) => {
                        if graph.cause_at(position).is_some()
                            && latest.map_or(true, |(latest, _)| position > latest)
                        {
                            latest = Some((position, variable));
                        }
                    }
                    _ => falsified_at_root.push(variable),
                }
            }

            for variable in falsified_at_root {
                let _ = self.clause.remove(&variable);
            }

            let Some((position, variable)) = latest else {
                break;
            };

            let explanation = context.explain(position)?;
            self.add_explanation(&explanation, graph, Some(variable));
        }

        let literals = self
            .clause
            .drain()
            .map(|(variable, mut allowed)| {
                allowed.retain_all(&graph.root_domain(variable));
                (variable, allowed)
            })
            .filter(|(_, allowed)| !allowed.is_empty())
            .collect::<Vec<_>>();
        let learned_clause = LearnedClause::new(literals);

        kestrel_assert_moderate!(learned_clause
            .literals()
            .iter()
            .all(|(variable, allowed)| !graph.domain_at(*variable, graph.len()).intersects(allowed)));

        debug!("Learned clause {learned_clause}");
        Some(learned_clause)
    }
}

impl AllDecisionLearning {
    /// Merges the explanation into the working clause. When `resolved` is set, the literal on
    /// that variable is resolved against the pivot of the explanation; otherwise all literals are
    /// added as they are.
    fn add_explanation(
        &mut self,
        explanation: &Explanation,
        graph: &ImplicationGraph,
        resolved: Option<VariableId>,
    ) {
        let mut reason: HashMap<VariableId, IntervalSet> = HashMap::default();
        let mut pivot = None;

        for (variable, allowed) in explanation.literals() {
            let (root, allowed) = rewrite_on_root(graph, *variable, allowed);
            reason.entry(root).or_default().add_all(&allowed);
        }
        if let Some((variable, allowed)) = explanation.pivot() {
            let (root, allowed) = rewrite_on_root(graph, *variable, allowed);
            reason.entry(root).or_default().add_all(&allowed);
            pivot = Some(root);
        }

        if let Some(resolved) = resolved {
            kestrel_assert_moderate!(
                pivot == Some(resolved),
                "the pivot of an explanation must be the updated variable"
            );
            let pivot_values = reason.remove(&resolved).unwrap_or_default();
            if let Some(allowed) = self.clause.get_mut(&resolved) {
                allowed.retain_all(&pivot_values);
                if allowed.is_empty() {
                    let _ = self.clause.remove(&resolved);
                }
            }
        }

        for (variable, allowed) in reason {
            if !allowed.is_empty() {
                self.clause.entry(variable).or_default().add_all(&allowed);
            }
        }
    }
}

/// The latest update on `variable` which removed the last of the values in `allowed`.
fn falsifying_position(
    graph: &ImplicationGraph,
    variable: VariableId,
    allowed: &IntervalSet,
) -> Option<usize> {
    graph
        .trail_positions(variable)
        .iter()
        .rev()
        .copied()
        .find(|&position| graph.domain_at(variable, position).intersects(allowed))
}

/// Rewrites `variable ∈ allowed` into the equivalent literal on the root of `variable`.
fn rewrite_on_root(
    graph: &ImplicationGraph,
    mut variable: VariableId,
    allowed: &IntervalSet,
) -> (VariableId, IntervalSet) {
    let mut allowed = allowed.clone();
    while let Some(view) = graph.assignments().view(variable) {
        allowed = view.preimage_of_set(&allowed, &graph.root_domain(view.base()));
        variable = view.base();
    }
    allowed.retain_all(&graph.root_domain(variable));
    (variable, allowed)
}
