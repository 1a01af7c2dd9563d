use crate::basic_types::KeyedVec;
use crate::engine::cp::propagation::Explanation;
use crate::engine::cp::propagation::Propagator;
use crate::engine::cp::propagation::PropagatorId;
use crate::engine::cp::ImplicationGraph;
#[cfg(feature = "explanation-checks")]
use crate::kestrel_assert_simple;

/// Used during conflict analysis to provide the necessary information.
pub(crate) struct ConflictAnalysisContext<'a> {
    pub(crate) graph: ImplicationGraph<'a>,
    pub(crate) propagators: &'a KeyedVec<PropagatorId, Box<dyn Propagator>>,
}

impl std::fmt::Debug for ConflictAnalysisContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConflictAnalysisContext")
            .field("graph", &self.graph)
            .field("num_propagators", &self.propagators.len())
            .finish()
    }
}

impl ConflictAnalysisContext<'_> {
    /// Asks the propagator which made the update at `position` to explain it. Returns `None` for
    /// decisions and root facts.
    pub(crate) fn explain(&self, position: usize) -> Option<Explanation> {
        let cause = self.graph.cause_at(position)?;
        let mut explanation = Explanation::default();
        self.propagators[cause].explain(&mut explanation, &self.graph, position);

        #[cfg(feature = "explanation-checks")]
        kestrel_assert_simple!(
            crate::engine::cp::propagation::is_valid_explanation(
                &explanation,
                &self.graph,
                position
            ),
            "{} gave an invalid explanation for position {position}: {explanation:?}",
            self.propagators[cause].name()
        );

        Some(explanation)
    }
}
