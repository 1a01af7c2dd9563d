use super::ConflictAnalysisContext;
use super::LearnedClause;

pub(crate) trait ConflictResolver {
    /// Derives a clause which is falsified by the current domains from the pending failure, or
    /// returns `None` if no clause can be learned.
    fn resolve_conflict(&mut self, context: &ConflictAnalysisContext) -> Option<LearnedClause>;
}

/// After a conflict, the engine can learn a clause from it before backtracking. The strategy
/// determines whether it does so.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ConflictResolutionStrategy {
    /// Learn a clause over the decisions which led to the conflict.
    #[default]
    AllDecision,
    /// Only backtrack.
    NoLearning,
}
