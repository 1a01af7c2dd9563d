use super::ConflictAnalysisContext;
use super::ConflictResolver;
use super::LearnedClause;

#[derive(Debug, Copy, Clone, Default)]
pub(crate) struct NoLearning;

impl ConflictResolver for NoLearning {
    fn resolve_conflict(&mut self, _context: &ConflictAnalysisContext) -> Option<LearnedClause> {
        // In the case of no learning, this method does not do anything
        None
    }
}
