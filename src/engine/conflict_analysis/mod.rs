//! Contains the conflict analysis which turns a failure into a learned clause. The clause is
//! derived by resolution on the explanations of the propagators, following the all-decision
//! learning scheme.
mod all_decision_learning;
mod conflict_analysis_context;
mod conflict_resolver;
mod learned_clause;
mod no_learning;

pub(crate) use all_decision_learning::AllDecisionLearning;
pub(crate) use conflict_analysis_context::ConflictAnalysisContext;
pub use conflict_resolver::ConflictResolutionStrategy;
pub(crate) use conflict_resolver::ConflictResolver;
pub use learned_clause::LearnedClause;
pub(crate) use no_learning::NoLearning;
