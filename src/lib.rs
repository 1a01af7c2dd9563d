//! Kestrel is the propagation and explanation core of a constraint programming solver.
//!
//! The [`PropagationEngine`] owns integer variables with finite domains and the propagators which
//! filter them. It propagates to a fixpoint, backtracks to checkpoints, and when a propagation
//! fails it explains the failure as a [`LearnedClause`] over the decisions that caused it. Boolean
//! [`View`]s on integer variables are supported throughout, and learned clauses are expressed
//! over root variables only.
//!
//! ```
//! use kestrel::constraints;
//! use kestrel::constraints::Constraint;
//! use kestrel::PropagationEngine;
//!
//! let mut engine = PropagationEngine::default();
//! let a = engine.new_variable(1, 5, Some("a".to_owned()));
//! let b = engine.new_variable(3, 7, Some("b".to_owned()));
//! let result = engine.new_variable(0, 10, None);
//!
//! constraints::maximum([a, b], result)
//!     .post(&mut engine)
//!     .expect("the constraint is well-formed");
//! engine.propagate().expect("no conflict");
//!
//! assert_eq!((3, 7), (engine.lower_bound(result), engine.upper_bound(result)));
//! ```

pub(crate) mod asserts;
pub(crate) mod basic_types;
pub mod constraints;
pub(crate) mod engine;
pub mod propagators;
mod tests;

pub use basic_types::statistic_logging::statistic_logger;
pub use basic_types::ConstraintOperationError;
pub use basic_types::Entailment;
pub use basic_types::Inconsistency;
pub use basic_types::IntervalSet;
pub use basic_types::PropagationStatusCP;
pub use engine::conflict_analysis::ConflictResolutionStrategy;
pub use engine::conflict_analysis::LearnedClause;
pub use engine::cp::propagation;
pub use engine::cp::DomainEvent;
pub use engine::cp::DomainEvents;
pub use engine::cp::DomainOperation;
pub use engine::cp::ImplicationGraph;
pub use engine::variables::VariableId;
pub use engine::variables::View;
pub use engine::Checkpoint;
pub use engine::EngineOptions;
pub use engine::EngineState;
pub use engine::PropagationEngine;
