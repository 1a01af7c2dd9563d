//! Contains the main building blocks for propagators.
//!
//! A propagator takes as input a set of variables (`x_i ∈ X`) and for each variable a corresponding
//! domain (`D_i ∈ D`); it can then be seen as a function which maps `D ↦ D'` such that `D'_i ⊆ D_i`
//! for all variables.
//!
//! Each concrete propagator is associated with two structs, which implement traits with
//! corresponding names:
//! - [`Propagator`]: contains the filtering, entailment and explanation logic.
//! - [`PropagatorConstructor`]: propagators do not directly communicate with the engine, but use
//!   this struct as a communication point during creation to allocate backtrackable state.
//!
//! The engine first calls [`Propagator::propagate_full`] on a new propagator. Afterwards, changes
//! to the variables in its scope are delivered through [`Propagator::propagate_event`], filtered
//! by [`Propagator::propagation_conditions`]. A propagator that can never prune again may mark
//! itself passive through [`PropagationContextMut`], which is undone on backtracking.
//!
//! When conflict analysis needs to know why a propagator made an update, it calls
//! [`Propagator::explain`] with the position of the update in the [`ImplicationGraph`].

mod constructor;
mod explanation;
pub(crate) mod propagation_context;
mod propagator;
mod propagator_id;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use explanation::explain_by_scope;
#[cfg(any(test, doc, feature = "explanation-checks"))]
pub(crate) use explanation::is_valid_explanation;
pub use explanation::Explanation;
pub use propagation_context::PropagationContext;
pub use propagation_context::PropagationContextMut;
pub(crate) use propagation_context::ReadDomains;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;

#[cfg(doc)]
use crate::engine::cp::ImplicationGraph;
