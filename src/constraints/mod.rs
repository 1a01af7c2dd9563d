//! A constraint is a relation over variables. In the engine, constraints are enforced through
//! propagators, and therefore constraints can be viewed as a collection of propagators.
//!
//! Learned clauses are materialised through the [`ClauseBuilder`], which posts either a
//! [`member`] or a [`clause`] constraint.

mod clause_builder;

pub use clause_builder::ClauseBuilder;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::IntervalSet;
use crate::engine::cp::propagation::PropagatorConstructor;
use crate::engine::variables::VariableId;
use crate::engine::PropagationEngine;
use crate::propagators::CountArgs;
use crate::propagators::MaximumArgs;
use crate::propagators::MemberArgs;
use crate::propagators::SignedClauseArgs;

/// A [`Constraint`] is a relation over variables.
pub trait Constraint {
    /// Post the constraint to the engine.
    fn post(self, engine: &mut PropagationEngine) -> Result<(), ConstraintOperationError>;
}

impl<Constructor> Constraint for Constructor
where
    Constructor: PropagatorConstructor,
{
    fn post(self, engine: &mut PropagationEngine) -> Result<(), ConstraintOperationError> {
        engine.add_propagator(self).map(|_| ())
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, engine: &mut PropagationEngine) -> Result<(), ConstraintOperationError> {
        self.into_iter().try_for_each(|c| c.post(engine))
    }
}

/// Creates the [`Constraint`] `|{i | vars[i] = value}| = card`.
pub fn count(vars: impl Into<Box<[VariableId]>>, value: i32, card: VariableId) -> impl Constraint {
    CountArgs {
        vars: vars.into(),
        value,
        card,
    }
}

/// Creates the [`Constraint`] `max(array) = rhs`.
pub fn maximum(array: impl Into<Box<[VariableId]>>, rhs: VariableId) -> impl Constraint {
    MaximumArgs {
        array: array.into(),
        rhs,
    }
}

/// Creates the [`Constraint`] `var ∈ allowed`.
pub fn member(var: VariableId, allowed: IntervalSet) -> impl Constraint {
    MemberArgs { var, allowed }
}

/// Creates the [`Constraint`] `\/ (var ∈ allowed)` over the given literals.
pub fn clause(literals: impl Into<Vec<(VariableId, IntervalSet)>>) -> impl Constraint {
    SignedClauseArgs {
        literals: literals.into(),
    }
}
