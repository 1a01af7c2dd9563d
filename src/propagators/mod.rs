//! Contains propagator implementations that are used in Kestrel.
//!
//! See the [`crate::engine::cp::propagation`] for info on propagators.

pub(crate) mod arithmetic;
pub(crate) mod count;
pub(crate) mod member;
pub(crate) mod signed_clause;

pub use arithmetic::maximum::MaximumArgs;
pub use arithmetic::maximum::MaximumPropagator;
pub use count::CountArgs;
pub use count::CountPropagator;
pub use member::MemberArgs;
pub use member::MemberPropagator;
pub use signed_clause::SignedClauseArgs;
pub use signed_clause::SignedClausePropagator;
