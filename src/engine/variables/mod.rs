//! Variables are identified by a [`VariableId`]. A variable either owns a domain in the
//! [`crate::engine::cp::Assignments`], or it is a [`View`] whose domain is derived from its base.
mod variable_id;
mod view;

pub use variable_id::VariableId;
pub(crate) use view::BooleanImage;
pub(crate) use view::DomainQuery;
pub use view::View;
