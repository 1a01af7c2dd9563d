mod sparse_set;
mod trailed_change;
mod trailed_values;

pub(crate) use sparse_set::SparseSet;
pub(crate) use trailed_change::TrailedChange;
pub use trailed_values::TrailedInteger;
pub use trailed_values::TrailedSet;
pub(crate) use trailed_values::TrailedValues;
