mod constraint_operation_error;
mod cumulative_moving_average;
mod entailment;
mod hash_structures;
mod interval_set;
mod keyed_vec;
mod propagation_status_cp;
pub mod statistic_logging;
mod trail;

pub use constraint_operation_error::ConstraintOperationError;
pub(crate) use cumulative_moving_average::CumulativeMovingAverage;
pub use entailment::Entailment;
pub use hash_structures::*;
pub use interval_set::IntervalSet;
pub(crate) use keyed_vec::KeyedVec;
pub(crate) use keyed_vec::StorageKey;
pub use propagation_status_cp::Inconsistency;
pub use propagation_status_cp::PropagationStatusCP;
pub(crate) use trail::Trail;
