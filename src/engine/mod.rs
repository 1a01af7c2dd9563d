pub(crate) mod conflict_analysis;
pub(crate) mod cp;
mod propagation_engine;
pub(crate) mod variables;

mod variable_names;

#[cfg(any(test, doc))]
pub(crate) mod test_helper;

pub use propagation_engine::Checkpoint;
pub use propagation_engine::EngineOptions;
pub use propagation_engine::EngineState;
pub use propagation_engine::PropagationEngine;
pub(crate) use variable_names::VariableNames;
