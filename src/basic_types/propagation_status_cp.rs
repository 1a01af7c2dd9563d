use thiserror::Error;

use crate::engine::variables::VariableId;

/// The result of invoking a constraint programming propagator. The propagation can either succeed
/// or detect that a domain would become empty.
pub type PropagationStatusCP = Result<(), Inconsistency>;

/// The failures that can be raised by a domain operation.
///
/// When a domain operation fails, the domain is left untouched and the failing update is recorded
/// so that conflict analysis can explain it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    #[error("the domain of {variable} became empty")]
    DomainWipeout { variable: VariableId },
    #[error("the bounds of {variable} crossed")]
    BoundInversion { variable: VariableId },
}

impl Inconsistency {
    pub fn variable(&self) -> VariableId {
        match self {
            Inconsistency::DomainWipeout { variable }
            | Inconsistency::BoundInversion { variable } => *variable,
        }
    }
}
