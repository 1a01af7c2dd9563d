use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    #[error("The constraint is malformed: {0}")]
    MalformedConfiguration(String),
    #[error("The accumulated explanation is unconditionally false and cannot be materialised")]
    UnsupportedDerivation,
    #[error("Adding constraint failed because the solver is in an infeasible state")]
    InfeasibleState,
    #[error("Adding the clause failed because it is infeasible at the root")]
    InfeasibleClause,
}
