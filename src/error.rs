use thiserror::Error;

use crate::math::optimization::LpStatus;

/// Faults raised by the LP and integer engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("simplex pivot limit of {0} reached")]
    PivotLimit(usize),

    #[error("branch-and-bound node limit of {0} reached")]
    NodeLimit(usize),
}

/// Why the Pareto auxiliary solve did not produce a dual vertex.
///
/// Never fatal: the caller falls back to the plain optimality cut.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParetoError {
    #[error("auxiliary solve faulted: {0}")]
    Solver(#[from] SolverError),

    #[error("auxiliary problem ended {0:?}")]
    Status(LpStatus),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    #[error("master problem infeasible at iteration {iteration}")]
    MasterInfeasible { iteration: usize },

    #[error("master problem solve failed at iteration {iteration}: {reason}")]
    MasterSolveError { iteration: usize, reason: String },

    #[error("solver exception: {0}")]
    Solver(#[from] SolverError),

    #[error("bounds did not meet within {0} iterations")]
    IterationLimit(usize),
}

impl Error {
    /// True for the two fatal master outcomes, as opposed to engine faults.
    pub fn is_master_failure(&self) -> bool {
        matches!(
            self,
            Error::MasterInfeasible { .. } | Error::MasterSolveError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
