use crate::error::SolverError;
use crate::math::optimization::LinearProgram;

pub mod benders;
pub mod branch_and_bound;
pub mod session;

/// A linear program where some variables must take integer values.
#[derive(Debug, Clone)]
pub struct IntegerLinearProgram {
    pub program: LinearProgram<f64>,
    /// Indices of the integer variables (the rest are continuous)
    pub integer_vars: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct ILPSolution {
    pub values: Vec<f64>,
    pub objective_value: f64,
    pub status: ILPStatus,
    pub nodes_explored: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ILPStatus {
    Optimal,
    Infeasible,
    Unbounded,
    MaxIterationsReached,
}

pub trait ILPSolver {
    fn solve(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution, SolverError>;
}

pub use benders::{BendersConfig, BendersDecomposition, BendersOutcome, CutStrategy, Instance};
pub use branch_and_bound::BranchAndBoundSolver;
pub use session::{SessionConfig, SessionStats, SolverEngine, SolverSession};
