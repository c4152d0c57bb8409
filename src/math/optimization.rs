pub mod simplex;

use num_traits::Float;
use std::fmt::Debug;

pub use simplex::{solve as simplex_solve, Direction, LinearProgram, LpSolution, Relation};

/// Configuration options for the simplex engine.
#[derive(Debug, Clone)]
pub struct OptimizationConfig<T>
where
    T: Float + Debug,
{
    /// Maximum number of pivots across both phases
    pub max_iterations: usize,
    /// Pivot and optimality tolerance
    pub tolerance: T,
    /// Largest phase-one residual still accepted as feasible
    pub feasibility_tolerance: T,
}

impl Default for OptimizationConfig<f64> {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 1e-9,
            feasibility_tolerance: 1e-7,
        }
    }
}

/// Terminal status of a linear program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
}
