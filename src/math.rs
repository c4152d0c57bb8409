pub mod integer_linear;
pub mod optimization;

pub use optimization::{
    simplex_solve, Direction, LinearProgram, LpSolution, LpStatus, OptimizationConfig, Relation,
};

pub use integer_linear::{
    BendersDecomposition, BranchAndBoundSolver, ILPSolution, ILPSolver, ILPStatus,
    IntegerLinearProgram, SolverEngine, SolverSession,
};
