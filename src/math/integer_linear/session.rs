//! The solver engine seam used by every decomposition component.
//!
//! Components never reach a global solver environment: they receive a
//! [`SolverEngine`] by reference. [`SolverSession`] is the in-crate engine,
//! built once per run and released when it goes out of scope.

use std::cell::Cell;

use log::debug;

use crate::error::SolverError;
use crate::math::integer_linear::{
    BranchAndBoundSolver, ILPSolution, ILPSolver, IntegerLinearProgram,
};
use crate::math::optimization::{simplex_solve, LinearProgram, LpSolution, OptimizationConfig};

/// Capability to solve linear and mixed-integer programs.
pub trait SolverEngine {
    fn solve_lp(&self, lp: &LinearProgram<f64>) -> Result<LpSolution<f64>, SolverError>;

    fn solve_ilp(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution, SolverError>;

    /// Integer feasibility tolerance; the decomposition stops once its
    /// bounds are closer than this.
    fn integer_tolerance(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub lp: OptimizationConfig<f64>,
    pub integer_tolerance: f64,
    pub max_nodes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lp: OptimizationConfig::default(),
            integer_tolerance: 1e-5,
            max_nodes: 10_000,
        }
    }
}

/// Counters accumulated over the life of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub lp_solves: usize,
    pub ilp_solves: usize,
    pub pivots: usize,
    pub nodes: usize,
}

pub struct SolverSession {
    config: SessionConfig,
    branch_and_bound: BranchAndBoundSolver,
    stats: Cell<SessionStats>,
}

impl SolverSession {
    pub fn new(config: SessionConfig) -> Self {
        let branch_and_bound = BranchAndBoundSolver::new(config.max_nodes, config.integer_tolerance)
            .with_lp_config(config.lp.clone());
        Self {
            config,
            branch_and_bound,
            stats: Cell::new(SessionStats::default()),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.get()
    }

    fn record(&self, update: impl FnOnce(&mut SessionStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl Default for SolverSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SolverEngine for SolverSession {
    fn solve_lp(&self, lp: &LinearProgram<f64>) -> Result<LpSolution<f64>, SolverError> {
        let solution = simplex_solve(lp, &self.config.lp)?;
        self.record(|stats| {
            stats.lp_solves += 1;
            stats.pivots += solution.iterations;
        });
        Ok(solution)
    }

    fn solve_ilp(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution, SolverError> {
        let solution = self.branch_and_bound.solve(problem)?;
        self.record(|stats| {
            stats.ilp_solves += 1;
            stats.nodes += solution.nodes_explored;
        });
        Ok(solution)
    }

    fn integer_tolerance(&self) -> f64 {
        self.config.integer_tolerance
    }
}

impl Drop for SolverSession {
    fn drop(&mut self) {
        let stats = self.stats.get();
        debug!(
            "releasing solver session: {} LP solves ({} pivots), {} MIP solves ({} nodes)",
            stats.lp_solves, stats.pivots, stats.ilp_solves, stats.nodes
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::optimization::{Direction, Relation};

    #[test]
    fn test_session_counts_solves() {
        let session = SolverSession::default();
        let lp = LinearProgram::new(Direction::Maximize, vec![1.0])
            .with_constraint(vec![2.0], Relation::LessEqual, 3.0);

        session.solve_lp(&lp).unwrap();
        session
            .solve_ilp(&IntegerLinearProgram {
                program: lp,
                integer_vars: vec![0],
            })
            .unwrap();

        let stats = session.stats();
        assert_eq!(stats.lp_solves, 1);
        assert_eq!(stats.ilp_solves, 1);
        assert!(stats.pivots >= 1);
        assert!(stats.nodes >= 1);
    }

    #[test]
    fn test_engine_tolerance_comes_from_config() {
        let session = SolverSession::new(SessionConfig {
            integer_tolerance: 1e-3,
            ..SessionConfig::default()
        });
        assert_eq!(session.integer_tolerance(), 1e-3);
        assert_eq!(SolverSession::default().integer_tolerance(), 1e-5);
    }

    #[test]
    fn test_faults_are_not_counted() {
        let session = SolverSession::default();
        let lp = LinearProgram::new(Direction::Maximize, vec![1.0, 1.0])
            .with_constraint(vec![1.0], Relation::LessEqual, 3.0);

        assert!(session.solve_lp(&lp).is_err());
        assert_eq!(session.stats(), SessionStats::default());
    }
}
