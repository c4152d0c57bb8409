use log::debug;

use crate::error::SolverError;
use crate::math::integer_linear::benders::Instance;
use crate::math::integer_linear::SolverEngine;
use crate::math::optimization::{Direction, LinearProgram, LpStatus, Relation};

/// Outcome of the dual subproblem at a fixed `Y`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubproblemSolution {
    pub status: LpStatus,
    /// Dual multipliers `u`, one per linking constraint; empty unless optimal
    pub duals: Vec<f64>,
    pub objective_value: f64,
}

impl SubproblemSolution {
    pub fn is_optimal(&self) -> bool {
        self.status == LpStatus::Optimal
    }
}

/// The continuous subproblem in dual form:
///
/// maximize sum (b_i - g_i * Y) u_i
/// subject to A^T u ≤ c, u ≥ 0
///
/// Only the objective depends on `Y`; the constraint rows are fixed when the
/// subproblem is built.
pub struct Subproblem<'a> {
    instance: &'a Instance,
    rows: Vec<Vec<f64>>,
}

impl<'a> Subproblem<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            rows: instance.dual_rows(),
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn program(&self, y: f64) -> LinearProgram<f64> {
        self.over_dual_region(self.instance.dual_objective(y))
    }

    /// A maximization over the dual feasible region with the given objective.
    pub(crate) fn over_dual_region(&self, objective: Vec<f64>) -> LinearProgram<f64> {
        let mut lp = LinearProgram::new(Direction::Maximize, objective);
        for (row, &cost) in self.rows.iter().zip(self.instance.costs.iter()) {
            lp.add_constraint(row.clone(), Relation::LessEqual, cost);
        }
        lp
    }

    pub fn solve<E>(&self, engine: &E, y: i64) -> Result<SubproblemSolution, SolverError>
    where
        E: SolverEngine + ?Sized,
    {
        let solution = engine.solve_lp(&self.program(y as f64))?;
        debug!(
            "subproblem at Y = {}: {:?} after {} pivots",
            y, solution.status, solution.iterations
        );
        Ok(SubproblemSolution {
            status: solution.status,
            duals: solution.values,
            objective_value: solution.objective_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::integer_linear::SolverSession;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_subproblem_at_reference_point() {
        let instance = Instance::canonical();
        let session = SolverSession::default();

        let solution = Subproblem::new(&instance).solve(&session, 5).unwrap();

        assert!(solution.is_optimal());
        assert_abs_diff_eq!(solution.objective_value, 28.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.duals[0], 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.duals[1], 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_subproblem_unique_vertex() {
        let instance = Instance::canonical();
        let session = SolverSession::default();

        let solution = Subproblem::new(&instance).solve(&session, 7).unwrap();

        assert_abs_diff_eq!(solution.objective_value, 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.duals[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.duals[1], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_subproblem_at_upper_bound() {
        // Every objective coefficient is negative, so u = 0 is optimal
        let instance = Instance::canonical();
        let session = SolverSession::default();

        let solution = Subproblem::new(&instance).solve(&session, 12).unwrap();

        assert!(solution.is_optimal());
        assert_abs_diff_eq!(solution.objective_value, 0.0);
        assert!(solution.duals.iter().all(|&u| u == 0.0));
        assert!(instance.fixed_cost * 12.0 + solution.objective_value > 78.0);
    }

    #[test]
    fn test_unbounded_dual_when_primal_infeasible() {
        // -x + Y >= 3 has no x >= 0 for Y < 3
        let instance = Instance {
            fixed_cost: 1.0,
            costs: vec![1.0],
            matrix: vec![vec![-1.0]],
            linking: vec![1.0],
            rhs: vec![3.0],
            y_low: 2,
            y_high: 6,
            reference_point: None,
        };
        let session = SolverSession::default();
        let subproblem = Subproblem::new(&instance);

        let solution = subproblem.solve(&session, 2).unwrap();
        assert_eq!(solution.status, LpStatus::Unbounded);
        assert!(solution.duals.is_empty());

        let solution = subproblem.solve(&session, 4).unwrap();
        assert!(solution.is_optimal());
        assert_abs_diff_eq!(solution.objective_value, 0.0);
    }

    #[test]
    fn test_program_only_changes_objective() {
        let instance = Instance::canonical();
        let subproblem = Subproblem::new(&instance);

        let at_two = subproblem.program(2.0);
        let at_seven = subproblem.program(7.0);

        assert_eq!(at_two.constraints, at_seven.constraints);
        assert_eq!(at_two.rhs, vec![18.0, 8.0, 20.0]);
        assert_eq!(at_two.objective, vec![8.0, 8.0]);
        assert_eq!(at_seven.objective, vec![-2.0, 3.0]);
    }
}
