use log::debug;

use crate::error::{Error, Result};
use crate::math::integer_linear::benders::{CutSet, Instance};
use crate::math::integer_linear::{ILPStatus, IntegerLinearProgram, SolverEngine};
use crate::math::optimization::{Direction, LinearProgram, Relation};

const THETA: usize = 0;
const Y: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterSolution {
    pub y: i64,
    pub theta: f64,
    pub objective_value: f64,
}

/// minimize theta + f * Y
/// subject to theta + a_k * Y ≥ r_k for every accumulated cut k
///           y_low ≤ Y ≤ y_high, Y integer, theta ≥ 0
///
/// Engine columns are non-negative, so `Y` is carried as the offset
/// `Y - y_low` in `[0, y_high - y_low]` and shifted back on the way out.
/// The program is rebuilt from the full cut set on every solve.
pub struct MasterProblem {
    fixed_cost: f64,
    y_low: i64,
    y_high: i64,
}

impl MasterProblem {
    pub fn new(instance: &Instance) -> Self {
        Self {
            fixed_cost: instance.fixed_cost,
            y_low: instance.y_low,
            y_high: instance.y_high,
        }
    }

    pub fn program(&self, cuts: &CutSet) -> IntegerLinearProgram {
        let offset = self.y_low as f64;
        let mut program = LinearProgram::new(Direction::Minimize, vec![1.0, self.fixed_cost]);
        for cut in cuts {
            program.add_constraint(
                vec![1.0, cut.coefficient],
                Relation::GreaterEqual,
                cut.rhs - cut.coefficient * offset,
            );
        }
        program.add_constraint(
            vec![0.0, 1.0],
            Relation::LessEqual,
            (self.y_high - self.y_low) as f64,
        );

        IntegerLinearProgram {
            program,
            integer_vars: vec![Y],
        }
    }

    /// Any outcome other than an optimal solution is fatal for the run.
    pub fn solve<E>(&self, engine: &E, cuts: &CutSet, iteration: usize) -> Result<MasterSolution>
    where
        E: SolverEngine + ?Sized,
    {
        let solution = engine.solve_ilp(&self.program(cuts))?;
        debug!(
            "master with {} cuts: {:?} after {} nodes",
            cuts.len(),
            solution.status,
            solution.nodes_explored
        );

        match solution.status {
            ILPStatus::Optimal => Ok(MasterSolution {
                y: self.y_low + solution.values[Y].round() as i64,
                theta: solution.values[THETA],
                objective_value: solution.objective_value + self.fixed_cost * self.y_low as f64,
            }),
            ILPStatus::Infeasible => Err(Error::MasterInfeasible { iteration }),
            ILPStatus::Unbounded => Err(Error::MasterSolveError {
                iteration,
                reason: "relaxation unbounded".into(),
            }),
            ILPStatus::MaxIterationsReached => Err(Error::MasterSolveError {
                iteration,
                reason: "node limit reached".into(),
            }),
        }
    }
}
