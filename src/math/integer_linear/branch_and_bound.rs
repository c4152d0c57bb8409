use log::debug;

use crate::error::SolverError;
use crate::math::integer_linear::{ILPSolution, ILPSolver, ILPStatus, IntegerLinearProgram};
use crate::math::optimization::{
    simplex_solve, Direction, LpSolution, LpStatus, OptimizationConfig, Relation,
};

/// Depth-first branch and bound over simplex relaxations.
pub struct BranchAndBoundSolver {
    max_nodes: usize,
    tolerance: f64,
    lp_config: OptimizationConfig<f64>,
}

impl BranchAndBoundSolver {
    pub fn new(max_nodes: usize, tolerance: f64) -> Self {
        Self {
            max_nodes,
            tolerance,
            lp_config: OptimizationConfig::default(),
        }
    }

    pub fn with_lp_config(mut self, lp_config: OptimizationConfig<f64>) -> Self {
        self.lp_config = lp_config;
        self
    }

    fn is_integer(&self, value: f64) -> bool {
        (value - value.round()).abs() < self.tolerance
    }

    fn solve_relaxation(
        &self,
        problem: &IntegerLinearProgram,
    ) -> Result<LpSolution<f64>, SolverError> {
        simplex_solve(&problem.program, &self.lp_config)
    }

    fn branch(
        &self,
        problem: &IntegerLinearProgram,
        var_idx: usize,
        value: f64,
    ) -> (IntegerLinearProgram, IntegerLinearProgram) {
        let mut lower_branch = problem.clone();
        let mut upper_branch = problem.clone();

        let mut selector = vec![0.0; problem.program.num_variables()];
        selector[var_idx] = 1.0;

        // x_i <= floor(value)
        lower_branch
            .program
            .add_constraint(selector.clone(), Relation::LessEqual, value.floor());
        // x_i >= ceil(value)
        upper_branch
            .program
            .add_constraint(selector, Relation::GreaterEqual, value.ceil());

        (lower_branch, upper_branch)
    }

    fn terminal(status: ILPStatus, nodes_explored: usize) -> ILPSolution {
        ILPSolution {
            values: vec![],
            objective_value: 0.0,
            status,
            nodes_explored,
        }
    }
}

impl ILPSolver for BranchAndBoundSolver {
    fn solve(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution, SolverError> {
        // Compare everything as a minimization
        let sense = match problem.program.direction {
            Direction::Minimize => 1.0,
            Direction::Maximize => -1.0,
        };
        let mut best_solution: Option<ILPSolution> = None;
        let mut best_key = f64::INFINITY;
        let mut nodes = vec![problem.clone()];
        let mut explored = 0;

        while let Some(current) = nodes.pop() {
            if explored >= self.max_nodes {
                debug!("node limit {} reached with {} open nodes", self.max_nodes, nodes.len() + 1);
                return Ok(match best_solution {
                    Some(mut solution) => {
                        solution.status = ILPStatus::MaxIterationsReached;
                        solution.nodes_explored = explored;
                        solution
                    }
                    None => Self::terminal(ILPStatus::MaxIterationsReached, explored),
                });
            }
            explored += 1;

            let relaxation = self.solve_relaxation(&current)?;
            match relaxation.status {
                LpStatus::Infeasible => continue,
                LpStatus::Unbounded => return Ok(Self::terminal(ILPStatus::Unbounded, explored)),
                LpStatus::Optimal => {}
            }

            let key = sense * relaxation.objective_value;
            if key >= best_key - self.tolerance {
                continue;
            }

            let fractional = problem
                .integer_vars
                .iter()
                .map(|&i| (i, relaxation.values[i]))
                .find(|&(_, value)| !self.is_integer(value));

            match fractional {
                None => {
                    let mut values = relaxation.values;
                    for &i in &problem.integer_vars {
                        values[i] = values[i].round();
                    }
                    let objective_value = values
                        .iter()
                        .zip(problem.program.objective.iter())
                        .map(|(&x, &c)| x * c)
                        .sum();
                    debug!("incumbent {} at node {}", objective_value, explored);
                    best_key = key;
                    best_solution = Some(ILPSolution {
                        values,
                        objective_value,
                        status: ILPStatus::Optimal,
                        nodes_explored: explored,
                    });
                }
                Some((var_idx, value)) => {
                    let (lower, upper) = self.branch(&current, var_idx, value);
                    // Explore the down branch first
                    nodes.push(upper);
                    nodes.push(lower);
                }
            }
        }

        Ok(match best_solution {
            Some(mut solution) => {
                solution.nodes_explored = explored;
                solution
            }
            None => Self::terminal(ILPStatus::Infeasible, explored),
        })
    }
}
