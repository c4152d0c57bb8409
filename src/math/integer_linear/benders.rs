// -----------------------------------------------------------------------
// Benders Decomposition with Pareto-optimal cuts
// -----------------------------------------------------------------------
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::math::integer_linear::SolverEngine;
use crate::math::optimization::LpStatus;

pub mod cut;
pub mod instance;
pub mod master;
pub mod pareto;
pub mod subproblem;


pub use cut::{Cut, CutSet};
pub use instance::Instance;
pub use master::{MasterProblem, MasterSolution};
pub use pareto::ParetoCutGenerator;
pub use subproblem::{Subproblem, SubproblemSolution};

/// How the dual solution behind each cut is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutStrategy {
    /// Whatever optimal dual vertex the subproblem solve returns
    Standard,
    /// The Magnanti-Wong vertex, best at the instance's reference point
    #[default]
    Pareto,
}

#[derive(Debug, Clone)]
pub struct BendersConfig {
    pub strategy: CutStrategy,
    /// Safety net; the loop reports [`Error::IterationLimit`] past this
    pub max_iterations: usize,
}

impl Default for BendersConfig {
    fn default() -> Self {
        Self {
            strategy: CutStrategy::default(),
            max_iterations: 100,
        }
    }
}

/// Where the cut of an iteration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutSource {
    Standard,
    Pareto,
    /// The auxiliary solve failed and the plain optimality cut was used
    ParetoFallback,
    /// The subproblem was not optimal, so no cut was added
    Skipped,
}

/// Observable state after one pass of the loop.
#[derive(Debug, Clone)]
pub struct IterationRecord {
    pub iteration: usize,
    /// `Y` the subproblem was solved at
    pub y: i64,
    pub subproblem_status: LpStatus,
    pub subproblem_objective: Option<f64>,
    /// Duals returned by the subproblem; empty unless it was optimal
    pub duals: Vec<f64>,
    /// Duals the cut was built from
    pub cut_duals: Vec<f64>,
    pub cut: Option<Cut>,
    pub cut_source: CutSource,
    /// Master solution
    pub master_y: i64,
    pub theta: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl IterationRecord {
    pub fn gap(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

#[derive(Debug, Clone)]
pub struct BendersOutcome {
    /// Final master solution
    pub y: i64,
    pub theta: f64,
    /// `Y` at which the upper bound was attained
    pub incumbent_y: i64,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub iterations: usize,
    pub cuts: CutSet,
    pub history: Vec<IterationRecord>,
}

impl BendersOutcome {
    pub fn objective_value(&self) -> f64 {
        self.upper_bound
    }

    pub fn gap(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

pub struct BendersDecomposition {
    config: BendersConfig,
}

impl BendersDecomposition {
    pub fn new(config: BendersConfig) -> Self {
        Self { config }
    }

    /// Alternates subproblem and master solves until the bounds are within
    /// the engine's integer tolerance.
    ///
    /// A subproblem that is not optimal contributes no cut; the master is
    /// re-solved on the cuts gathered so far. A failed Pareto solve falls back
    /// to the plain cut. Master failures and engine faults end the run.
    pub fn solve<E>(&self, engine: &E, instance: &Instance) -> Result<BendersOutcome>
    where
        E: SolverEngine + ?Sized,
    {
        instance.validate()?;
        let pareto = match self.config.strategy {
            CutStrategy::Pareto => {
                instance.validate_reference_point()?;
                let generator = ParetoCutGenerator::new(instance.reference_point());
                debug!("Pareto reference point Y0 = {}", generator.reference_point());
                Some(generator)
            }
            CutStrategy::Standard => None,
        };
        let subproblem = Subproblem::new(instance);
        let master = MasterProblem::new(instance);
        let eps = engine.integer_tolerance();
        let fixed_cost = instance.fixed_cost;

        let mut y = instance.y_low;
        let mut theta = 0.0;
        let mut incumbent_y = y;
        let mut upper_bound = f64::INFINITY;
        let mut lower_bound = 0.0;
        let mut cuts = CutSet::new();
        let mut history = Vec::new();
        let mut iteration = 0;

        info!(
            "{:?} decomposition from Y = {}, tolerance {}",
            self.config.strategy, y, eps
        );

        while upper_bound - lower_bound > eps {
            if iteration >= self.config.max_iterations {
                warn!(
                    "stopping after {} iterations with UB = {}, LB = {}",
                    iteration, upper_bound, lower_bound
                );
                return Err(Error::IterationLimit(self.config.max_iterations));
            }
            iteration += 1;

            let evaluated_y = y;
            let sub = subproblem.solve(engine, y)?;

            let (cut, cut_source, cut_duals) = if sub.is_optimal() {
                let candidate = fixed_cost * y as f64 + sub.objective_value;
                if candidate < upper_bound {
                    upper_bound = candidate;
                    incumbent_y = y;
                }

                let (cut_duals, cut_source) = match &pareto {
                    Some(generator) => {
                        match generator.generate(engine, &subproblem, y, sub.objective_value) {
                            Ok(duals) => (duals, CutSource::Pareto),
                            Err(err) => {
                                warn!("Pareto cut unavailable at Y = {}: {}", y, err);
                                (sub.duals.clone(), CutSource::ParetoFallback)
                            }
                        }
                    }
                    None => (sub.duals.clone(), CutSource::Standard),
                };
                let cut = Cut::from_duals(instance, &cut_duals);
                cuts.push(cut);
                (Some(cut), cut_source, cut_duals)
            } else {
                warn!("subproblem {:?} at Y = {}, no cut added", sub.status, y);
                (None, CutSource::Skipped, Vec::new())
            };

            let solution = master.solve(engine, &cuts, iteration)?;
            y = solution.y;
            theta = solution.theta;
            lower_bound = fixed_cost * y as f64 + theta;

            match cut {
                Some(cut) => info!(
                    "iteration {}: Y = {} gives UB = {}; {:?} cut {}; master Y = {}, theta = {}, LB = {}",
                    iteration, evaluated_y, upper_bound, cut_source, cut, y, theta, lower_bound
                ),
                None => info!(
                    "iteration {}: Y = {} gives no cut; master Y = {}, theta = {}, LB = {}",
                    iteration, evaluated_y, y, theta, lower_bound
                ),
            }

            history.push(IterationRecord {
                iteration,
                y: evaluated_y,
                subproblem_status: sub.status,
                subproblem_objective: sub.is_optimal().then_some(sub.objective_value),
                duals: sub.duals,
                cut_duals,
                cut,
                cut_source,
                master_y: y,
                theta,
                upper_bound,
                lower_bound,
            });
        }

        info!(
            "converged after {} iterations: Y = {}, objective = {}",
            iteration, y, upper_bound
        );

        Ok(BendersOutcome {
            y,
            theta,
            incumbent_y,
            upper_bound,
            lower_bound,
            iterations: iteration,
            cuts,
            history,
        })
    }
}
