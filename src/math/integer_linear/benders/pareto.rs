use log::debug;

use crate::error::ParetoError;
use crate::math::integer_linear::benders::Subproblem;
use crate::math::integer_linear::SolverEngine;
use crate::math::optimization::{LpStatus, Relation};

/// Magnanti-Wong cut selection.
///
/// Among the optimal duals of the subproblem at the current `Y`, picks the
/// one that is best at a fixed interior reference point `Y0`. The resulting
/// cut is not dominated by any other cut available at the current `Y`.
#[derive(Debug, Clone, Copy)]
pub struct ParetoCutGenerator {
    reference_point: f64,
}

impl ParetoCutGenerator {
    pub fn new(reference_point: f64) -> Self {
        Self { reference_point }
    }

    pub fn reference_point(&self) -> f64 {
        self.reference_point
    }

    /// Solves
    ///
    /// maximize sum (b_i - g_i * Y0) u_i
    /// subject to A^T u ≤ c
    ///           sum (b_i - g_i * Y) u_i = `sub_objective`
    ///           u ≥ 0
    ///
    /// The equality row restricts the region to the optimal face at `y`. It
    /// lives only in the auxiliary program built here, which is dropped
    /// before returning.
    pub fn generate<E>(
        &self,
        engine: &E,
        subproblem: &Subproblem<'_>,
        y: i64,
        sub_objective: f64,
    ) -> Result<Vec<f64>, ParetoError>
    where
        E: SolverEngine + ?Sized,
    {
        let instance = subproblem.instance();
        let mut auxiliary =
            subproblem.over_dual_region(instance.dual_objective(self.reference_point));
        auxiliary.add_constraint(
            instance.dual_objective(y as f64),
            Relation::Equal,
            sub_objective,
        );

        let solution = engine.solve_lp(&auxiliary)?;
        debug!(
            "auxiliary problem at Y = {} (Y0 = {}): {:?}",
            y, self.reference_point, solution.status
        );
        match solution.status {
            LpStatus::Optimal => Ok(solution.values),
            status => Err(ParetoError::Status(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use crate::math::integer_linear::benders::{Cut, Instance};
    use crate::math::integer_linear::{ILPSolution, IntegerLinearProgram, SolverSession};
    use crate::math::optimization::{LinearProgram, LpSolution};
    use approx::assert_abs_diff_eq;

    /// Faults on any program carrying an equality row.
    struct EqualityFaultEngine(SolverSession);

    impl SolverEngine for EqualityFaultEngine {
        fn solve_lp(&self, lp: &LinearProgram<f64>) -> Result<LpSolution<f64>, SolverError> {
            if lp.relations.contains(&Relation::Equal) {
                return Err(SolverError::PivotLimit(0));
            }
            self.0.solve_lp(lp)
        }

        fn solve_ilp(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution, SolverError> {
            self.0.solve_ilp(problem)
        }

        fn integer_tolerance(&self) -> f64 {
            self.0.integer_tolerance()
        }
    }

    #[test]
    fn test_selects_pareto_vertex_on_tied_face() {
        // At Y = 2 both (5, 3) and (4, 4) reach 64; Y0 = 5 prefers (4, 4)
        let instance = Instance::canonical();
        let session = SolverSession::default();
        let subproblem = Subproblem::new(&instance);
        let generator = ParetoCutGenerator::new(instance.reference_point());

        let duals = generator.generate(&session, &subproblem, 2, 64.0).unwrap();

        assert_abs_diff_eq!(duals[0], 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(duals[1], 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            Cut::from_duals(&instance, &duals),
            Cut::new(12.0, 88.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_unique_optimum_is_kept() {
        let instance = Instance::canonical();
        let session = SolverSession::default();
        let subproblem = Subproblem::new(&instance);
        let plain = subproblem.solve(&session, 7).unwrap();

        let duals = ParetoCutGenerator::new(5.0)
            .generate(&session, &subproblem, 7, plain.objective_value)
            .unwrap();

        assert_abs_diff_eq!(duals[0], plain.duals[0], epsilon = 1e-9);
        assert_abs_diff_eq!(duals[1], plain.duals[1], epsilon = 1e-9);
    }

    #[test]
    fn test_pareto_cut_not_dominated_by_plain_cut() {
        let instance = Instance::canonical();
        let session = SolverSession::default();
        let subproblem = Subproblem::new(&instance);
        let generator = ParetoCutGenerator::new(instance.reference_point());

        for y in instance.y_low..=instance.y_high {
            let plain = subproblem.solve(&session, y).unwrap();
            let duals = generator
                .generate(&session, &subproblem, y, plain.objective_value)
                .unwrap();
            let plain_cut = Cut::from_duals(&instance, &plain.duals);
            let pareto_cut = Cut::from_duals(&instance, &duals);

            // same value where it was derived, never weaker at Y0
            assert_abs_diff_eq!(
                pareto_cut.bound_at(y as f64),
                plain_cut.bound_at(y as f64),
                epsilon = 1e-7
            );
            assert!(pareto_cut.bound_at(5.0) >= plain_cut.bound_at(5.0) - 1e-7);
            assert!(!plain_cut.dominates(&pareto_cut, 2, 12, -1e-7));
        }
    }

    #[test]
    fn test_inconsistent_objective_is_reported() {
        let instance = Instance::canonical();
        let session = SolverSession::default();
        let subproblem = Subproblem::new(&instance);

        let result = ParetoCutGenerator::new(5.0).generate(&session, &subproblem, 2, 1000.0);

        assert_eq!(result, Err(ParetoError::Status(LpStatus::Infeasible)));
    }

    #[test]
    fn test_engine_fault_is_reported() {
        let instance = Instance::canonical();
        let engine = EqualityFaultEngine(SolverSession::default());
        let subproblem = Subproblem::new(&instance);

        let result = ParetoCutGenerator::new(5.0).generate(&engine, &subproblem, 2, 64.0);

        assert_eq!(
            result,
            Err(ParetoError::Solver(SolverError::PivotLimit(0)))
        );
    }
}
