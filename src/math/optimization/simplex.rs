use num_traits::Float;
use std::fmt::Debug;

use crate::error::SolverError;
use crate::math::optimization::{LpStatus, OptimizationConfig};

/// Optimization direction of a linear program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

/// Relation between the left-hand side of a row and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl Relation {
    fn flipped(self) -> Self {
        match self {
            Relation::LessEqual => Relation::GreaterEqual,
            Relation::GreaterEqual => Relation::LessEqual,
            Relation::Equal => Relation::Equal,
        }
    }
}

/// A linear programming problem over non-negative variables.
#[derive(Debug, Clone)]
pub struct LinearProgram<T>
where
    T: Float + Debug,
{
    /// Whether `objective` is minimized or maximized
    pub direction: Direction,
    /// The objective function coefficients (c in c^T x)
    pub objective: Vec<T>,
    /// The constraint matrix, one row per constraint
    pub constraints: Vec<Vec<T>>,
    /// The relation of each row to its right-hand side
    pub relations: Vec<Relation>,
    /// The right-hand side vector
    pub rhs: Vec<T>,
}

impl<T> LinearProgram<T>
where
    T: Float + Debug,
{
    pub fn new(direction: Direction, objective: Vec<T>) -> Self {
        Self {
            direction,
            objective,
            constraints: Vec::new(),
            relations: Vec::new(),
            rhs: Vec::new(),
        }
    }

    pub fn add_constraint(&mut self, coefficients: Vec<T>, relation: Relation, rhs: T) {
        self.constraints.push(coefficients);
        self.relations.push(relation);
        self.rhs.push(rhs);
    }

    pub fn with_constraint(mut self, coefficients: Vec<T>, relation: Relation, rhs: T) -> Self {
        self.add_constraint(coefficients, relation, rhs);
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    fn validate(&self) -> Result<(), SolverError> {
        let n = self.objective.len();
        let m = self.constraints.len();
        if self.relations.len() != m || self.rhs.len() != m {
            return Err(SolverError::DimensionMismatch(format!(
                "{} rows, {} relations, {} right-hand sides",
                m,
                self.relations.len(),
                self.rhs.len()
            )));
        }
        if let Some((i, row)) = self
            .constraints
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n)
        {
            return Err(SolverError::DimensionMismatch(format!(
                "row {} has {} coefficients, expected {}",
                i,
                row.len(),
                n
            )));
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(SolverError::NonFinite("objective"));
        }
        if self.constraints.iter().flatten().any(|a| !a.is_finite()) {
            return Err(SolverError::NonFinite("constraint matrix"));
        }
        if self.rhs.iter().any(|b| !b.is_finite()) {
            return Err(SolverError::NonFinite("right-hand side"));
        }
        Ok(())
    }
}

/// Result of a simplex solve.
///
/// `values`, `duals` and `objective_value` are only meaningful when `status`
/// is [`LpStatus::Optimal`]; otherwise the vectors are empty.
#[derive(Debug, Clone)]
pub struct LpSolution<T>
where
    T: Float + Debug,
{
    pub status: LpStatus,
    /// Primal values, one per variable
    pub values: Vec<T>,
    /// Shadow price of each row: the rate of change of the optimal objective
    /// per unit increase of that row's right-hand side
    pub duals: Vec<T>,
    pub objective_value: T,
    /// Pivots performed across both phases
    pub iterations: usize,
}

impl<T> LpSolution<T>
where
    T: Float + Debug,
{
    fn terminal(status: LpStatus, iterations: usize) -> Self {
        Self {
            status,
            values: Vec::new(),
            duals: Vec::new(),
            objective_value: T::zero(),
            iterations,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == LpStatus::Optimal
    }
}

/// Solves a linear program with the two-phase simplex method.
///
/// The problem is
/// minimize or maximize c^T x
/// subject to a_i^T x (<=, >=, =) b_i for every row i
///           x ≥ 0
///
/// Rows with a negative right-hand side are negated first. Phase I drives the
/// artificial variables of `>=` and `=` rows to zero; Phase II optimizes the
/// real objective with the artificials barred from the basis. Both phases use
/// Bland's rule, so degenerate problems terminate.
///
/// # Arguments
///
/// * `lp` - The linear program to solve
/// * `config` - Pivot limit and tolerances
///
/// # Returns
///
/// Returns an `LpSolution` whose status tells optimal, infeasible and
/// unbounded apart. Malformed input and pivot-limit exhaustion are errors.
///
/// # Examples
///
/// ```
/// use benders::math::optimization::{simplex_solve, Direction, LinearProgram, LpStatus,
///     OptimizationConfig, Relation};
///
/// // maximize x + y subject to x + y ≤ 1
/// let lp = LinearProgram::new(Direction::Maximize, vec![1.0, 1.0])
///     .with_constraint(vec![1.0, 1.0], Relation::LessEqual, 1.0);
///
/// let result = simplex_solve(&lp, &OptimizationConfig::default()).unwrap();
/// assert_eq!(result.status, LpStatus::Optimal);
/// assert!((result.objective_value - 1.0).abs() < 1e-9);
/// ```
pub fn solve<T>(
    lp: &LinearProgram<T>,
    config: &OptimizationConfig<T>,
) -> Result<LpSolution<T>, SolverError>
where
    T: Float + Debug,
{
    lp.validate()?;

    let n = lp.num_variables();
    let mut tableau = Tableau::build(lp);
    let mut pivots = 0;

    // Phase I: maximize the negated sum of artificials
    if tableau.first_artificial < tableau.columns {
        let mut phase_one = vec![T::zero(); tableau.columns];
        for cost in phase_one.iter_mut().skip(tableau.first_artificial) {
            *cost = -T::one();
        }
        tableau.price(&phase_one);
        tableau.run(tableau.columns, config, &mut pivots)?;

        if tableau.value() < -config.feasibility_tolerance {
            return Ok(LpSolution::terminal(LpStatus::Infeasible, pivots));
        }
        tableau.drive_out_artificials(config.tolerance);
    }

    // Phase II
    let mut phase_two = vec![T::zero(); tableau.columns];
    for (cost, &c) in phase_two.iter_mut().zip(lp.objective.iter()) {
        *cost = match lp.direction {
            Direction::Maximize => c,
            Direction::Minimize => -c,
        };
    }
    tableau.price(&phase_two);
    if tableau.run(tableau.first_artificial, config, &mut pivots)? == LpStatus::Unbounded {
        return Ok(LpSolution::terminal(LpStatus::Unbounded, pivots));
    }

    let values = tableau.primal_values(n);
    let objective_value = values
        .iter()
        .zip(lp.objective.iter())
        .fold(T::zero(), |acc, (&x, &c)| acc + c * x);
    let duals = tableau
        .identity
        .iter()
        .zip(tableau.flipped.iter())
        .map(|(&col, &flipped)| {
            let mut y = tableau.cost[col];
            if flipped {
                y = -y;
            }
            if lp.direction == Direction::Minimize {
                y = -y;
            }
            y
        })
        .collect();

    Ok(LpSolution {
        status: LpStatus::Optimal,
        values,
        duals,
        objective_value,
        iterations: pivots,
    })
}

/// Dense simplex tableau.
///
/// Columns are laid out as structural variables, then one slack or surplus
/// column per inequality row, then one artificial column per `>=` or `=`
/// row. The last entry of every row is its right-hand side. `cost` holds the
/// reduced costs `c_B B^-1 a_j - c_j` of the current (maximization) objective.
struct Tableau<T> {
    rows: Vec<Vec<T>>,
    cost: Vec<T>,
    basis: Vec<usize>,
    /// Column that started as the unit vector of each row
    identity: Vec<usize>,
    /// Rows negated to make their right-hand side non-negative
    flipped: Vec<bool>,
    columns: usize,
    first_artificial: usize,
}

impl<T> Tableau<T>
where
    T: Float + Debug,
{
    fn build(lp: &LinearProgram<T>) -> Self {
        let n = lp.num_variables();
        let m = lp.constraints.len();

        let mut flipped = vec![false; m];
        let mut relations = lp.relations.clone();
        for (i, &b) in lp.rhs.iter().enumerate() {
            if b < T::zero() {
                flipped[i] = true;
                relations[i] = relations[i].flipped();
            }
        }

        let slacks = relations
            .iter()
            .filter(|&&r| r != Relation::Equal)
            .count();
        let artificials = relations
            .iter()
            .filter(|&&r| r != Relation::LessEqual)
            .count();
        let first_artificial = n + slacks;
        let columns = first_artificial + artificials;

        let mut rows = Vec::with_capacity(m);
        let mut identity = Vec::with_capacity(m);
        let mut next_slack = n;
        let mut next_artificial = first_artificial;
        for i in 0..m {
            let sign = if flipped[i] { -T::one() } else { T::one() };
            let mut row = vec![T::zero(); columns + 1];
            for (cell, &a) in row.iter_mut().zip(lp.constraints[i].iter()) {
                *cell = sign * a;
            }
            row[columns] = sign * lp.rhs[i];

            match relations[i] {
                Relation::LessEqual => {
                    row[next_slack] = T::one();
                    identity.push(next_slack);
                    next_slack += 1;
                }
                Relation::GreaterEqual => {
                    row[next_slack] = -T::one();
                    next_slack += 1;
                    row[next_artificial] = T::one();
                    identity.push(next_artificial);
                    next_artificial += 1;
                }
                Relation::Equal => {
                    row[next_artificial] = T::one();
                    identity.push(next_artificial);
                    next_artificial += 1;
                }
            }
            rows.push(row);
        }

        Self {
            rows,
            cost: vec![T::zero(); columns + 1],
            basis: identity.clone(),
            identity,
            flipped,
            columns,
            first_artificial,
        }
    }

    /// Objective value of the current basis.
    fn value(&self) -> T {
        self.cost[self.columns]
    }

    /// Recomputes the reduced-cost row for `costs` against the current basis.
    fn price(&mut self, costs: &[T]) {
        for (j, cell) in self.cost.iter_mut().enumerate() {
            let c_j = if j < self.columns { costs[j] } else { T::zero() };
            *cell = self
                .basis
                .iter()
                .zip(self.rows.iter())
                .fold(-c_j, |acc, (&b, row)| acc + costs[b] * row[j]);
        }
    }

    /// Pivots until optimal or unbounded. Only columns below `admissible`
    /// may enter the basis.
    fn run(
        &mut self,
        admissible: usize,
        config: &OptimizationConfig<T>,
        pivots: &mut usize,
    ) -> Result<LpStatus, SolverError> {
        let tol = config.tolerance;
        loop {
            // Bland: lowest-index improving column
            let entering = match (0..admissible).find(|&j| self.cost[j] < -tol) {
                Some(j) => j,
                None => return Ok(LpStatus::Optimal),
            };

            let mut leaving: Option<(usize, T)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                let a = row[entering];
                if a <= tol {
                    continue;
                }
                let ratio = row[self.columns] / a;
                leaving = match leaving {
                    Some((r, best))
                        if ratio > best + tol
                            || (ratio >= best - tol && self.basis[r] < self.basis[i]) =>
                    {
                        Some((r, best))
                    }
                    _ => Some((i, ratio)),
                };
            }

            let leaving_row = match leaving {
                Some((r, _)) => r,
                None => return Ok(LpStatus::Unbounded),
            };

            if *pivots >= config.max_iterations {
                return Err(SolverError::PivotLimit(config.max_iterations));
            }
            self.pivot(leaving_row, entering);
            *pivots += 1;
        }
    }

    fn pivot(&mut self, leaving_row: usize, entering_col: usize) {
        let pivot_element = self.rows[leaving_row][entering_col];
        for cell in self.rows[leaving_row].iter_mut() {
            *cell = *cell / pivot_element;
        }
        let pivot_row = self.rows[leaving_row].clone();

        for (i, row) in self.rows.iter_mut().enumerate() {
            if i != leaving_row {
                eliminate(row, &pivot_row, entering_col);
            }
        }
        eliminate(&mut self.cost, &pivot_row, entering_col);
        self.basis[leaving_row] = entering_col;
    }

    /// Swaps zero-level artificials out of the basis where a structural or
    /// slack column can replace them. Rows with no such column are redundant
    /// and keep their artificial at zero.
    fn drive_out_artificials(&mut self, tol: T) {
        for r in 0..self.rows.len() {
            if self.basis[r] < self.first_artificial {
                continue;
            }
            if let Some(col) = (0..self.first_artificial).find(|&j| self.rows[r][j].abs() > tol) {
                self.pivot(r, col);
            }
        }
    }

    fn primal_values(&self, n: usize) -> Vec<T> {
        let mut values = vec![T::zero(); n];
        for (row, &b) in self.rows.iter().zip(self.basis.iter()) {
            if b < n {
                values[b] = row[self.columns].max(T::zero());
            }
        }
        values
    }
}

fn eliminate<T>(row: &mut [T], pivot_row: &[T], col: usize)
where
    T: Float + Debug,
{
    let factor = row[col];
    if factor == T::zero() {
        return;
    }
    for (cell, &p) in row.iter_mut().zip(pivot_row.iter()) {
        *cell = *cell - factor * p;
    }
    row[col] = T::zero();
}
