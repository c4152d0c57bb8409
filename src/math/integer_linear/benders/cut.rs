use std::fmt;

use approx::AbsDiffEq;

use crate::math::integer_linear::benders::Instance;

/// Optimality cut `theta + coefficient * Y >= rhs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    pub coefficient: f64,
    pub rhs: f64,
}

impl Cut {
    pub fn new(coefficient: f64, rhs: f64) -> Self {
        Self { coefficient, rhs }
    }

    /// Builds the cut supported by a subproblem dual solution `u`:
    /// the coefficient is `sum g_i u_i` and the right-hand side `sum b_i u_i`.
    pub fn from_duals(instance: &Instance, duals: &[f64]) -> Self {
        let coefficient = instance
            .linking
            .iter()
            .zip(duals)
            .map(|(&g, &u)| g * u)
            .sum();
        let rhs = instance.rhs.iter().zip(duals).map(|(&b, &u)| b * u).sum();
        Self { coefficient, rhs }
    }

    /// Lower bound this cut places on `theta` at `y`.
    pub fn bound_at(&self, y: f64) -> f64 {
        self.rhs - self.coefficient * y
    }

    pub fn is_satisfied_by(&self, y: f64, theta: f64, tolerance: f64) -> bool {
        theta + self.coefficient * y >= self.rhs - tolerance
    }

    /// True when this cut bounds `theta` at least as tightly as `other` over
    /// the whole domain `[low, high]`. Both are affine, so the endpoints decide.
    pub fn dominates(&self, other: &Cut, low: i64, high: i64, tolerance: f64) -> bool {
        [low, high]
            .iter()
            .all(|&y| self.bound_at(y as f64) >= other.bound_at(y as f64) - tolerance)
    }
}

impl fmt::Display for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "theta + {} * Y >= {}", self.coefficient, self.rhs)
    }
}

impl AbsDiffEq for Cut {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.coefficient.abs_diff_eq(&other.coefficient, epsilon)
            && self.rhs.abs_diff_eq(&other.rhs, epsilon)
    }
}

/// Append-only sequence of cuts handed to the master problem.
#[derive(Debug, Clone, Default)]
pub struct CutSet {
    cuts: Vec<Cut>,
}

impl CutSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cut and returns its position. Duplicates are kept.
    pub fn push(&mut self, cut: Cut) -> usize {
        self.cuts.push(cut);
        self.cuts.len() - 1
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cut> {
        self.cuts.iter()
    }

    /// Tightest lower bound on `theta` at `y` implied by every cut (and `theta >= 0`).
    pub fn bound_at(&self, y: f64) -> f64 {
        self.cuts
            .iter()
            .map(|cut| cut.bound_at(y))
            .fold(0.0, f64::max)
    }
}

impl<'a> IntoIterator for &'a CutSet {
    type Item = &'a Cut;
    type IntoIter = std::slice::Iter<'a, Cut>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Cut> for CutSet {
    fn from_iter<I: IntoIterator<Item = Cut>>(iter: I) -> Self {
        Self {
            cuts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cut_from_duals() {
        let instance = Instance::canonical();

        assert_abs_diff_eq!(Cut::from_duals(&instance, &[4.0, 4.0]), Cut::new(12.0, 88.0));
        assert_abs_diff_eq!(Cut::from_duals(&instance, &[5.0, 3.0]), Cut::new(13.0, 90.0));
        assert_abs_diff_eq!(Cut::from_duals(&instance, &[0.0, 5.0]), Cut::new(5.0, 50.0));
        assert_abs_diff_eq!(Cut::from_duals(&instance, &[0.0, 0.0]), Cut::new(0.0, 0.0));
    }

    #[test]
    fn test_bound_and_satisfaction() {
        let cut = Cut::new(12.0, 88.0);
        assert_abs_diff_eq!(cut.bound_at(5.0), 28.0);
        assert!(cut.is_satisfied_by(5.0, 28.0, 1e-9));
        assert!(!cut.is_satisfied_by(5.0, 27.0, 1e-9));
        assert_eq!(cut.to_string(), "theta + 12 * Y >= 88");
    }

    #[test]
    fn test_alternative_duals_at_low_end() {
        // (4, 4) and (5, 3) are both optimal at Y = 2; the first is tighter
        // everywhere else on the domain.
        let instance = Instance::canonical();
        let pareto = Cut::from_duals(&instance, &[4.0, 4.0]);
        let plain = Cut::from_duals(&instance, &[5.0, 3.0]);

        assert_abs_diff_eq!(pareto.bound_at(2.0), plain.bound_at(2.0));
        assert!(pareto.dominates(&plain, 2, 12, 1e-9));
        assert!(!plain.dominates(&pareto, 2, 12, 1e-9));
    }

    #[test]
    fn test_cut_set_is_append_only() {
        let mut cuts = CutSet::new();
        assert!(cuts.is_empty());
        assert_eq!(cuts.push(Cut::new(12.0, 88.0)), 0);
        assert_eq!(cuts.push(Cut::new(5.0, 50.0)), 1);
        assert_eq!(cuts.push(Cut::new(12.0, 88.0)), 2);

        assert_eq!(cuts.len(), 3);
        assert_eq!(cuts.iter().nth(1), Some(&Cut::new(5.0, 50.0)));
        assert_abs_diff_eq!(cuts.bound_at(5.0), 28.0);
        assert_abs_diff_eq!(cuts.bound_at(12.0), 0.0);
        assert_eq!((&cuts).into_iter().count(), 3);
    }
}
