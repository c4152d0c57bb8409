use crate::error::{Error, Result};

/// A mixed-integer program with one complicating integer variable `Y`:
///
/// minimize f*Y + c^T X
/// subject to A X + g Y ≥ b
///           X ≥ 0, Y integer in [y_low, y_high]
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Cost per unit of `Y` (f)
    pub fixed_cost: f64,
    /// Cost of each continuous variable (c)
    pub costs: Vec<f64>,
    /// Coefficients of the continuous variables, one row per constraint (A)
    pub matrix: Vec<Vec<f64>>,
    /// Coefficient of `Y` in each constraint (g)
    pub linking: Vec<f64>,
    /// Right-hand side of each constraint (b)
    pub rhs: Vec<f64>,
    pub y_low: i64,
    pub y_high: i64,
    /// Interior point used to rank alternative optimal duals. When unset the
    /// midpoint of the `Y` domain is used.
    pub reference_point: Option<f64>,
}

impl Instance {
    /// minimize 10Y + 18X1 + 8X2 + 20X3
    /// s.t. 3X1 + X2 + X3 + 2Y ≥ 12
    ///      X1 + X2 + 4X3 + Y ≥ 10
    ///      X ≥ 0, Y integer in [2, 12]
    pub fn canonical() -> Self {
        Self {
            fixed_cost: 10.0,
            costs: vec![18.0, 8.0, 20.0],
            matrix: vec![vec![3.0, 1.0, 1.0], vec![1.0, 1.0, 4.0]],
            linking: vec![2.0, 1.0],
            rhs: vec![12.0, 10.0],
            y_low: 2,
            y_high: 12,
            reference_point: Some(5.0),
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.rhs.len()
    }

    pub fn num_continuous(&self) -> usize {
        self.costs.len()
    }

    pub fn reference_point(&self) -> f64 {
        self.reference_point
            .unwrap_or_else(|| (self.y_low as f64 + self.y_high as f64) / 2.0)
    }

    /// Dual objective coefficients at `y`: `b_i - g_i * y`.
    pub fn dual_objective(&self, y: f64) -> Vec<f64> {
        self.rhs
            .iter()
            .zip(self.linking.iter())
            .map(|(&b, &g)| b - g * y)
            .collect()
    }

    /// Rows of the dual constraint set `A^T u ≤ c`, one per continuous variable.
    pub fn dual_rows(&self) -> Vec<Vec<f64>> {
        (0..self.num_continuous())
            .map(|j| self.matrix.iter().map(|row| row[j]).collect())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let m = self.num_constraints();
        let n = self.num_continuous();
        if m == 0 {
            return Err(Error::InvalidInstance("no linking constraints".into()));
        }
        if self.matrix.len() != m || self.linking.len() != m {
            return Err(Error::InvalidInstance(format!(
                "{} right-hand sides but {} matrix rows and {} linking coefficients",
                m,
                self.matrix.len(),
                self.linking.len()
            )));
        }
        if let Some(i) = self.matrix.iter().position(|row| row.len() != n) {
            return Err(Error::InvalidInstance(format!(
                "matrix row {} has {} entries, expected {}",
                i,
                self.matrix[i].len(),
                n
            )));
        }

        let all_finite = std::iter::once(&self.fixed_cost)
            .chain(self.costs.iter())
            .chain(self.matrix.iter().flatten())
            .chain(self.linking.iter())
            .chain(self.rhs.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::InvalidInstance("non-finite coefficient".into()));
        }

        if self.y_low > self.y_high {
            return Err(Error::InvalidInstance(format!(
                "empty domain [{}, {}]",
                self.y_low, self.y_high
            )));
        }
        Ok(())
    }

    /// The reference point must lie strictly inside the `Y` domain.
    pub fn validate_reference_point(&self) -> Result<()> {
        let y0 = self.reference_point();
        if !(y0 > self.y_low as f64 && y0 < self.y_high as f64) {
            return Err(Error::InvalidInstance(format!(
                "reference point {} is not inside ({}, {})",
                y0, self.y_low, self.y_high
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_is_valid() {
        let instance = Instance::canonical();
        assert!(instance.validate().is_ok());
        assert!(instance.validate_reference_point().is_ok());
        assert_eq!(instance.reference_point(), 5.0);
    }

    #[test]
    fn test_dual_structure() {
        let instance = Instance::canonical();
        assert_eq!(instance.dual_objective(2.0), vec![8.0, 8.0]);
        assert_eq!(instance.dual_objective(12.0), vec![-12.0, -2.0]);
        assert_eq!(
            instance.dual_rows(),
            vec![vec![3.0, 1.0], vec![1.0, 1.0], vec![1.0, 4.0]]
        );
    }

    #[test]
    fn test_midpoint_reference_point() {
        let instance = Instance {
            reference_point: None,
            ..Instance::canonical()
        };
        assert_eq!(instance.reference_point(), 7.0);
    }

    #[test]
    fn test_rejects_boundary_reference_point() {
        let instance = Instance {
            reference_point: Some(2.0),
            ..Instance::canonical()
        };
        assert!(instance.validate().is_ok());
        assert!(matches!(
            instance.validate_reference_point(),
            Err(Error::InvalidInstance(_))
        ));
    }

    #[test]
    fn test_rejects_degenerate_domain() {
        // a single-point domain has no interior
        let instance = Instance {
            y_low: 4,
            y_high: 4,
            reference_point: None,
            ..Instance::canonical()
        };
        assert!(instance.validate().is_ok());
        assert!(instance.validate_reference_point().is_err());

        let instance = Instance {
            y_low: 5,
            y_high: 3,
            ..Instance::canonical()
        };
        assert!(instance.validate().is_err());
    }

    #[test]
    fn test_rejects_ragged_matrix() {
        let mut instance = Instance::canonical();
        instance.matrix[1].pop();
        assert!(instance.validate().is_err());

        let mut instance = Instance::canonical();
        instance.linking.push(1.0);
        assert!(instance.validate().is_err());

        let mut instance = Instance::canonical();
        instance.costs[0] = f64::INFINITY;
        assert!(instance.validate().is_err());
    }
}
