//! Reference host: a uniform 1-D wall-bounded channel.
//!
//! Implements every collaborator capability over the simplest mesh that can
//! exercise the closure models end to end: `n` equal cells between two walls,
//! central-difference gradients, and a backward-Euler implicit solve of the
//! assembled transport terms (zero convection, homogeneous Dirichlet wall
//! values, direct tridiagonal solve).
//!
//! This host exists so the crate's own tests can run full `correct()` paths;
//! it is not a CFD solver. Production deployments implement the capability
//! traits over their framework's field and matrix machinery instead.

use crate::support::{
    field::{ScalarField, VectorField},
    host::{FieldCalculus, GridScale, ScalarTransport, SolveError, SolveStats, TransportTerms,
           WallGeometry},
};

/// Uniform 1-D channel with walls at both ends.
#[derive(Debug, Clone)]
pub struct Channel1d {
    dx: f64,
    dt: f64,
    wall_distance: ScalarField,
    delta: ScalarField,
}

impl Channel1d {
    /// A channel of `n` cells spanning `length` metres, stepped at `dt`
    /// seconds, with a grid length scale of `2·dx` (the `maxDeltaxyz`
    /// convention with a delta coefficient of 2).
    ///
    /// # Panics
    ///
    /// Panics unless `n >= 3` and `length`, `dt` are positive.
    #[must_use]
    pub fn new(n: usize, length: f64, dt: f64) -> Self {
        Self::with_delta_coeff(n, length, dt, 2.0)
    }

    /// Same as [`Channel1d::new`] with an explicit delta coefficient.
    ///
    /// # Panics
    ///
    /// Panics unless `n >= 3` and `length`, `dt`, `delta_coeff` are positive.
    #[must_use]
    pub fn with_delta_coeff(n: usize, length: f64, dt: f64, delta_coeff: f64) -> Self {
        assert!(n >= 3, "channel needs at least 3 cells");
        assert!(length > 0.0 && dt > 0.0 && delta_coeff > 0.0);

        let dx = length / n as f64;
        let wall_distance = ScalarField::from_vec(
            (0..n)
                .map(|i| {
                    let x = (i as f64 + 0.5) * dx;
                    x.min(length - x)
                })
                .collect(),
        );
        let delta = ScalarField::uniform(delta_coeff * dx, n);

        Self {
            dx,
            dt,
            wall_distance,
            delta,
        }
    }

    /// Cell-centre coordinate of cell `i`, metres from the left wall.
    #[must_use]
    pub fn cell_centre(&self, i: usize) -> f64 {
        (i as f64 + 0.5) * self.dx
    }

    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Replaces the grid length scale field (tests use this to force the
    /// RANS and LES branches of the DES length-scale switch).
    pub fn set_delta(&mut self, delta: ScalarField) {
        assert_eq!(delta.len(), self.n_cells(), "field length mismatch");
        self.delta = delta;
    }

    /// Residual `max |A·x - b|` of the assembled tridiagonal system.
    fn residual(
        lower: &[f64],
        diag: &[f64],
        upper: &[f64],
        rhs: &[f64],
        x: &[f64],
    ) -> f64 {
        let n = x.len();
        let mut worst = 0.0_f64;
        for i in 0..n {
            let mut ax = diag[i] * x[i];
            if i > 0 {
                ax += lower[i] * x[i - 1];
            }
            if i + 1 < n {
                ax += upper[i] * x[i + 1];
            }
            worst = worst.max((ax - rhs[i]).abs());
        }
        worst
    }
}

impl FieldCalculus for Channel1d {
    fn n_cells(&self) -> usize {
        self.wall_distance.len()
    }

    fn grad(&self, field: &ScalarField) -> VectorField {
        let n = field.len();
        assert_eq!(n, self.n_cells(), "field length mismatch");
        let mut grad = VectorField::zeros(n);
        let values = field.values();
        let out = grad.values_mut();
        for i in 0..n {
            out[i].x = if i == 0 {
                (values[1] - values[0]) / self.dx
            } else if i == n - 1 {
                (values[n - 1] - values[n - 2]) / self.dx
            } else {
                (values[i + 1] - values[i - 1]) / (2.0 * self.dx)
            };
        }
        grad
    }
}

impl WallGeometry for Channel1d {
    fn wall_distance(&self) -> &ScalarField {
        &self.wall_distance
    }
}

impl GridScale for Channel1d {
    fn delta(&self) -> &ScalarField {
        &self.delta
    }
}

impl ScalarTransport for Channel1d {
    fn solve(
        &mut self,
        equation: &'static str,
        terms: &TransportTerms,
        field: &mut ScalarField,
    ) -> Result<SolveStats, SolveError> {
        let n = self.n_cells();
        assert_eq!(field.len(), n, "field length mismatch");

        let dx2 = self.dx * self.dx;
        let gamma = terms.diffusivity.values();
        let old = field.values().to_vec();

        let mut lower = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut upper = vec![0.0; n];
        let mut rhs = vec![0.0; n];

        for i in 0..n {
            let mut a_diag = 0.0;
            let mut b = terms.explicit[i];

            if terms.transient {
                a_diag += 1.0 / self.dt;
                b += old[i] / self.dt;
            }

            // Positive implicit coefficients would weaken the diagonal; they
            // are deferred to the right-hand side at the previous iterate.
            let sp = terms.implicit[i];
            if sp <= 0.0 {
                a_diag -= sp;
            } else {
                b += sp * old[i];
            }

            // Interior faces take the arithmetic mean of cell diffusivities;
            // wall faces see a homogeneous Dirichlet value half a cell away.
            if i > 0 {
                let gf = 0.5 * (gamma[i] + gamma[i - 1]);
                a_diag += gf / dx2;
                lower[i] = -gf / dx2;
            } else {
                a_diag += 2.0 * gamma[i] / dx2;
            }
            if i + 1 < n {
                let gf = 0.5 * (gamma[i] + gamma[i + 1]);
                a_diag += gf / dx2;
                upper[i] = -gf / dx2;
            } else {
                a_diag += 2.0 * gamma[i] / dx2;
            }

            diag[i] = a_diag;
            rhs[i] = b;
        }

        let initial_residual = Self::residual(&lower, &diag, &upper, &rhs, &old);

        // Thomas algorithm.
        let mut c_star = vec![0.0; n];
        let mut d_star = vec![0.0; n];
        for i in 0..n {
            let denom = if i == 0 {
                diag[0]
            } else {
                diag[i] - lower[i] * c_star[i - 1]
            };
            if denom.abs() < f64::MIN_POSITIVE {
                return Err(SolveError::Singular { equation, cell: i });
            }
            c_star[i] = upper[i] / denom;
            d_star[i] = if i == 0 {
                rhs[0] / denom
            } else {
                (rhs[i] - lower[i] * d_star[i - 1]) / denom
            };
        }
        let solution = field.values_mut();
        solution[n - 1] = d_star[n - 1];
        for i in (0..n - 1).rev() {
            solution[i] = d_star[i] - c_star[i] * solution[i + 1];
        }

        for (cell, &value) in solution.iter().enumerate() {
            if !value.is_finite() {
                return Err(SolveError::NotFinite { equation, cell });
            }
        }

        let final_residual = Self::residual(&lower, &diag, &upper, &rhs, solution);

        Ok(SolveStats {
            iterations: 1,
            initial_residual,
            final_residual,
        })
    }
}
