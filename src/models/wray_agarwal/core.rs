//! Shared computational core of the Wray-Agarwal model family.
//!
//! Every variant transports the same eddy-viscosity proxy `Rnu` and blends
//! the same two coefficient sets (a near-wall k-ω set against a free-stream
//! k-ε set) through a per-cell switch `f1`. The core owns that shared state
//! and arithmetic; variants supply the switch formula, the destruction-term
//! policy, and any auxiliary sub-equations.

pub(crate) mod coeffs;
pub(crate) mod equation;

pub use coeffs::WaCoeffs;
pub(crate) use coeffs::WaDefaults;
pub(crate) use equation::{Destruction, RnuTerms};

use glam::DMat3;

use crate::support::{
    config::{CoeffDict, ConfigError},
    field::{ScalarField, TensorField},
};

/// Floor applied to the strain-rate magnitude and other denominators.
pub(crate) const WA_SMALL: f64 = 1e-15;

/// Shared coefficient storage and persistent fields.
///
/// Field dimensions: `rnu` and `nut` are m²/s, `s` is 1/s, `f1` is
/// dimensionless in `[0, 1]`.
#[derive(Debug, Clone)]
pub(crate) struct WaCore {
    pub coeffs: WaCoeffs,
    defaults: WaDefaults,
    /// Transported eddy-viscosity proxy.
    pub rnu: ScalarField,
    /// Blending switch between the k-ω and k-ε coefficient sets.
    pub f1: ScalarField,
    /// Strain-rate magnitude, floored at [`WA_SMALL`].
    pub s: ScalarField,
    /// Eddy viscosity, the externally visible output.
    pub nut: ScalarField,
}

impl WaCore {
    pub fn new(
        rnu0: ScalarField,
        dict: &CoeffDict,
        defaults: WaDefaults,
    ) -> Result<Self, ConfigError> {
        let coeffs = WaCoeffs::read(dict, &defaults)?;
        let n = rnu0.len();
        Ok(Self {
            coeffs,
            defaults,
            rnu: rnu0,
            f1: ScalarField::zeros(n),
            s: ScalarField::uniform(WA_SMALL, n),
            nut: ScalarField::zeros(n),
        })
    }

    /// Re-reads the coefficient set, replacing it wholesale on success.
    pub fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.coeffs = WaCoeffs::read(dict, &self.defaults)?;
        Ok(())
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.rnu.len()
    }

    /// Linear interpolation between two coefficients by a per-cell switch:
    /// `switch·psi1 + (1 − switch)·psi2`.
    ///
    /// Switch values are expected in `[0, 1]` but are not checked;
    /// out-of-range values silently extrapolate.
    pub fn blend(switch: &ScalarField, psi1: f64, psi2: f64) -> ScalarField {
        switch.map(|w| w * (psi1 - psi2) + psi2)
    }

    /// Blended diffusion coefficient σR.
    pub fn sigma_r(&self, switch: &ScalarField) -> ScalarField {
        Self::blend(switch, self.coeffs.sigma_kw, self.coeffs.sigma_ke)
    }

    /// Blended production coefficient C1.
    pub fn c1(&self, switch: &ScalarField) -> ScalarField {
        Self::blend(switch, self.coeffs.c1kw, self.coeffs.c1ke)
    }

    /// Viscosity ratio `Rnu/ν`, the near-wall damping argument.
    pub fn chi(&self, nu: &ScalarField) -> ScalarField {
        self.rnu.zip_map(nu, |r, nu| r / nu)
    }

    /// Near-wall damping function `χ³/(χ³ + Cw³)`.
    pub fn fmu(&self, chi: &ScalarField) -> ScalarField {
        let cw3 = self.coeffs.cw.powi(3);
        chi.map(|chi| {
            let chi3 = chi * chi * chi;
            chi3 / (chi3 + cw3)
        })
    }

    /// Effective diffusivity for the `Rnu` equation: `Rnu·σR + ν`.
    pub fn drnu_eff(&self, switch: &ScalarField, nu: &ScalarField) -> ScalarField {
        let sigma_r = self.sigma_r(switch);
        let n = self.n_cells();
        let mut out = ScalarField::zeros(n);
        for i in 0..n {
            out[i] = self.rnu[i].max(0.0) * sigma_r[i] + nu[i];
        }
        out
    }

    /// Recomputes the strain-rate magnitude `S = √(2·Sij·Sij)` from the
    /// velocity gradient and clamps the transported variable, mirroring the
    /// pre-solve adjust pass of the reference implementation: `Rnu ≥ 0`,
    /// `S ≥` [`WA_SMALL`].
    pub fn update_strain(&mut self, grad_u: &TensorField) {
        assert_eq!(grad_u.len(), self.n_cells(), "field length mismatch");
        self.rnu.clamp_min(0.0);
        for (i, g) in grad_u.values().iter().enumerate() {
            self.s[i] = strain_rate_mag(g).max(WA_SMALL);
        }
    }

    /// Vorticity magnitude `W = √(2·Wij·Wij)` per cell.
    pub fn vorticity_mag(grad_u: &TensorField) -> ScalarField {
        ScalarField::from_vec(grad_u.values().iter().map(rotation_rate_mag).collect())
    }

    /// Frobenius norm of the velocity gradient per cell.
    pub fn mag_grad_u(grad_u: &TensorField) -> ScalarField {
        ScalarField::from_vec(
            grad_u
                .values()
                .iter()
                .map(|g| frobenius_sq(g).sqrt())
                .collect(),
        )
    }

    /// Updates the eddy viscosity: `nut = Rnu·fmu(χ)`, clipped non-negative.
    pub fn correct_nut(&mut self, nu: &ScalarField) {
        let fmu = self.fmu(&self.chi(nu));
        for i in 0..self.nut.len() {
            self.nut[i] = self.rnu[i].max(0.0) * fmu[i];
        }
    }

    /// Turbulence kinetic energy, `k = nut·S/√Cmu`. Diagnostic only; the
    /// transport equation never feeds on it.
    pub fn k(&self) -> ScalarField {
        let inv_sqrt_cmu = 1.0 / self.coeffs.cmu.sqrt();
        self.nut.zip_map(&self.s, |nut, s| nut * s * inv_sqrt_cmu)
    }

    /// Turbulence dissipation rate, `ε = Cmu·k·ω = nut·S²`. Diagnostic only.
    pub fn epsilon(&self) -> ScalarField {
        self.nut.zip_map(&self.s, |nut, s| nut * s * s)
    }
}

/// `√(2·Sij·Sij)` with `Sij = ½(g + gᵀ)`, which reduces to `√(½‖g + gᵀ‖²)`.
#[inline]
fn strain_rate_mag(g: &DMat3) -> f64 {
    let sym = *g + g.transpose();
    (0.5 * frobenius_sq(&sym)).sqrt()
}

/// `√(2·Wij·Wij)` with `Wij = ½(g − gᵀ)`.
#[inline]
fn rotation_rate_mag(g: &DMat3) -> f64 {
    let skew = *g - g.transpose();
    (0.5 * frobenius_sq(&skew)).sqrt()
}

#[inline]
fn frobenius_sq(m: &DMat3) -> f64 {
    m.x_axis.length_squared() + m.y_axis.length_squared() + m.z_axis.length_squared()
}

/// Trace of the velocity gradient, `div(U)`.
#[inline]
pub(crate) fn trace(g: &DMat3) -> f64 {
    g.x_axis.x + g.y_axis.y + g.z_axis.z
}
