//! WA-2017mDV: density-variance correction for hypersonic flow.
//!
//! Extends WA-2017m with a transport equation for the density-fluctuation
//! variance `rhoPrime2`, driven by the dilatation invariant of the velocity
//! gradient and the local temperature. The resolved variance feeds a
//! correction multiplier `fcomp` on the destruction terms of the `Rnu`
//! equation, accounting for extra compressibility effects on turbulence.
//!
//! Default coefficients beyond the 2017m set:
//!
//! ```text
//! gamma 1.4     Rsp 286.9 J/(kg·K)
//! Cr1 0.01      Cr2 0.01
//! Crho1 1.4     Crho2 2.0     sigmaRho 1.0
//! ```

use crate::{
    models::{
        CorrectError, TurbulenceModel,
        wray_agarwal::{
            core::{self, Destruction, RnuTerms, WA_SMALL},
            wa2017m::WrayAgarwal2017m,
        },
    },
    support::{
        config::{CoeffDict, ConfigError},
        field::{ScalarField, TensorField},
        host::{FieldCalculus, FlowState, ScalarTransport, TransportTerms, WallGeometry},
        units::{SpecificGasConstant, specific_gas_constant},
    },
};

/// Coefficients of the density-variance sub-model.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DvCoeffs {
    gamma: f64,
    rsp: SpecificGasConstant,
    cr1: f64,
    cr2: f64,
    crho1: f64,
    crho2: f64,
    sigma_rho: f64,
}

impl DvCoeffs {
    fn read(dict: &CoeffDict) -> Result<Self, ConfigError> {
        Ok(Self {
            gamma: dict.lookup_positive_or("gamma", 1.4)?,
            rsp: specific_gas_constant(dict.lookup_positive_or("Rsp", 286.9)?),
            cr1: dict.lookup_positive_or("Cr1", 0.01)?,
            cr2: dict.lookup_positive_or("Cr2", 0.01)?,
            crho1: dict.lookup_positive_or("Crho1", 1.4)?,
            crho2: dict.lookup_positive_or("Crho2", 2.0)?,
            sigma_rho: dict.lookup_positive_or("sigmaRho", 1.0)?,
        })
    }
}

/// The WA-2017mDV turbulence model.
#[derive(Debug, Clone)]
pub struct WrayAgarwal2017mDv {
    inner: WrayAgarwal2017m,
    dv: DvCoeffs,
    /// Temperature copied from the host thermophysical model, K.
    t: ScalarField,
    /// Density-fluctuation variance, kg²/m⁶.
    rho_prime2: ScalarField,
    /// Compressibility correction multiplier on the destruction terms, ≥ 1.
    fcomp: ScalarField,
    /// Dilatation invariant `tr(grad U) = div(U)`, 1/s.
    grad_u_sum: ScalarField,
}

impl WrayAgarwal2017mDv {
    /// Registry type name.
    pub const NAME: &'static str = "WrayAgarwal2017mDV";

    /// Constructs the model from an initial `Rnu` field and a coefficient
    /// dictionary.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients.
    pub fn new(rnu0: ScalarField, dict: &CoeffDict) -> Result<Self, ConfigError> {
        let inner = WrayAgarwal2017m::new(rnu0, dict)?;
        let n = inner.rnu().len();
        Ok(Self {
            inner,
            dv: DvCoeffs::read(dict)?,
            t: ScalarField::zeros(n),
            rho_prime2: ScalarField::zeros(n),
            fcomp: ScalarField::uniform(1.0, n),
            grad_u_sum: ScalarField::zeros(n),
        })
    }

    /// Re-reads the coefficient set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients.
    pub fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.inner.read(dict)?;
        self.dv = DvCoeffs::read(dict)?;
        Ok(())
    }

    /// Effective diffusivity of the variance equation: `sigmaRho·Rnu + ν`.
    fn drho_prime2_eff(&self, nu: &ScalarField) -> ScalarField {
        let sigma_rho = self.dv.sigma_rho;
        self.inner
            .rnu()
            .zip_map(nu, |r, nu| sigma_rho * r.max(0.0) + nu)
    }

    /// Advances the model by one step: temperature and dilatation update,
    /// the variance solve, the `fcomp` update, then the standard `Rnu`
    /// solve with corrected destruction.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectError::MissingTemperature`] when the host supplies
    /// no temperature field; otherwise propagates solver failures.
    pub fn correct<H>(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError>
    where
        H: FieldCalculus + WallGeometry + ScalarTransport,
    {
        let temperature = flow
            .temperature
            .ok_or(CorrectError::MissingTemperature { model: Self::NAME })?;

        self.inner.core.update_strain(flow.grad_u);
        self.inner.calc_f1(host.wall_distance(), flow.nu);

        self.t = temperature.clone();
        self.update_dilatation(flow.grad_u);

        // Variance transport: production from dilatation against the local
        // speed of sound, dissipation at the strain-rate time scale.
        let n = self.rho_prime2.len();
        let dv = self.dv;
        let rsp = dv.rsp.value;
        let mut implicit = ScalarField::zeros(n);
        let mut explicit = ScalarField::zeros(n);
        for i in 0..n {
            let a_sq = (dv.gamma * rsp * self.t[i]).max(WA_SMALL);
            let rho = flow.rho[i];
            let div_u = self.grad_u_sum[i];
            explicit[i] = dv.crho1 * rho * rho * self.inner.nut()[i] * div_u * div_u / a_sq;
            implicit[i] = -dv.crho2 * self.inner.core.s[i];
        }
        let terms = TransportTerms {
            diffusivity: self.drho_prime2_eff(flow.nu),
            implicit,
            explicit,
            transient: true,
        };
        host.solve("rhoPrime2", &terms, &mut self.rho_prime2)?;
        self.rho_prime2.clamp_min(0.0);

        // Saturating correction multiplier from the variance ratio.
        self.fcomp = self.rho_prime2.zip_map(flow.rho, |rp2, rho| {
            let chi_rho = rp2 / (rho * rho);
            1.0 + dv.cr1 * chi_rho / (1.0 + dv.cr2 * chi_rho)
        });

        let mut opts = RnuTerms::new(Destruction::Quadratic);
        opts.fcomp = Some(&self.fcomp);
        self.inner.core.solve_rnu(host, flow, &opts)?;
        Ok(())
    }

    fn update_dilatation(&mut self, grad_u: &TensorField) {
        for (i, g) in grad_u.values().iter().enumerate() {
            self.grad_u_sum[i] = core::trace(g);
        }
    }

    /// Eddy viscosity, the model output.
    #[must_use]
    pub fn nut(&self) -> &ScalarField {
        self.inner.nut()
    }

    /// Density-fluctuation variance, for diagnostics.
    #[must_use]
    pub fn rho_prime2(&self) -> &ScalarField {
        &self.rho_prime2
    }

    /// Compressibility correction multiplier, for diagnostics.
    #[must_use]
    pub fn fcomp(&self) -> &ScalarField {
        &self.fcomp
    }

    /// Transported eddy-viscosity proxy.
    #[must_use]
    pub fn rnu(&self) -> &ScalarField {
        self.inner.rnu()
    }

    /// Turbulence kinetic energy, diagnostic only.
    #[must_use]
    pub fn k(&self) -> ScalarField {
        self.inner.k()
    }

    /// Turbulence dissipation rate, diagnostic only.
    #[must_use]
    pub fn epsilon(&self) -> ScalarField {
        self.inner.epsilon()
    }
}

impl<H> TurbulenceModel<H> for WrayAgarwal2017mDv
where
    H: FieldCalculus + WallGeometry + ScalarTransport,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        WrayAgarwal2017mDv::read(self, dict)
    }

    fn correct(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError> {
        WrayAgarwal2017mDv::correct(self, host, flow)
    }

    fn nut(&self) -> &ScalarField {
        self.inner.nut()
    }

    fn k(&self) -> ScalarField {
        self.inner.k()
    }

    fn epsilon(&self) -> ScalarField {
        self.inner.epsilon()
    }
}
