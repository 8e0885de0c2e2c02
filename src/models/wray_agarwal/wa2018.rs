//! WA-2018: the wall-distance-free model.
//!
//! Re-defines the blending switch of WA-2017 from velocity-gradient
//! invariants instead of the geometric wall distance, so the model runs on
//! geometries without a precomputed boundary-distance map. Also bounds the
//! second destruction term to fix the eddy-viscosity drop in zero-strain
//! regions such as the channel centre.
//!
//! Default coefficients:
//!
//! ```text
//! kappa 0.41    Cw 8.54    C1ke 0.1284   C1kw 0.0829
//! sigmake 1.0   sigmakw 0.72
//! C2ke 1.7638 (C1ke/κ² + σke)   C2kw 1.2132 (C1kw/κ² + σkw)
//! Cmu 0.09      Cm 8.0
//! ```

use crate::{
    models::{
        CorrectError, TurbulenceModel,
        wray_agarwal::core::{Destruction, RnuTerms, WA_SMALL, WaCore, WaDefaults},
    },
    support::{
        config::{CoeffDict, ConfigError},
        field::{ScalarField, TensorField},
        host::{FieldCalculus, FlowState, ScalarTransport},
    },
};

/// Computes the wall-distance-free blending switch into `core.f1`.
///
/// Surrogate turbulence variables come from the strain and vorticity
/// magnitudes and the previous-step eddy viscosity:
///
/// ```text
/// ω    = S/√Cmu          k = nut·ω        η = S·max(1, W/S)
/// arg1 = ((ν + Rnu)/2)·η² / max(Cmu·k·ω, small)
/// f1   = tanh(arg1⁴)
/// ```
pub(crate) fn calc_wdf_f1(core: &mut WaCore, w: &ScalarField, nu: &ScalarField) {
    let cmu = core.coeffs.cmu;
    for i in 0..core.n_cells() {
        let s = core.s[i];
        let omega = s / cmu.sqrt();
        let k = core.nut[i] * omega;
        let eta = s * (w[i] / s).max(1.0);
        let arg1 = (nu[i] + core.rnu[i]) / 2.0 * eta * eta / (cmu * k * omega).max(WA_SMALL);
        core.f1[i] = arg1.powi(4).tanh();
    }
}

/// The WA-2018 turbulence model.
#[derive(Debug, Clone)]
pub struct WrayAgarwal2018 {
    pub(crate) core: WaCore,
    /// Bound coefficient for the second destruction term.
    pub(crate) cm: f64,
    /// Vorticity magnitude, 1/s.
    pub(crate) w: ScalarField,
}

impl WrayAgarwal2018 {
    /// Registry type name.
    pub const NAME: &'static str = "WrayAgarwal2018";

    /// Constructs the model from an initial `Rnu` field and a coefficient
    /// dictionary.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients.
    pub fn new(rnu0: ScalarField, dict: &CoeffDict) -> Result<Self, ConfigError> {
        Self::with_defaults(rnu0, dict, WaDefaults::WA2018)
    }

    pub(crate) fn with_defaults(
        rnu0: ScalarField,
        dict: &CoeffDict,
        defaults: WaDefaults,
    ) -> Result<Self, ConfigError> {
        let core = WaCore::new(rnu0, dict, defaults)?;
        let n = core.n_cells();
        Ok(Self {
            core,
            cm: dict.lookup_positive_or("Cm", 8.0)?,
            w: ScalarField::zeros(n),
        })
    }

    /// Re-reads the coefficient set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients.
    pub fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.core.read(dict)?;
        self.cm = dict.lookup_positive_or("Cm", 8.0)?;
        Ok(())
    }

    pub(crate) fn update_invariants(&mut self, grad_u: &TensorField) {
        self.core.update_strain(grad_u);
        self.w = WaCore::vorticity_mag(grad_u);
    }

    /// Advances the model by one step.
    ///
    /// # Errors
    ///
    /// Propagates host solver failures as [`CorrectError`].
    pub fn correct<H>(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError>
    where
        H: FieldCalculus + ScalarTransport,
    {
        self.update_invariants(flow.grad_u);
        calc_wdf_f1(&mut self.core, &self.w, flow.nu);
        self.core.solve_rnu(
            host,
            flow,
            &RnuTerms::new(Destruction::Bounded { cm: self.cm }),
        )?;
        Ok(())
    }

    /// Eddy viscosity, the model output.
    #[must_use]
    pub fn nut(&self) -> &ScalarField {
        &self.core.nut
    }

    /// Blending switch field, for diagnostics.
    #[must_use]
    pub fn f1(&self) -> &ScalarField {
        &self.core.f1
    }

    /// Transported eddy-viscosity proxy.
    #[must_use]
    pub fn rnu(&self) -> &ScalarField {
        &self.core.rnu
    }

    /// Turbulence kinetic energy, diagnostic only.
    #[must_use]
    pub fn k(&self) -> ScalarField {
        self.core.k()
    }

    /// Turbulence dissipation rate, diagnostic only.
    #[must_use]
    pub fn epsilon(&self) -> ScalarField {
        self.core.epsilon()
    }
}

impl<H> TurbulenceModel<H> for WrayAgarwal2018
where
    H: FieldCalculus + ScalarTransport,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        WrayAgarwal2018::read(self, dict)
    }

    fn correct(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError> {
        WrayAgarwal2018::correct(self, host, flow)
    }

    fn nut(&self) -> &ScalarField {
        &self.core.nut
    }

    fn k(&self) -> ScalarField {
        self.core.k()
    }

    fn epsilon(&self) -> ScalarField {
        self.core.epsilon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::test_support::shear_channel;

    #[test]
    fn default_c1ke_is_the_2018_recalibration() {
        let model =
            WrayAgarwal2018::new(ScalarField::uniform(1e-4, 5), &CoeffDict::new()).unwrap();
        assert_eq!(model.core.coeffs.c1ke, 0.1284);
        assert_eq!(model.cm, 8.0);
    }

    #[test]
    fn wdf_switch_stays_in_the_unit_interval() {
        let (_host, grad_u, nu, _rho) = shear_channel(25);
        let mut model =
            WrayAgarwal2018::new(ScalarField::uniform(1e-4, 25), &CoeffDict::new()).unwrap();
        model.update_invariants(&grad_u);
        // Seed a previous-step eddy viscosity so the surrogate k is nonzero.
        model.core.correct_nut(&nu);
        let w = model.w.clone();
        calc_wdf_f1(&mut model.core, &w, &nu);
        for f1 in model.f1().iter() {
            assert!(
                crate::support::constraint::UnitInterval::new(f1).is_ok(),
                "f1 out of range: {f1}"
            );
        }
    }

    #[test]
    fn destruction_floor_prevents_zero_strain_collapse() {
        // Same scenario that collapses the 2017 models: S ~ 0 mid-channel
        // with a finite strain gradient. The Cm bound must keep Rnu alive,
        // and the difference against the unbounded 2017 model must show.
        use crate::models::wray_agarwal::wa2017::WrayAgarwal2017;

        let (mut host, grad_u, nu, rho) = shear_channel(30);
        let mut bounded =
            WrayAgarwal2018::new(ScalarField::uniform(1e-2, 30), &CoeffDict::new()).unwrap();
        let mut unbounded =
            WrayAgarwal2017::new(ScalarField::uniform(1e-2, 30), &CoeffDict::new()).unwrap();
        let flow = FlowState {
            grad_u: &grad_u,
            nu: &nu,
            rho: &rho,
            temperature: None,
        };
        for _ in 0..200 {
            bounded.correct(&mut host, &flow).unwrap();
            unbounded.correct(&mut host, &flow).unwrap();
        }

        let mid = 14;
        let quarter = 7;
        assert!(
            bounded.rnu()[mid] > 0.3 * bounded.rnu()[quarter],
            "centre Rnu {} must not collapse (quarter-height {})",
            bounded.rnu()[mid],
            bounded.rnu()[quarter]
        );
        // The floored model retains far more centre viscosity than the
        // unbounded one in the identical flow.
        assert!(
            bounded.rnu()[mid] > 3.0 * unbounded.rnu()[mid],
            "bounded {} vs unbounded {}",
            bounded.rnu()[mid],
            unbounded.rnu()[mid]
        );
    }

    #[test]
    fn adversarial_seeds_end_non_negative() {
        let (mut host, grad_u, nu, rho) = shear_channel(25);
        let rnu0 = ScalarField::from_vec(
            (0..25)
                .map(|i| if i % 4 == 0 { -0.5 } else { 2e-4 })
                .collect(),
        );
        let mut model = WrayAgarwal2018::new(rnu0, &CoeffDict::new()).unwrap();
        let flow = FlowState {
            grad_u: &grad_u,
            nu: &nu,
            rho: &rho,
            temperature: None,
        };
        for _ in 0..4 {
            model.correct(&mut host, &flow).unwrap();
        }
        assert!(model.rnu().min() >= 0.0);
        assert!(model.nut().min() >= 0.0);
    }

    #[test]
    fn read_round_trips() {
        let dict = CoeffDict::from_iter([("Cm", 6.0), ("Cmu", 0.08)]);
        let mut model = WrayAgarwal2018::new(ScalarField::uniform(1e-4, 7), &dict).unwrap();
        let first = (model.core.coeffs, model.cm);
        model.read(&dict).unwrap();
        assert_eq!(first, (model.core.coeffs, model.cm));
        assert_eq!(model.cm, 6.0);
    }
}
