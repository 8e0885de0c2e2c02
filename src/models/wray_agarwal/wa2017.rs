//! WA-2017: the baseline one-equation model.
//!
//! Wall-distance-based blending switch and the original (unbounded)
//! quadratic second destruction term.
//!
//! Default coefficients:
//!
//! ```text
//! kappa 0.41    Cw 8.54    C1ke 0.1127   C1kw 0.0829
//! sigmake 1.0   sigmakw 0.72
//! C2ke 1.6704 (C1ke/κ² + σke)   C2kw 1.2132 (C1kw/κ² + σkw)
//! ```

use crate::{
    models::{
        CorrectError, TurbulenceModel,
        wray_agarwal::core::{Destruction, RnuTerms, WaCore, WaDefaults},
    },
    support::{
        config::{CoeffDict, ConfigError},
        field::ScalarField,
        host::{FieldCalculus, FlowState, ScalarTransport, WallGeometry},
    },
};

/// Computes the wall-distance blending switch into `core.f1`:
///
/// ```text
/// arg1 = (1 + d·√(Rnu·S)/ν) / (1 + (max(d·√(Rnu·S), 1.5·Rnu)/(20·ν))²)
/// f1   = tanh(arg1⁴), optionally capped
/// ```
///
/// The cap keeps a residual share of the k-ε branch active everywhere; the
/// 2017m models apply it at 0.9.
pub(crate) fn calc_wall_f1(
    core: &mut WaCore,
    wall_distance: &ScalarField,
    nu: &ScalarField,
    cap: Option<f64>,
) {
    for i in 0..core.n_cells() {
        let d = wall_distance[i];
        let sqrt_rs = (core.rnu[i] * core.s[i]).sqrt();
        let scale = (d * sqrt_rs).max(1.5 * core.rnu[i]) / (20.0 * nu[i]);
        let arg1 = (1.0 + d * sqrt_rs / nu[i]) / (1.0 + scale * scale);
        let f1 = arg1.powi(4).tanh();
        core.f1[i] = match cap {
            Some(cap) => f1.min(cap),
            None => f1,
        };
    }
}

/// The WA-2017 turbulence model.
#[derive(Debug, Clone)]
pub struct WrayAgarwal2017 {
    core: WaCore,
}

impl WrayAgarwal2017 {
    /// Registry type name.
    pub const NAME: &'static str = "WrayAgarwal2017";

    /// Constructs the model from an initial `Rnu` field and a coefficient
    /// dictionary.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients.
    pub fn new(rnu0: ScalarField, dict: &CoeffDict) -> Result<Self, ConfigError> {
        Ok(Self {
            core: WaCore::new(rnu0, dict, WaDefaults::WA2017)?,
        })
    }

    /// Re-reads the coefficient set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients; the previous
    /// set stays in place on failure.
    pub fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.core.read(dict)
    }

    /// Advances the model by one step: strain rate, blending switch, the
    /// `Rnu` transport solve, and the eddy-viscosity update.
    ///
    /// # Errors
    ///
    /// Propagates host solver failures as [`CorrectError`].
    pub fn correct<H>(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError>
    where
        H: FieldCalculus + WallGeometry + ScalarTransport,
    {
        self.core.update_strain(flow.grad_u);
        calc_wall_f1(&mut self.core, host.wall_distance(), flow.nu, None);
        self.core
            .solve_rnu(host, flow, &RnuTerms::new(Destruction::Quadratic))?;
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

impl<H> TurbulenceModel<H> for WrayAgarwal2017
where
    H: FieldCalculus + WallGeometry + ScalarTransport,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        WrayAgarwal2017::read(self, dict)
    }

    fn correct(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError> {
        WrayAgarwal2017::correct(self, host, flow)
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

    use crate::models::test_support::{shear_channel, uniform_flow};
    use crate::support::host::WallGeometry;

    #[test]
    fn f1_stays_in_the_unit_interval() {
        use crate::support::constraint::UnitInterval;

        let (host, grad_u, nu, _rho) = shear_channel(25);
        let mut model =
            WrayAgarwal2017::new(ScalarField::uniform(1e-4, 25), &CoeffDict::new()).unwrap();
        model.core.update_strain(&grad_u);
        calc_wall_f1(&mut model.core, host.wall_distance(), &nu, None);
        for f1 in model.f1().iter() {
            assert!(UnitInterval::new(f1).is_ok(), "f1 out of range: {f1}");
        }
    }

    #[test]
    fn f1_rises_toward_the_wall() {
        let (host, grad_u, nu, _rho) = shear_channel(41);
        let mut model =
            WrayAgarwal2017::new(ScalarField::uniform(5e-4, 41), &CoeffDict::new()).unwrap();
        model.core.update_strain(&grad_u);
        calc_wall_f1(&mut model.core, host.wall_distance(), &nu, None);
        let f1 = model.f1();
        assert!(f1[1] > f1[20], "near-wall f1 {} vs centre {}", f1[1], f1[20]);
    }

    #[test]
    fn correct_keeps_rnu_non_negative_for_adversarial_seeds() {
        let (mut host, grad_u, nu, rho) = shear_channel(25);
        let rnu0 = ScalarField::from_vec(
            (0..25)
                .map(|i| if i % 2 == 0 { -1.0 } else { 1e-4 })
                .collect(),
        );
        let mut model = WrayAgarwal2017::new(rnu0, &CoeffDict::new()).unwrap();
        let flow = FlowState {
            grad_u: &grad_u,
            nu: &nu,
            rho: &rho,
            temperature: None,
        };
        for _ in 0..3 {
            model.correct(&mut host, &flow).unwrap();
        }
        assert!(model.rnu().min() >= 0.0);
        assert!(model.nut().min() >= 0.0);
    }

    #[test]
    fn read_round_trips() {
        let dict = CoeffDict::from_iter([("kappa", 0.40), ("C1ke", 0.12)]);
        let mut model = WrayAgarwal2017::new(ScalarField::uniform(1e-4, 9), &dict).unwrap();
        let first = model.core.coeffs;
        model.read(&dict).unwrap();
        let second = model.core.coeffs;
        assert_eq!(first, second);
    }

    #[test]
    fn zero_strain_region_collapses_rnu() {
        // The unbounded quadratic destruction wears Rnu down where S ~ 0
        // with a finite strain gradient: the documented channel-centre drop.
        // Even cell count keeps the strain gradient finite at the dip cells.
        let (mut host, grad_u, nu, rho) = shear_channel(30);
        let mut model =
            WrayAgarwal2017::new(ScalarField::uniform(1e-2, 30), &CoeffDict::new()).unwrap();
        let flow = FlowState {
            grad_u: &grad_u,
            nu: &nu,
            rho: &rho,
            temperature: None,
        };
        for _ in 0..200 {
            model.correct(&mut host, &flow).unwrap();
        }
        let mid = 14;
        let quarter = 7;
        assert!(
            model.rnu()[mid] < 0.2 * model.rnu()[quarter],
            "centre Rnu {} should collapse relative to quarter-height {}",
            model.rnu()[mid],
            model.rnu()[quarter]
        );
    }

    #[test]
    fn freestream_flow_keeps_finite_viscosity() {
        let (mut host, grad_u, nu, rho) = uniform_flow(9);
        let mut model =
            WrayAgarwal2017::new(ScalarField::uniform(3e-4, 9), &CoeffDict::new()).unwrap();
        let flow = FlowState {
            grad_u: &grad_u,
            nu: &nu,
            rho: &rho,
            temperature: None,
        };
        model.correct(&mut host, &flow).unwrap();
        assert!(model.rnu().max().is_finite());
        assert!(model.rnu().min() >= 0.0);
    }
}
