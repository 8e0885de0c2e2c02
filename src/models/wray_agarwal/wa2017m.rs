//! WA-2017m: the modified baseline model.
//!
//! Identical to [`WrayAgarwal2017`](crate::models::wray_agarwal::WrayAgarwal2017)
//! except that the blending switch is capped at 0.9, so the free-stream
//! coefficient branch never switches off completely. The compressibility
//! and DES models build on this variant.

use crate::{
    models::{
        CorrectError, TurbulenceModel,
        wray_agarwal::{
            core::{Destruction, RnuTerms, WaCore, WaDefaults},
            wa2017::calc_wall_f1,
        },
    },
    support::{
        config::{CoeffDict, ConfigError},
        field::ScalarField,
        host::{FieldCalculus, FlowState, ScalarTransport, WallGeometry},
    },
};

/// Cap applied to the blending switch.
pub(crate) const F1_CAP: f64 = 0.9;

/// The WA-2017m turbulence model.
#[derive(Debug, Clone)]
pub struct WrayAgarwal2017m {
    pub(crate) core: WaCore,
}

impl WrayAgarwal2017m {
    /// Registry type name.
    pub const NAME: &'static str = "WrayAgarwal2017m";

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
    /// Returns a [`ConfigError`] for malformed coefficients.
    pub fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.core.read(dict)
    }

    pub(crate) fn calc_f1(&mut self, wall_distance: &ScalarField, nu: &ScalarField) {
        calc_wall_f1(&mut self.core, wall_distance, nu, Some(F1_CAP));
    }

    /// Advances the model by one step.
    ///
    /// # Errors
    ///
    /// Propagates host solver failures as [`CorrectError`].
    pub fn correct<H>(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError>
    where
        H: FieldCalculus + WallGeometry + ScalarTransport,
    {
        self.core.update_strain(flow.grad_u);
        self.calc_f1(host.wall_distance(), flow.nu);
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

impl<H> TurbulenceModel<H> for WrayAgarwal2017m
where
    H: FieldCalculus + WallGeometry + ScalarTransport,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        WrayAgarwal2017m::read(self, dict)
    }

    fn correct(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError> {
        WrayAgarwal2017m::correct(self, host, flow)
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
    use crate::support::host::WallGeometry;

    #[test]
    fn f1_never_exceeds_the_cap() {
        let (host, grad_u, nu, _rho) = shear_channel(25);
        let mut model =
            WrayAgarwal2017m::new(ScalarField::uniform(5e-4, 25), &CoeffDict::new()).unwrap();
        model.core.update_strain(&grad_u);
        model.calc_f1(host.wall_distance(), &nu);
        for f1 in model.f1().iter() {
            assert!(f1 <= F1_CAP, "f1 {f1} exceeds the cap");
            assert!(f1 >= 0.0);
        }
    }

    #[test]
    fn cap_binds_where_the_uncapped_switch_saturates() {
        let (host, grad_u, nu, _rho) = shear_channel(41);
        let mut model =
            WrayAgarwal2017m::new(ScalarField::uniform(5e-4, 41), &CoeffDict::new()).unwrap();
        model.core.update_strain(&grad_u);

        calc_wall_f1(&mut model.core, host.wall_distance(), &nu, None);
        let uncapped = model.core.f1.clone();
        assert!(
            uncapped.max() > F1_CAP,
            "fixture should drive the switch past the cap"
        );

        model.calc_f1(host.wall_distance(), &nu);
        for i in 0..41 {
            assert_eq!(model.core.f1[i], uncapped[i].min(F1_CAP));
        }
    }

    #[test]
    fn zero_strain_collapse_also_affects_2017m() {
        let (mut host, grad_u, nu, rho) = shear_channel(30);
        let mut model =
            WrayAgarwal2017m::new(ScalarField::uniform(1e-2, 30), &CoeffDict::new()).unwrap();
        let flow = FlowState {
            grad_u: &grad_u,
            nu: &nu,
            rho: &rho,
            temperature: None,
        };
        for _ in 0..200 {
            model.correct(&mut host, &flow).unwrap();
        }
        assert!(model.rnu()[14] < 0.2 * model.rnu()[7]);
    }
}
