//! Hybrid RANS/LES models: WA2017DES, WA2017DDES, WA2017IDDES.
//!
//! The whole family shares the WA-2017m transport machinery and differs only
//! in how the per-cell length-scale factor `fdes` is computed. `fdes ≥ 1`
//! multiplies (squared) onto the quadratic destruction term: where the grid
//! resolves scales finer than the RANS length scale `√(Rnu/S)`, destruction
//! is amplified and the model behaves LES-like; on coarse grids `fdes = 1`
//! and the model reduces to pure RANS.
//!
//! The factor computation is the single override point, expressed as a
//! [`LengthScaleModifier`] strategy so the numerically sensitive solve path
//! exists exactly once:
//!
//! - [`DetachedEddy`]: `fdes = max(Lrans/(CDES·Δ), 1)`.
//! - [`DelayedDetachedEddy`]: shields attached boundary layers with
//!   `fd = 1 − tanh((Cd1·rd)³)` before allowing the LES branch.
//! - [`ImprovedDelayedDetachedEddy`]: adds wall-modeled/wall-resolved
//!   blending of the two length scales.

use crate::{
    models::{
        CorrectError, TurbulenceModel,
        wray_agarwal::{
            core::{Destruction, RnuTerms, WA_SMALL, WaCore, WaDefaults},
            wa2017::calc_wall_f1,
            wa2017m::F1_CAP,
        },
    },
    support::{
        config::{CoeffDict, ConfigError},
        field::ScalarField,
        host::{FieldCalculus, FlowState, GridScale, ScalarTransport, WallGeometry},
    },
};

/// Per-cell inputs to a length-scale strategy.
#[derive(Debug, Clone, Copy)]
pub struct DesContext<'a> {
    /// RANS length scale `√(Rnu/S)`, m.
    pub l_rans: &'a ScalarField,
    /// LES length scale `CDES·Δ`, m.
    pub l_les: &'a ScalarField,
    /// Previous-step eddy viscosity, m²/s.
    pub nut: &'a ScalarField,
    /// Molecular kinematic viscosity, m²/s.
    pub nu: &'a ScalarField,
    /// Frobenius norm of the velocity gradient, 1/s.
    pub mag_grad_u: &'a ScalarField,
    /// Wall distance, m.
    pub wall_distance: &'a ScalarField,
    /// Grid length scale Δ, m.
    pub delta: &'a ScalarField,
    /// Von Kármán constant.
    pub kappa: f64,
}

/// The override point of the DES family: fills `fdes` for the current step.
pub trait LengthScaleModifier {
    /// Registry type name of the model using this strategy.
    const NAME: &'static str;

    /// Re-reads strategy coefficients.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients.
    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError>;

    /// Recomputes the length-scale factor; every value must be `>= 1`.
    fn calc_fdes(&mut self, ctx: &DesContext<'_>, fdes: &mut ScalarField);
}

/// Wall-shielding ratio `rd = nur/(κ²·d²·max(|∇U|, small))`.
///
/// Large deep inside a boundary layer, small in separated or free-shear
/// regions.
fn rd(nur: f64, mag_grad_u: f64, kappa: f64, d: f64) -> f64 {
    nur / (kappa * kappa * d * d * mag_grad_u.max(WA_SMALL))
}

/// Shielding function `fd = 1 − tanh((cd·rd)³)`.
fn shield(rd: f64, cd: f64) -> f64 {
    1.0 - (cd * rd).powi(3).tanh()
}

/// Plain DES length-scale switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedEddy;

impl LengthScaleModifier for DetachedEddy {
    const NAME: &'static str = "WA2017DES";

    fn read(&mut self, _dict: &CoeffDict) -> Result<(), ConfigError> {
        Ok(())
    }

    fn calc_fdes(&mut self, ctx: &DesContext<'_>, fdes: &mut ScalarField) {
        for i in 0..fdes.len() {
            fdes[i] = (ctx.l_rans[i] / ctx.l_les[i]).max(1.0);
        }
    }
}

/// DDES: DES with boundary-layer shielding (delay).
///
/// `fd` multiplies the LES-triggering deviation of `fdes` from 1, so
/// attached boundary layers (`rd` large, `fd → 0`) stay in RANS mode even
/// on fine grids.
#[derive(Debug, Clone)]
pub struct DelayedDetachedEddy {
    cd1: f64,
    /// Shielding function, dimensionless in `[0, 1]`. Persists across steps
    /// for host-side output.
    fd: ScalarField,
}

impl Default for DelayedDetachedEddy {
    fn default() -> Self {
        Self {
            cd1: 4.0,
            fd: ScalarField::zeros(0),
        }
    }
}

impl DelayedDetachedEddy {
    /// Shielding function field from the last step.
    #[must_use]
    pub fn fd(&self) -> &ScalarField {
        &self.fd
    }

    fn update_fd(&mut self, ctx: &DesContext<'_>) {
        let n = ctx.l_rans.len();
        if self.fd.len() != n {
            self.fd = ScalarField::zeros(n);
        }
        for i in 0..n {
            let nur = ctx.nut[i] + ctx.nu[i];
            let rd = rd(nur, ctx.mag_grad_u[i], ctx.kappa, ctx.wall_distance[i]);
            self.fd[i] = shield(rd, self.cd1);
        }
    }
}

impl LengthScaleModifier for DelayedDetachedEddy {
    const NAME: &'static str = "WA2017DDES";

    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.cd1 = dict.lookup_positive_or("Cd1", 4.0)?;
        Ok(())
    }

    fn calc_fdes(&mut self, ctx: &DesContext<'_>, fdes: &mut ScalarField) {
        self.update_fd(ctx);
        for i in 0..fdes.len() {
            let deviation = (ctx.l_rans[i] / ctx.l_les[i] - 1.0).max(0.0);
            fdes[i] = 1.0 + self.fd[i] * deviation;
        }
    }
}

/// IDDES: wall-modeled/wall-resolved blending of the two length scales.
///
/// The blending weight combines the DDES-style shield (computed from the
/// eddy viscosity alone) with a geometric wall-proximity function, and the
/// hybrid length scale replaces the hard `max` switch of plain DES.
#[derive(Debug, Clone)]
pub struct ImprovedDelayedDetachedEddy {
    cdt1: f64,
    fd: ScalarField,
}

impl Default for ImprovedDelayedDetachedEddy {
    fn default() -> Self {
        Self {
            cdt1: 8.0,
            fd: ScalarField::zeros(0),
        }
    }
}

impl ImprovedDelayedDetachedEddy {
    /// Blending weight field from the last step.
    #[must_use]
    pub fn fd(&self) -> &ScalarField {
        &self.fd
    }
}

impl LengthScaleModifier for ImprovedDelayedDetachedEddy {
    const NAME: &'static str = "WA2017IDDES";

    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.cdt1 = dict.lookup_positive_or("Cdt1", 8.0)?;
        Ok(())
    }

    fn calc_fdes(&mut self, ctx: &DesContext<'_>, fdes: &mut ScalarField) {
        let n = fdes.len();
        if self.fd.len() != n {
            self.fd = ScalarField::zeros(n);
        }
        for i in 0..n {
            // Geometric wall-proximity branch.
            let alpha = 0.25 - ctx.wall_distance[i] / ctx.delta[i];
            let fb = (2.0 * (-9.0 * alpha * alpha).exp()).min(1.0);

            // Turbulent shield, from the modeled viscosity alone.
            let rdt = rd(
                ctx.nut[i],
                ctx.mag_grad_u[i],
                ctx.kappa,
                ctx.wall_distance[i],
            );
            let fdt = shield(rdt, self.cdt1);
            let fd_hat = (1.0 - fdt).max(fb);
            self.fd[i] = fd_hat;

            let l_hybrid =
                (fd_hat * ctx.l_rans[i] + (1.0 - fd_hat) * ctx.l_les[i]).max(WA_SMALL);
            fdes[i] = (ctx.l_rans[i] / l_hybrid).max(1.0);
        }
    }
}

/// A hybrid RANS/LES model: the WA-2017m core with a pluggable length-scale
/// strategy.
#[derive(Debug, Clone)]
pub struct WaDes<M> {
    core: WaCore,
    cdes: f64,
    /// Length-scale factor, ≥ 1, recomputed every step.
    fdes: ScalarField,
    modifier: M,
}

/// Plain detached-eddy model.
pub type Wa2017Des = WaDes<DetachedEddy>;
/// Delayed detached-eddy model.
pub type Wa2017Ddes = WaDes<DelayedDetachedEddy>;
/// Improved delayed detached-eddy model.
pub type Wa2017Iddes = WaDes<ImprovedDelayedDetachedEddy>;

impl<M: LengthScaleModifier + Default> WaDes<M> {
    /// Registry type name.
    pub const NAME: &'static str = M::NAME;

    /// Constructs the model from an initial `Rnu` field and a coefficient
    /// dictionary.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients.
    pub fn new(rnu0: ScalarField, dict: &CoeffDict) -> Result<Self, ConfigError> {
        let core = WaCore::new(rnu0, dict, WaDefaults::WA2017)?;
        let n = core.n_cells();
        let mut modifier = M::default();
        modifier.read(dict)?;
        Ok(Self {
            core,
            cdes: dict.lookup_positive_or("CDES", 0.41)?,
            fdes: ScalarField::uniform(1.0, n),
            modifier,
        })
    }
}

impl<M: LengthScaleModifier> WaDes<M> {
    /// Re-reads the coefficient set, including the strategy's.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed coefficients.
    pub fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.core.read(dict)?;
        self.cdes = dict.lookup_positive_or("CDES", 0.41)?;
        self.modifier.read(dict)
    }

    /// Advances the model by one step: the RANS machinery plus the
    /// length-scale factor feeding the destruction term.
    ///
    /// # Errors
    ///
    /// Propagates host solver failures as [`CorrectError`].
    pub fn correct<H>(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError>
    where
        H: FieldCalculus + WallGeometry + GridScale + ScalarTransport,
    {
        self.core.update_strain(flow.grad_u);
        calc_wall_f1(&mut self.core, host.wall_distance(), flow.nu, Some(F1_CAP));

        let n = self.core.n_cells();
        let mut l_rans = ScalarField::zeros(n);
        let mut l_les = ScalarField::zeros(n);
        let delta = host.delta();
        for i in 0..n {
            l_rans[i] = (self.core.rnu[i] / self.core.s[i]).sqrt();
            l_les[i] = self.cdes * delta[i];
        }
        let mag_grad_u = WaCore::mag_grad_u(flow.grad_u);

        let ctx = DesContext {
            l_rans: &l_rans,
            l_les: &l_les,
            nut: &self.core.nut,
            nu: flow.nu,
            mag_grad_u: &mag_grad_u,
            wall_distance: host.wall_distance(),
            delta,
            kappa: self.core.coeffs.kappa,
        };
        self.modifier.calc_fdes(&ctx, &mut self.fdes);

        let mut opts = RnuTerms::new(Destruction::Quadratic);
        opts.fdes = Some(&self.fdes);
        self.core.solve_rnu(host, flow, &opts)?;
        Ok(())
    }

    /// Eddy viscosity, the model output.
    #[must_use]
    pub fn nut(&self) -> &ScalarField {
        &self.core.nut
    }

    /// Length-scale factor from the last step, ≥ 1.
    #[must_use]
    pub fn fdes(&self) -> &ScalarField {
        &self.fdes
    }

    /// The length-scale strategy, exposing strategy-owned fields such as
    /// the DDES shielding function.
    #[must_use]
    pub fn modifier(&self) -> &M {
        &self.modifier
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

impl<M, H> TurbulenceModel<H> for WaDes<M>
where
    M: LengthScaleModifier,
    H: FieldCalculus + WallGeometry + GridScale + ScalarTransport,
{
    fn name(&self) -> &'static str {
        M::NAME
    }

    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        WaDes::read(self, dict)
    }

    fn correct(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError> {
        WaDes::correct(self, host, flow)
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

    use approx::assert_relative_eq;

    use crate::{
        models::test_support::{shear_channel, uniform_shear},
        support::host::channel::Channel1d,
    };

    /// Runs `steps` corrects on a uniform-shear channel (S constant, no
    /// zero-strain cells) with the given grid length scale.
    fn run_uniform<M: LengthScaleModifier + Default>(
        n: usize,
        rnu0: f64,
        delta: f64,
        steps: usize,
    ) -> (WaDes<M>, Channel1d) {
        let (mut host, grad_u, nu, rho) = uniform_shear(n);
        host.set_delta(ScalarField::uniform(delta, n));
        let mut model = WaDes::<M>::new(ScalarField::uniform(rnu0, n), &CoeffDict::new()).unwrap();
        let flow = FlowState {
            grad_u: &grad_u,
            nu: &nu,
            rho: &rho,
            temperature: None,
        };
        for _ in 0..steps {
            model.correct(&mut host, &flow).unwrap();
        }
        (model, host)
    }

    /// Runs `steps` corrects on the centre-vanishing shear channel.
    fn run_channel<M: LengthScaleModifier + Default>(
        n: usize,
        rnu0: f64,
        delta: f64,
        steps: usize,
    ) -> (WaDes<M>, Channel1d) {
        let (mut host, grad_u, nu, rho) = shear_channel(n);
        host.set_delta(ScalarField::uniform(delta, n));
        let mut model = WaDes::<M>::new(ScalarField::uniform(rnu0, n), &CoeffDict::new()).unwrap();
        let flow = FlowState {
            grad_u: &grad_u,
            nu: &nu,
            rho: &rho,
            temperature: None,
        };
        for _ in 0..steps {
            model.correct(&mut host, &flow).unwrap();
        }
        (model, host)
    }

    #[test]
    fn fdes_is_at_least_one_everywhere() {
        let (model, _) = run_channel::<DetachedEddy>(25, 1e-3, 1e-4, 1);
        assert!(model.fdes().min() >= 1.0);
    }

    #[test]
    fn coarse_grid_reduces_to_pure_rans() {
        // Grid length scale far larger than the RANS length scale: the
        // destruction amplification must switch off exactly.
        let (model, _) = run_uniform::<DetachedEddy>(25, 1e-3, 1e3, 1);
        for v in model.fdes().iter() {
            assert_relative_eq!(v, 1.0);
        }
    }

    #[test]
    fn fine_grid_amplifies_destruction() {
        let (model, _) = run_uniform::<DetachedEddy>(25, 1e-3, 1e-4, 1);
        assert!(
            model.fdes().max() > 1.0,
            "fine grid should trigger the LES branch"
        );
    }

    #[test]
    fn ddes_shield_suppresses_switching_near_walls() {
        use crate::support::constraint::UnitInterval;

        // Two steps so the shield sees a developed eddy viscosity.
        let (model, _) = run_channel::<DelayedDetachedEddy>(41, 5e-4, 1e-4, 2);
        let fd = model.modifier().fd();

        for v in fd.iter() {
            assert!(UnitInterval::new(v).is_ok(), "fd out of range: {v}");
        }

        // Wall-adjacent cells have rd large -> fd near 0 (shielded); away
        // from the wall, with moderate shear, rd is small -> fd near 1.
        assert!(fd[0] < 0.2, "wall fd should be shielded, got {}", fd[0]);
        assert!(fd[30] > 0.8, "outer fd should be open, got {}", fd[30]);
    }

    #[test]
    fn ddes_fdes_stays_rans_where_shielded() {
        let (model, _) = run_channel::<DelayedDetachedEddy>(41, 5e-4, 1e-4, 2);
        let fd = model.modifier().fd();
        let fdes = model.fdes();
        assert!(fdes.min() >= 1.0);
        // Fully shielded cells keep fdes = 1 regardless of the fine grid.
        let mut shielded = 0;
        for i in 0..fd.len() {
            if fd[i] == 0.0 {
                shielded += 1;
                assert_relative_eq!(fdes[i], 1.0);
            }
        }
        assert!(shielded > 0, "expected fully shielded wall cells");
    }

    #[test]
    fn shield_limits_match_the_formula() {
        // rd large -> fd -> 0; rd small -> fd -> 1.
        assert!(shield(10.0, 4.0) < 1e-12);
        assert_relative_eq!(shield(0.0, 4.0), 1.0);
        assert!(shield(0.05, 4.0) > 0.99);
    }

    #[test]
    fn iddes_fdes_is_bounded_and_wall_aware() {
        let (model, _) = run_channel::<ImprovedDelayedDetachedEddy>(41, 5e-4, 1e-4, 2);
        assert!(model.fdes().min() >= 1.0);
        let fd = model.modifier().fd();
        assert!(fd.min() >= 0.0 && fd.max() <= 1.0);
    }

    #[test]
    fn adversarial_seeds_end_non_negative() {
        let (mut host, grad_u, nu, rho) = shear_channel(25);
        host.set_delta(ScalarField::uniform(1e-4, 25));
        let rnu0 = ScalarField::from_vec(
            (0..25)
                .map(|i| if i % 3 == 0 { -2.0 } else { 1e-4 })
                .collect(),
        );
        let mut model = Wa2017Ddes::new(rnu0, &CoeffDict::new()).unwrap();
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
    fn read_round_trips_strategy_coefficients() {
        let dict = CoeffDict::from_iter([("CDES", 0.5), ("Cd1", 6.0)]);
        let mut model = Wa2017Ddes::new(ScalarField::uniform(1e-4, 9), &dict).unwrap();
        model.read(&dict).unwrap();
        assert_eq!(model.cdes, 0.5);
        assert_eq!(model.modifier().cd1, 6.0);
    }
}
