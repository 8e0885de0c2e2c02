//! Assembly and solution of the `Rnu` transport equation.
//!
//! All variants share one equation skeleton,
//!
//! ```text
//! ddt(Rnu) + div(phi, Rnu) - laplacian(DRnuEff(f1), Rnu)
//!     =  C1(f1)·S·Rnu                          production
//!     +  f1·C2kw·(∇Rnu·∇S)/S·Rnu              first destruction
//!     -  second destruction                    per-variant policy
//! ```
//!
//! and differ only in the second destruction term and in the multipliers a
//! hybrid or compressibility variant hangs on it. Production and the first
//! destruction are linearized implicitly; the bounded second destruction is
//! explicit, matching the reference treatment.

use log::debug;

use crate::{
    models::wray_agarwal::core::WaCore,
    support::{
        field::ScalarField,
        host::{FieldCalculus, FlowState, ScalarTransport, SolveError, SolveStats,
               TransportTerms},
    },
};

/// Second-destruction-term policy.
///
/// The quadratic form divides by `S²`, which collapses the eddy viscosity
/// where the strain rate vanishes while its gradient does not (the channel
/// centre). The 2018 models floor that behavior by bounding the term with
/// `Cm·|∇Rnu|²`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Destruction {
    /// `(1 − f1)·C2ke·Rnu²·|∇S|²/S²`, implicit in `Rnu`.
    Quadratic,
    /// `(1 − f1)·min(C2ke·Rnu²·|∇S|²/S², Cm·|∇Rnu|²)`, explicit.
    Bounded { cm: f64 },
}

/// Per-variant hooks into the shared equation skeleton.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RnuTerms<'a> {
    pub destruction: Destruction,
    /// DES length-scale factor; squares onto the quadratic destruction term.
    pub fdes: Option<&'a ScalarField>,
    /// Compressibility correction multiplier on the destruction terms.
    pub fcomp: Option<&'a ScalarField>,
    /// Extra implicit sink coefficient (1/s), e.g. the elliptic-blending
    /// near-wall damping term.
    pub wall_damping: Option<&'a ScalarField>,
}

impl RnuTerms<'_> {
    pub fn new(destruction: Destruction) -> Self {
        Self {
            destruction,
            fdes: None,
            fcomp: None,
            wall_damping: None,
        }
    }
}

impl WaCore {
    /// Assembles the per-cell transport terms of the `Rnu` equation.
    pub(crate) fn assemble_rnu<H: FieldCalculus>(
        &self,
        host: &H,
        flow: &FlowState<'_>,
        opts: &RnuTerms<'_>,
    ) -> TransportTerms {
        let n = self.n_cells();
        let grad_r = host.grad(&self.rnu);
        let grad_s = host.grad(&self.s);
        let c1 = self.c1(&self.f1);

        let mut implicit = ScalarField::zeros(n);
        let mut explicit = ScalarField::zeros(n);

        let c = &self.coeffs;
        for i in 0..n {
            let r = self.rnu[i];
            let s = self.s[i];
            let f1 = self.f1[i];
            let gr = grad_r[i];
            let gs = grad_s[i];

            let mut sp = c1[i] * s;

            sp += f1 * c.c2kw * gr.dot(gs) / s;

            let fdes_sq = opts.fdes.map_or(1.0, |f| f[i] * f[i]);
            let fcomp = opts.fcomp.map_or(1.0, |f| f[i]);
            let gs_sq = gs.length_squared();

            match opts.destruction {
                Destruction::Quadratic => {
                    sp -= fcomp * (1.0 - f1) * c.c2ke * r * gs_sq / (s * s) * fdes_sq;
                }
                Destruction::Bounded { cm } => {
                    let quadratic = c.c2ke * r * r * gs_sq / (s * s) * fdes_sq;
                    let floor = cm * gr.length_squared();
                    explicit[i] -= fcomp * (1.0 - f1) * quadratic.min(floor);
                }
            }

            if let Some(damping) = opts.wall_damping {
                sp -= damping[i];
            }

            implicit[i] = sp;
        }

        TransportTerms {
            diffusivity: self.drnu_eff(&self.f1, flow.nu),
            implicit,
            explicit,
            transient: true,
        }
    }

    /// Assembles and solves the `Rnu` equation, clips the solution to be
    /// non-negative, and updates the eddy viscosity.
    ///
    /// # Errors
    ///
    /// Propagates any [`SolveError`] from the host linear-equation facility.
    pub(crate) fn solve_rnu<H: FieldCalculus + ScalarTransport>(
        &mut self,
        host: &mut H,
        flow: &FlowState<'_>,
        opts: &RnuTerms<'_>,
    ) -> Result<SolveStats, SolveError> {
        let terms = self.assemble_rnu(host, flow, opts);
        let stats = host.solve("Rnu", &terms, &mut self.rnu)?;

        let clipped = self.rnu.clamp_min(0.0);
        if clipped > 0 {
            debug!("Rnu solve clipped {clipped} negative cells to zero");
        }

        self.correct_nut(flow.nu);
        Ok(stats)
    }
}
