//! WA-2018EB: wall-distance-free model with elliptic blending.
//!
//! Couples the `Rnu` equation with an elliptic blending equation for the
//! field `PR`, which relaxes from 0 at walls to 1 in the free stream over
//! the configured reference length scale. The resolved `PR` drives an extra
//! near-wall destruction term that improves the near-wall velocity profile.
//!
//! The reference length `Lref` has no default and **must** be supplied in
//! the coefficient dictionary; construction and re-reads fail without it.
//!
//! Default coefficients:
//!
//! ```text
//! kappa 0.41    Cw 5.97    C1ke 0.094    C1kw 0.2
//! sigmake 1.0   sigmakw 0.72
//! C2ke 1.24     C2kw 2.63     C3kw 0.171
//! Cmu 0.09      Cm 8.0        Lref <required>
//! ```

use uom::si::{f64::Length, length::meter};

use crate::{
    models::{
        CorrectError, TurbulenceModel,
        wray_agarwal::{
            core::{Destruction, RnuTerms, WaDefaults},
            wa2018::{WrayAgarwal2018, calc_wdf_f1},
        },
    },
    support::{
        config::{CoeffDict, ConfigError},
        field::ScalarField,
        host::{FieldCalculus, FlowState, ScalarTransport, TransportTerms},
    },
};

/// The WA-2018EB turbulence model.
#[derive(Debug, Clone)]
pub struct WrayAgarwal2018Eb {
    inner: WrayAgarwal2018,
    c3kw: f64,
    lref: Length,
    /// Elliptic blending field, dimensionless in `[0, 1]`.
    pr: ScalarField,
}

impl WrayAgarwal2018Eb {
    /// Registry type name.
    pub const NAME: &'static str = "WrayAgarwal2018EB";

    /// Constructs the model from an initial `Rnu` field and a coefficient
    /// dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when `Lref` is absent, or
    /// [`ConfigError::Invalid`] for malformed coefficients.
    pub fn new(rnu0: ScalarField, dict: &CoeffDict) -> Result<Self, ConfigError> {
        let inner = WrayAgarwal2018::with_defaults(rnu0, dict, WaDefaults::WA2018EB)?;
        let n = inner.rnu().len();
        Ok(Self {
            inner,
            c3kw: dict.lookup_positive_or("C3kw", 0.171)?,
            lref: dict.require_length("Lref")?,
            pr: ScalarField::uniform(1.0, n),
        })
    }

    /// Re-reads the coefficient set; `Lref` stays required.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for missing `Lref` or malformed values.
    pub fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        self.inner.read(dict)?;
        self.c3kw = dict.lookup_positive_or("C3kw", 0.171)?;
        self.lref = dict.require_length("Lref")?;
        Ok(())
    }

    /// Squared reference length scale of the blending equation, m².
    #[must_use]
    pub fn lr2(&self) -> f64 {
        let l = self.lref.get::<meter>();
        l * l
    }

    /// Advances the model by one step: the elliptic `PR` solve feeds the
    /// near-wall destruction of the standard `Rnu` solve.
    ///
    /// # Errors
    ///
    /// Propagates host solver failures as [`CorrectError`].
    pub fn correct<H>(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError>
    where
        H: FieldCalculus + ScalarTransport,
    {
        self.inner.update_invariants(flow.grad_u);
        {
            let WrayAgarwal2018 { core, w, .. } = &mut self.inner;
            calc_wdf_f1(core, w, flow.nu);
        }

        // Elliptic blending: lap(PR) - PR/Lref² = -1/Lref², walls pull PR
        // to 0 through the host's boundary conditions.
        let n = self.pr.len();
        let inv_lr2 = 1.0 / self.lr2();
        let terms = TransportTerms {
            diffusivity: ScalarField::uniform(1.0, n),
            implicit: ScalarField::uniform(-inv_lr2, n),
            explicit: ScalarField::uniform(inv_lr2, n),
            transient: false,
        };
        host.solve("PR", &terms, &mut self.pr)?;
        self.pr.clamp(0.0, 1.0);

        // Near-wall destruction (1 - PR³)·C3kw·S, vanishing where PR -> 1.
        let damping = self.pr.zip_map(&self.inner.core.s, |pr, s| {
            (1.0 - pr * pr * pr) * self.c3kw * s
        });

        let mut opts = RnuTerms::new(Destruction::Bounded { cm: self.inner.cm });
        opts.wall_damping = Some(&damping);
        self.inner.core.solve_rnu(host, flow, &opts)?;
        Ok(())
    }

    /// Eddy viscosity, the model output.
    #[must_use]
    pub fn nut(&self) -> &ScalarField {
        self.inner.nut()
    }

    /// Elliptic blending field, for diagnostics.
    #[must_use]
    pub fn pr(&self) -> &ScalarField {
        &self.pr
    }

    /// Blending switch field, for diagnostics.
    #[must_use]
    pub fn f1(&self) -> &ScalarField {
        self.inner.f1()
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

impl<H> TurbulenceModel<H> for WrayAgarwal2018Eb
where
    H: FieldCalculus + ScalarTransport,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError> {
        WrayAgarwal2018Eb::read(self, dict)
    }

    fn correct(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError> {
        WrayAgarwal2018Eb::correct(self, host, flow)
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
