//! Collaborator seams to the hosting finite-volume framework.
//!
//! The closure models are purely local per-cell mathematics; everything with
//! a mesh-global footprint (gradients, matrix assembly, the linear solve,
//! boundary conditions, parallel exchange) belongs to the host framework.
//! Each host facility is a separate capability trait so a model's `correct`
//! only demands what it actually uses: a wall-distance-free RANS model needs
//! [`FieldCalculus`] and [`ScalarTransport`], the DES family additionally
//! needs [`WallGeometry`] and [`GridScale`].
//!
//! [`channel::Channel1d`] implements every capability over a uniform 1-D
//! wall-bounded mesh and is what this crate's own tests drive models with.

pub mod channel;

use thiserror::Error;

use crate::support::field::{ScalarField, TensorField, VectorField};

/// Cell-gradient calculus over the host mesh.
pub trait FieldCalculus {
    /// Number of cells in the local domain.
    fn n_cells(&self) -> usize;

    /// Gradient of a cell scalar field.
    fn grad(&self, field: &ScalarField) -> VectorField;
}

/// Distance from each cell centre to the nearest wall, in metres.
pub trait WallGeometry {
    fn wall_distance(&self) -> &ScalarField;
}

/// Local grid length scale for the DES family, in metres.
///
/// The host applies its own delta definition (e.g. `maxDeltaxyz` with a
/// delta coefficient) before handing the field over.
pub trait GridScale {
    fn delta(&self) -> &ScalarField;
}

/// Assembled per-cell terms of one scalar transport equation,
///
/// ```text
/// ddt(X) + div(phi, X) - laplacian(diffusivity, X) = implicit·X + explicit
/// ```
///
/// Time scheme, convective fluxes, boundary conditions, and the matrix solve
/// are the host's responsibility; the closure only supplies the fields below.
#[derive(Debug, Clone)]
pub struct TransportTerms {
    /// Effective diffusivity Γ per cell, m²/s.
    pub diffusivity: ScalarField,
    /// Implicit source coefficient per cell, 1/s. Negative values damp the
    /// transported quantity.
    pub implicit: ScalarField,
    /// Explicit source per cell, in units of the transported quantity per
    /// second.
    pub explicit: ScalarField,
    /// Whether the equation carries a time-derivative term. Elliptic
    /// sub-equations (the 2018EB blending equation) set this to `false`.
    pub transient: bool,
}

/// Convergence report from a transport solve.
#[derive(Debug, Clone, Copy)]
pub struct SolveStats {
    pub iterations: usize,
    pub initial_residual: f64,
    pub final_residual: f64,
}

/// A failure reported by the host linear-equation facility.
///
/// Numerical solve failures are diagnosed and reported by the host; the
/// closure models only propagate them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("{equation} transport solve diverged (residual {residual:e})")]
    Diverged {
        equation: &'static str,
        residual: f64,
    },

    #[error("{equation} transport matrix is singular at cell {cell}")]
    Singular {
        equation: &'static str,
        cell: usize,
    },

    #[error("{equation} solution is not finite at cell {cell}")]
    NotFinite {
        equation: &'static str,
        cell: usize,
    },
}

/// The host linear-equation facility.
pub trait ScalarTransport {
    /// Solves one scalar transport equation in place.
    ///
    /// `equation` names the transported quantity for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] from the host solver; the closure propagates
    /// it unchanged.
    fn solve(
        &mut self,
        equation: &'static str,
        terms: &TransportTerms,
        field: &mut ScalarField,
    ) -> Result<SolveStats, SolveError>;
}

/// Per-step flow inputs borrowed from the momentum/continuity solver.
#[derive(Debug, Clone, Copy)]
pub struct FlowState<'a> {
    /// Velocity gradient tensor, entry `(i, j)` = `∂u_i/∂x_j`, 1/s.
    pub grad_u: &'a TensorField,
    /// Molecular kinematic viscosity, m²/s.
    pub nu: &'a ScalarField,
    /// Density, kg/m³.
    pub rho: &'a ScalarField,
    /// Temperature from the host thermophysical model, K. Only the
    /// compressibility-correction variant consumes it.
    pub temperature: Option<&'a ScalarField>,
}
