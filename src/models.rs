//! Turbulence closure models.
//!
//! Models are the primary public interface of this crate. Each model owns
//! its persistent per-cell fields, reads its coefficients from a
//! [`CoeffDict`], and advances one solver step per [`TurbulenceModel::correct`]
//! call, leaving the eddy viscosity for the momentum solver to pick up.
//!
//! # Organization
//!
//! The Wray-Agarwal family lives in [`wray_agarwal`], with the shared
//! computational core in an internal `core` submodule and one public model
//! type per published variant. [`registry`] provides construction by the
//! string type names the host framework dispatches on.
//!
//! # Model structure
//!
//! Each model type exposes inherent `new`/`read`/`correct` methods with the
//! narrowest host-capability bounds it needs; the [`TurbulenceModel`] trait
//! implementation is a thin adapter over those for hosts that hold models
//! behind a single object type.

pub mod registry;
pub mod wray_agarwal;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

use crate::support::{
    config::{CoeffDict, ConfigError},
    field::ScalarField,
    host::{FlowState, SolveError},
};

/// A failure while advancing a model by one step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrectError {
    /// The host linear-equation facility reported a failure.
    #[error(transparent)]
    Solve(#[from] SolveError),

    /// The model needs a temperature field and the host supplied none.
    #[error("`{model}` requires a temperature field from the host thermophysical model")]
    MissingTemperature { model: &'static str },
}

/// Host-facing interface of every turbulence closure model.
///
/// `H` is the host framework type supplying field calculus and the
/// linear-equation facility; the registry requires the full capability set,
/// while direct construction of a concrete model only demands what that
/// model uses.
pub trait TurbulenceModel<H> {
    /// Registry type name of the model.
    fn name(&self) -> &'static str;

    /// Re-reads all coefficients from the dictionary.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending key; the previous
    /// coefficient set stays in place on failure.
    fn read(&mut self, dict: &CoeffDict) -> Result<(), ConfigError>;

    /// Solves the turbulence equations for one step and updates the eddy
    /// viscosity.
    ///
    /// # Errors
    ///
    /// Returns a [`CorrectError`] on host solver failure or missing flow
    /// inputs.
    fn correct(&mut self, host: &mut H, flow: &FlowState<'_>) -> Result<(), CorrectError>;

    /// Eddy viscosity, m²/s.
    fn nut(&self) -> &ScalarField;

    /// Turbulence kinetic energy, m²/s² (diagnostic).
    fn k(&self) -> ScalarField;

    /// Turbulence dissipation rate, m²/s³ (diagnostic).
    fn epsilon(&self) -> ScalarField;
}
