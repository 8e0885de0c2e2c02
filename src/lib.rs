//! # wa-models
//!
//! The Wray-Agarwal family of one-equation and hybrid RANS/LES turbulence
//! closure models, packaged as a numerical-kernel library for embedding in
//! a finite-volume CFD solver.
//!
//! Each model transports an eddy-viscosity proxy `Rnu`, blends near-wall
//! (k-ω) and free-stream (k-ε) closure coefficients through a per-cell
//! switch, and produces the eddy viscosity consumed by the host's momentum
//! and continuity solve. Mesh handling, matrix assembly, linear solves, and
//! time marching stay on the host side, reached through the capability
//! traits in [`support::host`].
//!
//! ## Crate layout
//!
//! - [`models`]: the closure models and the type-name registry.
//! - [`support`]: fields, numeric constraints, units, configuration, and the
//!   host collaborator seams (including a 1-D reference host used by the
//!   crate's own tests).
//!
//! ## Minimal embedding
//!
//! ```
//! use wa_models::models::{TurbulenceModel, registry};
//! use wa_models::support::{
//!     config::CoeffDict,
//!     field::{ScalarField, TensorField},
//!     host::{FlowState, channel::Channel1d},
//! };
//!
//! let mut host = Channel1d::new(16, 1.0, 0.01);
//! let dict = CoeffDict::new();
//! let mut model =
//!     registry::build::<Channel1d>("WrayAgarwal2018", ScalarField::uniform(1e-4, 16), &dict)
//!         .unwrap();
//!
//! let grad_u = TensorField::zeros(16);
//! let nu = ScalarField::uniform(1.5e-5, 16);
//! let rho = ScalarField::uniform(1.2, 16);
//! let flow = FlowState {
//!     grad_u: &grad_u,
//!     nu: &nu,
//!     rho: &rho,
//!     temperature: None,
//! };
//!
//! model.correct(&mut host, &flow).unwrap();
//! assert!(model.nut().min() >= 0.0);
//! ```

pub mod models;
pub mod support;
