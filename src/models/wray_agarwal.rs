//! The Wray-Agarwal one-equation model family.
//!
//! All variants transport a single eddy-viscosity proxy `Rnu` and blend
//! k-ω and k-ε closure coefficient sets through a per-cell switch `f1`;
//! they differ in the switch formula, the second-destruction treatment, and
//! the sub-equations they couple in:
//!
//! | model | switch | notes |
//! |---|---|---|
//! | [`WrayAgarwal2017`] | wall distance | original quadratic destruction |
//! | [`WrayAgarwal2017m`] | wall distance, capped | basis of the DV and DES models |
//! | [`WrayAgarwal2017mDv`] | wall distance, capped | density-variance compressibility correction |
//! | [`WrayAgarwal2018`] | wall-distance-free | bounded destruction (zero-strain fix) |
//! | [`WrayAgarwal2018Eb`] | wall-distance-free | elliptic blending, requires `Lref` |
//! | [`Wa2017Des`] / [`Wa2017Ddes`] / [`Wa2017Iddes`] | wall distance, capped | hybrid RANS/LES destruction scaling |

pub(crate) mod core;
mod des;
mod wa2017;
mod wa2017m;
mod wa2017m_dv;
mod wa2018;
mod wa2018_eb;

pub use self::core::WaCoeffs;
pub use des::{
    DelayedDetachedEddy, DesContext, DetachedEddy, ImprovedDelayedDetachedEddy,
    LengthScaleModifier, Wa2017Ddes, Wa2017Des, Wa2017Iddes, WaDes,
};
pub use wa2017::WrayAgarwal2017;
pub use wa2017m::WrayAgarwal2017m;
pub use wa2017m_dv::WrayAgarwal2017mDv;
pub use wa2018::WrayAgarwal2018;
pub use wa2018_eb::WrayAgarwal2018Eb;
