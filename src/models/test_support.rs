//! Shared test fixtures for the model tests.
//!
//! Every fixture returns `(host, grad_u, nu, rho)` as separate values so a
//! test can borrow the flow fields immutably while handing the host to
//! `correct` mutably.

use glam::DMat3;

use crate::support::{
    field::{ScalarField, TensorField},
    host::channel::Channel1d,
};

const LENGTH: f64 = 1.0;
const DT: f64 = 0.01;
const NU: f64 = 1e-5;
const SHEAR: f64 = 8.0;

fn gradient(du_dy: f64, du_dx: f64) -> DMat3 {
    let mut g = DMat3::ZERO;
    // entry (0, 1) = du/dy lives in column 1, row 0
    g.y_axis.x = du_dy;
    // entry (0, 0) = du/dx
    g.x_axis.x = du_dx;
    g
}

/// Channel with shear vanishing mid-height: `du/dy = SHEAR·(x − L/2)`.
///
/// Reproduces the zero-strain-with-finite-strain-gradient situation at the
/// channel centre that separates the 2017 and 2018 destruction treatments.
pub(crate) fn shear_channel(n: usize) -> (Channel1d, TensorField, ScalarField, ScalarField) {
    let host = Channel1d::new(n, LENGTH, DT);
    let mut grad_u = TensorField::zeros(n);
    for i in 0..n {
        grad_u[i] = gradient(SHEAR * (host.cell_centre(i) - 0.5 * LENGTH), 0.0);
    }
    (
        host,
        grad_u,
        ScalarField::uniform(NU, n),
        ScalarField::uniform(1.0, n),
    )
}

/// Channel with spatially constant shear: `S = SHEAR` in every cell.
pub(crate) fn uniform_shear(n: usize) -> (Channel1d, TensorField, ScalarField, ScalarField) {
    let host = Channel1d::new(n, LENGTH, DT);
    let grad_u = TensorField::from_vec(vec![gradient(SHEAR, 0.0); n]);
    (
        host,
        grad_u,
        ScalarField::uniform(NU, n),
        ScalarField::uniform(1.0, n),
    )
}

/// Quiescent flow: zero velocity gradient everywhere.
pub(crate) fn uniform_flow(n: usize) -> (Channel1d, TensorField, ScalarField, ScalarField) {
    let host = Channel1d::new(n, LENGTH, DT);
    (
        host,
        TensorField::zeros(n),
        ScalarField::uniform(NU, n),
        ScalarField::uniform(1.0, n),
    )
}

/// Sheared channel with nonzero dilatation, `div(U) = 2.0` per cell, for the
/// compressibility-correction model.
pub(crate) fn compressible_channel(n: usize) -> (Channel1d, TensorField, ScalarField, ScalarField) {
    let host = Channel1d::new(n, LENGTH, DT);
    let mut grad_u = TensorField::zeros(n);
    for i in 0..n {
        grad_u[i] = gradient(SHEAR * (host.cell_centre(i) - 0.5 * LENGTH), 2.0);
    }
    (
        host,
        grad_u,
        ScalarField::uniform(NU, n),
        ScalarField::uniform(1.0, n),
    )
}
