//! Per-cell field storage.
//!
//! A field holds one value per discretization cell. Values are raw `f64` in
//! SI base units; each field's physical dimensions are documented where the
//! field is declared. Calculus on fields (gradients, transport solves) is
//! the host framework's job, reached through the traits in
//! [`crate::support::host`]; this module only provides storage and
//! element-wise arithmetic.

use std::ops::{Add, Index, IndexMut, Mul, Sub};

use glam::{DMat3, DVec3};

/// A scalar value per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField(Vec<f64>);

impl ScalarField {
    /// A field with the same `value` in every cell.
    #[must_use]
    pub fn uniform(value: f64, len: usize) -> Self {
        Self(vec![value; len])
    }

    /// A field of zeros.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self::uniform(0.0, len)
    }

    #[must_use]
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Applies `f` to every cell value.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|&v| f(v)).collect())
    }

    /// Combines two fields cell by cell.
    ///
    /// # Panics
    ///
    /// Panics if the fields have different lengths; mismatched fields are a
    /// programming error, not a runtime condition.
    #[must_use]
    pub fn zip_map(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(self.len(), other.len(), "field length mismatch");
        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }

    /// Clamps every cell to at least `lo`, returning how many cells changed.
    pub fn clamp_min(&mut self, lo: f64) -> usize {
        let mut clipped = 0;
        for v in &mut self.0 {
            if *v < lo {
                *v = lo;
                clipped += 1;
            }
        }
        clipped
    }

    /// Clamps every cell into `[lo, hi]`.
    pub fn clamp(&mut self, lo: f64, hi: f64) {
        for v in &mut self.0 {
            *v = v.clamp(lo, hi);
        }
    }

    /// Smallest cell value, or `f64::INFINITY` for an empty field.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest cell value, or `f64::NEG_INFINITY` for an empty field.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Index<usize> for ScalarField {
    type Output = f64;

    fn index(&self, cell: usize) -> &f64 {
        &self.0[cell]
    }
}

impl IndexMut<usize> for ScalarField {
    fn index_mut(&mut self, cell: usize) -> &mut f64 {
        &mut self.0[cell]
    }
}

impl Add for &ScalarField {
    type Output = ScalarField;

    fn add(self, rhs: Self) -> ScalarField {
        self.zip_map(rhs, |a, b| a + b)
    }
}

impl Sub for &ScalarField {
    type Output = ScalarField;

    fn sub(self, rhs: Self) -> ScalarField {
        self.zip_map(rhs, |a, b| a - b)
    }
}

impl Mul for &ScalarField {
    type Output = ScalarField;

    fn mul(self, rhs: Self) -> ScalarField {
        self.zip_map(rhs, |a, b| a * b)
    }
}

impl Mul<f64> for &ScalarField {
    type Output = ScalarField;

    fn mul(self, rhs: f64) -> ScalarField {
        self.map(|v| v * rhs)
    }
}

/// A 3-vector per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField(Vec<DVec3>);

impl VectorField {
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![DVec3::ZERO; len])
    }

    #[must_use]
    pub fn from_vec(values: Vec<DVec3>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[DVec3] {
        &self.0
    }

    pub fn values_mut(&mut self) -> &mut [DVec3] {
        &mut self.0
    }

    /// Cell-wise dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> ScalarField {
        assert_eq!(self.len(), other.len(), "field length mismatch");
        ScalarField::from_vec(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| a.dot(*b))
                .collect(),
        )
    }

    /// Cell-wise squared magnitude.
    #[must_use]
    pub fn norm_sq(&self) -> ScalarField {
        ScalarField::from_vec(self.0.iter().map(|v| v.length_squared()).collect())
    }
}

impl Index<usize> for VectorField {
    type Output = DVec3;

    fn index(&self, cell: usize) -> &DVec3 {
        &self.0[cell]
    }
}

impl IndexMut<usize> for VectorField {
    fn index_mut(&mut self, cell: usize) -> &mut DVec3 {
        &mut self.0[cell]
    }
}

/// A 3×3 tensor per cell, used for velocity gradients.
///
/// The component convention follows `grad(U)`: entry `(i, j)` of a cell's
/// matrix is `∂u_i/∂x_j`, with `DMat3` rows addressed via [`DMat3::row`].
#[derive(Debug, Clone, PartialEq)]
pub struct TensorField(Vec<DMat3>);

impl TensorField {
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![DMat3::ZERO; len])
    }

    #[must_use]
    pub fn from_vec(values: Vec<DMat3>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[DMat3] {
        &self.0
    }

    pub fn values_mut(&mut self) -> &mut [DMat3] {
        &mut self.0
    }
}

impl Index<usize> for TensorField {
    type Output = DMat3;

    fn index(&self, cell: usize) -> &DMat3 {
        &self.0[cell]
    }
}

impl IndexMut<usize> for TensorField {
    fn index_mut(&mut self, cell: usize) -> &mut DMat3 {
        &mut self.0[cell]
    }
}
