//! Numeric invariants enforced at construction time.
//!
//! Closure coefficients and a handful of model quantities carry hard numeric
//! invariants: an eddy-viscosity proxy is never negative, a blending switch
//! lives in the unit interval, a reference length is strictly positive. This
//! module encodes those invariants at the type level so a value that made it
//! past construction needs no further checking.
//!
//! Three marker types are provided, used with the generic [`Checked<T, B>`]
//! wrapper:
//!
//! - [`NonNegative`]: zero or greater (`Rnu`, `nut`, `rhoPrime2`)
//! - [`StrictlyPositive`]: greater than zero (model coefficients, `Lref`)
//! - [`UnitInterval`]: `0 ≤ x ≤ 1` (blending switches `f1`, `fd`, `PR`)
//!
//! `NaN` is rejected by every bound.

use std::{fmt, marker::PhantomData};

use num_traits::{One, Zero};
use thiserror::Error;

/// A numeric invariant that can be checked against a value.
///
/// Implemented by zero-sized marker types such as [`NonNegative`].
pub trait Bound<T> {
    /// Checks that `value` satisfies this bound.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundError`] describing the violation.
    fn check(value: &T) -> Result<(), BoundError>;
}

/// An error returned when a [`Bound`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must be strictly positive")]
    NotPositive,
    #[error("value must lie in [0, 1]")]
    OutsideUnitInterval,
    #[error("value is not a number")]
    NotANumber,
}

/// A value guaranteed to satisfy the bound `B`.
///
/// The check runs once, in [`Checked::new`]; afterwards the wrapper is a
/// plain `Copy`-able value.
///
/// # Example
///
/// ```
/// use wa_models::support::constraint::{Checked, UnitInterval};
///
/// let f1 = Checked::<f64, UnitInterval>::new(0.9).unwrap();
/// assert_eq!(f1.into_inner(), 0.9);
/// assert!(Checked::<f64, UnitInterval>::new(1.2).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Checked<T, B: Bound<T>> {
    value: T,
    _bound: PhantomData<B>,
}

impl<T, B: Bound<T>> Checked<T, B> {
    /// Wraps `value` after verifying the bound.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundError`] if `value` violates the bound or is `NaN`.
    pub fn new(value: T) -> Result<Self, BoundError> {
        B::check(&value)?;
        Ok(Self {
            value,
            _bound: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, B: Bound<T>> Checked<T, B> {
    /// Returns the inner value.
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T, B: Bound<T>> AsRef<T> for Checked<T, B> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug, B: Bound<T>> fmt::Debug for Checked<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// Marker type: zero or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonNegative;

impl NonNegative {
    /// Shorthand for `Checked::<T, NonNegative>::new`.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundError`] if `value` is negative or `NaN`.
    pub fn new<T: PartialOrd + Zero>(value: T) -> Result<Checked<T, NonNegative>, BoundError> {
        Checked::new(value)
    }
}

impl<T: PartialOrd + Zero> Bound<T> for NonNegative {
    fn check(value: &T) -> Result<(), BoundError> {
        match value.partial_cmp(&T::zero()) {
            Some(ord) if ord.is_ge() => Ok(()),
            Some(_) => Err(BoundError::Negative),
            None => Err(BoundError::NotANumber),
        }
    }
}

/// Marker type: strictly greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Shorthand for `Checked::<T, StrictlyPositive>::new`.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundError`] if `value` is zero or less, or `NaN`.
    pub fn new<T: PartialOrd + Zero>(value: T) -> Result<Checked<T, StrictlyPositive>, BoundError> {
        Checked::new(value)
    }
}

impl<T: PartialOrd + Zero> Bound<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), BoundError> {
        match value.partial_cmp(&T::zero()) {
            Some(ord) if ord.is_gt() => Ok(()),
            Some(_) => Err(BoundError::NotPositive),
            None => Err(BoundError::NotANumber),
        }
    }
}

/// Marker type: the closed unit interval `0 ≤ x ≤ 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInterval;

impl UnitInterval {
    /// Shorthand for `Checked::<T, UnitInterval>::new`.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundError`] if `value` lies outside `[0, 1]` or is `NaN`.
    pub fn new<T: PartialOrd + Zero + One>(
        value: T,
    ) -> Result<Checked<T, UnitInterval>, BoundError> {
        Checked::new(value)
    }
}

impl<T: PartialOrd + Zero + One> Bound<T> for UnitInterval {
    fn check(value: &T) -> Result<(), BoundError> {
        let below = value.partial_cmp(&T::zero());
        let above = value.partial_cmp(&T::one());
        match (below, above) {
            (Some(lo), Some(hi)) if lo.is_ge() && hi.is_le() => Ok(()),
            (Some(_), Some(_)) => Err(BoundError::OutsideUnitInterval),
            _ => Err(BoundError::NotANumber),
        }
    }
}
