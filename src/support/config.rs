//! Coefficient dictionary and configuration errors.
//!
//! The host framework hands each model a flat key-value dictionary of scalar
//! coefficients at construction and again on every re-read request. Values
//! are interpreted in SI base units. Every coefficient is either *defaulted*
//! (absent keys fall back to the model's documented default) or *required*
//! (absent keys abort construction); malformed values are always an error,
//! never silently replaced.

use std::collections::BTreeMap;

use thiserror::Error;
use uom::si::{f64::Length, length::meter};

use crate::support::constraint::StrictlyPositive;

/// A configuration failure. Aborts model construction or re-read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A coefficient with no default was absent from the dictionary.
    #[error("required coefficient `{key}` is missing from the model dictionary")]
    MissingKey { key: &'static str },

    /// A coefficient was present but unusable (non-finite, or violating the
    /// coefficient's sign constraint).
    #[error("coefficient `{key}` has invalid value {value}: {reason}")]
    Invalid {
        key: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A model type name not present in the registry.
    #[error("unknown turbulence model `{name}`")]
    UnknownModel { name: String },
}

/// A flat dictionary of named scalar coefficients.
///
/// # Example
///
/// ```
/// use wa_models::support::config::CoeffDict;
///
/// let dict = CoeffDict::from_iter([("kappa", 0.41), ("Cw", 8.54)]);
/// assert_eq!(dict.lookup_or("kappa", 0.40).unwrap(), 0.41);
/// assert_eq!(dict.lookup_or("Cmu", 0.09).unwrap(), 0.09);
/// assert!(dict.require("Lref").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoeffDict(BTreeMap<String, f64>);

impl CoeffDict {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a coefficient.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> &mut Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Raw lookup without validation.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Returns the coefficient, falling back to `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a present value is non-finite.
    pub fn lookup_or(&self, key: &'static str, default: f64) -> Result<f64, ConfigError> {
        match self.0.get(key) {
            None => Ok(default),
            Some(&value) if value.is_finite() => Ok(value),
            Some(&value) => Err(ConfigError::Invalid {
                key,
                value,
                reason: "value must be finite",
            }),
        }
    }

    /// Returns a coefficient that has no default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when absent and
    /// [`ConfigError::Invalid`] when non-finite.
    pub fn require(&self, key: &'static str) -> Result<f64, ConfigError> {
        match self.0.get(key) {
            None => Err(ConfigError::MissingKey { key }),
            Some(&value) if value.is_finite() => Ok(value),
            Some(&value) => Err(ConfigError::Invalid {
                key,
                value,
                reason: "value must be finite",
            }),
        }
    }

    /// Like [`CoeffDict::lookup_or`], additionally demanding a strictly
    /// positive value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero, negative, or non-finite
    /// values.
    pub fn lookup_positive_or(
        &self,
        key: &'static str,
        default: f64,
    ) -> Result<f64, ConfigError> {
        let value = self.lookup_or(key, default)?;
        StrictlyPositive::new(value)
            .map(|checked| checked.get())
            .map_err(|_| ConfigError::Invalid {
                key,
                value,
                reason: "value must be strictly positive",
            })
    }

    /// A required, strictly positive length in metres.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when absent and
    /// [`ConfigError::Invalid`] for non-positive or non-finite values.
    pub fn require_length(&self, key: &'static str) -> Result<Length, ConfigError> {
        let value = self.require(key)?;
        StrictlyPositive::new(value)
            .map(|checked| Length::new::<meter>(checked.get()))
            .map_err(|_| ConfigError::Invalid {
                key,
                value,
                reason: "length must be strictly positive",
            })
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for CoeffDict {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
