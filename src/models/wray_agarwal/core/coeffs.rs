//! The blended closure coefficient set shared by the whole model family.

use crate::support::config::{CoeffDict, ConfigError};

/// Per-variant default values for [`WaCoeffs::read`].
///
/// `c2ke`/`c2kw` default to the derived values `C1/κ² + σ` when `None`; the
/// elliptic-blending variant specifies them independently.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WaDefaults {
    pub kappa: f64,
    pub cw: f64,
    pub c1ke: f64,
    pub c1kw: f64,
    pub sigma_ke: f64,
    pub sigma_kw: f64,
    pub c2ke: Option<f64>,
    pub c2kw: Option<f64>,
    pub cmu: f64,
}

impl WaDefaults {
    /// WA-2017 family (2017, 2017m, 2017mDV, and the DES models).
    pub const WA2017: Self = Self {
        kappa: 0.41,
        cw: 8.54,
        c1ke: 0.1127,
        c1kw: 0.0829,
        sigma_ke: 1.0,
        sigma_kw: 0.72,
        c2ke: None,
        c2kw: None,
        cmu: 0.09,
    };

    /// WA-2018, the wall-distance-free model.
    pub const WA2018: Self = Self {
        kappa: 0.41,
        cw: 8.54,
        c1ke: 0.1284,
        c1kw: 0.0829,
        sigma_ke: 1.0,
        sigma_kw: 0.72,
        c2ke: None,
        c2kw: None,
        cmu: 0.09,
    };

    /// WA-2018EB. The second-destruction coefficients are calibrated
    /// independently rather than derived from `C1` and `σ`.
    pub const WA2018EB: Self = Self {
        kappa: 0.41,
        cw: 5.97,
        c1ke: 0.094,
        c1kw: 0.2,
        sigma_ke: 1.0,
        sigma_kw: 0.72,
        c2ke: Some(1.24),
        c2kw: Some(2.63),
        cmu: 0.09,
    };
}

/// Closure coefficients of the base one-equation model.
///
/// Immutable between [`WaCoeffs::read`] calls; a re-read replaces the whole
/// set. Dictionary keys and defaults:
///
/// | key       | default            |
/// |-----------|--------------------|
/// | `kappa`   | 0.41               |
/// | `Cw`      | 8.54 (EB: 5.97)    |
/// | `C1ke`    | 0.1127 (2018: 0.1284, EB: 0.094) |
/// | `C1kw`    | 0.0829 (EB: 0.2)   |
/// | `sigmake` | 1.0                |
/// | `sigmakw` | 0.72               |
/// | `C2ke`    | `C1ke/κ² + σke` (EB: 1.24) |
/// | `C2kw`    | `C1kw/κ² + σkw` (EB: 2.63) |
/// | `Cmu`     | 0.09               |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaCoeffs {
    pub kappa: f64,
    pub cw: f64,
    pub c1ke: f64,
    pub c1kw: f64,
    pub sigma_ke: f64,
    pub sigma_kw: f64,
    pub c2ke: f64,
    pub c2kw: f64,
    pub cmu: f64,
}

impl WaCoeffs {
    /// Reads the full coefficient set from `dict`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any malformed value; nothing is
    /// defaulted silently in that case.
    pub(crate) fn read(dict: &CoeffDict, defaults: &WaDefaults) -> Result<Self, ConfigError> {
        let kappa = dict.lookup_positive_or("kappa", defaults.kappa)?;
        let cw = dict.lookup_positive_or("Cw", defaults.cw)?;
        let c1ke = dict.lookup_positive_or("C1ke", defaults.c1ke)?;
        let c1kw = dict.lookup_positive_or("C1kw", defaults.c1kw)?;
        let sigma_ke = dict.lookup_positive_or("sigmake", defaults.sigma_ke)?;
        let sigma_kw = dict.lookup_positive_or("sigmakw", defaults.sigma_kw)?;

        let c2ke_default = defaults
            .c2ke
            .unwrap_or(c1ke / (kappa * kappa) + sigma_ke);
        let c2kw_default = defaults
            .c2kw
            .unwrap_or(c1kw / (kappa * kappa) + sigma_kw);

        Ok(Self {
            kappa,
            cw,
            c1ke,
            c1kw,
            sigma_ke,
            sigma_kw,
            c2ke: dict.lookup_positive_or("C2ke", c2ke_default)?,
            c2kw: dict.lookup_positive_or("C2kw", c2kw_default)?,
            cmu: dict.lookup_positive_or("Cmu", defaults.cmu)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn second_destruction_coefficients_derive_from_first() {
        let coeffs = WaCoeffs::read(&CoeffDict::new(), &WaDefaults::WA2017).unwrap();
        assert_relative_eq!(coeffs.c2ke, 0.1127 / (0.41 * 0.41) + 1.0, epsilon = 1e-12);
        assert_relative_eq!(coeffs.c2kw, 0.0829 / (0.41 * 0.41) + 0.72, epsilon = 1e-12);

        // The published rounded values.
        assert_relative_eq!(coeffs.c2ke, 1.6704, epsilon = 5e-4);
        assert_relative_eq!(coeffs.c2kw, 1.2132, epsilon = 5e-4);
    }

    #[test]
    fn derived_defaults_follow_an_overridden_c1() {
        let dict = CoeffDict::from_iter([("C1ke", 0.2)]);
        let coeffs = WaCoeffs::read(&dict, &WaDefaults::WA2017).unwrap();
        assert_relative_eq!(coeffs.c2ke, 0.2 / (0.41 * 0.41) + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn explicit_c2_wins_over_derivation() {
        let dict = CoeffDict::from_iter([("C2ke", 1.5)]);
        let coeffs = WaCoeffs::read(&dict, &WaDefaults::WA2017).unwrap();
        assert_eq!(coeffs.c2ke, 1.5);
    }

    #[test]
    fn eb_defaults_are_independent() {
        let coeffs = WaCoeffs::read(&CoeffDict::new(), &WaDefaults::WA2018EB).unwrap();
        assert_eq!(coeffs.c2ke, 1.24);
        assert_eq!(coeffs.c2kw, 2.63);
        assert_eq!(coeffs.cw, 5.97);
    }

    #[test]
    fn read_is_deterministic() {
        let dict = CoeffDict::from_iter([("kappa", 0.40), ("C1kw", 0.09)]);
        let first = WaCoeffs::read(&dict, &WaDefaults::WA2017).unwrap();
        let second = WaCoeffs::read(&dict, &WaDefaults::WA2017).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn negative_coefficient_is_rejected() {
        let dict = CoeffDict::from_iter([("Cw", -8.54)]);
        assert!(WaCoeffs::read(&dict, &WaDefaults::WA2017).is_err());
    }
}
