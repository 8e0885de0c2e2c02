//! Extensions to [`uom`].
//!
//! Dimensioned configuration quantities (a reference length, a specific gas
//! constant) are carried as [`uom`] quantities so unit mistakes fail at the
//! type level. Per-cell field values stay raw `f64` in SI base units for
//! performance; the conversion happens once, at the configuration boundary.
//!
//! This module adds quantity aliases that [`uom`] does not define.

use uom::{
    si::{
        ISQ, Quantity, SI,
        energy::joule,
        f64::{Energy, Mass, TemperatureInterval},
        mass::kilogram,
        temperature_interval::kelvin,
    },
    typenum::{N1, N2, P2, Z0},
};

/// Specific gas constant, J/(kg·K) in SI.
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Kinematic viscosity, m²/s in SI.
///
/// Also the dimensions of the transported eddy-viscosity proxy `Rnu`.
pub type KinematicViscosity = Quantity<ISQ<P2, Z0, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Builds a [`SpecificGasConstant`] from its SI value in J/(kg·K).
#[must_use]
pub fn specific_gas_constant(value: f64) -> SpecificGasConstant {
    Energy::new::<joule>(value)
        / (Mass::new::<kilogram>(1.0) * TemperatureInterval::new::<kelvin>(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{area::square_meter, f64::{Area, Time}, time::second};

    #[test]
    fn aliases_compose_from_base_quantities() {
        let rsp = specific_gas_constant(286.9);
        assert_eq!(rsp.value, 286.9);

        let nu: KinematicViscosity =
            Area::new::<square_meter>(1.5e-5) / Time::new::<second>(1.0);
        assert_eq!(nu.value, 1.5e-5);
    }
}
