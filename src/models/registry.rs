//! Construction of models by their string type name.
//!
//! The host framework selects a turbulence model from its configuration by
//! name; this module is the dispatch table behind that selection. Because
//! the choice is made at runtime, the host type must satisfy the union of
//! all model capability bounds; constructing a concrete model type directly
//! only requires the capabilities that model uses.

use log::debug;

use crate::{
    models::{
        TurbulenceModel,
        wray_agarwal::{
            Wa2017Ddes, Wa2017Des, Wa2017Iddes, WrayAgarwal2017, WrayAgarwal2017m,
            WrayAgarwal2017mDv, WrayAgarwal2018, WrayAgarwal2018Eb,
        },
    },
    support::{
        config::{CoeffDict, ConfigError},
        field::ScalarField,
        host::{FieldCalculus, GridScale, ScalarTransport, WallGeometry},
    },
};

/// Every registered model type name.
pub const MODEL_NAMES: [&str; 8] = [
    WrayAgarwal2017::NAME,
    WrayAgarwal2017m::NAME,
    WrayAgarwal2017mDv::NAME,
    WrayAgarwal2018::NAME,
    WrayAgarwal2018Eb::NAME,
    Wa2017Des::NAME,
    Wa2017Ddes::NAME,
    Wa2017Iddes::NAME,
];

/// Builds the model registered under `name`.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownModel`] for an unregistered name, or any
/// [`ConfigError`] from the selected model's constructor.
pub fn build<H>(
    name: &str,
    rnu0: ScalarField,
    dict: &CoeffDict,
) -> Result<Box<dyn TurbulenceModel<H>>, ConfigError>
where
    H: FieldCalculus + WallGeometry + GridScale + ScalarTransport,
{
    debug!("constructing turbulence model `{name}`");
    match name {
        _ if name == WrayAgarwal2017::NAME => {
            Ok(Box::new(WrayAgarwal2017::new(rnu0, dict)?))
        }
        _ if name == WrayAgarwal2017m::NAME => {
            Ok(Box::new(WrayAgarwal2017m::new(rnu0, dict)?))
        }
        _ if name == WrayAgarwal2017mDv::NAME => {
            Ok(Box::new(WrayAgarwal2017mDv::new(rnu0, dict)?))
        }
        _ if name == WrayAgarwal2018::NAME => {
            Ok(Box::new(WrayAgarwal2018::new(rnu0, dict)?))
        }
        _ if name == WrayAgarwal2018Eb::NAME => {
            Ok(Box::new(WrayAgarwal2018Eb::new(rnu0, dict)?))
        }
        _ if name == Wa2017Des::NAME => Ok(Box::new(Wa2017Des::new(rnu0, dict)?)),
        _ if name == Wa2017Ddes::NAME => Ok(Box::new(Wa2017Ddes::new(rnu0, dict)?)),
        _ if name == Wa2017Iddes::NAME => Ok(Box::new(Wa2017Iddes::new(rnu0, dict)?)),
        _ => Err(ConfigError::UnknownModel { name: name.into() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        models::test_support::shear_channel,
        support::host::{FlowState, channel::Channel1d},
    };

    #[test]
    fn every_registered_name_constructs() {
        for name in MODEL_NAMES {
            let dict = CoeffDict::from_iter([("Lref", 0.05)]);
            let model =
                build::<Channel1d>(name, ScalarField::uniform(1e-4, 9), &dict).unwrap();
            assert_eq!(model.name(), name);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = build::<Channel1d>("SpalartAllmaras", ScalarField::zeros(4), &CoeffDict::new())
            .err()
            .unwrap();
        assert_eq!(
            err,
            ConfigError::UnknownModel {
                name: "SpalartAllmaras".into()
            }
        );
    }

    #[test]
    fn registry_models_run_a_step_behind_the_trait_object() {
        let (mut host, grad_u, nu, rho) = shear_channel(15);
        let t = ScalarField::uniform(300.0, 15);
        for name in MODEL_NAMES {
            let dict = CoeffDict::from_iter([("Lref", 0.05)]);
            let mut model =
                build::<Channel1d>(name, ScalarField::uniform(1e-4, 15), &dict).unwrap();
            let flow = FlowState {
                grad_u: &grad_u,
                nu: &nu,
                rho: &rho,
                temperature: Some(&t),
            };
            model.correct(&mut host, &flow).unwrap();
            assert!(
                crate::support::constraint::NonNegative::new(model.nut().min()).is_ok(),
                "{name} produced a negative nut"
            );
            assert_eq!(model.k().len(), 15);
            assert_eq!(model.epsilon().len(), 15);
        }
    }
}
