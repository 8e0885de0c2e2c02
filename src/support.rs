//! Supporting utilities used by the closure models.
//!
//! Modules here are part of the public API because hosts embedding the
//! models need them (fields, collaborator traits, configuration), but their
//! APIs are less stable than the models themselves and may change as the
//! model family grows.

pub mod config;
pub mod constraint;
pub mod field;
pub mod host;
pub mod units;
