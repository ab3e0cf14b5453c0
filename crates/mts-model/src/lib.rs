//! Public types shared by every `mts` crate.
//!
//! Nothing in here runs anything: the crate only describes what a simulation run is
//! (model, task count) and what it produces (a metrics snapshot), and validates user input.

mod error;
pub use error::ModelError;

mod domain;
pub use domain::*;
