//! Emission spectrum simulation and classifier-driven element detection.
//!
//! The dashboard binary wires these modules to egui; the training-set
//! generator reuses the same synthesizer so both see identical spectra.

pub mod analysis;
pub mod assets;
pub mod classifier;
pub mod config;
pub mod data;
pub mod error;

pub use error::{Error, Result};
