//! Spectrum data and the statistics used to analyse it

pub mod data;
pub mod dispersion;
pub mod stats;
pub mod synthetic;

pub use data::{Spectrum, SpectrumError, Uncertainty};
pub use dispersion::dispersion_curve;
