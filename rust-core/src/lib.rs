//! Specline - Spectral Line Detection and Redshift Estimation Core
//!
//! FFT continuum smoothing, robust line detection and catalog-matching
//! redshift search, with optional Python bindings (feature `python`).

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod filters;
pub mod lines;
pub mod redshift;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use filters::{separate_continuum, smooth, FftSmoother, SmoothingParams};
pub use lines::{lookup, DetectorConfig, LineCandidate, LineDetector, RestFrameLine};
pub use redshift::{
    estimate, ObservedLine, RedshiftCandidate, RedshiftError, RedshiftEstimate,
    RedshiftEstimator, RedshiftSearch,
};
pub use spectrum::{Spectrum, SpectrumError, Uncertainty};
