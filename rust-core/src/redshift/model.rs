//! Bump-sum line-match model
//!
//! Every observed line contributes a normalized Gaussian bump, scaled by
//! its height. A trial redshift scores the summed bump value at each
//! catalog wavelength moved to that redshift.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::lines::detector::LineCandidate;

/// An observed line fed to the redshift search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedLine {
    /// Observed-frame wavelength
    pub wavelength: f64,

    /// Approximate width in wavelength units
    pub width: f64,

    /// Relative weight of the line
    pub height: f64,
}

impl ObservedLine {
    pub fn new(wavelength: f64, width: f64, height: f64) -> Self {
        Self {
            wavelength,
            width,
            height,
        }
    }
}

/// A bare wavelength: no width information, unit weight
impl From<f64> for ObservedLine {
    fn from(wavelength: f64) -> Self {
        Self::new(wavelength, 0.0, 1.0)
    }
}

/// A `(wavelength, width, height)` triple
impl From<(f64, f64, f64)> for ObservedLine {
    fn from((wavelength, width, height): (f64, f64, f64)) -> Self {
        Self::new(wavelength, width, height)
    }
}

impl From<LineCandidate> for ObservedLine {
    fn from(candidate: LineCandidate) -> Self {
        Self::new(candidate.wavelength, candidate.width, candidate.height)
    }
}

impl From<&LineCandidate> for ObservedLine {
    fn from(candidate: &LineCandidate) -> Self {
        Self::from(*candidate)
    }
}

/// Observed lines and the bump width used to match them
#[derive(Debug, Clone)]
pub struct LineMatchModel {
    lines: Vec<ObservedLine>,
    tolerance: f64,
    norm: f64,
}

impl LineMatchModel {
    /// # Arguments
    /// * `lines` - Observed lines
    /// * `tolerance` - Bump standard deviation (wavelength units, > 0)
    pub fn new(lines: Vec<ObservedLine>, tolerance: f64) -> Self {
        Self {
            lines,
            tolerance,
            norm: 1.0 / (tolerance * (2.0 * PI).sqrt()),
        }
    }

    pub fn lines(&self) -> &[ObservedLine] {
        &self.lines
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Summed bump value at an observed-frame wavelength
    pub fn evaluate(&self, wavelength: f64) -> f64 {
        let two_var = 2.0 * self.tolerance * self.tolerance;
        self.lines
            .iter()
            .map(|line| {
                let d = wavelength - line.wavelength;
                line.height * self.norm * (-d * d / two_var).exp()
            })
            .sum()
    }

    /// Score a trial redshift against rest-frame catalog wavelengths
    pub fn score(&self, z: f64, catalog_rest: &[f64]) -> f64 {
        let stretch = 1.0 + z;
        catalog_rest
            .iter()
            .map(|&rest| self.evaluate(rest * stretch))
            .sum()
    }
}
