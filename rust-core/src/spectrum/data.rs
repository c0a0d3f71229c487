//! Spectrum value type and input validation
//!
//! A spectrum is supplied by an external reader as parallel wavelength,
//! flux and (optionally) uncertainty arrays. Everything here is read-only
//! to the analysis core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lines::detector::{DetectorConfig, LineCandidate, LineDetector};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("{what} has {found} samples, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Spectrum must contain at least one sample")]
    EmptyInput,

    #[error("Smoothing parameters must be positive and finite (shape={shape}, width={width})")]
    InvalidSmoothing { shape: f64, width: f64 },

    #[error("Detection threshold must be finite and non-negative (got {0})")]
    InvalidThreshold(f64),

    #[error("Variance is negative at sample {index}")]
    NegativeVariance { index: usize },

    #[error("FFT processing failed: {0}")]
    Fft(String),
}

/// Check that an auxiliary array matches the reference length
pub(crate) fn ensure_len(
    what: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), SpectrumError> {
    if expected != found {
        return Err(SpectrumError::LengthMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Per-sample noise representation as delivered by file readers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Uncertainty {
    /// σ²
    Variance(Vec<f64>),

    /// 1/σ²
    InverseVariance(Vec<f64>),

    /// σ
    StdDev(Vec<f64>),
}

impl Uncertainty {
    pub fn len(&self) -> usize {
        match self {
            Uncertainty::Variance(v) | Uncertainty::InverseVariance(v) | Uncertainty::StdDev(v) => {
                v.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to variance
    ///
    /// Non-positive inverse variances carry no information and become NaN,
    /// which the detector treats as an unusable weight.
    pub fn into_variance(self) -> Vec<f64> {
        match self {
            Uncertainty::Variance(v) => v,
            Uncertainty::InverseVariance(ivar) => ivar
                .into_iter()
                .map(|w| if w > 0.0 { 1.0 / w } else { f64::NAN })
                .collect(),
            Uncertainty::StdDev(sd) => sd.into_iter().map(|s| s * s).collect(),
        }
    }
}

/// One-dimensional spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    wavelength: Vec<f64>,
    flux: Vec<f64>,
    variance: Option<Vec<f64>>,
    /// `true` marks an invalid sample
    mask: Option<Vec<bool>>,
}

impl Spectrum {
    /// Create a spectrum from wavelength and flux samples
    ///
    /// # Arguments
    /// * `wavelength` - Monotonically increasing wavelengths (Angstrom)
    /// * `flux` - Flux values, same length as `wavelength`
    pub fn new(wavelength: Vec<f64>, flux: Vec<f64>) -> Result<Self, SpectrumError> {
        if wavelength.is_empty() {
            return Err(SpectrumError::EmptyInput);
        }
        ensure_len("flux", wavelength.len(), flux.len())?;

        Ok(Self {
            wavelength,
            flux,
            variance: None,
            mask: None,
        })
    }

    /// Attach a noise estimate in any of the supported representations
    pub fn with_uncertainty(mut self, uncertainty: Uncertainty) -> Result<Self, SpectrumError> {
        ensure_len("uncertainty", self.len(), uncertainty.len())?;
        self.variance = Some(uncertainty.into_variance());
        Ok(self)
    }

    /// Attach a validity mask (`true` = invalid sample)
    pub fn with_mask(mut self, mask: Vec<bool>) -> Result<Self, SpectrumError> {
        ensure_len("mask", self.len(), mask.len())?;
        self.mask = Some(mask);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn variance(&self) -> Option<&[f64]> {
        self.variance.as_deref()
    }

    pub fn mask(&self) -> Option<&[bool]> {
        self.mask.as_deref()
    }

    /// Flux with masked samples replaced by NaN
    pub fn masked_flux(&self) -> Vec<f64> {
        match &self.mask {
            Some(mask) => self
                .flux
                .iter()
                .zip(mask)
                .map(|(&f, &bad)| if bad { f64::NAN } else { f })
                .collect(),
            None => self.flux.clone(),
        }
    }

    /// Run the line detector on this spectrum
    ///
    /// Masked samples are handled exactly like non-finite flux.
    pub fn lines(
        &self,
        config: &DetectorConfig,
    ) -> Result<Option<Vec<LineCandidate>>, SpectrumError> {
        let detector = LineDetector::new(config.clone());
        detector.detect(&self.wavelength, &self.masked_flux(), self.variance())
    }
}
