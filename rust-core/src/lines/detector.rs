//! Spectral line detection by robust outlier scanning
//!
//! The flux is split into a smooth continuum and a residual. The residual,
//! normalized by the per-sample noise, is scanned for samples deviating
//! from its median by more than `sigma_threshold` NMADs. Contiguous runs
//! of such samples become line candidates.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::filters::smooth::{FftSmoother, SmoothingParams};
use crate::spectrum::data::{ensure_len, SpectrumError};
use crate::spectrum::stats::{masked_median, masked_nmad, median};

/// Noise scales below this fraction of the typical normalized flux are rounding error
const NOISE_FLOOR_RTOL: f64 = 1e-10;

/// Variances at or below this fraction of the median variance carry no usable weight
pub const VARIANCE_EPSILON: f64 = 1e-12;

/// A detected feature
///
/// Width and height are relative quantities, comparable only between
/// candidates of the same detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCandidate {
    /// Sample index of the strongest deviation
    pub index: usize,

    /// Wavelength at `index`
    pub wavelength: f64,

    /// Wavelength span of the outlier run
    pub width: f64,

    /// Peak deviation in NMAD units
    pub height: f64,
}

/// Line detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Outlier threshold in NMAD units
    pub sigma_threshold: f64,

    /// Continuum smoothing width in samples
    pub smoothing_width: f64,

    /// Continuum smoothing kernel shape
    pub smoothing_shape: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sigma_threshold: 10.0,
            smoothing_width: 10.0,
            smoothing_shape: 1.0,
        }
    }
}

/// Robust line detector
pub struct LineDetector {
    config: DetectorConfig,
}

impl LineDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Find emission and absorption features
    ///
    /// # Arguments
    /// * `wavelength` - Sample wavelengths
    /// * `flux` - Flux samples; non-finite values are ignored
    /// * `variance` - Optional per-sample variance (uniform weighting when `None`)
    ///
    /// # Returns
    /// `Ok(None)` when no flux sample is usable, otherwise the candidates
    /// sorted by decreasing height (possibly empty)
    pub fn detect(
        &self,
        wavelength: &[f64],
        flux: &[f64],
        variance: Option<&[f64]>,
    ) -> Result<Option<Vec<LineCandidate>>, SpectrumError> {
        let n = wavelength.len();
        if n == 0 {
            return Err(SpectrumError::EmptyInput);
        }
        ensure_len("flux", n, flux.len())?;
        if let Some(variance) = variance {
            ensure_len("variance", n, variance.len())?;
        }

        let threshold = self.config.sigma_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(SpectrumError::InvalidThreshold(threshold));
        }

        let invalid_flux: Vec<bool> = flux.iter().map(|f| !f.is_finite()).collect();
        if invalid_flux.iter().all(|&bad| bad) {
            info!("No usable flux samples, skipping line detection");
            return Ok(None);
        }

        let params = SmoothingParams::new(self.config.smoothing_shape, self.config.smoothing_width);
        let continuum = FftSmoother::new(n, params)?.smooth(flux, Some(&invalid_flux))?;

        let variance_floor = match variance {
            Some(v) => {
                if let Some(index) = v.iter().position(|&var| var < 0.0) {
                    return Err(SpectrumError::NegativeVariance { index });
                }
                let usable: Vec<f64> = v
                    .iter()
                    .copied()
                    .filter(|var| var.is_finite() && *var > 0.0)
                    .collect();
                median(&usable).map_or(0.0, |m| VARIANCE_EPSILON * m)
            }
            None => 0.0,
        };

        // Residual normalized by the noise: sqrt((f - c)^2 / var)
        let mut excluded = invalid_flux;
        let mut noise = vec![0.0; n];
        let mut scaled_flux = vec![0.0; n];
        let mut unusable_variance = 0usize;
        for i in 0..n {
            let var = variance.map_or(1.0, |v| v[i]);
            if !(var.is_finite() && var > variance_floor) {
                if !excluded[i] {
                    unusable_variance += 1;
                }
                excluded[i] = true;
                continue;
            }

            let sigma = var.sqrt();
            noise[i] = (flux[i] - continuum[i]).abs() / sigma;
            scaled_flux[i] = flux[i].abs() / sigma;
            if !noise[i].is_finite() {
                excluded[i] = true;
            }
        }

        if unusable_variance > 0 {
            warn!(
                "Ignoring {} samples with negligible or non-finite variance",
                unusable_variance
            );
        }

        let (noise_median, nmad, flux_scale) = match (
            masked_median(&noise, &excluded),
            masked_nmad(&noise, &excluded),
            masked_median(&scaled_flux, &excluded),
        ) {
            (Some(m), Some(nmad), Some(scale)) => (m, nmad, scale),
            _ => {
                warn!("No sample has both finite flux and usable variance");
                return Ok(Some(Vec::new()));
            }
        };

        debug!("Residual noise: median={:.4e}, nmad={:.4e}", noise_median, nmad);

        if nmad <= NOISE_FLOOR_RTOL * flux_scale {
            warn!("Residual noise scale is zero, no line can be significant");
            return Ok(Some(Vec::new()));
        }

        let deviation: Vec<f64> = noise
            .iter()
            .zip(&excluded)
            .map(|(&v, &skip)| if skip { 0.0 } else { (v - noise_median).abs() })
            .collect();

        let cut = threshold * nmad;
        let mut outlier: Vec<bool> = deviation
            .iter()
            .zip(&excluded)
            .map(|(&d, &skip)| !skip && d >= cut)
            .collect();

        suppress_isolated(&mut outlier);

        let mut candidates: Vec<LineCandidate> = outlier_runs(&outlier)
            .into_iter()
            .map(|(start, end)| {
                let (peak, max_dev) = (start..end).fold((start, f64::NEG_INFINITY), |best, i| {
                    if deviation[i] > best.1 {
                        (i, deviation[i])
                    } else {
                        best
                    }
                });

                LineCandidate {
                    index: peak,
                    wavelength: wavelength[peak],
                    width: wavelength[end.min(n - 1)] - wavelength[start],
                    height: max_dev / nmad,
                }
            })
            .collect();

        // Stable: equal heights keep wavelength order
        candidates.sort_by(|a, b| b.height.total_cmp(&a.height));

        info!("Detected {} line candidates", candidates.len());
        Ok(Some(candidates))
    }
}

/// Detect lines with explicit parameters
///
/// # Arguments
/// * `wavelength`, `flux`, `variance` - See [`LineDetector::detect`]
/// * `sigma_threshold` - Outlier threshold in NMAD units (10.0 is conservative)
/// * `smoothing_width` - Continuum smoothing width in samples
pub fn detect(
    wavelength: &[f64],
    flux: &[f64],
    variance: Option<&[f64]>,
    sigma_threshold: f64,
    smoothing_width: f64,
) -> Result<Option<Vec<LineCandidate>>, SpectrumError> {
    let detector = LineDetector::new(DetectorConfig {
        sigma_threshold,
        smoothing_width,
        ..DetectorConfig::default()
    });
    detector.detect(wavelength, flux, variance)
}

/// Clear interior outliers whose neighbours are both clear
///
/// The first and last samples are left untouched.
fn suppress_isolated(outlier: &mut [bool]) {
    let n = outlier.len();
    if n < 3 {
        return;
    }

    let isolated: Vec<usize> = (1..n - 1)
        .filter(|&k| outlier[k] && !outlier[k - 1] && !outlier[k + 1])
        .collect();
    for k in isolated {
        outlier[k] = false;
    }
}

/// Half-open `[start, end)` ranges of consecutive outliers
fn outlier_runs(outlier: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;

    for (k, &flagged) in outlier.iter().enumerate() {
        match (flagged, start) {
            (true, None) => start = Some(k),
            (false, Some(s)) => {
                runs.push((s, k));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, outlier.len()));
    }

    runs
}
