//! Redshift estimation by template matching against the line catalog
//!
//! # Algorithm overview
//!
//! 1. **Model** - every observed line becomes a Gaussian bump of width
//!    `tolerance`, scaled by its height.
//! 2. **Grid scan** - for each trial redshift on a uniform grid, the catalog
//!    rest wavelengths are moved to that redshift and the summed bump value
//!    over all of them is the score. Grid points are independent and are
//!    scored in parallel with **rayon**.
//! 3. **Peaks** - local maxima of the score-vs-z curve are the hypotheses.
//! 4. **Plausibility cut** - peaks scoring below `median + std` of all peak
//!    scores are dropped; the rest are returned best first.

use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{LineMatchModel, ObservedLine};
use super::peaks::find_peaks;
use crate::lines::catalog::rest_wavelengths;
use crate::spectrum::stats::{median, std_dev};

/// Bump width (Angstrom) used when the observed lines carry no width
pub const DEFAULT_TOLERANCE: f64 = 2.0;

/// Grid points per unit of redshift when `z_points` is not given
const POINTS_PER_UNIT_Z: f64 = 1000.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RedshiftError {
    #[error("Invalid redshift range [{z_min}, {z_max}]: need 0 <= z_min < z_max")]
    InvalidRange { z_min: f64, z_max: f64 },

    #[error("Redshift grid needs at least 2 points (got {0})")]
    InvalidGrid(usize),

    #[error("Tolerance must be positive and finite (got {0})")]
    InvalidTolerance(f64),

    #[error("Observed line {index} has invalid wavelength {value}")]
    InvalidWavelength { index: usize, value: f64 },

    #[error("Observed line {index} has negative width {value}")]
    NegativeWidth { index: usize, value: f64 },
}

/// Redshift search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedshiftSearch {
    /// Lower end of the redshift grid
    pub z_min: f64,

    /// Upper end of the redshift grid
    pub z_max: f64,

    /// Grid size (default: 1000 points per unit of redshift)
    pub z_points: Option<usize>,

    /// Bump width in wavelength units (default: mean observed line width)
    pub tolerance: Option<f64>,

    /// Minimum separation of reported peaks, in grid points
    pub min_peak_distance: usize,

    /// Minimum peak prominence in score units
    pub min_peak_prominence: f64,
}

impl Default for RedshiftSearch {
    fn default() -> Self {
        Self {
            z_min: 0.0,
            z_max: 6.0,
            z_points: None,
            tolerance: None,
            min_peak_distance: 1,
            min_peak_prominence: 0.0,
        }
    }
}

impl RedshiftSearch {
    /// Search over `[z_min, z_max]` with every other setting at its default
    pub fn range(z_min: f64, z_max: f64) -> Self {
        Self {
            z_min,
            z_max,
            ..Self::default()
        }
    }

    /// Number of grid points actually used
    pub fn grid_points(&self) -> usize {
        self.z_points.unwrap_or_else(|| {
            let n = (POINTS_PER_UNIT_Z * (self.z_max - self.z_min)).round();
            if n.is_finite() && n >= 2.0 {
                n as usize
            } else {
                2
            }
        })
    }

    fn validate(&self) -> Result<(), RedshiftError> {
        let range_ok = self.z_min.is_finite()
            && self.z_max.is_finite()
            && self.z_min >= 0.0
            && self.z_max > self.z_min;
        if !range_ok {
            return Err(RedshiftError::InvalidRange {
                z_min: self.z_min,
                z_max: self.z_max,
            });
        }

        match self.z_points {
            Some(n) if n < 2 => Err(RedshiftError::InvalidGrid(n)),
            _ => Ok(()),
        }
    }

    /// Uniform redshift grid including both ends
    pub fn grid(&self) -> Result<Vec<f64>, RedshiftError> {
        self.validate()?;
        let n = self.grid_points();
        let step = (self.z_max - self.z_min) / (n - 1) as f64;

        Ok((0..n)
            .map(|i| {
                if i == n - 1 {
                    self.z_max
                } else {
                    self.z_min + step * i as f64
                }
            })
            .collect())
    }
}

/// A redshift hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RedshiftCandidate {
    pub z: f64,
    pub score: f64,
}

/// Score of every grid redshift, in grid order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCurve {
    pub z: Vec<f64>,
    pub score: Vec<f64>,
    /// Bump width the curve was computed with
    pub tolerance: f64,
}

/// Plausible redshifts, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedshiftEstimate {
    pub candidates: Vec<RedshiftCandidate>,
    pub tolerance: f64,
}

impl RedshiftEstimate {
    pub fn best(&self) -> Option<&RedshiftCandidate> {
        self.candidates.first()
    }

    pub fn z_values(&self) -> Vec<f64> {
        self.candidates.iter().map(|c| c.z).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.candidates.iter().map(|c| c.score).collect()
    }
}

/// Redshift estimator over the built-in line catalog
///
/// Construct with a [`RedshiftSearch`] and call [`RedshiftEstimator::estimate`]
/// with the observed lines, or [`RedshiftEstimator::scan`] for the raw curve.
#[derive(Debug, Clone)]
pub struct RedshiftEstimator {
    search: RedshiftSearch,
    catalog: Vec<f64>,
}

impl RedshiftEstimator {
    pub fn new(search: RedshiftSearch) -> Self {
        Self {
            search,
            catalog: rest_wavelengths(),
        }
    }

    pub fn search(&self) -> &RedshiftSearch {
        &self.search
    }

    /// Score every grid redshift
    ///
    /// # Arguments
    /// * `lines` - Observed lines (any count, including none)
    ///
    /// # Returns
    /// The score curve in increasing z order
    pub fn scan(&self, lines: &[ObservedLine]) -> Result<ScoreCurve, RedshiftError> {
        let z = self.search.grid()?;
        validate_lines(lines)?;
        let tolerance = self.resolve_tolerance(lines)?;

        debug!(
            "Scanning {} redshifts in [{}, {}] with {} lines, tolerance={:.3}",
            z.len(),
            self.search.z_min,
            self.search.z_max,
            lines.len(),
            tolerance
        );

        let start = Instant::now();
        let model = LineMatchModel::new(lines.to_vec(), tolerance);
        let score: Vec<f64> = z
            .par_iter()
            .map(|&trial| model.score(trial, &self.catalog))
            .collect();
        debug!("Scan complete in {} ms", start.elapsed().as_millis());

        Ok(ScoreCurve {
            z,
            score,
            tolerance,
        })
    }

    /// Rank plausible redshifts for a set of observed lines
    ///
    /// # Returns
    /// `Ok(None)` when fewer than two lines are given, otherwise the
    /// plausible candidates sorted by decreasing score
    pub fn estimate(
        &self,
        lines: &[ObservedLine],
    ) -> Result<Option<RedshiftEstimate>, RedshiftError> {
        self.search.validate()?;
        if lines.len() < 2 {
            info!(
                "Need at least 2 lines to estimate a redshift, got {}",
                lines.len()
            );
            return Ok(None);
        }

        let curve = self.scan(lines)?;
        let peaks = find_peaks(
            &curve.score,
            self.search.min_peak_distance,
            self.search.min_peak_prominence,
        );

        let mut candidates: Vec<RedshiftCandidate> = peaks
            .iter()
            .map(|&i| RedshiftCandidate {
                z: curve.z[i],
                score: curve.score[i],
            })
            .collect();

        // Stable: equal scores keep grid order
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let total = candidates.len();
        let candidates = plausible(candidates);
        info!(
            "Kept {} of {} score peaks{}",
            candidates.len(),
            total,
            candidates
                .first()
                .map(|c| format!(", best z={:.4}", c.z))
                .unwrap_or_default()
        );

        Ok(Some(RedshiftEstimate {
            candidates,
            tolerance: curve.tolerance,
        }))
    }

    fn resolve_tolerance(&self, lines: &[ObservedLine]) -> Result<f64, RedshiftError> {
        if let Some(tolerance) = self.search.tolerance {
            if tolerance.is_finite() && tolerance > 0.0 {
                return Ok(tolerance);
            }
            return Err(RedshiftError::InvalidTolerance(tolerance));
        }

        let mean_width = if lines.is_empty() {
            0.0
        } else {
            lines.iter().map(|l| l.width).sum::<f64>() / lines.len() as f64
        };

        if mean_width.is_finite() && mean_width > 0.0 {
            Ok(mean_width)
        } else {
            warn!(
                "Observed lines carry no width, using default tolerance {}",
                DEFAULT_TOLERANCE
            );
            Ok(DEFAULT_TOLERANCE)
        }
    }
}

fn validate_lines(lines: &[ObservedLine]) -> Result<(), RedshiftError> {
    for (index, line) in lines.iter().enumerate() {
        if !(line.wavelength.is_finite() && line.wavelength > 0.0) {
            return Err(RedshiftError::InvalidWavelength {
                index,
                value: line.wavelength,
            });
        }
        if !(line.width >= 0.0) {
            return Err(RedshiftError::NegativeWidth {
                index,
                value: line.width,
            });
        }
    }
    Ok(())
}

/// Keep candidates scoring at least `median + std` of all candidate scores
fn plausible(candidates: Vec<RedshiftCandidate>) -> Vec<RedshiftCandidate> {
    let scores: Vec<f64> = candidates.iter().map(|c| c.score).collect();
    let cut = match (median(&scores), std_dev(&scores)) {
        (Some(m), Some(s)) => m + s,
        _ => return candidates,
    };

    candidates.into_iter().filter(|c| c.score >= cut).collect()
}

/// Estimate redshifts from bare observed wavelengths
///
/// # Arguments
/// * `observed_wavelengths` - Observed line positions
/// * `z_min`, `z_max` - Search range
/// * `z_points` - Grid size (default: 1000 per unit of redshift)
/// * `tolerance` - Bump width (default: [`DEFAULT_TOLERANCE`])
pub fn estimate(
    observed_wavelengths: &[f64],
    z_min: f64,
    z_max: f64,
    z_points: Option<usize>,
    tolerance: Option<f64>,
) -> Result<Option<RedshiftEstimate>, RedshiftError> {
    let lines: Vec<ObservedLine> = observed_wavelengths
        .iter()
        .map(|&w| ObservedLine::from(w))
        .collect();

    let estimator = RedshiftEstimator::new(RedshiftSearch {
        z_min,
        z_max,
        z_points,
        tolerance,
        ..RedshiftSearch::default()
    });
    estimator.estimate(&lines)
}
