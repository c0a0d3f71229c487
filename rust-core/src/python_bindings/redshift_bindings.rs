//! Python bindings for redshift estimation

use pyo3::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1};

use super::as_slice;
use crate::redshift::{ObservedLine, RedshiftEstimator, RedshiftSearch};
use crate::spectrum::{self, dispersion::DEFAULT_RESOLUTION};

/// An observed line as accepted from Python
///
/// Detector output tuples keep their width and height, so the matching
/// tolerance follows the measured widths and strong lines weigh more.
#[derive(FromPyObject)]
pub enum PyObservedLine {
    /// (index, wavelength, width, height) as returned by `get_spectrum_lines`
    Candidate(usize, f64, f64, f64),
    /// (wavelength, width, height)
    Line(f64, f64, f64),
    /// Bare wavelength
    Wavelength(f64),
}

impl From<PyObservedLine> for ObservedLine {
    fn from(line: PyObservedLine) -> Self {
        match line {
            PyObservedLine::Candidate(_, wavelength, width, height) => {
                ObservedLine::new(wavelength, width, height)
            }
            PyObservedLine::Line(wavelength, width, height) => {
                ObservedLine::from((wavelength, width, height))
            }
            PyObservedLine::Wavelength(wavelength) => ObservedLine::from(wavelength),
        }
    }
}

fn estimator_for(
    z_min: f64,
    z_max: f64,
    z_points: Option<usize>,
    tolerance: Option<f64>,
) -> RedshiftEstimator {
    RedshiftEstimator::new(RedshiftSearch {
        z_min,
        z_max,
        z_points,
        tolerance,
        ..RedshiftSearch::default()
    })
}

/// Estimate redshifts from observed lines
///
/// Args:
///     identifications: Lines from `get_spectrum_lines`, (wavelength, width,
///         height) tuples or bare wavelengths
///     z_min, z_max: Search range, z_min >= 0
///     z_points: Grid size (default: 1000 per unit of redshift)
///     tolerance: Matching width in wavelength units (default: mean line
///         width, or 2.0 without widths)
///
/// Returns:
///     (z_values, scores) sorted by decreasing score, or None with fewer
///     than two lines
#[pyfunction]
#[pyo3(signature = (identifications, z_min=0.0, z_max=6.0, z_points=None, tolerance=None))]
pub fn get_redshift_from_lines<'py>(
    py: Python<'py>,
    identifications: Vec<PyObservedLine>,
    z_min: f64,
    z_max: f64,
    z_points: Option<usize>,
    tolerance: Option<f64>,
) -> PyResult<Option<(&'py PyArray1<f64>, &'py PyArray1<f64>)>> {
    let lines: Vec<ObservedLine> = identifications.into_iter().map(ObservedLine::from).collect();
    let result = estimator_for(z_min, z_max, z_points, tolerance).estimate(&lines)?;
    Ok(result.map(|r| {
        (
            PyArray1::from_vec(py, r.z_values()),
            PyArray1::from_vec(py, r.scores()),
        )
    }))
}

/// Full score-vs-z curve for plotting
///
/// Takes the same line forms as `get_redshift_from_lines`.
///
/// Returns:
///     (z, score) numpy arrays in grid order
#[pyfunction]
#[pyo3(signature = (identifications, z_min=0.0, z_max=6.0, z_points=None, tolerance=None))]
pub fn redshift_score_curve<'py>(
    py: Python<'py>,
    identifications: Vec<PyObservedLine>,
    z_min: f64,
    z_max: f64,
    z_points: Option<usize>,
    tolerance: Option<f64>,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let lines: Vec<ObservedLine> = identifications.into_iter().map(ObservedLine::from).collect();
    let curve = estimator_for(z_min, z_max, z_points, tolerance).scan(&lines)?;
    Ok((PyArray1::from_vec(py, curve.z), PyArray1::from_vec(py, curve.score)))
}

/// Default dispersion curve from the wavelength sampling
///
/// Args:
///     wavelength: Sample wavelengths
///     resolution: Scale numerator divided by the local sample spacing
#[pyfunction]
#[pyo3(signature = (wavelength, resolution=DEFAULT_RESOLUTION))]
pub fn dispersion_curve<'py>(
    py: Python<'py>,
    wavelength: PyReadonlyArray1<f64>,
    resolution: f64,
) -> PyResult<&'py PyArray1<f64>> {
    let wd = spectrum::dispersion_curve(as_slice(&wavelength)?, resolution);
    Ok(PyArray1::from_vec(py, wd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_line_forms() {
        let lines: Vec<ObservedLine> = vec![
            PyObservedLine::Candidate(1219, 7219.3, 3.0, 30.0),
            PyObservedLine::Line(5347.1, 5.0, 15.0),
            PyObservedLine::Wavelength(5508.0),
        ]
        .into_iter()
        .map(ObservedLine::from)
        .collect();

        assert_eq!(lines[0], ObservedLine::new(7219.3, 3.0, 30.0));
        assert_eq!(lines[1], ObservedLine::new(5347.1, 5.0, 15.0));
        assert_eq!(lines[2], ObservedLine::new(5508.0, 0.0, 1.0));

        // Widths from detector tuples drive the default tolerance
        let curve = estimator_for(0.0, 1.0, None, None).scan(&lines[..2]).unwrap();
        assert!((curve.tolerance - 4.0).abs() < 1e-12);
    }
}
