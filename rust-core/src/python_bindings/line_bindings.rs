//! Python bindings for the line catalog and line detection

use pyo3::prelude::*;
use numpy::PyReadonlyArray1;

use super::as_slice;
use crate::lines::{self, DetectorConfig, LineCandidate, LineDetector, IDENTIFY_WINDOW};

/// (wavelength, name, type) as seen from Python
type LineTuple = (f64, &'static str, &'static str);

/// (index, wavelength, width, height) as seen from Python
type CandidateTuple = (usize, f64, f64, f64);

fn to_tuples(candidates: Option<Vec<LineCandidate>>) -> Option<Vec<CandidateTuple>> {
    candidates.map(|found| {
        found
            .into_iter()
            .map(|c| (c.index, c.wavelength, c.width, c.height))
            .collect()
    })
}

/// Select lines from the rest-frame catalog
///
/// Args:
///     name: Exact line name (case-insensitive)
///     line_type: Substring of the type code, e.g. "E" or "A"
///     wrange: (low, high) applied after redshifting
///     z: Redshift applied to the catalog wavelengths
///
/// Returns:
///     List of (wavelength, name, type) tuples in catalog order
#[pyfunction]
#[pyo3(signature = (name=None, line_type=None, wrange=None, z=0.0))]
pub fn get_lines(
    name: Option<&str>,
    line_type: Option<&str>,
    wrange: Option<(f64, f64)>,
    z: f64,
) -> Vec<LineTuple> {
    lines::lookup(name, line_type, wrange, z)
        .into_iter()
        .map(|l| (l.wavelength, l.name, l.kind))
        .collect()
}

/// Catalog lines compatible with an observed wavelength at redshift z
#[pyfunction]
#[pyo3(signature = (wavelength, z=0.0, half_window=IDENTIFY_WINDOW))]
pub fn identify_line(wavelength: f64, z: f64, half_window: f64) -> Vec<LineTuple> {
    lines::identify(wavelength, z, half_window)
        .into_iter()
        .map(|l| (l.wavelength, l.name, l.kind))
        .collect()
}

/// Detect emission and absorption lines in a spectrum
///
/// Args:
///     wavelengths: Sample wavelengths
///     flux: Flux samples
///     var: Optional per-sample variance
///     sigma_threshold: Outlier threshold in NMAD units
///     smoothing_sigma: Continuum smoothing width in samples
///
/// Returns:
///     List of (index, wavelength, width, height) sorted by height,
///     or None when the flux holds no finite sample
#[pyfunction]
#[pyo3(signature = (wavelengths, flux, var=None, sigma_threshold=10.0, smoothing_sigma=10.0))]
pub fn get_spectrum_lines(
    wavelengths: PyReadonlyArray1<f64>,
    flux: PyReadonlyArray1<f64>,
    var: Option<PyReadonlyArray1<f64>>,
    sigma_threshold: f64,
    smoothing_sigma: f64,
) -> PyResult<Option<Vec<CandidateTuple>>> {
    let var = var.as_ref().map(as_slice).transpose()?;
    let found = lines::detect(
        as_slice(&wavelengths)?,
        as_slice(&flux)?,
        var,
        sigma_threshold,
        smoothing_sigma,
    )?;
    Ok(to_tuples(found))
}

/// Line detector exposed to Python
#[pyclass(name = "LineDetector")]
pub struct PyLineDetector {
    detector: LineDetector,
}

#[pymethods]
impl PyLineDetector {
    /// Create a new line detector
    ///
    /// Args:
    ///     sigma_threshold: Outlier threshold in NMAD units
    ///     smoothing_width: Continuum smoothing width in samples
    ///     smoothing_shape: Continuum kernel shape (1.0 = Gaussian)
    #[new]
    #[pyo3(signature = (sigma_threshold=10.0, smoothing_width=10.0, smoothing_shape=1.0))]
    fn new(sigma_threshold: f64, smoothing_width: f64, smoothing_shape: f64) -> Self {
        Self {
            detector: LineDetector::new(DetectorConfig {
                sigma_threshold,
                smoothing_width,
                smoothing_shape,
            }),
        }
    }

    /// Detect lines, see `get_spectrum_lines`
    #[pyo3(signature = (wavelength, flux, variance=None))]
    fn detect(
        &self,
        wavelength: PyReadonlyArray1<f64>,
        flux: PyReadonlyArray1<f64>,
        variance: Option<PyReadonlyArray1<f64>>,
    ) -> PyResult<Option<Vec<CandidateTuple>>> {
        let variance = variance.as_ref().map(as_slice).transpose()?;
        let found = self
            .detector
            .detect(as_slice(&wavelength)?, as_slice(&flux)?, variance)?;
        Ok(to_tuples(found))
    }

    #[getter]
    fn sigma_threshold(&self) -> f64 {
        self.detector.config().sigma_threshold
    }

    #[getter]
    fn smoothing_width(&self) -> f64 {
        self.detector.config().smoothing_width
    }
}
