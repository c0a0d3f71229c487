//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use numpy::PyReadonlyArray1;

use crate::redshift::RedshiftError;
use crate::spectrum::SpectrumError;

mod line_bindings;
mod redshift_bindings;
mod smoothing_bindings;

impl From<SpectrumError> for PyErr {
    fn from(err: SpectrumError) -> Self {
        match err {
            SpectrumError::Fft(_) => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

impl From<RedshiftError> for PyErr {
    fn from(err: RedshiftError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Borrow a numpy array as a contiguous slice
fn as_slice<'a, T: numpy::Element>(array: &'a PyReadonlyArray1<T>) -> PyResult<&'a [T]> {
    array
        .as_slice()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Python module definition
#[pymodule]
fn specline(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(smoothing_bindings::smooth_fft, m)?)?;
    m.add_function(wrap_pyfunction!(smoothing_bindings::smooth_fft_lanes, m)?)?;
    m.add_function(wrap_pyfunction!(smoothing_bindings::separate_continuum, m)?)?;

    m.add_function(wrap_pyfunction!(line_bindings::get_lines, m)?)?;
    m.add_function(wrap_pyfunction!(line_bindings::identify_line, m)?)?;
    m.add_function(wrap_pyfunction!(line_bindings::get_spectrum_lines, m)?)?;
    m.add_class::<line_bindings::PyLineDetector>()?;

    m.add_function(wrap_pyfunction!(redshift_bindings::get_redshift_from_lines, m)?)?;
    m.add_function(wrap_pyfunction!(redshift_bindings::redshift_score_curve, m)?)?;
    m.add_function(wrap_pyfunction!(redshift_bindings::dispersion_curve, m)?)?;

    Ok(())
}
