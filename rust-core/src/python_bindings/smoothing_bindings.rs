//! Python bindings for FFT smoothing

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use numpy::{PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use ndarray::Axis;

use super::as_slice;
use crate::filters::{self, SmoothingParams};

/// Smooth a 1-D signal in the frequency domain
///
/// Args:
///     data: Input samples as numpy array
///     shape: Generalized-Gaussian shape (1.0 = Gaussian)
///     width: Kernel standard deviation in samples
///     mask: Optional boolean array, True marks an invalid sample
///
/// Returns:
///     Smoothed samples, NaN where the input was invalid
#[pyfunction]
#[pyo3(signature = (data, shape=1.0, width=25.0, mask=None))]
pub fn smooth_fft<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<f64>,
    shape: f64,
    width: f64,
    mask: Option<PyReadonlyArray1<bool>>,
) -> PyResult<&'py PyArray1<f64>> {
    let mask = mask.as_ref().map(as_slice).transpose()?;
    let smoothed = filters::smooth(as_slice(&data)?, SmoothingParams::new(shape, width), mask)?;
    Ok(PyArray1::from_vec(py, smoothed))
}

/// Smooth every lane of a 2-D batch of spectra
///
/// Args:
///     data: 2-D numpy array
///     axis: Axis to smooth along (1 = each row)
///     shape, width: Kernel parameters
///     mask: Optional boolean array of the same shape
#[pyfunction]
#[pyo3(signature = (data, axis=1, shape=1.0, width=25.0, mask=None))]
pub fn smooth_fft_lanes<'py>(
    py: Python<'py>,
    data: PyReadonlyArray2<f64>,
    axis: usize,
    shape: f64,
    width: f64,
    mask: Option<PyReadonlyArray2<bool>>,
) -> PyResult<&'py PyArray2<f64>> {
    if axis > 1 {
        return Err(PyValueError::new_err(format!("axis must be 0 or 1, got {}", axis)));
    }

    let smoothed = filters::smooth_lanes(
        data.as_array(),
        Axis(axis),
        SmoothingParams::new(shape, width),
        mask.as_ref().map(|m| m.as_array()),
    )?;
    Ok(PyArray2::from_owned_array(py, smoothed))
}

/// Split a signal into continuum and residual
///
/// Returns:
///     (continuum, residual) numpy arrays
#[pyfunction]
#[pyo3(signature = (data, shape=1.0, width=25.0, mask=None))]
pub fn separate_continuum<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<f64>,
    shape: f64,
    width: f64,
    mask: Option<PyReadonlyArray1<bool>>,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let mask = mask.as_ref().map(as_slice).transpose()?;
    let (continuum, residual) =
        filters::separate_continuum(as_slice(&data)?, SmoothingParams::new(shape, width), mask)?;
    Ok((PyArray1::from_vec(py, continuum), PyArray1::from_vec(py, residual)))
}
