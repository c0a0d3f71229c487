//! FFT-domain smoothing and continuum separation
//!
//! Invalid samples are bridged by linear interpolation, the signal is
//! mirror-extended to suppress wrap-around at the edges, low-pass filtered
//! in the frequency domain and finally re-masked so no value is fabricated
//! where the input was invalid.

use std::sync::Arc;

use log::debug;
use ndarray::{Array2, ArrayView2, Axis};
use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};

use super::windows::lowpass_response;
use crate::spectrum::data::{ensure_len, SpectrumError};

/// Smoothing kernel parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    /// Peakedness of the generalized-Gaussian profile
    pub shape: f64,

    /// Kernel standard deviation in samples
    pub width: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            shape: 1.0,
            width: 25.0,
        }
    }
}

impl SmoothingParams {
    pub fn new(shape: f64, width: f64) -> Self {
        Self { shape, width }
    }

    fn validate(&self) -> Result<(), SpectrumError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.shape) && ok(self.width) {
            Ok(())
        } else {
            Err(SpectrumError::InvalidSmoothing {
                shape: self.shape,
                width: self.width,
            })
        }
    }
}

/// Smoothing width used for the "smoothed flux" overlay of a viewer
///
/// # Arguments
/// * `len` - Number of samples in the displayed spectrum
/// * `factor` - User-facing smoothing factor (0 = lightest)
pub fn display_smoothing_width(len: usize, factor: f64) -> f64 {
    len as f64 / (1.0 + 2.0 * factor)
}

/// Planned FFT smoother for signals of a fixed length
pub struct FftSmoother {
    /// Signal length (N)
    len: usize,

    /// Forward transform of the mirror-extended signal (2N)
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Inverse transform
    c2r: Arc<dyn ComplexToReal<f64>>,

    /// Low-pass gain per frequency bin
    response: Vec<f64>,

    /// Reusable buffers
    time_buffer: Vec<f64>,
    spectrum_buffer: Vec<Complex<f64>>,
    output_buffer: Vec<f64>,
}

impl FftSmoother {
    /// Create a smoother for signals of `len` samples
    pub fn new(len: usize, params: SmoothingParams) -> Result<Self, SpectrumError> {
        params.validate()?;
        if len == 0 {
            return Err(SpectrumError::EmptyInput);
        }

        let fft_len = 2 * len;
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_len);
        let c2r = planner.plan_fft_inverse(fft_len);

        let time_buffer = r2c.make_input_vec();
        let spectrum_buffer = r2c.make_output_vec();
        let output_buffer = c2r.make_output_vec();

        Ok(Self {
            len,
            r2c,
            c2r,
            response: lowpass_response(fft_len, params.shape, params.width),
            time_buffer,
            spectrum_buffer,
            output_buffer,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smooth a signal
    ///
    /// # Arguments
    /// * `data` - Input samples (not modified)
    /// * `mask` - Optional caller mask, `true` marks an invalid sample
    ///
    /// # Returns
    /// Low-pass version of `data`; NaN wherever the input was masked or
    /// non-finite
    pub fn smooth(&mut self, data: &[f64], mask: Option<&[bool]>) -> Result<Vec<f64>, SpectrumError> {
        let n = self.len;
        ensure_len("data", n, data.len())?;
        if let Some(mask) = mask {
            ensure_len("mask", n, mask.len())?;
        }

        let invalid: Vec<bool> = data
            .iter()
            .enumerate()
            .map(|(i, v)| !v.is_finite() || mask.map_or(false, |m| m[i]))
            .collect();

        let filled = match fill_gaps(data, &invalid) {
            Some(filled) => filled,
            None => return Ok(vec![f64::NAN; n]),
        };

        // Mirror-extend: x[0..N] followed by x reversed
        self.time_buffer[..n].copy_from_slice(&filled);
        for (dst, &src) in self.time_buffer[n..].iter_mut().zip(filled.iter().rev()) {
            *dst = src;
        }

        self.r2c
            .process(&mut self.time_buffer, &mut self.spectrum_buffer)
            .map_err(|e| SpectrumError::Fft(e.to_string()))?;

        for (bin, &gain) in self.spectrum_buffer.iter_mut().zip(&self.response) {
            *bin *= gain;
        }

        // DC and Nyquist bins must be purely real for the inverse transform
        self.spectrum_buffer[0].im = 0.0;
        if let Some(last) = self.spectrum_buffer.last_mut() {
            last.im = 0.0;
        }

        self.c2r
            .process(&mut self.spectrum_buffer, &mut self.output_buffer)
            .map_err(|e| SpectrumError::Fft(e.to_string()))?;

        // Scale by 1/2N (IFFT normalization) and drop the mirrored half
        let scale = 1.0 / (2 * n) as f64;
        Ok(self.output_buffer[..n]
            .iter()
            .zip(&invalid)
            .map(|(&v, &bad)| if bad { f64::NAN } else { v * scale })
            .collect())
    }

    /// Split a signal into a smooth continuum and a residual
    ///
    /// # Returns
    /// `(continuum, residual)` with `residual = data - continuum`
    pub fn separate_continuum(
        &mut self,
        data: &[f64],
        mask: Option<&[bool]>,
    ) -> Result<(Vec<f64>, Vec<f64>), SpectrumError> {
        let continuum = self.smooth(data, mask)?;
        let residual = data.iter().zip(&continuum).map(|(&d, &c)| d - c).collect();
        Ok((continuum, residual))
    }
}

/// Replace invalid samples by linear interpolation over sample positions
///
/// Samples before the first (after the last) valid one take its value.
/// Returns `None` when no sample is valid.
fn fill_gaps(data: &[f64], invalid: &[bool]) -> Option<Vec<f64>> {
    let valid: Vec<usize> = (0..data.len()).filter(|&i| !invalid[i]).collect();
    let (&first, &last) = (valid.first()?, valid.last()?);

    let mut filled = data.to_vec();
    filled[..first].fill(data[first]);
    filled[last + 1..].fill(data[last]);

    for pair in valid.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        let span = (hi - lo) as f64;
        for i in lo + 1..hi {
            let t = (i - lo) as f64 / span;
            filled[i] = data[lo] + t * (data[hi] - data[lo]);
        }
    }

    Some(filled)
}

/// Smooth a signal with a one-off smoother
///
/// # Arguments
/// * `data` - Input samples
/// * `params` - Kernel shape and width
/// * `mask` - Optional mask, `true` marks an invalid sample
pub fn smooth(
    data: &[f64],
    params: SmoothingParams,
    mask: Option<&[bool]>,
) -> Result<Vec<f64>, SpectrumError> {
    if data.is_empty() {
        params.validate()?;
        return Ok(Vec::new());
    }

    debug!(
        "Smoothing {} samples (shape={}, width={})",
        data.len(),
        params.shape,
        params.width
    );
    FftSmoother::new(data.len(), params)?.smooth(data, mask)
}

/// Split a signal into continuum and residual with a one-off smoother
pub fn separate_continuum(
    data: &[f64],
    params: SmoothingParams,
    mask: Option<&[bool]>,
) -> Result<(Vec<f64>, Vec<f64>), SpectrumError> {
    let continuum = smooth(data, params, mask)?;
    let residual = data.iter().zip(&continuum).map(|(&d, &c)| d - c).collect();
    Ok((continuum, residual))
}

/// Smooth every lane of a batch of spectra along `axis`
///
/// `Axis(1)` smooths each row independently, which is the layout of a
/// stack of spectra sharing one wavelength grid.
pub fn smooth_lanes(
    data: ArrayView2<f64>,
    axis: Axis,
    params: SmoothingParams,
    mask: Option<ArrayView2<bool>>,
) -> Result<Array2<f64>, SpectrumError> {
    if let Some(mask) = &mask {
        if mask.dim() != data.dim() {
            return Err(SpectrumError::LengthMismatch {
                what: "mask",
                expected: data.len(),
                found: mask.len(),
            });
        }
    }

    let mut out = Array2::from_elem(data.dim(), f64::NAN);
    let lane_len = data.len_of(axis);
    if data.is_empty() {
        params.validate()?;
        return Ok(out);
    }

    let mask_lanes: Option<Vec<Vec<bool>>> = mask.map(|m| {
        m.lanes(axis)
            .into_iter()
            .map(|lane| lane.to_vec())
            .collect()
    });

    let mut smoother = FftSmoother::new(lane_len, params)?;
    for (i, (lane, mut out_lane)) in data
        .lanes(axis)
        .into_iter()
        .zip(out.lanes_mut(axis))
        .enumerate()
    {
        let values = lane.to_vec();
        let lane_mask = mask_lanes.as_ref().map(|lanes| lanes[i].as_slice());
        let smoothed = smoother.smooth(&values, lane_mask)?;

        for (dst, v) in out_lane.iter_mut().zip(smoothed) {
            *dst = v;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    fn noisy_ramp(n: usize) -> Vec<f64> {
        // Deterministic high-frequency wiggle on top of a slow ramp
        (0..n)
            .map(|i| 10.0 + 0.01 * i as f64 + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect()
    }

    #[test]
    fn test_constant_is_preserved() {
        for &width in &[0.5, 3.0, 25.0, 400.0] {
            let data = vec![7.25; 300];
            let out = smooth(&data, SmoothingParams::new(1.0, width), None).unwrap();

            assert_eq!(out.len(), data.len());
            for (i, &v) in out.iter().enumerate() {
                assert!((v - 7.25).abs() < 1e-9, "width {}: sample {} = {}", width, i, v);
            }
        }
    }

    #[test]
    fn test_removes_alternating_component() {
        let data = noisy_ramp(500);
        let out = smooth(&data, SmoothingParams::new(1.0, 10.0), None).unwrap();

        // Away from the edges the ±0.5 alternation is gone and the ramp stays
        for i in 50..450 {
            let ramp = 10.0 + 0.01 * i as f64;
            assert!((out[i] - ramp).abs() < 0.01, "sample {}: {} vs {}", i, out[i], ramp);
        }
    }

    #[test]
    fn test_wider_kernel_is_smoother() {
        let data: Vec<f64> = (0..400).map(|i| (i as f64 * 0.3).sin()).collect();

        let roughness = |v: &[f64]| -> f64 {
            v.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
        };

        let light = smooth(&data, SmoothingParams::new(1.0, 1.0), None).unwrap();
        let heavy = smooth(&data, SmoothingParams::new(1.0, 20.0), None).unwrap();

        assert!(roughness(&heavy) < roughness(&light));
        assert!(roughness(&light) < roughness(&data));
    }

    #[test]
    fn test_masked_samples_stay_invalid() {
        let mut data = vec![5.0; 100];
        data[10] = f64::NAN;
        data[11] = f64::INFINITY;
        let mut mask = vec![false; 100];
        mask[50] = true;

        let out = smooth(&data, SmoothingParams::default(), Some(mask.as_slice())).unwrap();

        assert!(out[10].is_nan());
        assert!(out[11].is_nan());
        assert!(out[50].is_nan());
        assert!((out[49] - 5.0).abs() < 1e-9);
        assert!((out[12] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_masked_spike_does_not_leak() {
        let mut data = vec![1.0; 200];
        data[100] = 1e6;
        let mut mask = vec![false; 200];
        mask[100] = true;

        let out = smooth(&data, SmoothingParams::new(1.0, 5.0), Some(mask.as_slice())).unwrap();
        assert!((out[99] - 1.0).abs() < 1e-9);
        assert!((out[101] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_invalid_is_noop() {
        let data = vec![f64::NAN; 16];
        let out = smooth(&data, SmoothingParams::default(), None).unwrap();
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_edge_gaps_use_nearest_valid() {
        let data = [f64::NAN, f64::NAN, 2.0, f64::NAN, 4.0, f64::NAN];
        let invalid: Vec<bool> = data.iter().map(|v| !v.is_finite()).collect();

        let filled = fill_gaps(&data, &invalid).unwrap();
        assert_eq!(filled, vec![2.0, 2.0, 2.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(smooth(&[1.0, 2.0], SmoothingParams::new(0.0, 10.0), None).is_err());
        assert!(smooth(&[1.0, 2.0], SmoothingParams::new(1.0, -1.0), None).is_err());
        assert!(smooth(&[1.0, 2.0], SmoothingParams::new(1.0, f64::NAN), None).is_err());
        assert!(smooth(&[1.0, 2.0], SmoothingParams::default(), Some(&[false][..])).is_err());
    }

    #[test]
    fn test_single_sample() {
        let out = smooth(&[3.5], SmoothingParams::default(), None).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_smoother_reuse() {
        let mut smoother = FftSmoother::new(64, SmoothingParams::new(1.0, 4.0)).unwrap();
        let a: Vec<f64> = (0..64).map(|i| (i as f64 * 0.7).cos()).collect();

        let first = smoother.smooth(&a, None).unwrap();
        let second = smoother.smooth(&a, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_smooth_lanes_matches_single_rows() {
        let batch = array![
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            [8.0, 1.0, 7.0, 2.0, 6.0, 3.0, 5.0, 4.0]
        ];
        let params = SmoothingParams::new(1.0, 2.0);

        let rows = smooth_lanes(batch.view(), Axis(1), params, None).unwrap();
        for (r, row) in batch.rows().into_iter().enumerate() {
            let single = smooth(&row.to_vec(), params, None).unwrap();
            for (c, &v) in single.iter().enumerate() {
                assert!((rows[[r, c]] - v).abs() < 1e-12);
            }
        }

        let cols = smooth_lanes(batch.t(), Axis(0), params, None).unwrap();
        assert_eq!(cols.dim(), (8, 2));
        for r in 0..2 {
            for c in 0..8 {
                assert!((cols[[c, r]] - rows[[r, c]]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_display_width() {
        assert!((display_smoothing_width(700, 3.0) - 100.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn test_length_invariance(
            data in prop::collection::vec(-1e3f64..1e3, 1..300),
            width in 0.5f64..50.0,
        ) {
            let out = smooth(&data, SmoothingParams::new(1.0, width), None).unwrap();
            prop_assert_eq!(out.len(), data.len());
        }

        #[test]
        fn test_continuum_plus_residual_reconstructs(
            data in prop::collection::vec(-1e3f64..1e3, 1..300),
            shape in 0.5f64..3.0,
            width in 0.5f64..50.0,
        ) {
            let (continuum, residual) =
                separate_continuum(&data, SmoothingParams::new(shape, width), None).unwrap();
            for i in 0..data.len() {
                prop_assert!((continuum[i] + residual[i] - data[i]).abs() < 1e-9);
            }
        }
    }
}
