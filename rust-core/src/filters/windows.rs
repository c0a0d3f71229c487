//! Generalized-Gaussian windows for FFT-domain smoothing
//!
//! The smoother multiplies the spectrum of a signal by a window laid out
//! over FFT bins, so the same profile serves as a time-domain window and
//! as a frequency response.

use std::f64::consts::PI;

/// Generate a generalized-Gaussian window
///
/// w[n] = exp(-0.5 * |(n - c) / σ|^(2p))
///
/// # Arguments
/// * `length` - Number of samples (M)
/// * `shape` - Peakedness p (1.0 = Gaussian, larger = flatter top)
/// * `sigma` - Standard deviation in samples
/// * `periodic` - Center at M/2 (for DFT use) instead of (M-1)/2 (symmetric)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn general_gaussian(length: usize, shape: f64, sigma: f64, periodic: bool) -> Vec<f64> {
    let center = if periodic {
        (length / 2) as f64
    } else {
        (length as f64 - 1.0) / 2.0
    };

    (0..length)
        .map(|n| {
            let x = ((n as f64 - center) / sigma).abs();
            (-0.5 * x.powf(2.0 * shape)).exp()
        })
        .collect()
}

/// Frequency response of the smoothing low-pass filter
///
/// The generalized Gaussian is built over `fft_len` bins and rolled by half
/// the length so its peak sits on the DC bin. With `shape = 1` this is the
/// transfer function of a Gaussian kernel with standard deviation `width`
/// samples, so a larger `width` removes more high-frequency content.
///
/// # Arguments
/// * `fft_len` - Length of the (real) transform
/// * `shape` - Peakedness of the profile
/// * `width` - Time-domain standard deviation in samples
///
/// # Returns
/// Gains for the `fft_len / 2 + 1` bins of a real-to-complex transform
pub fn lowpass_response(fft_len: usize, shape: f64, width: f64) -> Vec<f64> {
    let sigma_bins = fft_len as f64 / (2.0 * PI * width);

    let mut window = general_gaussian(fft_len, shape, sigma_bins, true);
    window.rotate_left(fft_len / 2);
    window.truncate(fft_len / 2 + 1);
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_window() {
        let window = general_gaussian(101, 1.0, 10.0, false);

        assert_eq!(window.len(), 101);
        assert!((window[50] - 1.0).abs() < 1e-12);
        for i in 0..50 {
            assert!((window[i] - window[100 - i]).abs() < 1e-12);
        }

        // One sigma from the center
        assert!((window[60] - (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_shape_flattens_top() {
        let gauss = general_gaussian(101, 1.0, 10.0, false);
        let flat = general_gaussian(101, 4.0, 10.0, false);

        // Inside one sigma the flat-top profile stays closer to 1
        assert!(flat[55] > gauss[55]);
        // Outside one sigma it falls off faster
        assert!(flat[70] < gauss[70]);
    }

    #[test]
    fn test_lowpass_response_peaks_at_dc() {
        let response = lowpass_response(2000, 1.0, 10.0);

        assert_eq!(response.len(), 1001);
        assert!((response[0] - 1.0).abs() < 1e-12);
        assert!(response.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_wider_kernel_cuts_more() {
        let narrow = lowpass_response(1024, 1.0, 2.0);
        let wide = lowpass_response(1024, 1.0, 20.0);

        assert!(wide[50] < narrow[50]);
    }
}
