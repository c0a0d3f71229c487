//! Default wavelength-dispersion curve
//!
//! Readers that find no dispersion information in a file derive one from
//! the sample spacing. Widths and tolerances fed to the line detector and
//! the redshift estimator are built on top of it.

/// Dispersion values below this are considered unreliable
pub const MIN_DISPERSION: f64 = 1e-3;

/// Replacement for unreliable dispersion values
pub const FALLBACK_DISPERSION: f64 = 2.0;

/// Scale numerator when the instrument resolution is unknown
pub const DEFAULT_RESOLUTION: f64 = 2.0;

/// Build a dispersion curve from adjacent-sample spacing
///
/// # Arguments
/// * `wavelength` - Sample wavelengths in Angstrom
/// * `resolution` - Scale numerator ([`DEFAULT_RESOLUTION`] when the instrument resolution is unknown)
///
/// # Returns
/// `resolution / Δλ` per sample, with the first sample copying the second
pub fn dispersion_curve(wavelength: &[f64], resolution: f64) -> Vec<f64> {
    let mut wd: Vec<f64> = wavelength
        .windows(2)
        .map(|pair| resolution / (pair[1] - pair[0]))
        .collect();

    match wd.first().copied() {
        Some(first) => wd.insert(0, first),
        None if !wavelength.is_empty() => wd.push(FALLBACK_DISPERSION),
        None => {}
    }

    for w in wd.iter_mut() {
        if !w.is_finite() || *w < MIN_DISPERSION {
            *w = FALLBACK_DISPERSION;
        }
    }

    wd
}
