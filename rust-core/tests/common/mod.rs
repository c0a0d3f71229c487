//! Shared helpers for integration tests

#![allow(dead_code)]

use specline::spectrum::synthetic::{linear_grid, synthetic_flux, GaussianNoise, SyntheticLine};

/// Install a test logger (safe to call from every test)
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An injected Gaussian line profile
#[derive(Debug, Clone, Copy)]
pub struct InjectedLine {
    pub rest: f64,
    pub amplitude: f64,
    pub sigma: f64,
}

/// Unit-noise spectrum on a 1 Angstrom grid starting at `start`
///
/// Each line is centered on the sample closest to `rest * (1 + z)`.
pub fn redshifted_spectrum(
    start: f64,
    n: usize,
    z: f64,
    lines: &[InjectedLine],
    seed: u64,
) -> (Vec<f64>, Vec<f64>) {
    let wavelength = linear_grid(start, 1.0, n);
    let profiles: Vec<SyntheticLine> = lines
        .iter()
        .map(|line| {
            let center = start + pixel_of(start, line.rest, z) as f64;
            SyntheticLine::new(center, line.amplitude, line.sigma)
        })
        .collect();
    let flux = synthetic_flux(&wavelength, 50.0, 0.005, &profiles, 1.0, &mut GaussianNoise::new(seed));
    (wavelength, flux)
}

/// Nearest grid index of an observed wavelength
pub fn pixel_of(start: f64, rest: f64, z: f64) -> usize {
    (rest * (1.0 + z) - start).round() as usize
}
