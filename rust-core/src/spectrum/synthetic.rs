//! Deterministic synthetic spectra
//!
//! Sloped continuum plus Gaussian line profiles plus seeded Gaussian noise,
//! reproducible across platforms for a given seed. Used to exercise the
//! detector and the redshift search without a file reader.

use std::f64::consts::PI;

/// Seeded standard-normal generator (xorshift64* + Box-Muller)
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    state: u64,
}

impl GaussianNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1,
        }
    }

    /// Uniform sample in [0, 1)
    pub fn uniform(&mut self) -> f64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        let x = self.state.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (x >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard-normal sample
    pub fn sample(&mut self) -> f64 {
        let u1 = 1.0 - self.uniform();
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

/// A Gaussian line profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticLine {
    /// Center wavelength
    pub center: f64,

    /// Peak amplitude (negative for absorption)
    pub amplitude: f64,

    /// Standard deviation in wavelength units
    pub sigma: f64,
}

impl SyntheticLine {
    pub fn new(center: f64, amplitude: f64, sigma: f64) -> Self {
        Self {
            center,
            amplitude,
            sigma,
        }
    }

    pub fn profile(&self, wavelength: f64) -> f64 {
        let d = (wavelength - self.center) / self.sigma;
        self.amplitude * (-0.5 * d * d).exp()
    }
}

/// Flux samples on a given wavelength grid
///
/// # Arguments
/// * `wavelength` - Sample wavelengths
/// * `offset`, `slope` - Continuum `offset + slope * i` for sample index `i`
/// * `lines` - Profiles added on top of the continuum
/// * `noise_level` - Standard deviation of the additive noise
/// * `rng` - Noise source
pub fn synthetic_flux(
    wavelength: &[f64],
    offset: f64,
    slope: f64,
    lines: &[SyntheticLine],
    noise_level: f64,
    rng: &mut GaussianNoise,
) -> Vec<f64> {
    wavelength
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let signal: f64 = lines.iter().map(|line| line.profile(w)).sum();
            offset + slope * i as f64 + signal + noise_level * rng.sample()
        })
        .collect()
}

/// Uniform wavelength grid of `n` samples
pub fn linear_grid(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}
