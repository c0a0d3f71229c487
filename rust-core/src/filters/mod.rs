//! FFT-domain low-pass filtering

pub mod smooth;
pub mod windows;

pub use smooth::{
    display_smoothing_width, separate_continuum, smooth, smooth_lanes, FftSmoother,
    SmoothingParams,
};
pub use windows::{general_gaussian, lowpass_response};
