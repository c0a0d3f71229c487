//! Line catalog and line detection

pub mod catalog;
pub mod detector;

pub use catalog::{identify, lookup, rest_wavelengths, RestFrameLine, IDENTIFY_WINDOW, RESTFRAME_LINES};
pub use detector::{detect, DetectorConfig, LineCandidate, LineDetector, VARIANCE_EPSILON};
