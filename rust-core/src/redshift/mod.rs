//! Line-based redshift estimation

pub mod estimator;
pub mod model;
pub mod peaks;

pub use estimator::{
    estimate, RedshiftCandidate, RedshiftError, RedshiftEstimate, RedshiftEstimator,
    RedshiftSearch, ScoreCurve, DEFAULT_TOLERANCE,
};
pub use model::{LineMatchModel, ObservedLine};
pub use peaks::find_peaks;
