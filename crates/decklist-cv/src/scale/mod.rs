//! Resolution-dependent template scales

pub mod calibrate;
pub mod profile;

pub use calibrate::{Calibration, CalibrationSweep};
pub use profile::{ResolutionBucket, ScaleProfile};

/// Round to three decimals so stepped scales stay on the 0.001 grid.
pub(crate) fn round_scale(scale: f64) -> f64 {
    (scale * 1000.0).round() / 1000.0
}
