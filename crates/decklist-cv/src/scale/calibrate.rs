//! Scale discovery for devices outside the calibrated buckets.

use super::round_scale;
use crate::point::MatchPoint;
use crate::template::TemplateMatcher;
use crate::Result;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Scales to try: `start`, `start + step`, ... for `max_steps` values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSweep {
    pub start: f64,
    pub step: f64,
    pub max_steps: u32,
}

impl CalibrationSweep {
    pub fn scales(&self) -> Vec<f64> {
        (0..self.max_steps)
            .map(|i| round_scale(self.start + self.step * i as f64))
            .collect()
    }
}

impl Default for CalibrationSweep {
    fn default() -> Self {
        Self {
            start: 0.20,
            step: 0.01,
            max_steps: 80,
        }
    }
}

/// First scale at which the template was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    pub scale: f64,
    pub point: MatchPoint,
    pub score: f32,
    /// Custom scales worth configuring for this device.
    pub recommended: Vec<f64>,
}

impl TemplateMatcher {
    /// Try each sweep scale on its own against a still frame and report the
    /// first one that matches.
    pub fn calibrate(
        &self,
        frame: &GrayImage,
        template: &GrayImage,
        sweep: &CalibrationSweep,
    ) -> Result<Option<Calibration>> {
        let confidence = self.config().thresholds.single;
        let scales = sweep.scales();

        let try_scale = |scale: f64| match self.find_in_frame(frame, template, None, confidence, &[scale]) {
            Ok(Some(detection)) => Some(Ok(detection)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        };

        #[cfg(feature = "parallel")]
        let found = {
            use rayon::prelude::*;
            scales.par_iter().copied().find_map_first(try_scale)
        };

        #[cfg(not(feature = "parallel"))]
        let found = scales.iter().copied().find_map(try_scale);

        let Some(detection) = found.transpose()? else {
            return Ok(None);
        };

        Ok(Some(Calibration {
            scale: detection.scale,
            point: detection.point,
            score: detection.score,
            recommended: (1..=4)
                .map(|i| round_scale(detection.scale + sweep.step * i as f64))
                .collect(),
        }))
    }
}
