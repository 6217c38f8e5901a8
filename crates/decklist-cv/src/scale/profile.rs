use super::round_scale;
use serde::{Deserialize, Serialize};

const LOW_END_SCALES: &[f64] = &[0.60, 0.61, 0.62, 0.63, 0.64, 0.65, 0.67, 0.68, 0.69, 0.70];
const MIDDLE_END_SCALES: &[f64] = &[
    0.70, 0.71, 0.72, 0.73, 0.74, 0.75, 0.76, 0.77, 0.78, 0.79, 0.80, 0.81, 0.82, 0.83, 0.84,
    0.85, 0.87, 0.88, 0.89, 0.90, 0.91, 0.92, 0.93, 0.94, 0.95, 0.96, 0.97, 0.98, 0.99,
];
const TABLET_PORTRAIT_SCALES: &[f64] = &[0.70, 0.71, 0.72, 0.73, 0.74, 0.75];
const TABLET_LANDSCAPE_SCALES: &[f64] = &[0.55, 0.56, 0.57, 0.58, 0.59, 0.60];
const NATIVE_SCALES: &[f64] = &[1.0];

/// Offsets applied around a calibrated custom scale.
const CUSTOM_OFFSETS: &[f64] = &[-0.02, -0.01, 0.0, 0.01, 0.02, 0.03, 0.04];

/// Device resolution class. Templates are authored at 1080p.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionBucket {
    /// 1080 pixels on either side.
    Native1080,
    /// 720 pixels on either side.
    Low720,
    /// 1600x2560 tablet held upright.
    TabletPortrait,
    /// 2560x1600 tablet held sideways.
    TabletLandscape,
    /// Anything else, matched with the broad middle range.
    Other,
}

impl ResolutionBucket {
    pub fn classify(width: u32, height: u32) -> Self {
        match (width, height) {
            (720, _) | (_, 720) => ResolutionBucket::Low720,
            (2560, 1600) => ResolutionBucket::TabletLandscape,
            (1600, 2560) => ResolutionBucket::TabletPortrait,
            (1080, _) | (_, 1080) => ResolutionBucket::Native1080,
            _ => ResolutionBucket::Other,
        }
    }

    pub fn scale_factors(&self) -> &'static [f64] {
        match self {
            ResolutionBucket::Native1080 => NATIVE_SCALES,
            ResolutionBucket::Low720 => LOW_END_SCALES,
            ResolutionBucket::TabletPortrait => TABLET_PORTRAIT_SCALES,
            ResolutionBucket::TabletLandscape => TABLET_LANDSCAPE_SCALES,
            ResolutionBucket::Other => MIDDLE_END_SCALES,
        }
    }
}

/// Ordered template scale candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleProfile {
    factors: Vec<f64>,
    /// The one candidate used when a single scale is requested.
    primary: f64,
}

impl ScaleProfile {
    /// Pick the profile for a frame size. A calibrated `custom_scale` wins
    /// over the resolution bucket.
    pub fn select(width: u32, height: u32, custom_scale: Option<f64>) -> Self {
        match custom_scale {
            Some(scale) => Self::custom(scale),
            None => Self::for_bucket(ResolutionBucket::classify(width, height)),
        }
    }

    pub fn for_bucket(bucket: ResolutionBucket) -> Self {
        let factors = bucket.scale_factors().to_vec();
        Self {
            primary: factors[0],
            factors,
        }
    }

    pub fn custom(scale: f64) -> Self {
        Self {
            factors: CUSTOM_OFFSETS
                .iter()
                .map(|offset| round_scale(scale + offset))
                .collect(),
            primary: round_scale(scale),
        }
    }

    pub fn factors(&self) -> &[f64] {
        &self.factors
    }

    pub fn candidates(&self, single_scale: bool) -> &[f64] {
        if single_scale {
            std::slice::from_ref(&self.primary)
        } else {
            &self.factors
        }
    }
}
