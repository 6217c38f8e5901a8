use crate::point::Region;
use crate::template::TemplateCategory;
use thiserror::Error;

/// Failures raised by the matching engine.
///
/// They travel inside `anyhow::Error`; callers that need to react to a
/// specific case recover it with `downcast_ref::<CvError>()`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CvError {
    #[error("region {region} does not fit inside a {width}x{height} frame")]
    RegionOutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },

    #[error("no frame could be captured after {attempts} attempts")]
    CaptureExhausted { attempts: u32 },

    #[error("single-match confidence {single} is below the multi-match confidence {multi}")]
    ThresholdOrder { single: f64, multi: f64 },

    #[error("confidence {0} is outside 0.0..=1.0")]
    InvalidConfidence(f64),

    #[error("invalid scale factor {0}")]
    InvalidScale(f64),

    #[error("template '{name}' not found among {category} templates")]
    TemplateNotFound {
        name: String,
        category: TemplateCategory,
    },
}
