use decklist_core::RarityError;
use decklist_cv::CvError;
use thiserror::Error;

/// Errors that end an import run.
///
/// Per-card problems never show up here; they go to the failure ledger.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("screen state error: {0}")]
    ScreenState(String),

    #[error(transparent)]
    Device(anyhow::Error),
}

impl From<RarityError> for ImportError {
    fn from(err: RarityError) -> Self {
        ImportError::Configuration(err.to_string())
    }
}

impl From<anyhow::Error> for ImportError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<CvError>() {
            Some(CvError::CaptureExhausted { .. }) => ImportError::ScreenState(err.to_string()),
            Some(
                CvError::TemplateNotFound { .. }
                | CvError::RegionOutOfBounds { .. }
                | CvError::ThresholdOrder { .. }
                | CvError::InvalidConfidence(_)
                | CvError::InvalidScale(_),
            ) => ImportError::Configuration(err.to_string()),
            None => ImportError::Device(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
