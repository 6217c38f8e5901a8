//! Template matching module

mod correlation;
pub mod extractor;
pub mod loader;
pub mod matcher;

pub use loader::{TemplateLoader, TemplateSet};
pub use matcher::{Detection, LocateRequest, TemplateMatcher};

use crate::device::RetryPolicy;
use crate::error::CvError;
use crate::Result;
use image::GrayImage;
use imageproc::template_matching::MatchTemplateMethod;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a template lives: UI icons or whole-screen location landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateCategory {
    Icon,
    Location,
}

impl TemplateCategory {
    /// Subdirectory of the template root holding this category.
    pub fn folder(&self) -> &'static str {
        match self {
            TemplateCategory::Icon => "images",
            TemplateCategory::Location => "locations",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

/// Template data structure
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub category: TemplateCategory,
    pub image: GrayImage,
}

impl Template {
    pub fn new(name: impl Into<String>, category: TemplateCategory, image: GrayImage) -> Self {
        Self {
            name: name.into(),
            category,
            image,
        }
    }
}

/// Template matching method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingMethod {
    /// Correlation coefficient (zero-mean, robust to brightness and contrast changes)
    CorrelationCoefficientNormalized,
    /// Normalized cross-correlation (similarity: higher is better)
    CrossCorrelationNormalized,
    /// Normalized squared difference (distance: lower is better)
    SumOfSquaredErrorsNormalized,
}

impl MatchingMethod {
    /// The imageproc method, if imageproc computes this one.
    pub fn to_imageproc(&self) -> Option<MatchTemplateMethod> {
        match self {
            MatchingMethod::CorrelationCoefficientNormalized => None,
            MatchingMethod::CrossCorrelationNormalized => {
                Some(MatchTemplateMethod::CrossCorrelationNormalized)
            }
            MatchingMethod::SumOfSquaredErrorsNormalized => {
                Some(MatchTemplateMethod::SumOfSquaredErrorsNormalized)
            }
        }
    }

    pub fn is_inverted(&self) -> bool {
        matches!(self, MatchingMethod::SumOfSquaredErrorsNormalized)
    }

    /// Whether `score` clears `confidence` in this method's direction.
    pub fn accepts(&self, score: f32, confidence: f64) -> bool {
        let score = score as f64;
        if self.is_inverted() {
            score <= 1.0 - confidence
        } else {
            score >= confidence
        }
    }
}

/// Acceptance thresholds. `single` guards one-off lookups and must not be
/// below `multi`, which is tuned for recall when collecting every match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub single: f64,
    pub multi: f64,
}

impl ConfidenceThresholds {
    pub fn new(single: f64, multi: f64) -> Result<Self> {
        let thresholds = Self { single, multi };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        for value in [self.single, self.multi] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CvError::InvalidConfidence(value).into());
            }
        }

        if self.single < self.multi {
            return Err(CvError::ThresholdOrder {
                single: self.single,
                multi: self.multi,
            }
            .into());
        }

        Ok(())
    }
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            single: 0.85,
            multi: 0.8,
        }
    }
}

/// Template matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub method: MatchingMethod,
    pub thresholds: ConfidenceThresholds,
    /// Calibrated scale overriding the resolution bucket profile.
    pub custom_scale: Option<f64>,
    /// Frame acquisition budget for calls without their own retry policy.
    pub capture_retry: RetryPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            method: MatchingMethod::CorrelationCoefficientNormalized,
            thresholds: ConfidenceThresholds::default(),
            custom_scale: None,
            capture_retry: RetryPolicy::default(),
        }
    }
}

impl MatchConfig {
    /// Configuration using normalized squared difference
    pub fn sqdiff() -> Self {
        Self {
            method: MatchingMethod::SumOfSquaredErrorsNormalized,
            ..Default::default()
        }
    }

    pub fn with_custom_scale(mut self, scale: f64) -> Self {
        self.custom_scale = Some(scale);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;

        if let Some(scale) = self.custom_scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(CvError::InvalidScale(scale).into());
            }
        }

        Ok(())
    }
}
