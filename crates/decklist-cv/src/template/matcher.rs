//! Single-match template search over a multi-scale sweep

use super::correlation::correlation_coefficient;
use super::{MatchConfig, Template};
use crate::device::{acquire_frame, Clock, RetryPolicy};
use crate::error::CvError;
use crate::point::{MatchPoint, Region};
use crate::scale::ScaleProfile;
use crate::traits::{GestureExecutor, ScreenSource};
use crate::utils::ImageUtils;
use crate::Result;
use image::{GrayImage, ImageBuffer, Luma};
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Similarity (or distance) surface produced by sliding a template over an image.
pub(crate) type Surface = ImageBuffer<Luma<f32>, Vec<f32>>;

/// An accepted match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub point: MatchPoint,
    pub score: f32,
    pub scale: f64,
}

/// Per-call options for [`TemplateMatcher::locate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateRequest {
    pub region: Option<Region>,
    /// Overrides the configured single-match confidence.
    pub confidence: Option<f64>,
    pub retry: RetryPolicy,
    pub single_scale: bool,
}

impl LocateRequest {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            region: None,
            confidence: None,
            retry,
            single_scale: false,
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.retry = self.retry.with_attempts(attempts);
        self
    }

    pub fn single_scale(mut self) -> Self {
        self.single_scale = true;
        self
    }
}

impl Default for LocateRequest {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

/// Multi-scale template matcher.
///
/// Holds configuration only; every call depends solely on its arguments and
/// the frame it captures.
#[derive(Debug, Clone, Default)]
pub struct TemplateMatcher {
    config: MatchConfig,
}

impl TemplateMatcher {
    /// Create new template matcher
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Scale candidates for a frame of the given size.
    pub fn scales_for(&self, width: u32, height: u32, single_scale: bool) -> Vec<f64> {
        ScaleProfile::select(width, height, self.config.custom_scale)
            .candidates(single_scale)
            .to_vec()
    }

    /// Capture frames until the template is found or the attempt budget runs out.
    ///
    /// Fails with [`CvError::CaptureExhausted`] if not a single frame could be
    /// captured.
    pub fn locate(
        &self,
        screen: &mut dyn ScreenSource,
        gestures: &mut dyn GestureExecutor,
        clock: &dyn Clock,
        template: &Template,
        request: &LocateRequest,
    ) -> Result<Option<MatchPoint>> {
        let confidence = request.confidence.unwrap_or(self.config.thresholds.single);
        let attempts = request.retry.attempts();
        let mut budget = attempts;
        let mut captured = false;

        while budget > 0 {
            let Some(frame) =
                acquire_frame(screen, gestures, clock, &mut budget, request.retry.backoff())?
            else {
                break;
            };
            captured = true;

            let frame = frame.to_luma8();
            let scales = self.scales_for(frame.width(), frame.height(), request.single_scale);
            if let Some(detection) =
                self.find_in_frame(&frame, &template.image, request.region, confidence, &scales)?
            {
                info!(
                    template = %template.name,
                    point = %detection.point,
                    score = detection.score,
                    scale = detection.scale,
                    "Found template"
                );
                return Ok(Some(detection.point));
            }

            budget -= 1;
            if budget > 0 {
                debug!(template = %template.name, remaining = budget, "Template not found, trying again");
                clock.sleep(request.retry.backoff());
            }
        }

        if !captured {
            return Err(CvError::CaptureExhausted { attempts }.into());
        }

        warn!("Failed to find the {} image", template.name.to_uppercase());
        Ok(None)
    }

    /// Sweep `scales` in order and return the first acceptable match.
    pub fn find_in_frame(
        &self,
        frame: &GrayImage,
        template: &GrayImage,
        region: Option<Region>,
        confidence: f64,
        scales: &[f64],
    ) -> Result<Option<Detection>> {
        let (search, origin) = search_area(frame, region)?;

        for &scale in scales {
            let Some(scaled) = ImageUtils::scale(template, scale) else {
                continue;
            };
            if !ImageUtils::fits(&scaled, &search) {
                debug!(scale, "Template larger than search area, skipping scale");
                continue;
            }

            let Some((score, top_left)) = self.best_match(&search, &scaled) else {
                continue;
            };

            if self.config.method.accepts(score, confidence) {
                return Ok(Some(Detection {
                    point: centroid(top_left, &scaled, origin),
                    score,
                    scale,
                }));
            }

            debug!(score, confidence, scale, "Match not accepted at scale");
        }

        Ok(None)
    }

    /// Global optimum of the matching surface, ignoring non-finite scores.
    pub(crate) fn best_match(&self, image: &GrayImage, template: &GrayImage) -> Option<(f32, (u32, u32))> {
        let surface = self.surface(image, template);
        optimum(&surface, self.config.method.is_inverted())
    }

    fn surface(&self, image: &GrayImage, template: &GrayImage) -> Surface {
        let Some(method) = self.config.method.to_imageproc() else {
            return correlation_coefficient(image, template);
        };

        #[cfg(feature = "parallel")]
        {
            imageproc::template_matching::match_template_parallel(image, template, method)
        }

        #[cfg(not(feature = "parallel"))]
        {
            imageproc::template_matching::match_template(image, template, method)
        }
    }
}

/// The image to search and the offset mapping it back to frame space.
pub(crate) fn search_area(
    frame: &GrayImage,
    region: Option<Region>,
) -> Result<(Cow<'_, GrayImage>, (u32, u32))> {
    match region {
        Some(region) => Ok((Cow::Owned(ImageUtils::crop(frame, region)?), region.origin())),
        None => Ok((Cow::Borrowed(frame), (0, 0))),
    }
}

/// Centre of a template placed at `top_left`, translated by `origin`.
pub(crate) fn centroid(top_left: (u32, u32), template: &GrayImage, origin: (u32, u32)) -> MatchPoint {
    MatchPoint::new(
        origin.0 + top_left.0 + template.width() / 2,
        origin.1 + top_left.1 + template.height() / 2,
    )
}

/// Best finite score and its location; first occurrence wins ties.
pub(crate) fn optimum(surface: &Surface, inverted: bool) -> Option<(f32, (u32, u32))> {
    let mut best: Option<(f32, (u32, u32))> = None;

    for (x, y, pixel) in surface.enumerate_pixels() {
        let score = pixel[0];
        if !score.is_finite() {
            continue;
        }

        let better = match best {
            None => true,
            Some((current, _)) if inverted => score < current,
            Some((current, _)) => score > current,
        };
        if better {
            best = Some((score, (x, y)));
        }
    }

    best
}
