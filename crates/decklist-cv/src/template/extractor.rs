//! Every occurrence of a template, by repeated matching with masking

use super::matcher::{centroid, search_area};
use super::{Template, TemplateMatcher};
use crate::device::{acquire_frame, Clock};
use crate::error::CvError;
use crate::point::{sort_points, MatchPoint, Region};
use crate::traits::{GestureExecutor, ScreenSource};
use crate::utils::ImageUtils;
use crate::Result;
use image::GrayImage;
use tracing::debug;

impl TemplateMatcher {
    /// Capture one frame and collect every match of `template` in it.
    ///
    /// Points come back sorted by y, then x.
    pub fn locate_all(
        &self,
        screen: &mut dyn ScreenSource,
        gestures: &mut dyn GestureExecutor,
        clock: &dyn Clock,
        template: &Template,
        region: Option<Region>,
        confidence: f64,
    ) -> Result<Vec<MatchPoint>> {
        let retry = self.config().capture_retry;
        let mut budget = retry.attempts();

        let Some(frame) = acquire_frame(screen, gestures, clock, &mut budget, retry.backoff())? else {
            return Err(CvError::CaptureExhausted {
                attempts: retry.attempts(),
            }
            .into());
        };

        let frame = frame.to_luma8();
        let scales = self.scales_for(frame.width(), frame.height(), false);
        let points = self.find_all_in_frame(&frame, &template.image, region, confidence, &scales)?;

        debug!(template = %template.name, count = points.len(), "Found match locations: {:?}", points);
        Ok(points)
    }

    /// Commit to the first scale with an acceptable match, then keep masking
    /// each match and searching again at that scale until nothing clears
    /// `confidence`.
    pub fn find_all_in_frame(
        &self,
        frame: &GrayImage,
        template: &GrayImage,
        region: Option<Region>,
        confidence: f64,
        scales: &[f64],
    ) -> Result<Vec<MatchPoint>> {
        let (search, origin) = search_area(frame, region)?;
        let mut working = search.into_owned();
        let method = self.config().method;

        let mut committed = None;
        for &scale in scales {
            let Some(scaled) = ImageUtils::scale(template, scale) else {
                continue;
            };
            if !ImageUtils::fits(&scaled, &working) {
                continue;
            }

            if let Some((score, top_left)) = self.best_match(&working, &scaled) {
                if method.accepts(score, confidence) {
                    debug!(score, scale, "Committed to scale");
                    committed = Some((scaled, top_left));
                    break;
                }
            }
        }

        let Some((scaled, mut top_left)) = committed else {
            return Ok(Vec::new());
        };

        let mut points: Vec<MatchPoint> = Vec::new();
        loop {
            ImageUtils::mask(&mut working, top_left, scaled.dimensions());

            let point = centroid(top_left, &scaled, origin);
            if points.contains(&point) {
                // A hotspot that survives masking would loop forever.
                break;
            }
            if !points.iter().any(|existing| existing.is_adjacent(&point)) {
                points.push(point);
            }

            match self.best_match(&working, &scaled) {
                Some((score, next)) if method.accepts(score, confidence) => top_left = next,
                _ => break,
            }
        }

        sort_points(&mut points);
        Ok(points)
    }
}
