//! Grayscale image helpers used by the matcher

use crate::error::CvError;
use crate::point::Region;
use crate::Result;
use anyhow::Context;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Load image as a single intensity channel
    pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
        Ok(Self::load(&path)?.to_luma8())
    }

    /// Load image as-is
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        image::open(&path).with_context(|| format!("Failed to open image: {:?}", path.as_ref()))
    }

    /// Copy out `region` of `image`
    pub fn crop(image: &GrayImage, region: Region) -> Result<GrayImage> {
        let (width, height) = image.dimensions();
        if !region.fits_within(width, height) {
            return Err(CvError::RegionOutOfBounds {
                region,
                width,
                height,
            }
            .into());
        }

        Ok(imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image())
    }

    /// Resize by `factor`, truncating the new dimensions.
    ///
    /// Returns `None` when the result would have no pixels.
    pub fn scale(image: &GrayImage, factor: f64) -> Option<GrayImage> {
        if factor == 1.0 {
            return Some(image.clone());
        }

        let width = (image.width() as f64 * factor) as u32;
        let height = (image.height() as f64 * factor) as u32;
        if width == 0 || height == 0 {
            return None;
        }

        Some(imageops::resize(image, width, height, FilterType::Triangle))
    }

    /// Black out a `size` rectangle whose top-left corner is `top_left`
    pub fn mask(image: &mut GrayImage, top_left: (u32, u32), size: (u32, u32)) {
        let rect = Rect::at(top_left.0 as i32, top_left.1 as i32).of_size(size.0, size.1);
        draw_filled_rect_mut(image, rect, Luma([0u8]));
    }

    /// Whether `template` can be slid over `image` at least once.
    pub fn fits(template: &GrayImage, image: &GrayImage) -> bool {
        template.width() <= image.width() && template.height() <= image.height()
    }
}
