//! Zero-mean normalized cross-correlation surface

use super::matcher::Surface;
use image::{GrayImage, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image, sum_image_pixels};

/// Correlation coefficient of `template` against every window of `image`.
///
/// Window sums come from integral images; only the template product is
/// computed per window. Flat windows, and flat templates, have no defined
/// coefficient and score NaN.
pub(crate) fn correlation_coefficient(image: &GrayImage, template: &GrayImage) -> Surface {
    let (tw, th) = template.dimensions();
    let count = tw as u64 * th as u64;
    let width = image.width() - tw + 1;
    let height = image.height() - th + 1;

    let mean = template.pixels().map(|p| p[0] as f64).sum::<f64>() / count as f64;
    let centred: Vec<f64> = template.pixels().map(|p| p[0] as f64 - mean).collect();
    let template_energy: f64 = centred.iter().map(|v| v * v).sum();

    let sums = integral_image::<_, u64>(image);
    let squares = integral_squared_image::<_, u64>(image);
    let pixels = image.as_raw();
    let stride = image.width() as usize;

    let score_at = |x: u32, y: u32| -> f32 {
        let (right, bottom) = (x + tw - 1, y + th - 1);
        let [sum] = sum_image_pixels(&sums, x, y, right, bottom);
        let [sum_sq] = sum_image_pixels(&squares, x, y, right, bottom);

        // count * Σ(I - mean(I))², exact in integers
        let spread = (count as u128 * sum_sq as u128).saturating_sub(sum as u128 * sum as u128);
        if spread == 0 || template_energy == 0.0 {
            return f32::NAN;
        }

        let mut dot = 0.0;
        for (dy, row_template) in centred.chunks_exact(tw as usize).enumerate() {
            let start = (y as usize + dy) * stride + x as usize;
            let row = &pixels[start..start + tw as usize];
            dot += row
                .iter()
                .zip(row_template)
                .map(|(&i, &t)| i as f64 * t)
                .sum::<f64>();
        }

        let window_energy = spread as f64 / count as f64;
        (dot / (template_energy * window_energy).sqrt()) as f32
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        let rows: Vec<Vec<f32>> = (0..height)
            .into_par_iter()
            .map(|y| (0..width).map(|x| score_at(x, y)).collect())
            .collect();
        Surface::from_fn(width, height, |x, y| Luma([rows[y as usize][x as usize]]))
    }

    #[cfg(not(feature = "parallel"))]
    {
        Surface::from_fn(width, height, |x, y| Luma([score_at(x, y)]))
    }
}
