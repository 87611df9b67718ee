//! Rendering of escape matrices into images.

use crate::error::Error;
use crate::matrix::EscapeMatrix;

/// Settings for rendering an escape matrix into an image.
#[derive(Default)]
pub struct Renderer {}

impl Renderer {
    /// Renders escape counts into an RGB image.
    ///
    /// Pixels that never diverged (count == `max_iter`) are black; every
    /// other pixel is hued by where its count falls between the smallest and
    /// largest escaped counts actually present, so the full hue circle is
    /// spent on the structure that exists in this particular window.
    pub fn render(
        &self,
        matrix: &EscapeMatrix,
        max_iter: u32,
    ) -> Result<image::DynamicImage, Error> {
        if max_iter == 0 {
            return Err(Error::Configuration(
                "iteration budget must be positive".to_string(),
            ));
        }
        if let Some(&count) = matrix.as_slice().iter().find(|&&v| v > max_iter) {
            return Err(Error::Configuration(format!(
                "escape count {} exceeds the iteration budget {}",
                count, max_iter
            )));
        }

        // Observed range of escaped counts, for hue scaling.
        let (min, max) = matrix
            .as_slice()
            .iter()
            .filter(|&&v| v < max_iter)
            .fold((u32::MAX, u32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let denom = max.saturating_sub(min) as f64 + 1.0;

        let pixel_values = matrix.as_slice().iter().map(|&v| {
            if v >= max_iter {
                image::Rgb([0, 0, 0])
            } else {
                let hue = (v - min) as f64 * 360.0 / denom;
                let (r, g, b) = hsv::hsv_to_rgb(hue, 1.0, 1.0);
                image::Rgb([r, g, b])
            }
        });

        let mut img = image::ImageBuffer::<image::Rgb<u8>, _>::new(
            matrix.width() as u32,
            matrix.height() as u32,
        );
        img.pixels_mut()
            .zip(pixel_values)
            .for_each(|(pixel, value)| {
                *pixel = value;
            });

        Ok(img.into())
    }
}
