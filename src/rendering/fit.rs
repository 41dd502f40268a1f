//! Font size fitting

use crate::rendering::font::measure;
use crate::{Error, Result};
use ab_glyph::Font;

/// Reference size used for the measurement pass
pub const BASE_POINT_SIZE: f32 = 72.0;

/// Fraction of the canvas the label may occupy on each axis
pub const FILL_RATIO: f32 = 0.8;

/// Compute the largest integral point size at which `text` fits inside
/// `FILL_RATIO` of a `width x height` canvas.
///
/// Glyph metrics are linear in the point size, so one measurement at
/// `base_size` is enough to solve for both axes directly.
pub fn fit<F: Font>(font: &F, width: u32, height: u32, text: &str, base_size: f32) -> Result<f32> {
    let extent = measure(font, text, base_size)?;
    if extent.width <= 0.0 || extent.height <= 0.0 {
        return Err(Error::RenderError(format!(
            "cannot fit {text:?}: measured {}x{} at {base_size}pt",
            extent.width, extent.height
        )));
    }

    let by_width = FILL_RATIO * base_size * width as f32 / extent.width;
    let by_height = FILL_RATIO * base_size * height as f32 / extent.height;
    let points = by_width.min(by_height).floor();

    if points <= 0.0 {
        return Err(Error::RenderError(format!(
            "{width}x{height} canvas is too small for {text:?}"
        )));
    }
    Ok(points)
}
