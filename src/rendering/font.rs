//! Embedded font and text measurement
//!
//! Point sizes are interpreted at 72 DPI, so one point is one pixel per em.

use crate::{Error, Result};
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};

/// DejaVu Sans, compiled into the binary
pub static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Parse a fresh font face from the embedded bytes.
///
/// Faces are cheap views over `FONT_BYTES`; every request gets its own.
pub fn load_font() -> Result<FontRef<'static>> {
    load_font_from(FONT_BYTES)
}

pub(crate) fn load_font_from(bytes: &'static [u8]) -> Result<FontRef<'static>> {
    FontRef::try_from_slice(bytes).map_err(|e| Error::FontLoadFailure(e.to_string()))
}

/// Convert a point size to the pixel scale ab_glyph expects.
///
/// `PxScale` is relative to the font's `ascent - descent` rather than its em,
/// so the em size has to be rescaled by the font's own height.
pub fn scale_for_points<F: Font>(font: &F, points: f32) -> Result<PxScale> {
    let units_per_em = font
        .units_per_em()
        .ok_or_else(|| Error::FontLoadFailure("font has no units-per-em".to_string()))?;
    Ok(PxScale::from(points * font.height_unscaled() / units_per_em))
}

/// Rendered extent of a single line of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    /// Sum of advances and kerning
    pub width: f32,
    /// Line height (`ascent - descent`)
    pub height: f32,
}

/// Measure `text` at the given point size.
pub fn measure<F: Font>(font: &F, text: &str, points: f32) -> Result<TextExtent> {
    let scaled = font.as_scaled(scale_for_points(font, points)?);

    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }

    Ok(TextExtent {
        width,
        height: scaled.height(),
    })
}
