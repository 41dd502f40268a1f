//! Placeholder rendering
//!
//! `render` composes the pieces: fit the label, build the paint commands and
//! rasterize them onto a fresh canvas.

pub mod fit;
pub mod font;
pub mod paint;
pub mod raster;

use crate::Result;
use ab_glyph::Font;
use image::{Rgba, RgbaImage};

/// Pixel buffer handed from the renderer to the encoder
pub type Canvas = RgbaImage;

/// Mid-gray background shared by every placeholder
pub const BACKGROUND: Rgba<u8> = Rgba([127, 127, 127, 255]);

/// Label color
pub const FOREGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Render a `width x height` placeholder with `text` centered on it.
pub fn render(width: u32, height: u32, text: &str) -> Result<Canvas> {
    let font = font::load_font()?;
    render_with_font(&font, width, height, text)
}

pub fn render_with_font<F: Font>(font: &F, width: u32, height: u32, text: &str) -> Result<Canvas> {
    let points = fit::fit(font, width, height, text, fit::BASE_POINT_SIZE)?;
    log::debug!("fitted {text:?} into {width}x{height} at {points}pt");
    let commands = paint::placeholder_commands(width, height, text, points, BACKGROUND, FOREGROUND);
    raster::rasterize(font, width, height, &commands)
}
