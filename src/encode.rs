//! Raster encoding

use crate::rendering::Canvas;
use crate::{Error, Format, Result};
use image::codecs::gif::GifEncoder;
use image::codecs::ico::IcoEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::io::Cursor;

/// JPEG quality used for every placeholder
pub const JPEG_QUALITY: u8 = 90;

/// Serialize `canvas` as `format`.
///
/// Output goes into an in-memory buffer, so a failure never leaves partial
/// bytes behind.
pub fn encode(canvas: Canvas, format: Format) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    let (width, height) = canvas.dimensions();

    match format {
        Format::Png => {
            PngEncoder::new(&mut buf)
                .write_image(canvas.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| Error::EncodeError(format!("PNG encode failed: {e}")))?;
        }
        Format::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| Error::EncodeError(format!("JPEG encode failed: {e}")))?;
        }
        Format::Gif => {
            let mut encoder = GifEncoder::new(&mut buf);
            encoder
                .encode(canvas.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| Error::EncodeError(format!("GIF encode failed: {e}")))?;
        }
    }

    Ok(buf.into_inner())
}

/// Serialize `canvas` as a single-image ICO file.
pub fn encode_favicon(canvas: &Canvas) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    let (width, height) = canvas.dimensions();
    IcoEncoder::new(&mut buf)
        .write_image(canvas.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| Error::EncodeError(format!("ICO encode failed: {e}")))?;
    Ok(buf.into_inner())
}
