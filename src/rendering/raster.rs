/// Rasterizer for paint commands

use crate::rendering::font::{measure, scale_for_points};
use crate::rendering::paint::PaintCommand;
use crate::rendering::Canvas;
use crate::{Error, Result};
use ab_glyph::{point, Font, ScaleFont};
use image::Rgba;

/// Execute `commands` in order on a fresh `width x height` canvas.
pub fn rasterize<F: Font>(
    font: &F,
    width: u32,
    height: u32,
    commands: &[PaintCommand],
) -> Result<Canvas> {
    let mut canvas = Canvas::new(width, height);
    for cmd in commands {
        match cmd {
            PaintCommand::Fill { rgba } => {
                for px in canvas.pixels_mut() {
                    *px = *rgba;
                }
            }
            PaintCommand::CenteredText {
                cx,
                cy,
                points,
                text,
                rgba,
            } => draw_centered_text(&mut canvas, font, *cx, *cy, *points, text, *rgba)?,
        }
    }
    Ok(canvas)
}

fn draw_centered_text<F: Font>(
    canvas: &mut Canvas,
    font: &F,
    cx: f32,
    cy: f32,
    points: f32,
    text: &str,
    color: Rgba<u8>,
) -> Result<()> {
    if points <= 0.0 {
        return Err(Error::RenderError(format!("invalid point size {points}")));
    }
    let scale = scale_for_points(font, points)?;
    let scaled = font.as_scaled(scale);
    let extent = measure(font, text, points)?;

    let mut caret = cx - extent.width / 2.0;
    let baseline = cy - extent.height / 2.0 + scaled.ascent();

    let (width, height) = canvas.dimensions();
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = scaled.outline_glyph(glyph) else {
            continue; // whitespace
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + gx as i64;
            let y = bounds.min.y as i64 + gy as i64;
            if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                return;
            }
            let px = canvas.get_pixel_mut(x as u32, y as u32);
            *px = blend(*px, color, coverage);
        });
    }
    Ok(())
}

/// Composite `fg` over an opaque `bg` with the given coverage.
fn blend(bg: Rgba<u8>, fg: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let a = coverage.clamp(0.0, 1.0) * fg[3] as f32 / 255.0;
    let mix = |b: u8, f: u8| (b as f32 * (1.0 - a) + f as f32 * a).round() as u8;
    Rgba([mix(bg[0], fg[0]), mix(bg[1], fg[1]), mix(bg[2], fg[2]), 255])
}
