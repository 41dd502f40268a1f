/// Paint command set for placeholder images

use image::Rgba;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Overwrite every pixel
    Fill { rgba: Rgba<u8> },
    /// A single line of text whose box is centered on `(cx, cy)`
    CenteredText {
        cx: f32,
        cy: f32,
        points: f32,
        text: String,
        rgba: Rgba<u8>,
    },
}

/// Build the command list for a placeholder: background, then the label.
pub fn placeholder_commands(
    width: u32,
    height: u32,
    text: &str,
    points: f32,
    background: Rgba<u8>,
    foreground: Rgba<u8>,
) -> Vec<PaintCommand> {
    vec![
        PaintCommand::Fill { rgba: background },
        PaintCommand::CenteredText {
            cx: width as f32 / 2.0,
            cy: height as f32 / 2.0,
            points,
            text: text.to_string(),
            rgba: foreground,
        },
    ]
}
