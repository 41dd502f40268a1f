//! Request descriptor parsing
//!
//! A request path has the shape `[/<label>]/<width>x<height>.<ext>`. The
//! scanner below works from the right: the final path segment carries the
//! dimensions and extension, everything before it is the optional label.

use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, Local};

/// Largest width or height accepted by default
pub const DEFAULT_MAX_DIMENSION: u32 = 10_000;

/// Label that is replaced by the current Unix time in milliseconds
pub const TIMESTAMP_LABEL: &str = "timestamp";

/// Label that is replaced by the current local date and time
pub const DATETIME_LABEL: &str = "datetime";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

/// Output raster format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Png,
    Jpeg,
    Gif,
}

impl Format {
    /// Map a path extension to a format. Matching is case-sensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// MIME type sent as `Content-Type`
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }
}

/// A validated placeholder request
///
/// Time labels are already resolved, so a descriptor always renders the same
/// image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub width: u32,
    pub height: u32,
    pub text: String,
    pub format: Format,
}

/// Limits applied while parsing
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Largest accepted width or height
    pub max_dimension: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

/// Parse a request path using the current time and default limits.
///
/// ```
/// use placeholdr::{parse, Format};
///
/// let req = parse("/hello/100x50.jpg").unwrap();
/// assert_eq!(req.text, "hello");
/// assert_eq!(req.format, Format::Jpeg);
/// ```
pub fn parse(path: &str) -> Result<RequestDescriptor> {
    parse_with(path, &ParseOptions::default(), Local::now().fixed_offset())
}

/// Parse a request path resolving time labels against `now`.
pub fn parse_at(path: &str, now: DateTime<FixedOffset>) -> Result<RequestDescriptor> {
    parse_with(path, &ParseOptions::default(), now)
}

/// Parse a request path with explicit limits and clock.
pub fn parse_with(
    path: &str,
    options: &ParseOptions,
    now: DateTime<FixedOffset>,
) -> Result<RequestDescriptor> {
    let (label, token) = split_label(path)?;
    let (width, height, format) = scan_token(token)?;

    check_dimension("width", width, options.max_dimension)?;
    check_dimension("height", height, options.max_dimension)?;

    let text = resolve_label(label, width, height, now);

    Ok(RequestDescriptor {
        width,
        height,
        text,
        format,
    })
}

/// Split `path` into the optional label and the final `<w>x<h>.<ext>` token.
fn split_label(path: &str) -> Result<(Option<&str>, &str)> {
    let slash = path
        .rfind('/')
        .ok_or_else(|| Error::MalformedRequest(format!("{path}: missing '/'")))?;
    let (head, token) = (&path[..slash], &path[slash + 1..]);

    if head.is_empty() {
        return Ok((None, token));
    }
    match head.strip_prefix('/') {
        Some(label) if label.contains('\n') => Err(Error::MalformedRequest(format!(
            "{path:?}: label must not contain a line break"
        ))),
        Some(label) => Ok((Some(label), token)),
        None => Err(Error::MalformedRequest(format!(
            "{path}: label must start with '/'"
        ))),
    }
}

/// Scan `<digits>x<digits>.<ext>`.
fn scan_token(token: &str) -> Result<(u32, u32, Format)> {
    let malformed = || {
        Error::MalformedRequest(format!(
            "{token}: expected <width>x<height>.<png|jpg|jpeg|gif>"
        ))
    };

    let (width, rest) = token.split_once('x').ok_or_else(malformed)?;
    let (height, ext) = rest.split_once('.').ok_or_else(malformed)?;

    if !is_digits(width) || !is_digits(height) {
        return Err(malformed());
    }
    let format = Format::from_extension(ext).ok_or_else(malformed)?;

    Ok((parse_dimension("width", width)?, parse_dimension("height", height)?, format))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_dimension(name: &str, digits: &str) -> Result<u32> {
    digits
        .parse::<u32>()
        .map_err(|e| Error::InvalidDimension(format!("{name} {digits}: {e}")))
}

fn check_dimension(name: &str, value: u32, max: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidDimension(format!("{name} must be positive")));
    }
    if value > max {
        return Err(Error::InvalidDimension(format!(
            "{name} {value} exceeds maximum {max}"
        )));
    }
    Ok(())
}

fn resolve_label(
    label: Option<&str>,
    width: u32,
    height: u32,
    now: DateTime<FixedOffset>,
) -> String {
    match label {
        None | Some("") => format!("{width}x{height}"),
        Some(TIMESTAMP_LABEL) => now.timestamp_millis().to_string(),
        Some(DATETIME_LABEL) => now.format(DATETIME_FORMAT).to_string(),
        Some(text) => text.to_string(),
    }
}
