//! Favicon served at `/favicon.ico`
//!
//! The icon is rendered once at startup and its modification time is the
//! startup time, so conditional GETs can be answered with `304`.

use crate::encode::encode_favicon;
use crate::rendering::render;
use crate::Result;
use chrono::{DateTime, SubsecRound, Utc};

/// Side length of the generated icon
pub const FAVICON_SIZE: u32 = 32;

const FAVICON_LABEL: &str = "P";
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone)]
pub struct Favicon {
    bytes: Vec<u8>,
    modified: DateTime<Utc>,
}

impl Favicon {
    /// Render and encode the icon, stamping it with the current time.
    pub fn generate() -> Result<Self> {
        Self::generate_at(Utc::now())
    }

    pub fn generate_at(modified: DateTime<Utc>) -> Result<Self> {
        let canvas = render(FAVICON_SIZE, FAVICON_SIZE, FAVICON_LABEL)?;
        Ok(Self {
            bytes: encode_favicon(&canvas)?,
            // HTTP dates have second precision
            modified: modified.trunc_subsecs(0),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Value for the `Last-Modified` header
    pub fn last_modified(&self) -> String {
        self.modified.format(HTTP_DATE_FORMAT).to_string()
    }

    /// Whether a client holding a copy from `if_modified_since` is up to date.
    ///
    /// Unparseable dates are treated as absent.
    pub fn is_not_modified(&self, if_modified_since: Option<&str>) -> bool {
        if_modified_since
            .and_then(|value| DateTime::parse_from_rfc2822(value.trim()).ok())
            .map(|since| self.modified <= since.with_timezone(&Utc))
            .unwrap_or(false)
    }
}
