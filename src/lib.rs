//! placeholdr
//!
//! An HTTP service that renders placeholder images on demand. A request path
//! such as `/hello/300x150.png` produces a 300x150 gray PNG with "hello"
//! centered on it, sized to fill most of the canvas.
//!
//! # Pipeline
//!
//! - [`parse`] turns a path into a [`RequestDescriptor`]
//! - [`generate`] renders the descriptor and encodes it
//! - [`server::PlaceholderServer`] exposes both over HTTP
//!
//! # Example
//!
//! ```
//! let req = placeholdr::parse("/300x150.png")?;
//! let image = placeholdr::generate(&req)?;
//! assert_eq!(image.content_type(), "image/png");
//! # Ok::<(), placeholdr::Error>(())
//! ```

pub mod encode;
pub mod error;
pub mod favicon;
pub mod rendering;
pub mod request;
pub mod server;

pub use error::{Error, Result};
pub use request::{parse, parse_at, parse_with, Format, ParseOptions, RequestDescriptor};
pub use server::PlaceholderServer;

/// Configuration for the HTTP server
///
/// The defaults listen on all interfaces on port 8080 with one worker thread
/// per CPU.
///
/// # Examples
///
/// ```
/// let cfg = placeholdr::ServerConfig::default();
/// assert_eq!(cfg.port, 8080);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port (0 picks an ephemeral port)
    pub port: u16,
    /// Number of request worker threads
    pub workers: usize,
    /// Largest accepted width or height
    pub max_dimension: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            max_dimension: request::DEFAULT_MAX_DIMENSION,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::ConfigError("workers must be at least 1".to_string()));
        }
        if self.max_dimension == 0 {
            return Err(Error::ConfigError("max_dimension must be at least 1".to_string()));
        }
        Ok(())
    }

    /// `host:port` string handed to the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_dimension: self.max_dimension,
        }
    }
}

/// An encoded placeholder ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub format: Format,
}

impl GeneratedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Render and encode a placeholder.
pub fn generate(descriptor: &RequestDescriptor) -> Result<GeneratedImage> {
    let canvas = rendering::render(descriptor.width, descriptor.height, &descriptor.text)?;
    let bytes = encode::encode(canvas, descriptor.format)?;
    Ok(GeneratedImage {
        bytes,
        format: descriptor.format,
    })
}
