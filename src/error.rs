//! Error types for the placeholder pipeline and server

use thiserror::Error;

/// Result type alias for placeholder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, rendering, encoding or serving
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request path does not match `[/<label>]/<width>x<height>.<ext>`
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Width or height is zero, overflows, or exceeds the configured cap
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// The embedded font could not be parsed
    #[error("Font load failed: {0}")]
    FontLoadFailure(String),

    /// Fitting or drawing the label failed
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// The canvas could not be serialized
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The HTTP listener could not be started
    #[error("Server error: {0}")]
    ServerError(String),
}

impl Error {
    /// Whether the error was caused by the request itself rather than the server.
    ///
    /// Client errors map to `404 Not Found`, everything else to
    /// `500 Internal Server Error`.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MalformedRequest(_) | Error::InvalidDimension(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_client_errors() {
        assert!(Error::MalformedRequest("x".into()).is_client_error());
        assert!(Error::InvalidDimension("x".into()).is_client_error());
    }

    #[test]
    fn pipeline_errors_are_server_errors() {
        assert!(!Error::FontLoadFailure("x".into()).is_client_error());
        assert!(!Error::RenderError("x".into()).is_client_error());
        assert!(!Error::EncodeError("x".into()).is_client_error());
    }

    #[test]
    fn display_includes_cause() {
        let err = Error::EncodeError("gif too large".into());
        assert_eq!(err.to_string(), "Encoding failed: gif too large");
    }
}
