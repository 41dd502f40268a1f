//! HTTP front end
//!
//! Routing and status mapping live in [`RequestHandler`], which works on plain
//! strings and is independent of the transport. [`PlaceholderServer`] feeds it
//! from a `tiny_http` listener on a fixed pool of worker threads.

use crate::favicon::Favicon;
use crate::request::parse_with;
use crate::{generate, Error, ParseOptions, Result, ServerConfig};
use chrono::Local;
use log::{error, info, warn, Level};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Response, Server};

/// Path of the favicon route
pub const FAVICON_PATH: &str = "/favicon.ico";

/// A transport-independent HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub last_modified: Option<String>,
    pub body: Vec<u8>,
}

impl Reply {
    fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            last_modified: None,
            body: Vec::new(),
        }
    }
}

/// Maps request targets to replies
#[derive(Debug, Clone)]
pub struct RequestHandler {
    favicon: Arc<Favicon>,
    options: ParseOptions,
}

impl RequestHandler {
    pub fn new(favicon: Arc<Favicon>, options: ParseOptions) -> Self {
        Self { favicon, options }
    }

    /// Handle one request target (path plus optional query).
    ///
    /// Parse failures become `404` and pipeline failures `500`, both without a
    /// body. Exactly one log line is written per call.
    pub fn handle(&self, target: &str, if_modified_since: Option<&str>) -> Reply {
        let path = match decode_path(target) {
            Ok(path) => path,
            Err(err) => {
                warn!("404 - {target} - {err}");
                return Reply::empty(404);
            }
        };

        if path == FAVICON_PATH {
            return self.favicon_reply(&path, if_modified_since);
        }

        let descriptor = match parse_with(&path, &self.options, Local::now().fixed_offset()) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                warn!("404 - {path} - {err}");
                return Reply::empty(404);
            }
        };

        match generate(&descriptor) {
            Ok(image) => {
                info!("200 - {path} (size {})", image.bytes.len());
                Reply {
                    status: 200,
                    content_type: Some(image.content_type()),
                    last_modified: None,
                    body: image.bytes,
                }
            }
            Err(err) => {
                let (status, level) = failure_status(&err);
                log::log!(level, "{status} - {path} - {err}");
                Reply::empty(status)
            }
        }
    }

    fn favicon_reply(&self, path: &str, if_modified_since: Option<&str>) -> Reply {
        let last_modified = Some(self.favicon.last_modified());
        if self.favicon.is_not_modified(if_modified_since) {
            info!("304 - {path}");
            return Reply {
                last_modified,
                ..Reply::empty(304)
            };
        }
        info!("200 - {path} (size {})", self.favicon.bytes().len());
        Reply {
            status: 200,
            content_type: Some("image/x-icon"),
            last_modified,
            body: self.favicon.bytes().to_vec(),
        }
    }
}

/// Status code and log level for a failed request: client errors are `404`
/// at `warn`, everything else `500` at `error`.
fn failure_status(err: &Error) -> (u16, Level) {
    if err.is_client_error() {
        (404, Level::Warn)
    } else {
        (500, Level::Error)
    }
}

/// Strip the query and percent-decode the path of a request target.
///
/// The path is otherwise left as sent: no dot-segment removal and no
/// backslash rewriting, so labels reach the parser verbatim.
pub fn decode_path(target: &str) -> Result<String> {
    if !target.starts_with('/') {
        return Err(Error::MalformedRequest(format!("{target}: not an origin-form target")));
    }
    let raw = target.split_once('?').map_or(target, |(path, _)| path);
    percent_decode_str(raw)
        .decode_utf8()
        .map(|path| path.into_owned())
        .map_err(|e| Error::MalformedRequest(format!("{target}: {e}")))
}

/// The placeholder HTTP server
pub struct PlaceholderServer {
    server: Arc<Server>,
    handler: RequestHandler,
    workers: usize,
    stopping: Arc<AtomicBool>,
}

/// Stops a running [`PlaceholderServer`] from another thread
#[derive(Clone)]
pub struct StopHandle {
    server: Arc<Server>,
    workers: usize,
    stopping: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        // each unblock releases one waiting worker
        for _ in 0..self.workers {
            self.server.unblock();
        }
    }
}

impl PlaceholderServer {
    /// Validate `config`, render the favicon and bind the listener.
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        config.validate()?;
        let favicon = Arc::new(Favicon::generate()?);
        let address = config.bind_address();
        let server = Server::http(address.as_str())
            .map_err(|e| Error::ServerError(format!("failed to bind {address}: {e}")))?;

        Ok(Self {
            server: Arc::new(server),
            handler: RequestHandler::new(favicon, config.parse_options()),
            workers: config.workers,
            stopping: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            server: Arc::clone(&self.server),
            workers: self.workers,
            stopping: Arc::clone(&self.stopping),
        }
    }

    /// Serve requests until stopped. Blocks the calling thread.
    pub fn run(self) -> Result<()> {
        info!(
            "listening on http://{} with {} workers",
            self.server.server_addr(),
            self.workers
        );

        let mut handles = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            let server = Arc::clone(&self.server);
            let handler = self.handler.clone();
            let stopping = Arc::clone(&self.stopping);
            let handle = thread::Builder::new()
                .name(format!("placeholdr-worker-{id}"))
                .spawn(move || worker_loop(&server, &handler, &stopping))
                .map_err(|e| Error::ServerError(format!("failed to spawn worker: {e}")))?;
            handles.push(handle);
        }

        for handle in handles {
            if handle.join().is_err() {
                error!("worker thread panicked");
            }
        }
        info!("server stopped");
        Ok(())
    }
}

fn worker_loop(server: &Server, handler: &RequestHandler, stopping: &AtomicBool) {
    loop {
        match server.recv() {
            Ok(request) => respond(request, handler),
            Err(_) if stopping.load(Ordering::SeqCst) => break,
            Err(e) => warn!("failed to accept request: {e}"),
        }
    }
}

fn respond(request: tiny_http::Request, handler: &RequestHandler) {
    let if_modified_since = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("If-Modified-Since"))
        .map(|h| h.value.as_str().to_string());

    let reply = handler.handle(request.url(), if_modified_since.as_deref());

    // the body is fully buffered, so always send Content-Length instead of chunking
    let mut response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_chunked_threshold(usize::MAX);
    if let Some(content_type) = reply.content_type {
        add_header(&mut response, "Content-Type", content_type);
    }
    if let Some(last_modified) = reply.last_modified.as_deref() {
        add_header(&mut response, "Last-Modified", last_modified);
    }

    if let Err(e) = request.respond(response) {
        warn!("failed to write response: {e}");
    }
}

fn add_header<R: std::io::Read>(response: &mut Response<R>, name: &str, value: &str) {
    match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
        Ok(header) => response.add_header(header),
        Err(()) => warn!("dropping invalid header {name}: {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn handler() -> RequestHandler {
        let favicon = Favicon::generate_at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()).unwrap();
        RequestHandler::new(Arc::new(favicon), ParseOptions::default())
    }

    #[test]
    fn image_route_returns_png() {
        let reply = handler().handle("/300x150.png", None);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, Some("image/png"));
        let img = image::load_from_memory(&reply.body).unwrap();
        assert_eq!((img.width(), img.height()), (300, 150));
    }

    #[test]
    fn bad_path_is_404_without_body() {
        let reply = handler().handle("/bad", None);
        assert_eq!(reply, Reply::empty(404));
    }

    #[test]
    fn zero_dimension_is_404() {
        assert_eq!(handler().handle("/0x10.png", None).status, 404);
    }

    #[test]
    fn unfittable_label_is_500() {
        let reply = handler().handle("/a very long label that cannot fit/1x1.png", None);
        assert_eq!(reply, Reply::empty(500));
    }

    #[test]
    fn query_is_ignored_and_path_is_decoded() {
        assert_eq!(decode_path("/hello%20world/10x10.png?x=1").unwrap(), "/hello world/10x10.png");
        assert_eq!(decode_path("/10x10.png").unwrap(), "/10x10.png");
        assert!(decode_path("/%FF/10x10.png").is_err());
        assert!(decode_path("*").is_err());
    }

    #[test]
    fn failures_log_at_matching_level() {
        let not_found = failure_status(&Error::InvalidDimension("0".into()));
        assert_eq!(not_found, (404, Level::Warn));
        let not_found = failure_status(&Error::MalformedRequest("/bad".into()));
        assert_eq!(not_found, (404, Level::Warn));
        let broken = failure_status(&Error::EncodeError("gif".into()));
        assert_eq!(broken, (500, Level::Error));
    }

    #[test]
    fn path_is_not_normalized() {
        assert_eq!(decode_path("/a\\b/40x40.png").unwrap(), "/a\\b/40x40.png");
        assert_eq!(decode_path("/%2e%2e/40x40.png").unwrap(), "/../40x40.png");
        assert_eq!(decode_path("/./x/../40x40.png").unwrap(), "/./x/../40x40.png");
    }

    #[test]
    fn backslash_label_is_rendered_verbatim() {
        let path = decode_path("/a\\b/40x40.png").unwrap();
        let req = parse_with(&path, &ParseOptions::default(), Local::now().fixed_offset()).unwrap();
        assert_eq!(req.text, "a\\b");
        assert_eq!(handler().handle("/a\\b/40x40.png", None).status, 200);
    }

    #[test]
    fn encoded_newline_label_is_404() {
        assert_eq!(handler().handle("/a%0Ab/10x10.png", None), Reply::empty(404));
    }

    #[test]
    fn favicon_route() {
        let h = handler();
        let reply = h.handle(FAVICON_PATH, None);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, Some("image/x-icon"));
        assert_eq!(reply.last_modified.as_deref(), Some("Tue, 02 Jan 2024 03:04:05 GMT"));

        let cached = h.handle(FAVICON_PATH, Some("Tue, 02 Jan 2024 03:04:05 GMT"));
        assert_eq!(cached.status, 304);
        assert!(cached.body.is_empty());
    }
}
