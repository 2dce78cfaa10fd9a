//! File lookup for the static file handler.
//!
//! [`ServeFiles`] is the seam between the handler and whatever resolves a
//! request path to content. [`FileServer`] is the implementation used by
//! default. Directories on disk are served by [`ServeDir`], which also takes
//! care of `Range` and conditional requests. Embedded filesystems are looked
//! up directly. Either way a miss is answered with `404 Not Found` or
//! `403 Forbidden`.

use crate::config::Options;
use crate::request::{clone_request, decode_path, set_path};
use crate::sink::ResponseSink;
use crate::util::errors::ConfigError;
use axum::body::Body;
use futures_util::StreamExt;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderValue, Method, Request, StatusCode};
use include_dir::{Dir, File};
use std::io;
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::warn;

const INDEX_FILE: &str = "index.html";

/// Writes the response for a file request into a [`ResponseSink`].
///
/// Implementations signal a miss by committing `404 Not Found` or
/// `403 Forbidden`. Closures with the matching signature implement the trait
/// too.
pub trait ServeFiles: Send + Sync {
    fn serve(&self, request: &Request<()>, response: &mut dyn ResponseSink) -> io::Result<()>;
}

impl<F> ServeFiles for F
where
    F: Fn(&Request<()>, &mut dyn ResponseSink) -> io::Result<()> + Send + Sync,
{
    fn serve(&self, request: &Request<()>, response: &mut dyn ResponseSink) -> io::Result<()> {
        (*self)(request, response)
    }
}

/// Where [`FileServer`] looks files up.
#[derive(Clone, Debug)]
pub enum Root {
    Disk(PathBuf),
    Embedded(&'static Dir<'static>),
}

impl Root {
    /// Resolves the configured directory.
    ///
    /// In embedded mode the directory is looked up in `assets`, split on `/`.
    /// Failing to find it is a configuration error, as is enabling embedded
    /// mode without passing an embedded filesystem. An empty directory means
    /// the current working directory (on disk) or the whole tree (embedded).
    pub fn from_options(
        options: &Options,
        assets: Option<&'static Dir<'static>>,
    ) -> Result<Self, ConfigError> {
        if !options.embedded {
            let directory = match options.directory.as_str() {
                "" => ".",
                directory => directory,
            };
            return Ok(Root::Disk(PathBuf::from(directory)));
        }

        let assets = assets.ok_or(ConfigError::MissingEmbeddedTree)?;

        let segments = options
            .directory
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>();

        if segments.is_empty() {
            return Ok(Root::Embedded(assets));
        }

        assets
            .get_dir(assets.path().join(segments.join("/")))
            .map(Root::Embedded)
            .ok_or_else(|| ConfigError::EmbeddedDirNotFound(options.directory.clone()))
    }
}

#[derive(Clone, Debug)]
enum Backend {
    Disk(ServeDir),
    Embedded(&'static Dir<'static>),
}

/// The default [`ServeFiles`] implementation.
///
/// Paths ending in `/` only ever resolve to a directory index, so a file
/// requested with a trailing slash is a miss. Directories are served through
/// their `index.html` when [`with_index`](Self::with_index) is enabled and
/// are a miss otherwise.
///
/// Disk lookups drive [`ServeDir`] on the current Tokio runtime, so
/// [`serve`](ServeFiles::serve) has to be called from a blocking thread of
/// that runtime, e.g. inside [`tokio::task::spawn_blocking`].
#[derive(Clone, Debug)]
pub struct FileServer {
    backend: Backend,
    index: bool,
}

impl FileServer {
    pub fn new(root: Root) -> Self {
        let backend = match root {
            Root::Disk(path) => Backend::Disk(ServeDir::new(path)),
            Root::Embedded(dir) => Backend::Embedded(dir),
        };

        Self {
            backend,
            index: false,
        }
    }

    /// Serve `index.html` for directories instead of treating them as a
    /// miss.
    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self.backend = match self.backend {
            Backend::Disk(dir) => Backend::Disk(dir.append_index_html_on_directories(index)),
            backend => backend,
        };
        self
    }

    fn serve_disk(
        &self,
        dir: &ServeDir,
        request: &Request<()>,
        response: &mut dyn ResponseSink,
    ) -> io::Result<()> {
        let runtime = Handle::try_current().map_err(io::Error::other)?;

        let mut request = clone_request(request);
        if request.uri().path().ends_with('/') {
            if !self.index {
                return send_error(response, StatusCode::NOT_FOUND);
            }
            let path = format!("{}{INDEX_FILE}", request.uri().path());
            set_path(&mut request, &path).map_err(invalid_path)?;
        }

        let call = |request: Request<()>| runtime.block_on(dir.clone().oneshot(request));
        let mut file = call(clone_request(&request)).unwrap_or_else(|never| match never {});

        // `ServeDir` redirects directory requests to the path with a trailing
        // slash. The index is served right away instead.
        if file.status().is_redirection() {
            let path = format!("{}/{INDEX_FILE}", request.uri().path());
            set_path(&mut request, &path).map_err(invalid_path)?;
            file = call(request).unwrap_or_else(|never| match never {});
        }

        let (parts, body) = file.into_parts();
        if parts.status.is_server_error() {
            warn!(status = %parts.status, "Failed to open static file");
        }

        response.headers_mut().extend(parts.headers);
        response.write_head(parts.status);

        let mut body = Body::new(body).into_data_stream();
        while let Some(chunk) = runtime.block_on(body.next()) {
            response.write_all(&chunk.map_err(io::Error::other)?)?;
        }
        Ok(())
    }

    fn serve_embedded(
        &self,
        root: &'static Dir<'static>,
        request: &Request<()>,
        response: &mut dyn ResponseSink,
    ) -> io::Result<()> {
        let Some(segments) = request_segments(request.uri().path()) else {
            return send_error(response, StatusCode::NOT_FOUND);
        };

        let path = root.path().join(segments.join("/"));
        let trailing_slash = request.uri().path().ends_with('/');

        let file = match embedded_entry(root, &segments, &path) {
            EmbeddedEntry::File(_) if trailing_slash => {
                return send_error(response, StatusCode::NOT_FOUND);
            }
            EmbeddedEntry::File(file) => file,
            EmbeddedEntry::Dir(_) if !self.index => {
                return send_error(response, StatusCode::FORBIDDEN);
            }
            EmbeddedEntry::Dir(dir) => match dir.get_file(dir.path().join(INDEX_FILE)) {
                Some(file) => file,
                None => return send_error(response, StatusCode::NOT_FOUND),
            },
            EmbeddedEntry::Missing => return send_error(response, StatusCode::NOT_FOUND),
        };

        let contents = file.contents();
        send_head(response, file.path(), contents.len() as u64);
        if request.method() != Method::HEAD {
            response.write_all(contents)?;
        }
        Ok(())
    }
}

impl ServeFiles for FileServer {
    fn serve(&self, request: &Request<()>, response: &mut dyn ResponseSink) -> io::Result<()> {
        match &self.backend {
            Backend::Disk(dir) => self.serve_disk(dir, request, response),
            Backend::Embedded(root) => self.serve_embedded(root, request, response),
        }
    }
}

fn invalid_path(error: http::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}

enum EmbeddedEntry {
    File(&'static File<'static>),
    Dir(&'static Dir<'static>),
    Missing,
}

fn embedded_entry(root: &'static Dir<'static>, segments: &[String], path: &Path) -> EmbeddedEntry {
    if segments.is_empty() {
        return EmbeddedEntry::Dir(root);
    }
    if let Some(file) = root.get_file(path) {
        return EmbeddedEntry::File(file);
    }
    match root.get_dir(path) {
        Some(dir) => EmbeddedEntry::Dir(dir),
        None => EmbeddedEntry::Missing,
    }
}

/// Percent-decodes the request path and splits it into segments, resolving
/// `.` and `..` without ever leaving the root.
fn request_segments(path: &str) -> Option<Vec<String>> {
    let decoded = decode_path(path)?;
    if decoded.contains('\0') {
        return None;
    }

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment.to_string()),
        }
    }
    Some(segments)
}

fn send_head(response: &mut dyn ResponseSink, path: &Path, len: u64) {
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(CONTENT_TYPE, value);
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(len));

    response.write_head(StatusCode::OK);
}

fn send_error(response: &mut dyn ResponseSink, status: StatusCode) -> io::Result<()> {
    let headers = response.headers_mut();
    let v = HeaderValue::from_static;
    headers.insert(CONTENT_TYPE, v("text/plain; charset=utf-8"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, v("nosniff"));

    response.write_head(status);
    write!(response, "{status}")
}
