use crate::config::Options;
use crate::fs::{FileServer, Root, ServeFiles};
use crate::interceptor::ResponseInterceptor;
use crate::prefix::trim_path_prefix;
use crate::request::{clone_request, decode_path, encode_path, set_path};
use crate::sink::ResponseSink;
use crate::util::errors::ConfigError;
use http::{Method, Request, StatusCode};
use include_dir::Dir;
use std::sync::Arc;
use std::{fmt, io};
use tracing::debug;

/// What the pipeline should do after [`StaticFiles::serve`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The response was written, the pipeline stops here.
    Served,
    /// Nothing was written. The original request should be passed on to the
    /// next handler.
    Continue,
}

/// Serves static files and signals a fallback when nothing matched.
///
/// Only `GET` and `HEAD` requests below the configured prefix are looked
/// up, and the prefix is matched against the percent-decoded path.
/// `404 Not Found` and `403 Forbidden` answers from the file server are
/// discarded by a [`ResponseInterceptor`] and turned into
/// [`Outcome::Continue`], leaving the real response untouched.
#[derive(Clone)]
pub struct StaticFiles {
    prefix: String,
    server: Arc<dyn ServeFiles>,
}

impl StaticFiles {
    /// Builds a handler backed by the default [`FileServer`].
    ///
    /// Fails if embedded mode is enabled, since there is no embedded
    /// filesystem to look the directory up in. Use
    /// [`with_assets`](Self::with_assets) for that.
    pub fn new(options: &Options) -> Result<Self, ConfigError> {
        Self::build(options, None)
    }

    /// Like [`new`](Self::new), but resolves embedded mode lookups against
    /// `assets`.
    pub fn with_assets(
        options: &Options,
        assets: &'static Dir<'static>,
    ) -> Result<Self, ConfigError> {
        Self::build(options, Some(assets))
    }

    /// Builds a handler around a custom file server.
    pub fn with_file_server(prefix: impl Into<String>, server: impl ServeFiles + 'static) -> Self {
        Self {
            prefix: prefix.into(),
            server: Arc::new(server),
        }
    }

    fn build(options: &Options, assets: Option<&'static Dir<'static>>) -> Result<Self, ConfigError> {
        let root = Root::from_options(options, assets)?;
        let server = FileServer::new(root).with_index(options.index);
        Ok(Self::with_file_server(options.prefix.clone(), server))
    }

    /// Tries to answer `request` with a static file.
    ///
    /// On [`Outcome::Served`] the response has been written into `response`.
    /// On [`Outcome::Continue`] `response` was not touched and `request` was
    /// not modified. Errors writing into `response` are returned as is.
    pub fn serve(
        &self,
        request: &Request<()>,
        response: &mut dyn ResponseSink,
    ) -> io::Result<Outcome> {
        let method = request.method();
        if method != Method::GET && method != Method::HEAD {
            debug!(%method, "Skipping static files for non-GET request");
            return Ok(Outcome::Continue);
        }

        let rewritten;
        let request = if self.prefix.is_empty() {
            request
        } else {
            let Some(path) = decode_path(request.uri().path())
                .and_then(|path| trim_path_prefix(&self.prefix, &path))
            else {
                return Ok(Outcome::Continue);
            };

            let mut snapshot = clone_request(request);
            set_path(&mut snapshot, &encode_path(&path))
                .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
            rewritten = snapshot;
            &rewritten
        };

        let mut interceptor = ResponseInterceptor::new(response);
        self.server.serve(request, &mut interceptor)?;
        // A file server that returns without writing anything answers `200 OK`.
        interceptor.write_head(StatusCode::OK);

        if interceptor.is_blocked() {
            debug!(path = %request.uri().path(), "No static file found, continuing");
            Ok(Outcome::Continue)
        } else {
            debug!(path = %request.uri().path(), "Served static file");
            Ok(Outcome::Served)
        }
    }
}

impl fmt::Debug for StaticFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticFiles")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
