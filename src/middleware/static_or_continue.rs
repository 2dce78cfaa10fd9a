//! This module implements middleware to serve static files from the
//! configured directory, handing every request that does not match a file
//! over to the rest of the router.

use crate::handler::{Outcome, StaticFiles};
use crate::sink::ResponseSink;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::stream;
use http::{HeaderMap, StatusCode};
use std::io;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::spawn_blocking;
use tracing::{error, warn};

/// Body chunks that may be queued up before the file lookup waits for the
/// client to catch up.
const BODY_CHANNEL_CAPACITY: usize = 16;

/// Serves a static file for `request` or runs the `next` handler with the
/// unmodified request.
///
/// The file lookup does blocking I/O, so it runs on the blocking thread
/// pool. The response head is returned as soon as the file server commits a
/// status, and the body is streamed from there. The request body is never
/// touched by the lookup and is reattached before falling through.
///
/// ```no_run
/// use axum::Router;
/// use axum::middleware::from_fn_with_state;
/// use static_or_continue::middleware::static_or_continue;
/// use static_or_continue::{Options, StaticFiles};
/// use std::sync::Arc;
///
/// # fn main() -> anyhow::Result<()> {
/// let options = Options::builder().prefix("static").directory("public").build();
/// let static_files = Arc::new(StaticFiles::new(&options)?);
///
/// let app: Router = Router::new()
///     .fallback(async || "Not found")
///     .layer(from_fn_with_state(static_files, static_or_continue));
/// # Ok(())
/// # }
/// ```
pub async fn static_or_continue(
    State(static_files): State<Arc<StaticFiles>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let head = http::Request::from_parts(parts, ());
    let (mut sink, committed, chunks) = ChannelSink::new();

    let lookup = spawn_blocking(move || {
        let outcome = static_files.serve(&head, &mut sink);
        if let Err(error) = &outcome {
            sink.abort(error);
        }
        (head, outcome)
    });

    // Fails once the lookup is done without having committed a status.
    if let Ok((status, headers)) = committed.await {
        let mut response = Response::new(body_stream(chunks));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        return response;
    }

    let (head, outcome) = match lookup.await {
        Ok(result) => result,
        Err(error) => {
            error!(%error, "Static file lookup panicked");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match outcome {
        Ok(Outcome::Continue) => {
            let (parts, ()) = head.into_parts();
            next.run(Request::from_parts(parts, body)).await
        }
        Ok(Outcome::Served) => StatusCode::OK.into_response(),
        Err(error) => {
            warn!(path = %head.uri().path(), %error, "Failed to serve static file");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn body_stream(chunks: mpsc::Receiver<io::Result<Bytes>>) -> Body {
    Body::from_stream(stream::unfold(chunks, |mut chunks| async move {
        chunks.recv().await.map(|chunk| (chunk, chunks))
    }))
}

/// A [`ResponseSink`] that hands the committed head and every body chunk
/// over to the async side of the middleware.
///
/// Must be used from a blocking thread, writes wait while the body channel
/// is full.
struct ChannelSink {
    staged: HeaderMap,
    head: Option<oneshot::Sender<(StatusCode, HeaderMap)>>,
    body: mpsc::Sender<io::Result<Bytes>>,
}

impl ChannelSink {
    fn new() -> (
        Self,
        oneshot::Receiver<(StatusCode, HeaderMap)>,
        mpsc::Receiver<io::Result<Bytes>>,
    ) {
        let (head, committed) = oneshot::channel();
        let (body, chunks) = mpsc::channel(BODY_CHANNEL_CAPACITY);

        let sink = Self {
            staged: HeaderMap::new(),
            head: Some(head),
            body,
        };
        (sink, committed, chunks)
    }

    fn is_committed(&self) -> bool {
        self.head.is_none()
    }

    /// Ends the body with `error` so that the client does not mistake a
    /// truncated body for a complete one.
    fn abort(&mut self, error: &io::Error) {
        if self.is_committed() {
            let error = io::Error::new(error.kind(), error.to_string());
            // Nobody is listening if the client went away.
            let _ = self.body.blocking_send(Err(error));
        }
    }
}

impl ResponseSink for ChannelSink {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.staged
    }

    fn write_head(&mut self, status: StatusCode) {
        if let Some(head) = self.head.take() {
            let _ = head.send((status, std::mem::take(&mut self.staged)));
        }
    }
}

impl io::Write for ChannelSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_head(StatusCode::OK);
        if buf.is_empty() {
            return Ok(0);
        }

        let chunk = Bytes::copy_from_slice(buf);
        self.body
            .blocking_send(Ok(chunk))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response body was dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
