use crate::StaticFiles;
use crate::middleware::static_or_continue;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use http::response::Parts;
use http::{Method, Request, Uri};
use include_dir::{Dir, include_dir};
use std::sync::Arc;
use tower::ServiceExt;

pub static TESTDATA: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/testdata");

pub const TESTDATA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata");

/// Contents of a file in the `testdata` directory.
pub fn testdata(path: &str) -> &'static [u8] {
    TESTDATA
        .get_file(path)
        .unwrap_or_else(|| panic!("missing testdata file {path}"))
        .contents()
}

/// Builds a router with the static file middleware in front of a fallback
/// that answers with `NOT FOUND` followed by the request path, and an
/// `/static/echo` route that returns the request body.
pub fn build_app(static_files: StaticFiles) -> Router {
    async fn not_found(uri: Uri) -> String {
        format!("NOT FOUND{}", uri.path())
    }

    async fn echo(body: String) -> String {
        body
    }

    Router::new()
        .route("/static/echo", post(echo))
        .fallback(not_found)
        .layer(from_fn_with_state(Arc::new(static_files), static_or_continue))
}

pub async fn request(app: Router, method: Method, path: &str) -> anyhow::Result<(Parts, Bytes)> {
    request_with_body(app, method, path, Body::empty()).await
}

pub async fn request_with_body(
    app: Router,
    method: Method,
    path: &str,
    body: impl Into<Body>,
) -> anyhow::Result<(Parts, Bytes)> {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(body.into())?;
    let response = app.oneshot(request).await?;
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await?;
    Ok((parts, bytes))
}
