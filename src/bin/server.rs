use anyhow::Context;
use axum::Router;
use axum::extract::Request;
use axum::middleware::from_fn_with_state;
use http::StatusCode;
use static_or_continue::middleware::static_or_continue;
use static_or_continue::{StaticFiles, config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    static_or_continue::util::tracing::init();

    let config = config::Server::from_environment()?;
    let options = &config.static_files;

    // Embedded mode needs an embedded tree, which this binary doesn't ship.
    let static_files = StaticFiles::new(options).context("Failed to set up static files")?;

    let app = Router::new()
        .fallback(not_found)
        .layer(from_fn_with_state(Arc::new(static_files), static_or_continue));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(
        directory = %options.directory,
        prefix = %options.prefix,
        index = options.index,
        "Serving static files on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has gracefully shutdown!");
    Ok(())
}

async fn not_found(request: Request) -> (StatusCode, &'static str) {
    debug!(path = %request.uri().path(), "No static file matched");
    (StatusCode::NOT_FOUND, "Not Found")
}

async fn shutdown_signal() {
    if let Err(error) = ctrl_c().await {
        error!(%error, "Failed to listen for the shutdown signal");
    }
}
