//! Static file serving for [axum] that gets out of the way.
//!
//! [`StaticFiles`] looks up `GET` and `HEAD` requests below a URL prefix in a
//! directory on disk or in an embedded filesystem. If the file server
//! answers with `404 Not Found` or `403 Forbidden`, that answer is dropped
//! and the original request continues down the pipeline, so static assets
//! and regular routes can share the same URL space.
//!
//! The [`middleware::static_or_continue`] function plugs the handler into an
//! axum router.

pub mod config;
pub mod fs;
mod handler;
mod interceptor;
pub mod middleware;
mod prefix;
mod request;
mod sink;
pub mod util;

#[cfg(test)]
mod tests;

pub use self::config::Options;
pub use self::handler::{Outcome, StaticFiles};
pub use self::interceptor::ResponseInterceptor;
pub use self::prefix::trim_path_prefix;
pub use self::request::{clone_request, set_path};
pub use self::sink::{ResponseBuffer, ResponseSink};
pub use self::util::errors::ConfigError;
