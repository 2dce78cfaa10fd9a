/// A static file handler could not be constructed.
///
/// These errors only happen while setting up the middleware and are never
/// produced while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configured directory does not exist in the embedded filesystem.
    #[error("Directory {0:?} not found in the embedded filesystem")]
    EmbeddedDirNotFound(String),

    /// Embedded mode was requested, but no embedded filesystem was supplied.
    #[error("Embedded mode is enabled, but no embedded filesystem was supplied")]
    MissingEmbeddedTree,
}
