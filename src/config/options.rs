use bon::Builder;
use static_or_continue_env_vars::{flag, var};

/// Configuration of a [`StaticFiles`](crate::StaticFiles) handler.
///
/// ```
/// use static_or_continue::Options;
///
/// let options = Options::builder()
///     .prefix("static")
///     .directory("public")
///     .index(true)
///     .build();
///
/// assert_eq!(options.prefix, "static");
/// assert!(!options.embedded);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Builder)]
pub struct Options {
    /// URL path prefix that is stripped before looking up files. Requests
    /// outside of the prefix are passed on untouched. Empty means every
    /// request is looked up.
    #[builder(default, into)]
    pub prefix: String,

    /// Directory to serve. For embedded filesystems this is a slash
    /// separated path inside the embedded tree.
    #[builder(default, into)]
    pub directory: String,

    /// Look files up in the embedded filesystem instead of on disk.
    #[builder(default)]
    pub embedded: bool,

    /// Serve `index.html` for requests that resolve to a directory.
    #[builder(default)]
    pub index: bool,
}

impl Options {
    /// Fills in [`directory`](Self::directory) from `fallback` if it was not
    /// configured explicitly.
    pub fn resolve_directory(mut self, fallback: Option<String>) -> Self {
        if self.directory.is_empty() {
            self.directory = fallback.unwrap_or_default();
        }
        self
    }

    /// Reads the options from the environment.
    ///
    /// - `STATIC_PREFIX`: URL path prefix, defaults to none.
    /// - `STATIC_DIRECTORY`: directory to serve.
    /// - `WEBROOT`: directory to serve if `STATIC_DIRECTORY` is not set.
    /// - `STATIC_EMBEDDED`: look files up in the embedded filesystem.
    /// - `STATIC_INDEX`: serve `index.html` for directories.
    pub fn from_environment() -> anyhow::Result<Self> {
        let options = Options::builder()
            .prefix(var("STATIC_PREFIX")?.unwrap_or_default())
            .directory(var("STATIC_DIRECTORY")?.unwrap_or_default())
            .embedded(flag("STATIC_EMBEDDED", false)?)
            .index(flag("STATIC_INDEX", false)?)
            .build();

        Ok(options.resolve_directory(var("WEBROOT")?))
    }
}
