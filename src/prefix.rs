/// Strips `prefix` from the request `path`.
///
/// Both values are treated as if they started with a `/`. If the path starts
/// with the prefix, the remainder is returned as an absolute path (`/` for an
/// exact match). Otherwise `None` is returned and the caller should keep
/// using the original path.
///
/// The comparison is a plain string prefix check, so `static` also matches
/// `/staticfiles/app.js` (yielding `/files/app.js`).
///
/// ```
/// use static_or_continue::trim_path_prefix;
///
/// assert_eq!(trim_path_prefix("static", "/static/app.js").as_deref(), Some("/app.js"));
/// assert_eq!(trim_path_prefix("/static", "static").as_deref(), Some("/"));
/// assert_eq!(trim_path_prefix("static", "/api/crates"), None);
/// ```
pub fn trim_path_prefix(prefix: &str, path: &str) -> Option<String> {
    let prefix = prefix.strip_prefix('/').unwrap_or(prefix);
    let path = path.strip_prefix('/').unwrap_or(path);

    let rest = path.strip_prefix(prefix)?;
    if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        Some(format!("/{rest}"))
    }
}
