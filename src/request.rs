use http::{Request, Uri};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;

/// Characters that have to be escaped when a decoded path is put back into
/// a URI. `/` stays as is.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Copies the head of `request` into a new, independently owned request.
///
/// Method, URI, version, headers and extensions are cloned; the body is
/// left behind since file servers never read it. Changing the copy (for
/// example through [`set_path`]) never affects `request`, which can still be
/// handed to the next handler untouched.
pub fn clone_request<B>(request: &Request<B>) -> Request<()> {
    let mut clone = Request::new(());
    *clone.method_mut() = request.method().clone();
    *clone.uri_mut() = request.uri().clone();
    *clone.version_mut() = request.version();
    *clone.headers_mut() = request.headers().clone();
    *clone.extensions_mut() = request.extensions().clone();
    clone
}

/// Replaces the path of the request URI, keeping scheme, authority and
/// query string.
pub fn set_path<B>(request: &mut Request<B>, path: &str) -> Result<(), http::Error> {
    let path_and_query = match request.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse()?);
    *request.uri_mut() = Uri::from_parts(parts)?;
    Ok(())
}

/// Percent-decodes a URI path. Returns `None` if the decoded bytes are not
/// valid UTF-8.
pub(crate) fn decode_path(path: &str) -> Option<Cow<'_, str>> {
    percent_decode_str(path).decode_utf8().ok()
}

/// Percent-encodes a decoded path so that it can be passed to [`set_path`].
pub(crate) fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}
