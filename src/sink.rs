use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode};
use std::io;

/// Something an HTTP response can be written into.
///
/// Headers are staged through [`headers_mut`](Self::headers_mut) and
/// committed together with the status code by
/// [`write_head`](Self::write_head). Body bytes go through the [`io::Write`]
/// implementation; the first write commits an implicit `200 OK` if no status
/// was committed yet.
///
/// The trait is object safe so that file servers can be handed a
/// `&mut dyn ResponseSink` without caring whether they write into the real
/// response or into a [`ResponseInterceptor`](crate::ResponseInterceptor).
pub trait ResponseSink: io::Write {
    /// The header map staged for the next [`write_head`](Self::write_head).
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commits the status code and the staged headers. Only the first call
    /// has any effect.
    fn write_head(&mut self, status: StatusCode);
}

/// An in-memory [`ResponseSink`] that collects a complete response.
///
/// Header changes made after the head was committed are ignored, matching
/// the behavior of a response that is already on the wire.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    staged: HeaderMap,
    head: Option<(StatusCode, HeaderMap)>,
    body: BytesMut,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed status code, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.head.as_ref().map(|(status, _)| *status)
    }

    /// The committed headers, if any.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.head.as_ref().map(|(_, headers)| headers)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns `true` if neither a status nor a body byte was written.
    pub fn is_untouched(&self) -> bool {
        self.head.is_none() && self.body.is_empty()
    }

    /// Converts the buffer into a response. A buffer whose head was never
    /// committed turns into an empty `200 OK` carrying the staged headers.
    pub fn into_response(self) -> Response<Bytes> {
        let (status, headers) = self.head.unwrap_or((StatusCode::OK, self.staged));

        let mut response = Response::new(self.body.freeze());
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl ResponseSink for ResponseBuffer {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.staged
    }

    fn write_head(&mut self, status: StatusCode) {
        if self.head.is_none() {
            self.head = Some((status, std::mem::take(&mut self.staged)));
        }
    }
}

impl io::Write for ResponseBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_head(StatusCode::OK);
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;
    use http::header;
    use std::io::Write;

    #[test]
    fn implicit_ok_on_first_write() {
        let mut buffer = ResponseBuffer::new();
        assert!(buffer.is_untouched());

        buffer
            .headers_mut()
            .insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        assert_ok!(buffer.write_all(b"hello"));
        assert!(!buffer.is_untouched());

        assert_some_eq!(buffer.status(), StatusCode::OK);
        let response = buffer.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(response.body().as_ref(), b"hello");
    }

    #[test]
    fn head_is_committed_once() {
        let mut buffer = ResponseBuffer::new();
        buffer.write_head(StatusCode::CREATED);
        buffer.write_head(StatusCode::BAD_REQUEST);

        buffer
            .headers_mut()
            .insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());

        let response = buffer.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().is_empty());
    }

    #[test]
    fn untouched_buffer_is_empty_ok() {
        let response = ResponseBuffer::new().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }
}
