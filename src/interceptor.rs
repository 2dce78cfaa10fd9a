//! A [`ResponseSink`] wrapper that swallows `404 Not Found` and
//! `403 Forbidden` responses.
//!
//! File servers usually only decide between success and failure at the
//! moment they commit the status code, and may have staged headers before
//! that. The interceptor keeps its own header map until the status is known,
//! so a miss never leaves a trace on the real response and the request can
//! be handed to another handler.

use crate::sink::ResponseSink;
use http::{HeaderMap, StatusCode};
use std::io;

pub struct ResponseInterceptor<'a, S: ResponseSink + ?Sized> {
    inner: &'a mut S,
    headers: HeaderMap,
    head_written: bool,
    blocked: bool,
}

impl<'a, S: ResponseSink + ?Sized> ResponseInterceptor<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            headers: HeaderMap::new(),
            head_written: false,
            blocked: false,
        }
    }

    /// Returns `true` once the wrapped response was diverted because the
    /// status code was `404` or `403`.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn is_head_written(&self) -> bool {
        self.head_written
    }
}

impl<S: ResponseSink + ?Sized> ResponseSink for ResponseInterceptor<'_, S> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) {
        if self.head_written {
            return;
        }
        self.head_written = true;

        if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN {
            self.blocked = true;
            return;
        }

        // `extend` replaces entries that already exist on the real response.
        let headers = std::mem::take(&mut self.headers);
        self.inner.headers_mut().extend(headers);
        self.inner.write_head(status);
    }
}

impl<S: ResponseSink + ?Sized> io::Write for ResponseInterceptor<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.head_written {
            self.write_head(StatusCode::OK);
        }
        if self.blocked {
            return Ok(buf.len());
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.blocked {
            return Ok(());
        }
        self.inner.flush()
    }
}
