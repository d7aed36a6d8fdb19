//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are described as plain data. `MoodleClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; a `Transport` implementation performs the actual round-trip.
//! Connection handling, TLS, timeouts and retries all live behind that trait.
//!
//! A response body is either fully buffered or a lazy `ByteStream`. Structured
//! calls read the body to the end before decoding; downloads hand the stream
//! to the caller untouched so memory use stays bounded by the caller.

use std::fmt;
use std::io::{self, Read};

use crate::error::TransportError;

/// HTTP method for a request. The Moodle web-service API only needs `GET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// How the transport should deliver the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// The body is JSON and will be parsed; buffering it is fine.
    Json,
    /// The body is opaque bytes of unbounded size; return it unread.
    Stream,
}

/// An HTTP request described as plain data.
///
/// `url` never carries a query string of its own for structured calls; all
/// parameters live in `query`, in the order they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub mode: ResponseMode,
}

impl HttpRequest {
    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The absolute URL with every query pair percent-encoded and appended.
    pub fn to_url(&self) -> Result<url::Url, url::ParseError> {
        let mut url = url::Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// An opaque, lazily read response body.
pub struct ByteStream(Box<dyn Read + Send>);

impl ByteStream {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self(Box::new(reader))
    }

    /// Drain the stream into memory.
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.0.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteStream { .. }")
    }
}

/// Body of an `HttpResponse`.
#[derive(Debug)]
pub enum ResponseBody {
    Buffered(Vec<u8>),
    Streaming(ByteStream),
}

impl ResponseBody {
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        match self {
            ResponseBody::Buffered(bytes) => Ok(bytes),
            ResponseBody::Streaming(stream) => stream.into_bytes(),
        }
    }

    pub fn into_stream(self) -> ByteStream {
        match self {
            ResponseBody::Buffered(bytes) => ByteStream::new(io::Cursor::new(bytes)),
            ResponseBody::Streaming(stream) => stream,
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn buffered(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: ResponseBody::Buffered(body.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes an `HttpRequest` and reports the status and body.
///
/// Implementations must not treat non-2xx statuses as errors; status
/// interpretation belongs to `MoodleClient`. Only failures to complete the
/// exchange at all (connection refused, timeout, broken read) are reported
/// as `TransportError`.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
