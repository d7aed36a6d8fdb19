//! Blocking `Transport` backed by ureq.

use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;
use crate::http::{ByteStream, HttpMethod, HttpRequest, HttpResponse, ResponseBody, ResponseMode};

/// Executes requests with a shared `ureq::Agent`.
///
/// Status codes are never turned into errors here; a 4xx or 5xx response
/// comes back as data so `MoodleClient` can interpret it.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl crate::http::Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request
            .to_url()
            .map_err(|e| TransportError::Request(format!("invalid URL `{}`: {e}", request.url)))?;
        debug!(url = %request.url, mode = ?request.mode, "sending request");

        let response = match request.method {
            HttpMethod::Get => self.agent.get(url.as_str()).call(),
        }
        .map_err(map_error)?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        let body = match request.mode {
            ResponseMode::Json => {
                let bytes = body
                    .with_config()
                    .limit(u64::MAX)
                    .read_to_vec()
                    .map_err(map_error)?;
                ResponseBody::Buffered(bytes)
            }
            ResponseMode::Stream => ResponseBody::Streaming(ByteStream::new(body.into_reader())),
        };
        Ok(HttpResponse { status, body })
    }
}

fn map_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::Io(e) => TransportError::Io(e),
        other => TransportError::Request(other.to_string()),
    }
}
