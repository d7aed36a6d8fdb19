//! Request builder and response parser for the Moodle REST endpoint.
//!
//! # Design
//! `MoodleClient` holds the base URL and token and nothing else. Every call
//! is split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`; whoever owns a
//! `Transport` executes the round-trip in between. `MoodleSession` is that
//! owner in normal use, tests drive the two halves directly.
//!
//! Moodle reports most failures with HTTP 200 and an `errorcode` in the
//! body, so `parse_call` inspects the JSON before decoding it regardless of
//! the status line.

use serde_json::Value;
use tracing::{debug, warn};

use crate::call::Call;
use crate::error::{status_handler, DecodeError, ErrorResponse, MoodleError};
use crate::http::{ByteStream, HttpMethod, HttpRequest, HttpResponse, ResponseMode};

pub const REST_PATH: &str = "/webservice/rest/server.php";
pub const LOGIN_PATH: &str = "/login/token.php";

/// Stateless builder/parser for authenticated web-service calls.
#[derive(Clone)]
pub struct MoodleClient {
    base_url: String,
    token: String,
}

impl std::fmt::Debug for MoodleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodleClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MoodleClient {
    /// Bind a base URL and token. Trailing slashes on the URL are dropped.
    pub fn new(base_url: &str, token: &str) -> Result<Self, MoodleError> {
        let base_url = normalize_base_url(base_url)?;
        if token.is_empty() {
            return Err(MoodleError::Config("token must not be empty".to_string()));
        }
        Ok(Self {
            base_url,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Absolute URL of the REST endpoint.
    pub fn rest_url(&self) -> String {
        format!("{}{REST_PATH}", self.base_url)
    }

    /// Build a structured call. `args` fill the template placeholders,
    /// `params` are appended verbatim after the templated parameters.
    ///
    /// # Panics
    ///
    /// Panics if the template references an argument missing from `args`.
    pub fn build_call<T>(
        &self,
        call: &Call<T>,
        args: &[(&str, &str)],
        params: &[(String, String)],
    ) -> HttpRequest {
        let rendered = call.render(args);
        let mut query = vec![
            ("wstoken".to_string(), self.token.clone()),
            ("moodlewsrestformat".to_string(), "json".to_string()),
            ("wsfunction".to_string(), rendered.function),
        ];
        query.extend(rendered.params);
        query.extend(params.iter().cloned());

        HttpRequest {
            method: HttpMethod::Get,
            url: self.rest_url(),
            query,
            mode: ResponseMode::Json,
        }
    }

    /// Interpret the response of a structured call and decode it.
    pub fn parse_call<T>(&self, call: &Call<T>, response: HttpResponse) -> Result<T, MoodleError> {
        debug!(
            function = call.function(),
            status = response.status,
            "parsing structured response"
        );
        let value = read_json(response)?;
        Ok(call.decode(value)?)
    }

    /// Build a download of `attachment_url`. The token travels as the
    /// `token` query parameter, followed by `params`.
    pub fn build_download(
        &self,
        attachment_url: &str,
        params: &[(String, String)],
    ) -> Result<HttpRequest, MoodleError> {
        url::Url::parse(attachment_url).map_err(|e| {
            MoodleError::Config(format!("invalid attachment URL `{attachment_url}`: {e}"))
        })?;
        let mut query = vec![("token".to_string(), self.token.clone())];
        query.extend(params.iter().cloned());
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: attachment_url.to_string(),
            query,
            mode: ResponseMode::Stream,
        })
    }

    /// Hand back the body of a download without looking at it.
    pub fn parse_download(&self, response: HttpResponse) -> Result<ByteStream, MoodleError> {
        debug!(status = response.status, "parsing download response");
        if !response.is_success() {
            return Err(status_error(response.status, None));
        }
        Ok(response.body.into_stream())
    }
}

/// Validate and normalise a site base URL.
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String, MoodleError> {
    let trimmed = base_url.trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| MoodleError::Config(format!("invalid base URL `{base_url}`: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MoodleError::Config(format!(
            "base URL `{base_url}` must use http or https"
        )));
    }
    Ok(trimmed.to_string())
}

/// Read a JSON body and fail on an embedded error code or bad status.
pub(crate) fn read_json(response: HttpResponse) -> Result<Value, MoodleError> {
    let status = response.status;
    let success = response.is_success();
    let bytes = response
        .body
        .into_bytes()
        .map_err(crate::error::TransportError::from)?;

    let parsed = serde_json::from_slice::<Value>(&bytes);
    if !success {
        return Err(status_error(status, parsed.ok().as_ref()));
    }
    let value = parsed.map_err(|e| DecodeError::new(".", e.to_string()))?;
    check_error_code(&value)?;
    Ok(value)
}

/// Fail if `value` is an object carrying an `errorcode`.
pub fn check_error_code(value: &Value) -> Result<(), MoodleError> {
    let Some(code) = value.as_object().and_then(|obj| obj.get("errorcode")) else {
        return Ok(());
    };
    let code = code.as_str().unwrap_or_default().to_string();
    let response = serde_json::from_value::<ErrorResponse>(value.clone()).unwrap_or_else(|_| {
        ErrorResponse {
            errorcode: code.clone(),
            ..ErrorResponse::default()
        }
    });
    warn!(errorcode = %code, message = %response.message, "moodle reported an error");
    Err(status_handler(&code, response))
}

/// Error for a non-2xx status; prefers the server's own error object.
fn status_error(status: u16, body: Option<&Value>) -> MoodleError {
    if let Some(value) = body {
        if let Err(err) = check_error_code(value) {
            return err;
        }
    }
    warn!(status, "moodle returned a non-success status");
    MoodleError::Api(ErrorResponse {
        errorcode: format!("httpstatus{status}"),
        message: format!("HTTP status {status}"),
        ..ErrorResponse::default()
    })
}
