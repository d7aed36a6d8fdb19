//! Error types for the Moodle web-service client.
//!
//! # Design
//! Moodle reports API failures inside the response body, usually with HTTP
//! 200, as an object carrying an `errorcode`. `status_handler` maps that code
//! onto a closed set of kinds; anything it does not recognise lands in the
//! catch-all `Api` variant. Transport and decode failures are kept apart from
//! the API taxonomy so callers can tell "the server said no" from "we never
//! got a usable answer".

use std::fmt;

use serde::{Deserialize, Serialize};

/// The error object Moodle embeds in a failed response.
///
/// Login failures use `error` instead of `message`; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errorcode: String,
    #[serde(default, alias = "error")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debuginfo: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "[{}]", self.errorcode)
        } else {
            write!(f, "{} [{}]", self.message, self.errorcode)
        }
    }
}

/// Failure of the transport collaborator to complete an exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Reading or writing the connection failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure reported by the HTTP stack.
    #[error("request failed: {0}")]
    Request(String),
}

/// A response body that does not match the expected record shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to decode response at `{path}`: {message}")]
pub struct DecodeError {
    /// Path of the offending field, e.g. `[0].modules[2].contents`.
    pub path: String,
    pub message: String,
}

impl DecodeError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for DecodeError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

/// Discriminant of `MoodleError`, for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parameter,
    Token,
    Context,
    Permissions,
    Api,
    Transport,
    Decode,
    Config,
}

/// Errors returned by every Moodle client operation.
#[derive(Debug, thiserror::Error)]
pub enum MoodleError {
    /// `invalidparameter`: a parameter value was rejected.
    #[error("invalid parameter: {0}")]
    Parameter(ErrorResponse),

    /// `invalidtoken`: the token is unknown or expired.
    #[error("invalid token: {0}")]
    Token(ErrorResponse),

    /// `errorcoursecontextnotvalid`: the function cannot run in this course context.
    #[error("invalid course context: {0}")]
    Context(ErrorResponse),

    /// `nopermissions`: the user lacks the capability for this call.
    #[error("permission denied: {0}")]
    Permissions(ErrorResponse),

    /// Any other error code reported by the server.
    #[error("moodle API error: {0}")]
    Api(ErrorResponse),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The client was constructed with unusable settings.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MoodleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoodleError::Parameter(_) => ErrorKind::Parameter,
            MoodleError::Token(_) => ErrorKind::Token,
            MoodleError::Context(_) => ErrorKind::Context,
            MoodleError::Permissions(_) => ErrorKind::Permissions,
            MoodleError::Api(_) => ErrorKind::Api,
            MoodleError::Transport(_) => ErrorKind::Transport,
            MoodleError::Decode(_) => ErrorKind::Decode,
            MoodleError::Config(_) => ErrorKind::Config,
        }
    }

    /// The server's error object, for the API kinds.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            MoodleError::Parameter(r)
            | MoodleError::Token(r)
            | MoodleError::Context(r)
            | MoodleError::Permissions(r)
            | MoodleError::Api(r) => Some(r),
            _ => None,
        }
    }
}

/// Map a Moodle error code to its error variant.
///
/// Exact match on a fixed table; every other code, the empty string
/// included, becomes `MoodleError::Api`. Always returns an error: it is only
/// called once a response has been judged a failure.
pub fn status_handler(code: &str, response: ErrorResponse) -> MoodleError {
    match code {
        "invalidparameter" => MoodleError::Parameter(response),
        "invalidtoken" => MoodleError::Token(response),
        "errorcoursecontextnotvalid" => MoodleError::Context(response),
        "nopermissions" => MoodleError::Permissions(response),
        _ => MoodleError::Api(response),
    }
}
