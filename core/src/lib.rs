//! Typed client for the Moodle web-service REST API.
//!
//! # Overview
//! `MoodleLogin` exchanges credentials for a `Token`. `MoodleSession` binds a
//! site URL and token and exposes one method per remote function, each a
//! single round-trip that returns immutable, validated records from `model`.
//!
//! # Design
//! - `call` holds the table of function templates and their decoders.
//! - `MoodleClient` builds `HttpRequest`s and parses `HttpResponse`s without
//!   doing I/O; a `Transport` performs the exchange. `UreqTransport` is the
//!   bundled blocking implementation.
//! - Moodle signals most failures with HTTP 200 and an `errorcode` in the
//!   body; those become typed `MoodleError` variants via `status_handler`.
//! - Downloads bypass JSON handling and return a lazy `ByteStream`.

pub mod call;
pub mod client;
pub mod config;
pub mod error;
mod extended;
pub mod http;
pub mod login;
pub mod model;
pub mod session;
pub mod transport;

pub use client::MoodleClient;
pub use config::ClientConfig;
pub use error::{status_handler, DecodeError, ErrorKind, ErrorResponse, MoodleError, TransportError};
pub use http::{ByteStream, HttpMethod, HttpRequest, HttpResponse, ResponseBody, ResponseMode, Transport};
pub use login::MoodleLogin;
pub use session::MoodleSession;
pub use transport::UreqTransport;
