//! Unauthenticated token request against `login/token.php`.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::client::{normalize_base_url, read_json, LOGIN_PATH};
use crate::config::{ClientConfig, DEFAULT_SERVICE};
use crate::error::MoodleError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseMode, Transport};
use crate::model::{self, Token};
use crate::transport::UreqTransport;

/// Exchanges a username and password for a web-service `Token`.
pub struct MoodleLogin {
    base_url: String,
    service: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for MoodleLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodleLogin")
            .field("base_url", &self.base_url)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl MoodleLogin {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, MoodleError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            service: DEFAULT_SERVICE.to_string(),
            transport,
        })
    }

    /// Login over a `UreqTransport` using the configured login timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, MoodleError> {
        let transport = Arc::new(UreqTransport::new(config.login_timeout));
        Ok(Self::new(&config.base_url, transport)?.with_service(config.service.clone()))
    }

    /// Request tokens for `service` instead of the mobile app service.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn build_login(&self, username: &str, password: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{LOGIN_PATH}", self.base_url),
            query: vec![
                ("username".to_string(), username.to_string()),
                ("password".to_string(), password.to_string()),
                ("service".to_string(), self.service.clone()),
            ],
            mode: ResponseMode::Json,
        }
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<Token, MoodleError> {
        let value = read_json(response)?;
        Ok(model::decode(value)?)
    }

    /// One round-trip to the login endpoint.
    #[instrument(skip(self, password), fields(service = %self.service))]
    pub fn login(&self, username: &str, password: &str) -> Result<Token, MoodleError> {
        let request = self.build_login(username, password);
        debug!("requesting token");
        let response = self.transport.send(&request)?;
        self.parse_login(response)
    }
}
