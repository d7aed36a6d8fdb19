//! Connection settings for sessions and logins.

use std::time::Duration;

use crate::error::MoodleError;

/// Timeout for authenticated web-service calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Timeout for `login/token.php`.
pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Web service the login endpoint issues tokens for.
pub const DEFAULT_SERVICE: &str = "moodle_mobile_app";

/// Settings needed to reach a Moodle site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Web-service token; `None` until a login has produced one.
    pub token: Option<String>,
    pub timeout: Duration,
    pub login_timeout: Duration,
    pub service: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            service: DEFAULT_SERVICE.to_string(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Read `MOODLE_URL`, `MOODLE_TOKEN`, `MOODLE_TIMEOUT_SECS` and
    /// `MOODLE_SERVICE` from the environment.
    pub fn from_env() -> Result<Self, MoodleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MoodleError> {
        let base_url = lookup("MOODLE_URL")
            .filter(|url| !url.is_empty())
            .ok_or_else(|| MoodleError::Config("MOODLE_URL is not set".to_string()))?;

        let mut config = Self::new(base_url);
        config.token = lookup("MOODLE_TOKEN").filter(|token| !token.is_empty());
        if let Some(secs) = lookup("MOODLE_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                MoodleError::Config(format!("MOODLE_TIMEOUT_SECS is not a number: `{secs}`"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(service) = lookup("MOODLE_SERVICE").filter(|s| !s.is_empty()) {
            config.service = service;
        }
        Ok(config)
    }
}
