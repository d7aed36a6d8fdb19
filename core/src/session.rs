//! Authenticated session: one typed method per remote function.
//!
//! # Design
//! `MoodleSession` pairs a `MoodleClient` with a `Transport`. Each method is
//! one build → send → parse round-trip through a template from `call`.
//!
//! The only state carried between calls is the token owner's user id. It is
//! stored in a `OnceLock` by the first successful
//! `core_webservice_get_site_info`, whether called directly or through
//! `user_id`; concurrent first reads may both hit the network, but the value
//! written is the same for a given token and is written once.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::call::{self, Call};
use crate::client::MoodleClient;
use crate::config::ClientConfig;
use crate::error::MoodleError;
use crate::http::{ByteStream, Transport};
use crate::model::{Course, PrivateFilesInfo, ResourceList, Section, SiteInfo, UserPreferences};
use crate::transport::UreqTransport;

pub struct MoodleSession {
    client: MoodleClient,
    instance_url: String,
    transport: Arc<dyn Transport>,
    user_id: OnceLock<String>,
}

impl fmt::Debug for MoodleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoodleSession")
            .field("instance_url", &self.instance_url)
            .field("user_id", &self.user_id.get())
            .finish_non_exhaustive()
    }
}

impl MoodleSession {
    /// Bind `base_url` and `token`. No request is made.
    pub fn new(
        base_url: &str,
        token: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, MoodleError> {
        Ok(Self {
            client: MoodleClient::new(base_url, token)?,
            instance_url: base_url.to_string(),
            transport,
            user_id: OnceLock::new(),
        })
    }

    /// Session over a `UreqTransport` using the configured timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, MoodleError> {
        let token = config
            .token
            .as_deref()
            .ok_or_else(|| MoodleError::Config("a session needs a token".to_string()))?;
        let transport = Arc::new(UreqTransport::new(config.timeout));
        Self::new(&config.base_url, token, transport)
    }

    pub fn client(&self) -> &MoodleClient {
        &self.client
    }

    /// The REST endpoint calls are sent to.
    pub fn url(&self) -> String {
        self.client.rest_url()
    }

    /// The base URL exactly as given at construction.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Whether the user id has been resolved yet.
    pub fn is_identified(&self) -> bool {
        self.user_id.get().is_some()
    }

    /// Id of the token owner, fetched once and then reused.
    pub fn user_id(&self) -> Result<&str, MoodleError> {
        if let Some(id) = self.user_id.get() {
            return Ok(id.as_str());
        }
        let id = self.core_webservice_get_site_info()?.userid().to_string();
        debug!(user_id = %id, "resolved session user");
        Ok(self.user_id.get_or_init(|| id).as_str())
    }

    pub(crate) fn execute<T>(
        &self,
        call: &Call<T>,
        args: &[(&str, &str)],
        params: &[(String, String)],
    ) -> Result<T, MoodleError> {
        let request = self.client.build_call(call, args, params);
        debug!(function = call.function(), "dispatching call");
        let response = self.transport.send(&request)?;
        self.client.parse_call(call, response)
    }

    /// Site details, the current user and the functions the token may call.
    #[instrument(skip(self))]
    pub fn core_webservice_get_site_info(&self) -> Result<SiteInfo, MoodleError> {
        let info = self.execute(&call::SITE_INFO, &[], &[])?;
        self.user_id.get_or_init(|| info.userid().to_string());
        Ok(info)
    }

    /// Sections of a course with their modules, in course order.
    #[instrument(skip(self))]
    pub fn core_course_get_contents(&self, course_id: i64) -> Result<Vec<Section>, MoodleError> {
        let course_id = course_id.to_string();
        self.execute(&call::COURSE_CONTENTS, &[("course_id", &course_id)], &[])
    }

    #[instrument(skip(self))]
    pub fn core_course_get_courses(&self) -> Result<Vec<Course>, MoodleError> {
        self.execute(&call::COURSES, &[], &[])
    }

    /// Courses `user_id` is enrolled in.
    #[instrument(skip(self))]
    pub fn core_enrol_get_users_courses(&self, user_id: &str) -> Result<Vec<Course>, MoodleError> {
        self.execute(&call::USERS_COURSES, &[("user_id", user_id)], &[])
    }

    /// Browse the file areas. The response is returned as raw JSON.
    #[instrument(skip(self))]
    pub fn core_files_get_files(&self, params: &[(String, String)]) -> Result<Value, MoodleError> {
        self.execute(&call::FILES, &[], params)
    }

    #[instrument(skip(self))]
    pub fn core_user_get_private_files_info(&self) -> Result<PrivateFilesInfo, MoodleError> {
        self.execute(&call::PRIVATE_FILES_INFO, &[], &[])
    }

    #[instrument(skip(self))]
    pub fn core_user_get_user_preferences(&self) -> Result<UserPreferences, MoodleError> {
        self.execute(&call::USER_PREFERENCES, &[], &[])
    }

    /// File resources in `course_ids`, or in every course of the user when
    /// empty. Warnings for courses that could not be read stay on the list.
    #[instrument(skip(self))]
    pub fn mod_resource_get_resources_by_courses(
        &self,
        course_ids: &[i64],
    ) -> Result<ResourceList, MoodleError> {
        let params: Vec<(String, String)> = course_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (format!("courseids[{i}]"), id.to_string()))
            .collect();
        self.execute(&call::RESOURCES_BY_COURSES, &[], &params)
    }

    /// Stream the file at `attachment_url`. The body is not read or parsed.
    #[instrument(skip(self, params))]
    pub fn download(
        &self,
        attachment_url: &str,
        params: &[(String, String)],
    ) -> Result<ByteStream, MoodleError> {
        let request = self.client.build_download(attachment_url, params)?;
        let response = self.transport.send(&request)?;
        self.client.parse_download(response)
    }
}
