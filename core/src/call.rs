//! Call templates: the table of remote functions this client knows.
//!
//! # Design
//! A `Call` pairs a template string with the decoder for its response. The
//! template is the `wsfunction` name optionally followed by `&key=value`
//! pairs, where values may contain `{placeholder}` tokens, e.g.
//! `core_course_get_contents&courseid={course_id}`. `Call::render` resolves
//! the placeholders from the caller's arguments and splits the result into
//! the function name and its query parameters.
//!
//! Templates are compile-time constants and their arguments come from typed
//! session methods, so a placeholder without an argument can only be a bug in
//! this crate. `render` panics in that case instead of returning an error.

use std::fmt;

use serde_json::Value;

use crate::error::DecodeError;
use crate::model::{self, Course, PrivateFilesInfo, ResourceList, Section, SiteInfo, UserPreferences};

/// A remote function template bound to its response decoder.
pub struct Call<T> {
    template: &'static str,
    decode: fn(Value) -> Result<T, DecodeError>,
}

impl<T> Clone for Call<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Call<T> {}

impl<T> fmt::Debug for Call<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

/// A template with all placeholders resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCall {
    pub function: String,
    pub params: Vec<(String, String)>,
}

impl<T> Call<T> {
    pub const fn new(template: &'static str, decode: fn(Value) -> Result<T, DecodeError>) -> Self {
        Self { template, decode }
    }

    /// The `wsfunction` name, without any templated parameters.
    pub fn function(&self) -> &'static str {
        self.template
            .split_once('&')
            .map_or(self.template, |(name, _)| name)
    }

    pub fn decode(&self, value: Value) -> Result<T, DecodeError> {
        (self.decode)(value)
    }

    /// Resolve every `{name}` in the template from `args`.
    ///
    /// # Panics
    ///
    /// Panics if a placeholder has no matching argument or a brace is left
    /// unbalanced.
    pub fn render(&self, args: &[(&str, &str)]) -> RenderedCall {
        let resolved = substitute(self.template, args);
        let mut parts = resolved.split('&');
        let function = parts.next().unwrap_or_default().to_string();
        let params = parts
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (part.to_string(), String::new()),
            })
            .collect();
        RenderedCall { function, params }
    }
}

fn substitute(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            panic!("unbalanced placeholder in call template `{template}`");
        };
        let name = &after[..close];
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => panic!("call template `{template}` has no argument for `{{{name}}}`"),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn passthrough(value: Value) -> Result<Value, DecodeError> {
    Ok(value)
}

pub const SITE_INFO: Call<SiteInfo> = Call::new("core_webservice_get_site_info", model::decode);

pub const COURSE_CONTENTS: Call<Vec<Section>> =
    Call::new("core_course_get_contents&courseid={course_id}", model::decode);

pub const COURSES: Call<Vec<Course>> = Call::new("core_course_get_courses", model::decode);

pub const USERS_COURSES: Call<Vec<Course>> =
    Call::new("core_enrol_get_users_courses&userid={user_id}", model::decode);

pub const FILES: Call<Value> = Call::new("core_files_get_files", passthrough);

pub const PRIVATE_FILES_INFO: Call<PrivateFilesInfo> =
    Call::new("core_user_get_private_files_info", model::decode);

pub const USER_PREFERENCES: Call<UserPreferences> =
    Call::new("core_user_get_user_preferences", model::decode);

pub const RESOURCES_BY_COURSES: Call<ResourceList> =
    Call::new("mod_resource_get_resources_by_courses", model::decode);

/// Every function name the session can call, in declaration order.
pub const FUNCTIONS: &[&str] = &[
    "core_webservice_get_site_info",
    "core_course_get_contents",
    "core_course_get_courses",
    "core_enrol_get_users_courses",
    "core_files_get_files",
    "core_user_get_private_files_info",
    "core_user_get_user_preferences",
    "mod_resource_get_resources_by_courses",
];
