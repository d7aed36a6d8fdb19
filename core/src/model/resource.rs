use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{de, MoodleFile, Warning};

/// A file resource activity from `mod_resource_get_resources_by_courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    id: i64,
    coursemodule: i64,
    course: i64,
    name: String,
    intro: String,
    introformat: i64,
    introfiles: Vec<Value>,
    section: i64,
    #[serde(deserialize_with = "de::flag")]
    visible: bool,
    groupmode: i64,
    groupingid: i64,
    lang: String,
    #[serde(default)]
    contentfiles: Vec<MoodleFile>,
    tobemigrated: i64,
    legacyfiles: i64,
    #[serde(deserialize_with = "de::nullable")]
    legacyfileslast: Option<Value>,
    display: i64,
    displayoptions: String,
    filterfiles: i64,
    revision: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    timemodified: DateTime<Utc>,
}

getters!(Resource {
    copy id: i64,
    copy coursemodule: i64,
    copy course: i64,
    borrow name: String,
    borrow intro: String,
    copy introformat: i64,
    borrow introfiles: Vec<Value>,
    copy section: i64,
    copy visible: bool,
    copy groupmode: i64,
    copy groupingid: i64,
    borrow lang: String,
    borrow contentfiles: Vec<MoodleFile>,
    copy tobemigrated: i64,
    copy legacyfiles: i64,
    borrow legacyfileslast: Option<Value>,
    copy display: i64,
    borrow displayoptions: String,
    copy filterfiles: i64,
    copy revision: i64,
    copy timemodified: DateTime<Utc>,
});

/// Envelope of the resources call; the records live under `resources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceList {
    resources: Vec<Resource>,
    #[serde(default)]
    warnings: Vec<Warning>,
}

getters!(ResourceList {
    borrow resources: Vec<Resource>,
    borrow warnings: Vec<Warning>,
});

impl ResourceList {
    pub fn into_resources(self) -> Vec<Resource> {
        self.resources
    }
}
