//! Course contents: sections, the modules inside them and module contents.
//!
//! Ordering is whatever the server sent; nothing here sorts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;

/// Kind of a module content entry. Unknown kinds decode as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    File,
    Url,
    #[serde(other)]
    Other,
}

/// Activity type of a course module. Unknown kinds decode as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleType {
    #[serde(rename = "assign")]
    Assignment,
    #[serde(rename = "book")]
    Book,
    #[serde(rename = "folder")]
    Folder,
    #[serde(rename = "forum")]
    Forum,
    #[serde(rename = "glossary")]
    Glossary,
    #[serde(rename = "h5pactivity")]
    H5pActivity,
    #[serde(rename = "label")]
    Label,
    #[serde(rename = "lti")]
    Lti,
    #[serde(rename = "page")]
    Page,
    #[serde(rename = "quiz")]
    Quiz,
    #[serde(rename = "resource")]
    Resource,
    #[serde(rename = "subsection")]
    Subsection,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "other", other)]
    Other,
}

/// A file or link attached to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    kind: ContentType,
    filename: String,
    #[serde(default)]
    filepath: Option<String>,
    filesize: i64,
    #[serde(default)]
    fileurl: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    timecreated: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    timemodified: Option<DateTime<Utc>>,
    #[serde(default)]
    sortorder: Option<i64>,
    #[serde(default)]
    mimetype: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    isexternalfile: bool,
    #[serde(default)]
    userid: Option<i64>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    license: Option<String>,
}

getters!(Content {
    copy kind: ContentType,
    borrow filename: String,
    borrow filepath: Option<String>,
    copy filesize: i64,
    borrow fileurl: Option<String>,
    copy timecreated: Option<DateTime<Utc>>,
    copy timemodified: Option<DateTime<Utc>>,
    copy sortorder: Option<i64>,
    borrow mimetype: Option<String>,
    copy isexternalfile: bool,
    copy userid: Option<i64>,
    borrow author: Option<String>,
    borrow license: Option<String>,
});

/// Aggregate statistics over a module's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsInfo {
    filescount: i64,
    filessize: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    lastmodified: DateTime<Utc>,
    mimetypes: Vec<String>,
    repositorytype: String,
}

getters!(ContentsInfo {
    copy filescount: i64,
    copy filessize: i64,
    copy lastmodified: DateTime<Utc>,
    borrow mimetypes: Vec<String>,
    borrow repositorytype: String,
});

/// An activity date shown on the course page (opens, due, closes...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDate {
    label: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    timestamp: DateTime<Utc>,
    dataid: String,
}

getters!(ModuleDate {
    borrow label: String,
    copy timestamp: DateTime<Utc>,
    borrow dataid: String,
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleValue {
    status: i64,
    description: String,
}

getters!(RuleValue {
    copy status: i64,
    borrow description: String,
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRule {
    rulename: String,
    rulevalue: RuleValue,
}

getters!(CompletionRule {
    borrow rulename: String,
    borrow rulevalue: RuleValue,
});

/// Completion state of a module for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionData {
    state: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    timecompleted: DateTime<Utc>,
    #[serde(deserialize_with = "de::nullable")]
    overrideby: Option<Value>,
    #[serde(deserialize_with = "de::flag")]
    valueused: bool,
    #[serde(deserialize_with = "de::flag")]
    hascompletion: bool,
    #[serde(deserialize_with = "de::flag")]
    isautomatic: bool,
    #[serde(deserialize_with = "de::flag")]
    istrackeduser: bool,
    #[serde(deserialize_with = "de::flag")]
    uservisible: bool,
    details: Vec<CompletionRule>,
    #[serde(deserialize_with = "de::flag")]
    isoverallcomplete: bool,
}

getters!(CompletionData {
    copy state: i64,
    copy timecompleted: DateTime<Utc>,
    borrow overrideby: Option<Value>,
    copy valueused: bool,
    copy hascompletion: bool,
    copy isautomatic: bool,
    copy istrackeduser: bool,
    copy uservisible: bool,
    borrow details: Vec<CompletionRule>,
    copy isoverallcomplete: bool,
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    badgecontent: String,
    badgestyle: String,
}

getters!(Badge {
    borrow badgecontent: String,
    borrow badgestyle: String,
});

/// Servers send either a single badge or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityBadge {
    Single(Badge),
    Many(Vec<Badge>),
}

impl ActivityBadge {
    pub fn badges(&self) -> &[Badge] {
        match self {
            ActivityBadge::Single(badge) => std::slice::from_ref(badge),
            ActivityBadge::Many(badges) => badges,
        }
    }
}

/// A course module (activity or resource) inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    id: i64,
    #[serde(default)]
    url: Option<String>,
    name: String,
    instance: i64,
    contextid: i64,
    #[serde(default)]
    description: Option<String>,
    visible: i64,
    #[serde(deserialize_with = "de::flag")]
    uservisible: bool,
    visibleoncoursepage: i64,
    modicon: String,
    modname: ModuleType,
    purpose: String,
    #[serde(deserialize_with = "de::flag")]
    branded: bool,
    modplural: String,
    indent: i64,
    onclick: String,
    #[serde(deserialize_with = "de::nullable")]
    afterlink: Option<String>,
    #[serde(default)]
    activitybadge: Option<ActivityBadge>,
    customdata: String,
    #[serde(deserialize_with = "de::flag")]
    noviewlink: bool,
    completion: i64,
    #[serde(default)]
    completiondata: Option<CompletionData>,
    downloadcontent: i64,
    dates: Vec<ModuleDate>,
    groupmode: i64,
    #[serde(default)]
    contents: Vec<Content>,
    #[serde(default)]
    contentsinfo: Option<ContentsInfo>,
}

getters!(Module {
    copy id: i64,
    borrow url: Option<String>,
    borrow name: String,
    copy instance: i64,
    copy contextid: i64,
    borrow description: Option<String>,
    copy visible: i64,
    copy uservisible: bool,
    copy visibleoncoursepage: i64,
    borrow modicon: String,
    copy modname: ModuleType,
    borrow purpose: String,
    copy branded: bool,
    borrow modplural: String,
    copy indent: i64,
    borrow onclick: String,
    borrow afterlink: Option<String>,
    borrow activitybadge: Option<ActivityBadge>,
    borrow customdata: String,
    copy noviewlink: bool,
    copy completion: i64,
    borrow completiondata: Option<CompletionData>,
    copy downloadcontent: i64,
    borrow dates: Vec<ModuleDate>,
    copy groupmode: i64,
    borrow contents: Vec<Content>,
    borrow contentsinfo: Option<ContentsInfo>,
});

impl Module {
    /// Contents of type `file`, in server order.
    pub fn files(&self) -> impl Iterator<Item = &Content> {
        self.contents
            .iter()
            .filter(|c| c.kind == ContentType::File)
    }
}

/// A course section (topic or week) and its modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: i64,
    name: String,
    visible: i64,
    summary: String,
    summaryformat: i64,
    section: i64,
    hiddenbynumsections: i64,
    #[serde(deserialize_with = "de::flag")]
    uservisible: bool,
    component: Value,
    itemid: Value,
    #[serde(default)]
    modules: Vec<Module>,
}

getters!(Section {
    copy id: i64,
    borrow name: String,
    copy visible: i64,
    borrow summary: String,
    copy summaryformat: i64,
    copy section: i64,
    copy hiddenbynumsections: i64,
    copy uservisible: bool,
    borrow component: Value,
    borrow itemid: Value,
    borrow modules: Vec<Module>,
});
