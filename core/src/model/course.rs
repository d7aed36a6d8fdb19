use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// A stored file as reported in course overviews and resource listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodleFile {
    filename: String,
    filepath: String,
    filesize: i64,
    fileurl: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    timemodified: DateTime<Utc>,
    mimetype: String,
    #[serde(default, deserialize_with = "de::flag")]
    isexternalfile: bool,
    #[serde(default)]
    icon: Option<String>,
}

getters!(MoodleFile {
    borrow filename: String,
    borrow filepath: String,
    copy filesize: i64,
    borrow fileurl: String,
    copy timemodified: DateTime<Utc>,
    borrow mimetype: String,
    copy isexternalfile: bool,
    borrow icon: Option<String>,
});

/// A course as returned by the enrolment and course listing functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    id: i64,
    shortname: String,
    fullname: String,
    displayname: String,
    enrolledusercount: i64,
    idnumber: String,
    visible: i64,
    summary: String,
    summaryformat: i64,
    format: String,
    courseimage: String,
    #[serde(deserialize_with = "de::nullable_flag")]
    showgrades: Option<bool>,
    lang: String,
    #[serde(deserialize_with = "de::nullable_flag")]
    enablecompletion: Option<bool>,
    #[serde(deserialize_with = "de::nullable_flag")]
    completionhascriteria: Option<bool>,
    #[serde(deserialize_with = "de::nullable_flag")]
    completionusertracked: Option<bool>,
    category: i64,
    #[serde(deserialize_with = "de::nullable")]
    progress: Option<f64>,
    #[serde(deserialize_with = "de::nullable_flag")]
    completed: Option<bool>,
    #[serde(with = "chrono::serde::ts_seconds")]
    startdate: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    enddate: DateTime<Utc>,
    marker: i64,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    lastaccess: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "de::flag")]
    isfavourite: bool,
    #[serde(deserialize_with = "de::flag")]
    hidden: bool,
    overviewfiles: Vec<MoodleFile>,
    #[serde(deserialize_with = "de::flag")]
    showactivitydates: bool,
    #[serde(deserialize_with = "de::nullable_flag")]
    showcompletionconditions: Option<bool>,
    #[serde(with = "chrono::serde::ts_seconds")]
    timemodified: DateTime<Utc>,
}

getters!(Course {
    copy id: i64,
    borrow shortname: String,
    borrow fullname: String,
    borrow displayname: String,
    copy enrolledusercount: i64,
    borrow idnumber: String,
    copy visible: i64,
    borrow summary: String,
    copy summaryformat: i64,
    borrow format: String,
    borrow courseimage: String,
    copy showgrades: Option<bool>,
    borrow lang: String,
    copy enablecompletion: Option<bool>,
    copy completionhascriteria: Option<bool>,
    copy completionusertracked: Option<bool>,
    copy category: i64,
    copy progress: Option<f64>,
    copy completed: Option<bool>,
    copy startdate: DateTime<Utc>,
    copy enddate: DateTime<Utc>,
    copy marker: i64,
    copy lastaccess: Option<DateTime<Utc>>,
    copy isfavourite: bool,
    copy hidden: bool,
    borrow overviewfiles: Vec<MoodleFile>,
    copy showactivitydates: bool,
    copy showcompletionconditions: Option<bool>,
    copy timemodified: DateTime<Utc>,
});

impl Course {
    pub fn is_visible(&self) -> bool {
        self.visible != 0 && !self.hidden
    }
}
