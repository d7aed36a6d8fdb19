//! Immutable records decoded from Moodle web-service responses.
//!
//! # Design
//! Every record keeps its fields private and exposes read-only accessors, so
//! a decoded value cannot be altered after construction. Decoding validates
//! eagerly: a missing required field fails with the path of that field.
//!
//! Field defaults follow the server's habit of omitting keys between
//! releases:
//! - `#[serde(default)]` fields fall back to an empty list, `false` or `None`;
//! - nullable fields without a default must be present but may be `null`;
//! - `ModuleType` and `ContentType` never fail, unknown values become `Other`.
//!
//! Timestamps are unix seconds on the wire and `DateTime<Utc>` in memory.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Read-only accessors for record fields. `copy` fields are returned by
/// value, `borrow` fields by reference.
macro_rules! getters {
    ($record:ty { $($mode:ident $field:ident: $ty:ty),* $(,)? }) => {
        impl $record {
            $( getters!(@accessor $mode $field: $ty); )*
        }
    };
    (@accessor copy $field:ident: $ty:ty) => {
        pub fn $field(&self) -> $ty {
            self.$field
        }
    };
    (@accessor borrow $field:ident: $ty:ty) => {
        pub fn $field(&self) -> &$ty {
            &self.$field
        }
    };
}

mod de;

pub mod contents;
pub mod course;
pub mod resource;
pub mod site;
pub mod token;
pub mod user;

pub use contents::{
    ActivityBadge, Badge, CompletionData, CompletionRule, Content, ContentType, ContentsInfo,
    Module, ModuleDate, ModuleType, RuleValue, Section,
};
pub use course::{Course, MoodleFile};
pub use resource::{Resource, ResourceList};
pub use site::{AdvancedFeature, SiteFunction, SiteInfo};
pub use token::Token;
pub use user::{Preference, PreferenceValue, PrivateFilesInfo, UserPreferences};

/// Decode a JSON value into `T`, reporting the path of the first bad field.
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, DecodeError> {
    serde_path_to_error::deserialize(value).map_err(DecodeError::from)
}

/// A partial-failure notice attached to an otherwise successful response.
///
/// Most functions report structured warnings; some older endpoints send bare
/// strings. Both are kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Warning {
    Notice(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        itemid: Option<i64>,
        warningcode: String,
        message: String,
    },
}

impl Warning {
    pub fn message(&self) -> &str {
        match self {
            Warning::Notice(message) | Warning::Detailed { message, .. } => message,
        }
    }
}
