use serde::{Deserialize, Serialize};

use super::Warning;

/// Usage summary of the user's private files area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateFilesInfo {
    filecount: i64,
    foldercount: i64,
    filesize: i64,
    filesizewithoutreferences: i64,
    warnings: Vec<Warning>,
}

getters!(PrivateFilesInfo {
    copy filecount: i64,
    copy foldercount: i64,
    copy filesize: i64,
    copy filesizewithoutreferences: i64,
    borrow warnings: Vec<Warning>,
});

/// A preference value; Moodle stores them as text or integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    name: String,
    #[serde(deserialize_with = "super::de::nullable")]
    value: Option<PreferenceValue>,
}

getters!(Preference {
    borrow name: String,
    borrow value: Option<PreferenceValue>,
});

/// Result of `core_user_get_user_preferences`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    preferences: Vec<Preference>,
    warnings: Vec<Warning>,
}

getters!(UserPreferences {
    borrow preferences: Vec<Preference>,
    borrow warnings: Vec<Warning>,
});

impl UserPreferences {
    pub fn get(&self, name: &str) -> Option<&PreferenceValue> {
        self.preferences
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn preferences_accept_text_numbers_and_null() {
        let prefs: UserPreferences = decode(json!({
            "preferences": [
                {"name": "auth_forcepasswordchange", "value": "0"},
                {"name": "login_failed_count", "value": 3},
                {"name": "email_bounce_count", "value": null}
            ],
            "warnings": []
        }))
        .unwrap();
        assert_eq!(
            prefs.get("auth_forcepasswordchange"),
            Some(&PreferenceValue::Text("0".to_string()))
        );
        assert_eq!(prefs.get("login_failed_count"), Some(&PreferenceValue::Number(3)));
        assert_eq!(prefs.get("email_bounce_count"), None);
        assert_eq!(prefs.preferences().len(), 3);
    }

    #[test]
    fn warnings_are_required_and_preserved() {
        let err = decode::<PrivateFilesInfo>(json!({
            "filecount": 1, "foldercount": 0, "filesize": 10, "filesizewithoutreferences": 10
        }))
        .unwrap_err();
        assert!(err.message.contains("warnings"), "{err}");

        let info: PrivateFilesInfo = decode(json!({
            "filecount": 1, "foldercount": 0, "filesize": 10, "filesizewithoutreferences": 10,
            "warnings": [{"warningcode": "quota", "message": "Nearly full"}]
        }))
        .unwrap();
        assert_eq!(info.warnings()[0].message(), "Nearly full");
    }
}
