//! Verify parsing against the JSON fixtures stored in `test-vectors/`.
//!
//! Every fixture goes through `MoodleClient::parse_call` exactly as a live
//! response would, is checked field by field where it matters, and then
//! re-encoded and decoded again to confirm nothing is lost.

use moodle_core::call::{self, Call};
use moodle_core::model::{self, ContentType, ModuleType, PreferenceValue, Warning};
use moodle_core::{ErrorKind, HttpResponse, MoodleClient};
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use serde::Serialize;

const BASE_URL: &str = "https://moodle.example.org";

fn client() -> MoodleClient {
    MoodleClient::new(BASE_URL, "abc").unwrap()
}

fn parse<T>(call: &Call<T>, body: &str) -> T {
    client()
        .parse_call(call, HttpResponse::buffered(200, body))
        .unwrap_or_else(|e| panic!("{}: {e}", call.function()))
}

/// decode(encode(x)) == x
fn assert_round_trip<T>(value: &T)
where
    T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let encoded = serde_json::to_value(value).unwrap();
    let decoded: T = model::decode(encoded).unwrap();
    assert_eq!(&decoded, value);
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[test]
fn site_info_fixture() {
    let info = parse(&call::SITE_INFO, include_str!("../../test-vectors/fixtures/site_info.json"));
    assert_eq!(info.userid(), 7);
    assert_eq!(info.fullname(), "Ada Lovelace");
    assert!(info.usercanmanageownfiles());
    assert!(!info.userissiteadmin());
    assert!(info.has_function("core_course_get_contents"));
    assert!(!info.has_function("core_course_get_courses"));
    assert_eq!(info.feature("enablebadges"), Some(0));
    assert_round_trip(&info);
}

#[test]
fn users_courses_fixture() {
    let courses = parse(
        &call::USERS_COURSES,
        include_str!("../../test-vectors/fixtures/users_courses.json"),
    );
    let ids: Vec<_> = courses.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![2, 5]);

    let cs101 = &courses[0];
    assert_eq!(cs101.progress(), Some(42.5));
    assert_eq!(cs101.startdate().timestamp(), 1_725_148_800);
    assert_eq!(cs101.overviewfiles().len(), 1);
    assert!(cs101.is_visible());

    let math = &courses[1];
    assert_eq!(math.progress(), None);
    assert_eq!(math.lastaccess(), None);
    assert_eq!(math.completionhascriteria(), None);
    assert!(!math.is_visible());

    for course in &courses {
        assert_round_trip(course);
    }
}

#[test]
fn course_contents_fixture() {
    let sections = parse(
        &call::COURSE_CONTENTS,
        include_str!("../../test-vectors/fixtures/course_contents.json"),
    );
    let order: Vec<_> = sections.iter().map(|s| s.section()).collect();
    assert_eq!(order, vec![0, 1]);

    let general = &sections[0];
    let kinds: Vec<_> = general.modules().iter().map(|m| m.modname()).collect();
    assert_eq!(kinds, vec![ModuleType::Forum, ModuleType::Other]);
    assert_eq!(general.modules()[1].dates()[0].dataid(), "openingtime");
    assert_eq!(
        general.modules()[0]
            .activitybadge()
            .as_ref()
            .map(|b| b.badges().len()),
        Some(1)
    );

    let week1 = &sections[1];
    let kinds: Vec<_> = week1.modules().iter().map(|m| m.modname()).collect();
    assert_eq!(kinds, vec![ModuleType::Resource, ModuleType::Url, ModuleType::Assignment]);

    let resource = &week1.modules()[0];
    assert_eq!(resource.files().count(), 1);
    assert_eq!(resource.contents()[0].author().as_deref(), Some("Dana Reyes"));
    assert_eq!(resource.contentsinfo().as_ref().map(|i| i.filescount()), Some(1));
    let completion = resource.completiondata().as_ref().unwrap();
    assert_eq!(completion.details()[0].rulevalue().description(), "View");

    let url = &week1.modules()[1];
    assert_eq!(url.contents()[0].kind(), ContentType::Url);
    assert!(url.contents()[0].timecreated().is_none());

    let assign = &week1.modules()[2];
    assert!(assign.url().is_none());
    assert_eq!(assign.contents()[0].kind(), ContentType::Other);
    assert!(assign.contentsinfo().is_none());
    assert_eq!(assign.dates().len(), 2);

    for section in &sections {
        assert_round_trip(section);
    }
}

#[test]
fn private_files_info_fixture() {
    let info = parse(
        &call::PRIVATE_FILES_INFO,
        include_str!("../../test-vectors/fixtures/private_files_info.json"),
    );
    assert_eq!(info.filecount(), 4);
    assert!(info.warnings().is_empty());
    assert_round_trip(&info);
}

#[test]
fn user_preferences_fixture() {
    let prefs = parse(
        &call::USER_PREFERENCES,
        include_str!("../../test-vectors/fixtures/user_preferences.json"),
    );
    assert_eq!(
        prefs.get("login_failed_count_since_success"),
        Some(&PreferenceValue::Number(0))
    );
    assert_eq!(prefs.get("drawer-open-index"), None);
    assert!(matches!(
        &prefs.warnings()[0],
        Warning::Detailed { warningcode, .. } if warningcode == "nopermission"
    ));
    assert_round_trip(&prefs);
}

#[test]
fn resources_fixture() {
    let list = parse(
        &call::RESOURCES_BY_COURSES,
        include_str!("../../test-vectors/fixtures/resources.json"),
    );
    assert_round_trip(&list);
    let resources = list.into_resources();
    assert_eq!(resources.len(), 2);
    assert!(resources[0].visible());
    assert_eq!(resources[0].contentfiles()[0].icon().as_deref(), Some("f/pdf"));
    assert!(!resources[1].visible());
    assert!(resources[1].contentfiles().is_empty());
    for resource in &resources {
        assert_round_trip(resource);
    }
}

#[test]
fn unknown_enum_values_never_fail() {
    let raw = include_str!("../../test-vectors/fixtures/course_contents.json");
    for modname in ["chat", "scorm", "wiki", "workshop", "", "ASSIGN"] {
        let mut value: serde_json::Value = serde_json::from_str(raw).unwrap();
        value[0]["modules"][0]["modname"] = serde_json::json!(modname);
        value[1]["modules"][0]["contents"][0]["type"] = serde_json::json!(modname);
        let sections = parse(&call::COURSE_CONTENTS, &value.to_string());
        assert_eq!(sections[0].modules()[0].modname(), ModuleType::Other, "{modname:?}");
        assert_eq!(
            sections[1].modules()[0].contents()[0].kind(),
            ContentType::Other,
            "{modname:?}"
        );
    }
}

#[test]
fn mistyped_field_names_its_path() {
    let raw = include_str!("../../test-vectors/fixtures/course_contents.json");
    let mut value: serde_json::Value = serde_json::from_str(raw).unwrap();
    value[1]["modules"][0]["contents"][0]["filesize"] = serde_json::json!("big");
    let err = client()
        .parse_call(&call::COURSE_CONTENTS, HttpResponse::buffered(200, value.to_string()))
        .unwrap_err();
    match err {
        moodle_core::MoodleError::Decode(decode) => {
            assert_eq!(decode.path, "[1].modules[0].contents[0].filesize")
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "Parameter" => ErrorKind::Parameter,
        "Token" => ErrorKind::Token,
        "Context" => ErrorKind::Context,
        "Permissions" => ErrorKind::Permissions,
        "Api" => ErrorKind::Api,
        "Decode" => ErrorKind::Decode,
        other => panic!("unknown kind: {other}"),
    }
}

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse::buffered(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        let err = c.parse_call(&call::SITE_INFO, response).unwrap_err();
        let expected = parse_kind(case["expected_kind"].as_str().unwrap());
        assert_eq!(err.kind(), expected, "{name}");
    }
}
