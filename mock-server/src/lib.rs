//! A stand-in Moodle site for integration tests.
//!
//! Serves the REST endpoint, the token endpoint and plugin files from the
//! fixtures in `test-vectors/fixtures`. Errors are reported the way Moodle
//! does it: HTTP 200 with an `errorcode` object in the body.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;
use uuid::Uuid;

pub const TOKEN: &str = "abc";
pub const USERNAME: &str = "student";
pub const PASSWORD: &str = "s3cret";
pub const SERVICE: &str = "moodle_mobile_app";
pub const USER_ID: i64 = 7;
pub const COURSE_ID: i64 = 2;

pub const SITE_INFO: &str = include_str!("../../test-vectors/fixtures/site_info.json");
pub const USERS_COURSES: &str = include_str!("../../test-vectors/fixtures/users_courses.json");
pub const COURSE_CONTENTS: &str = include_str!("../../test-vectors/fixtures/course_contents.json");
pub const PRIVATE_FILES_INFO: &str =
    include_str!("../../test-vectors/fixtures/private_files_info.json");
pub const USER_PREFERENCES: &str =
    include_str!("../../test-vectors/fixtures/user_preferences.json");
pub const RESOURCES: &str = include_str!("../../test-vectors/fixtures/resources.json");

/// Plugin file served at `/webservice/pluginfile.php/901/mod_resource/content/1/week1.pdf`.
pub const WEEK1_PDF: &[u8] = b"%PDF-1.4\n% week 1 lecture notes\n%%EOF\n";
/// A plugin file whose bytes happen to be JSON.
pub const EXPORT_JSON: &[u8] = br#"{"userid": 7, "errorcode": "notanerror"}"#;

#[derive(Debug)]
pub struct Site {
    pub token: String,
    pub files: HashMap<String, Vec<u8>>,
}

impl Default for Site {
    fn default() -> Self {
        let files = HashMap::from([
            (
                "901/mod_resource/content/1/week1.pdf".to_string(),
                WEEK1_PDF.to_vec(),
            ),
            ("5/user/private/export.json".to_string(), EXPORT_JSON.to_vec()),
        ]);
        Self {
            token: TOKEN.to_string(),
            files,
        }
    }
}

type Params = Query<HashMap<String, String>>;

pub fn app() -> Router {
    app_with(Site::default())
}

pub fn app_with(site: Site) -> Router {
    Router::new()
        .route("/webservice/rest/server.php", get(rest))
        .route("/login/token.php", get(login))
        .route("/webservice/pluginfile.php/{*path}", get(pluginfile))
        .with_state(Arc::new(site))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn fixture(raw: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], raw).into_response()
}

fn moodle_error(exception: &str, errorcode: &str, message: &str) -> Response {
    Json(json!({
        "exception": exception,
        "errorcode": errorcode,
        "message": message,
    }))
    .into_response()
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}

async fn rest(State(site): State<Arc<Site>>, Query(params): Params) -> Response {
    if param(&params, "wstoken") != Some(site.token.as_str()) {
        return moodle_error("moodle_exception", "invalidtoken", "Invalid token - token not found");
    }
    if param(&params, "moodlewsrestformat") != Some("json") {
        return moodle_error(
            "invalid_parameter_exception",
            "invalidparameter",
            "Invalid parameter value detected",
        );
    }

    let function = param(&params, "wsfunction").unwrap_or_default();
    debug!(function, "rest call");
    match function {
        "core_webservice_get_site_info" => fixture(SITE_INFO),
        "core_course_get_courses" => fixture(USERS_COURSES),
        "core_course_get_contents" => course_contents(&params),
        "core_enrol_get_users_courses" => users_courses(&params),
        "core_files_get_files" => Json(json!({"parents": [], "files": []})).into_response(),
        "core_user_get_private_files_info" => fixture(PRIVATE_FILES_INFO),
        "core_user_get_user_preferences" => fixture(USER_PREFERENCES),
        "mod_resource_get_resources_by_courses" => resources(&params),
        _ => moodle_error(
            "dml_missing_record_exception",
            "invalidrecord",
            "Can't find data record in database table external_functions.",
        ),
    }
}

fn course_contents(params: &HashMap<String, String>) -> Response {
    match param(params, "courseid").and_then(|id| id.parse::<i64>().ok()) {
        None => moodle_error(
            "invalid_parameter_exception",
            "invalidparameter",
            "Invalid parameter value detected",
        ),
        Some(COURSE_ID) => fixture(COURSE_CONTENTS),
        Some(5) => fixture("[]"),
        Some(id) => moodle_error(
            "moodle_exception",
            "errorcoursecontextnotvalid",
            &format!("You cannot execute functions in the course context (course id:{id})."),
        ),
    }
}

fn users_courses(params: &HashMap<String, String>) -> Response {
    match param(params, "userid").and_then(|id| id.parse::<i64>().ok()) {
        None => moodle_error(
            "invalid_parameter_exception",
            "invalidparameter",
            "Invalid parameter value detected",
        ),
        Some(USER_ID) => fixture(USERS_COURSES),
        Some(_) => moodle_error(
            "required_capability_exception",
            "nopermissions",
            "Sorry, but you do not currently have permissions to do that (View participants).",
        ),
    }
}

fn resources(params: &HashMap<String, String>) -> Response {
    let requested: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key.starts_with("courseids["))
        .map(|(_, value)| value.as_str())
        .collect();
    let course = COURSE_ID.to_string();
    if requested.is_empty() || requested.contains(&course.as_str()) {
        fixture(RESOURCES)
    } else {
        Json(json!({"resources": [], "warnings": []})).into_response()
    }
}

async fn login(State(site): State<Arc<Site>>, Query(params): Params) -> Response {
    if param(&params, "service") != Some(SERVICE) {
        return Json(json!({
            "error": "Web service is not available (it doesn't exist or might be disabled)",
            "errorcode": "servicenotavailable",
            "stacktrace": null,
            "debuginfo": null,
            "reproductionlink": null,
        }))
        .into_response();
    }
    if param(&params, "username") != Some(USERNAME) || param(&params, "password") != Some(PASSWORD)
    {
        return Json(json!({
            "error": "Invalid login, please try again",
            "errorcode": "invalidlogin",
            "stacktrace": null,
            "debuginfo": null,
            "reproductionlink": null,
        }))
        .into_response();
    }
    Json(json!({
        "token": site.token,
        "privatetoken": Uuid::new_v4().simple().to_string(),
    }))
    .into_response()
}

async fn pluginfile(
    State(site): State<Arc<Site>>,
    Path(path): Path<String>,
    Query(params): Params,
) -> Response {
    if param(&params, "token") != Some(site.token.as_str()) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Invalid token", "errorcode": "invalidtoken"})),
        )
            .into_response();
    }
    match site.files.get(&path) {
        Some(bytes) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
