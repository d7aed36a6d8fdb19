//! Full client lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then logs in and exercises every
//! session operation over real HTTP with `UreqTransport`. A counting wrapper
//! around the transport checks how many round-trips each step costs.

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moodle_core::model::ModuleType;
use moodle_core::{
    ClientConfig, ErrorKind, HttpRequest, HttpResponse, MoodleLogin, MoodleSession, Transport,
    TransportError, UreqTransport,
};

struct Counting {
    inner: UreqTransport,
    sent: AtomicUsize,
}

impl Counting {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: UreqTransport::new(Duration::from_secs(5)),
            sent: AtomicUsize::new(0),
        })
    }

    fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

impl Transport for Counting {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.inner.send(request)
    }
}

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn session_lifecycle() {
    let base_url = start_server();

    // Step 1: log in.
    let login = MoodleLogin::new(&base_url, Counting::new()).unwrap();
    let token = login.login(mock_server::USERNAME, mock_server::PASSWORD).unwrap();
    assert_eq!(token.token(), mock_server::TOKEN);
    assert!(token.privatetoken().is_some());

    // Step 2: open a session; nothing is sent yet.
    let transport = Counting::new();
    let session = MoodleSession::new(&base_url, token.token(), transport.clone()).unwrap();
    assert_eq!(transport.sent(), 0);

    // Step 3: site info, then the memoized user id.
    let info = session.core_webservice_get_site_info().unwrap();
    assert_eq!(info.userid(), mock_server::USER_ID);
    assert_eq!(session.user_id().unwrap(), "7");
    assert_eq!(session.user_id().unwrap(), "7");
    assert_eq!(transport.sent(), 1);

    // Step 4: enrolled courses through the convenience layer (user id cached).
    let courses = session.fetch_courses(None).unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(transport.sent(), 2);

    // Step 5: course contents keep server order.
    let sections = session.core_course_get_contents(mock_server::COURSE_ID).unwrap();
    let kinds: Vec<_> = sections[1].modules().iter().map(|m| m.modname()).collect();
    assert_eq!(
        kinds,
        vec![ModuleType::Resource, ModuleType::Url, ModuleType::Assignment]
    );
    assert!(session.fetch_contents(5).unwrap().is_empty());

    // Step 6: the remaining calls.
    assert_eq!(session.core_course_get_courses().unwrap().len(), 2);
    assert_eq!(session.core_user_get_private_files_info().unwrap().filecount(), 4);
    assert_eq!(session.core_user_get_user_preferences().unwrap().warnings().len(), 1);
    let all = session.mod_resource_get_resources_by_courses(&[]).unwrap();
    assert_eq!(all.resources().len(), 2);
    let none = session.mod_resource_get_resources_by_courses(&[5]).unwrap();
    assert!(none.resources().is_empty());
    let files = session.core_files_get_files(&[]).unwrap();
    assert!(files["files"].as_array().unwrap().is_empty());

    // Step 7: download a file as a stream.
    let resource = &sections[1].modules()[0];
    let fileurl = resource.contents()[0].fileurl().clone().unwrap();
    let path = fileurl.strip_prefix("https://moodle.example.org").unwrap();
    let url = format!("{base_url}{path}");
    let mut stream = session.download(&url, &[]).unwrap();
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, mock_server::WEEK1_PDF);

    // Step 8: JSON bytes from a download are not decoded or error-checked.
    let url = format!("{base_url}/webservice/pluginfile.php/5/user/private/export.json");
    let mut stream = session.download(&url, &[]).unwrap();
    let mut text = String::new();
    stream.read_to_string(&mut text).unwrap();
    assert_eq!(text.as_bytes(), mock_server::EXPORT_JSON);
}

#[test]
fn api_errors_over_http() {
    let base_url = start_server();

    let bad = MoodleSession::new(&base_url, "not-the-token", Counting::new()).unwrap();
    let err = bad.core_webservice_get_site_info().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Token);
    assert_eq!(bad.user_id().unwrap_err().kind(), ErrorKind::Token);

    let session = MoodleSession::new(&base_url, mock_server::TOKEN, Counting::new()).unwrap();
    let err = session.core_course_get_contents(99).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Context);
    let err = session.core_enrol_get_users_courses("8").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permissions);

    let err = session
        .download(&format!("{base_url}/webservice/pluginfile.php/1/missing.txt"), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);

    let login = MoodleLogin::new(&base_url, Counting::new()).unwrap();
    let err = login.login(mock_server::USERNAME, "wrong").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.response().unwrap().errorcode, "invalidlogin");
}

#[test]
fn from_config_uses_ureq() {
    let base_url = start_server();
    let config = ClientConfig::new(base_url).with_token(mock_server::TOKEN);
    let session = MoodleSession::from_config(&config).unwrap();
    assert_eq!(session.user_id().unwrap(), "7");

    let login = MoodleLogin::from_config(&config).unwrap();
    assert!(login.login(mock_server::USERNAME, mock_server::PASSWORD).is_ok());
}

#[test]
fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let session = MoodleSession::new(&format!("http://{addr}"), "abc", Counting::new()).unwrap();
    let err = session.core_webservice_get_site_info().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
