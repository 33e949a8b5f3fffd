/// End-to-end client tests against a local `tiny_http` backend.
///
/// Each test starts a server on an ephemeral port that answers a fixed
/// number of requests and records what it received.
use std::io::Read;
use std::rc::Rc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use progress_tracker::activity::ActivityLog;
use progress_tracker::api;
use progress_tracker::api::alerts::AlertQuery;
use progress_tracker::http::{ApiClient, ApiError, UreqTransport};
use progress_tracker::models::{Category, Priority, User};
use progress_tracker::store::AuthStore;
use progress_tracker::ui::{RecordingNotifier, Route};
use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone)]
struct Received {
    method: String,
    url: String,
    authorization: Option<String>,
    body: String,
}

/// Serve `replies` in order, one per request, then stop.
fn backend(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Received>>) {
    let server = Server::http("127.0.0.1:0").expect("bind test server");
    let port = server
        .server_addr()
        .to_ip()
        .expect("tcp listener")
        .port();

    let handle = thread::spawn(move || {
        let mut received = Vec::new();
        for (status, body) in replies {
            let Ok(Some(mut request)) = server.recv_timeout(Duration::from_secs(5)) else {
                break;
            };
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            received.push(Received {
                method: request.method().to_string(),
                url: request.url().to_string(),
                authorization: request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Authorization"))
                    .map(|h| h.value.as_str().to_string()),
                body: buf,
            });
            let header = Header::from_bytes("Content-Type", "application/json").expect("header");
            let _ = request.respond(
                Response::from_string(body)
                    .with_header(header)
                    .with_status_code(status),
            );
        }
        received
    });

    (format!("http://127.0.0.1:{port}/api"), handle)
}

fn client(base_url: &str, signed_in: bool) -> (ApiClient, Rc<RecordingNotifier>) {
    let notifier = Rc::new(RecordingNotifier::new());
    let mut auth = AuthStore::in_memory();
    if signed_in {
        auth.login(
            User {
                id: "parent-1".into(),
                student_id: "STU001".into(),
                ..Default::default()
            },
            "tok-123",
        );
    }
    let client = ApiClient::new(base_url, Box::new(UreqTransport), auth, notifier.clone())
        .with_timeout(Duration::from_secs(5));
    (client, notifier)
}

const ALERTS: &str = r#"[
    {"id": "a1", "type": "warning", "priority": "high", "category": "academic",
     "title": "Math Performance Decline", "message": "Scores dropped",
     "created_at": "2024-10-16T09:00:00", "read": false, "action_required": true},
    {"id": "a2", "type": "info", "priority": "low", "category": "engagement",
     "title": "Study streak", "message": "", "created_at": "2024-10-14T09:00:00Z",
     "read": true}
]"#;

#[test]
fn fetches_alerts_with_bearer_and_query() {
    let (base, server) = backend(vec![(200, ALERTS)]);
    let (mut c, _) = client(&base, true);

    let query = AlertQuery {
        unread_only: true,
        category: Some(Category::Academic),
        ..Default::default()
    };
    let alerts = api::alerts::list(&mut c, "parent-1", &query).unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].priority, Priority::High);
    assert!(alerts[0].action_required);
    assert!(alerts[1].read);

    let received = server.join().unwrap();
    assert_eq!(received[0].method, "GET");
    assert_eq!(
        received[0].url,
        "/api/alerts/parent-1?unread_only=true&category=academic"
    );
    assert_eq!(received[0].authorization.as_deref(), Some("Bearer tok-123"));
}

#[test]
fn mark_read_sends_patch_with_body() {
    let (base, server) = backend(vec![(200, r#"{"message": "Alert marked as read"}"#)]);
    let (mut c, _) = client(&base, true);

    api::alerts::mark_read(&mut c, "a1").unwrap();

    let received = server.join().unwrap();
    assert_eq!(received[0].method, "PATCH");
    assert_eq!(received[0].url, "/api/alerts/a1/read");
    assert_eq!(received[0].body, r#"{"read":true}"#);
}

#[test]
fn unauthorized_response_expires_the_session() {
    let (base, server) = backend(vec![(401, r#"{"detail": "Token expired"}"#)]);
    let (mut c, notifier) = client(&base, true);

    let err = api::student::engagement(&mut c, "STU001").unwrap_err();
    assert_eq!(err, ApiError::SessionExpired);
    assert!(!c.auth().is_authenticated());
    assert_eq!(notifier.routes(), [Route::Login]);
    server.join().unwrap();
}

#[test]
fn server_detail_reaches_the_user() {
    let (base, server) = backend(vec![(404, r#"{"detail": "Alert not found or access denied"}"#)]);
    let (mut c, _) = client(&base, true);

    let err = api::alerts::mark_read(&mut c, "missing").unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message("fallback"), "Alert not found or access denied");
    assert!(c.auth().is_authenticated());
    server.join().unwrap();
}

#[test]
fn unreachable_backend_is_a_transport_error() {
    // Bind and drop to get a port nobody listens on.
    let port = {
        let server = Server::http("127.0.0.1:0").unwrap();
        server.server_addr().to_ip().unwrap().port()
    };
    let (mut c, notifier) = client(&format!("http://127.0.0.1:{port}/api"), true);

    let err = api::student::academic(&mut c, "STU001").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(c.auth().is_authenticated());
    assert!(notifier.toasts().is_empty());
}

#[test]
fn requests_are_written_to_the_activity_log() {
    let path = std::env::temp_dir().join(format!("ptrack-http-test-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let (base, server) = backend(vec![(200, "[]"), (500, "{}")]);
    let (c, _) = client(&base, true);
    let mut c = c.with_activity_log(ActivityLog::at(&path));

    api::insights::list(&mut c, "STU001", Some(5)).unwrap();
    assert!(api::student::attendance(&mut c, "STU001").is_err());
    server.join().unwrap();

    let entries = ActivityLog::at(&path).read_all();
    let _ = std::fs::remove_file(&path);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path, "/insights/STU001");
    assert_eq!(entries[0].outcome, "ok");
    assert_eq!(entries[1].status, Some(500));
    assert_eq!(entries[1].outcome, "error");
}
