/// Session lifecycle through the typed API wrappers, with a scripted
/// in-memory transport standing in for the backend.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use progress_tracker::alerts::{self, ReadOutcome};
use progress_tracker::api;
use progress_tracker::api::alerts::AlertQuery;
use progress_tracker::http::error::SESSION_EXPIRED;
use progress_tracker::http::{ApiClient, ApiError, HttpRequest, HttpResponse, Method, Transport};
use progress_tracker::models::{Alert, Category, Priority, User};
use progress_tracker::store::{AuthStore, StudentStore};
use progress_tracker::ui::{RecordingNotifier, Route, ToastLevel};

// ---------------------------------------------------------------------------
// Scripted backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Script {
    replies: RefCell<VecDeque<HttpResponse>>,
    seen: RefCell<Vec<HttpRequest>>,
}

struct ScriptedTransport(Rc<Script>);

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.0.seen.borrow_mut().push(request.clone());
        self.0
            .replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("connection refused".into()))
    }
}

struct Harness {
    client: ApiClient,
    notifier: Rc<RecordingNotifier>,
    script: Rc<Script>,
}

impl Harness {
    fn new(signed_in: bool, replies: Vec<HttpResponse>) -> Self {
        let script = Rc::new(Script::default());
        script.replies.borrow_mut().extend(replies);
        let notifier = Rc::new(RecordingNotifier::new());
        let mut auth = AuthStore::in_memory();
        if signed_in {
            auth.login(parent(), "old-token");
        }
        let client = ApiClient::new(
            "http://backend/api",
            Box::new(ScriptedTransport(Rc::clone(&script))),
            auth,
            notifier.clone(),
        );
        Self {
            client,
            notifier,
            script,
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.script.seen.borrow().clone()
    }
}

fn parent() -> User {
    User {
        id: "parent-1".into(),
        email: "parent@example.com".into(),
        name: "Pat Parent".into(),
        student_id: "STU001".into(),
        ..Default::default()
    }
}

fn token_body(token: &str) -> String {
    serde_json::json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 1800,
        "user": {"id": "parent-1", "email": "parent@example.com", "student_id": "STU001"}
    })
    .to_string()
}

const UNAUTHORIZED: &str = r#"{"detail":"Could not validate credentials"}"#;

// ---------------------------------------------------------------------------
// Sign in / sign out
// ---------------------------------------------------------------------------

#[test]
fn login_stores_session_and_later_requests_carry_it() {
    let mut h = Harness::new(
        false,
        vec![HttpResponse::new(200, token_body("fresh")), HttpResponse::new(200, "[]")],
    );

    let user = api::auth::login(&mut h.client, " parent@example.com ", "secret").unwrap();
    assert_eq!(user.id, "parent-1");
    assert!(h.client.auth().is_authenticated());

    let alerts = api::alerts::list(&mut h.client, "parent-1", &AlertQuery::default()).unwrap();
    assert!(alerts.is_empty());

    let requests = h.requests();
    assert_eq!(requests[0].url, "http://backend/api/auth/login");
    assert!(requests[0].header("Authorization").is_none());
    let body: serde_json::Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["email"], "parent@example.com");
    assert_eq!(requests[1].header("Authorization"), Some("Bearer fresh"));
}

#[test]
fn empty_credentials_never_reach_the_server() {
    let mut h = Harness::new(false, vec![]);
    let err = api::auth::login(&mut h.client, "parent@example.com", "").unwrap_err();
    assert_eq!(err, ApiError::Validation("Please fill in all fields".into()));
    assert!(h.requests().is_empty());
}

#[test]
fn wrong_password_is_an_ordinary_error() {
    let mut h = Harness::new(
        false,
        vec![HttpResponse::new(401, r#"{"detail":"Incorrect email or password"}"#)],
    );
    let err = api::auth::login(&mut h.client, "parent@example.com", "nope").unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message("x"), "Incorrect email or password");
    assert!(h.notifier.routes().is_empty());
    assert!(h.notifier.toasts().is_empty());
}

#[test]
fn relogin_with_stale_token_keeps_server_detail() {
    let mut h = Harness::new(
        true,
        vec![HttpResponse::new(401, r#"{"detail":"Incorrect email or password"}"#)],
    );

    let err = api::auth::login(&mut h.client, "parent@example.com", "typo").unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));
    assert_eq!(err.user_message("x"), "Incorrect email or password");
    assert!(h.notifier.routes().is_empty());
    assert!(h.notifier.toasts().is_empty());
    assert!(h.requests()[0].header("Authorization").is_none());
    // The old session is left as it was; only a successful login replaces it.
    assert_eq!(h.client.auth().token(), Some("old-token"));
}

#[test]
fn signup_never_sends_the_stored_token() {
    let mut h = Harness::new(true, vec![HttpResponse::new(200, token_body("new-account"))]);
    let request = progress_tracker::models::session::SignupRequest {
        email: "new@example.com".into(),
        name: "New Parent".into(),
        student_name: "Sam".into(),
        student_id: "STU002".into(),
        phone: None,
        password: "secret1".into(),
        confirm_password: "secret1".into(),
    };

    api::auth::signup(&mut h.client, &request).unwrap();
    assert!(h.requests()[0].header("Authorization").is_none());
    assert_eq!(h.client.auth().token(), Some("new-account"));
}

#[test]
fn logout_clears_session_even_when_server_fails() {
    let mut h = Harness::new(true, vec![HttpResponse::new(500, "{}")]);
    assert!(api::auth::logout(&mut h.client).is_err());
    assert!(!h.client.auth().is_authenticated());
    assert!(h.client.auth().user().is_none());
}

#[test]
fn refresh_replaces_only_the_token() {
    let mut h = Harness::new(true, vec![HttpResponse::new(200, token_body("rotated"))]);
    api::auth::refresh(&mut h.client).unwrap();
    assert_eq!(h.client.auth().token(), Some("rotated"));
    assert_eq!(h.client.auth().user().unwrap().name, "Pat Parent");
}

// ---------------------------------------------------------------------------
// Session guard
// ---------------------------------------------------------------------------

#[test]
fn expired_token_on_get_resets_session_once() {
    let mut h = Harness::new(true, vec![HttpResponse::new(401, UNAUTHORIZED)]);

    let err = api::student::overview(&mut h.client, "STU001").unwrap_err();
    assert_eq!(err, ApiError::SessionExpired);
    assert!(!h.client.auth().is_authenticated());
    assert_eq!(h.notifier.routes(), [Route::Login]);
    assert_eq!(h.notifier.messages(ToastLevel::Warning), [SESSION_EXPIRED]);

    // The next call goes out anonymously and does not fire the guard again.
    let _ = api::student::overview(&mut h.client, "STU001");
    let requests = h.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].header("Authorization").is_none());
    assert_eq!(h.notifier.routes().len(), 1);
}

#[test]
fn expired_token_on_post_resets_session() {
    let mut h = Harness::new(true, vec![HttpResponse::new(401, UNAUTHORIZED)]);
    let err = api::insights::generate(&mut h.client, "STU001", "How is math going?").unwrap_err();
    assert_eq!(err, ApiError::SessionExpired);
    assert!(!h.client.auth().is_authenticated());
    assert_eq!(h.requests()[0].method, Method::Post);
}

#[test]
fn expired_token_while_marking_read_leaves_alert_unread() {
    let mut h = Harness::new(true, vec![HttpResponse::new(401, UNAUTHORIZED)]);
    let at = Utc.with_ymd_and_hms(2024, 10, 16, 9, 0, 0).unwrap();
    let mut store = StudentStore::with_alerts(vec![Alert::new(
        "a1",
        Priority::High,
        Category::Academic,
        "Math Performance Decline",
        "",
        at,
    )]);

    let notifier = Rc::clone(&h.notifier);
    let outcome = alerts::mark_read(&mut store, &mut h.client, notifier.as_ref(), "a1");
    assert!(matches!(outcome, ReadOutcome::Failed(_)));
    assert!(!store.state().find_alert("a1").unwrap().read);

    let request = &h.requests()[0];
    assert_eq!(request.method, Method::Patch);
    assert_eq!(request.url, "http://backend/api/alerts/a1/read");
    assert_eq!(request.body.as_deref(), Some(r#"{"read":true}"#));

    // Only the session guard spoke.
    assert_eq!(h.notifier.toasts().len(), 1);
    assert!(h.notifier.messages(ToastLevel::Error).is_empty());
}

#[test]
fn other_statuses_keep_the_session() {
    let mut h = Harness::new(
        true,
        vec![HttpResponse::new(403, r#"{"detail":"Access denied to this student's data"}"#)],
    );
    let err = api::student::academic(&mut h.client, "STU999").unwrap_err();
    assert_eq!(err.user_message("x"), "Access denied to this student's data");
    assert!(h.client.auth().is_authenticated());
    assert!(h.notifier.routes().is_empty());
}
