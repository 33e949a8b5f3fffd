//! HTTP client for the student progress backend.
//!
//! [`ApiClient`] owns the authentication store and applies two global
//! policies to every request:
//!
//! - **Bearer injection**: when a session token is held, every request
//!   carries `Authorization: Bearer <token>`.
//! - **Session guard**: a 401 on a request that carried a token clears the
//!   session, shows a "session expired" notification and navigates to the
//!   login route. The reset is idempotent and independent of which API call
//!   triggered it.
//!
//! Request execution is behind the [`Transport`] trait so the policies can
//! be exercised without a network. The production transport is
//! [`UreqTransport`]. There is no retry anywhere: a failed request is
//! surfaced once.

pub mod error;
mod transport;

use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::activity::{ActivityLog, RequestLogEntry};
use crate::config::schema::ApiConfig;
use crate::store::AuthStore;
use crate::ui::{Notifier, Route, ToastLevel};

pub use error::ApiError;
pub use transport::UreqTransport;

// ---------------------------------------------------------------------------
// Transport abstraction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-built request, ready for a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of any HTTP response, including error statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes requests. Returns `Err` only when no HTTP response was received.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    transport: Box<dyn Transport>,
    auth: AuthStore,
    notifier: Rc<dyn Notifier>,
    activity: Option<ActivityLog>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        transport: Box<dyn Transport>,
        auth: AuthStore,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            transport,
            auth,
            notifier,
            activity: None,
        }
    }

    /// Build a client that talks HTTP via `ureq`.
    pub fn from_config(config: &ApiConfig, auth: AuthStore, notifier: Rc<dyn Notifier>) -> Self {
        Self::new(&config.base_url, Box::new(UreqTransport), auth, notifier)
            .with_timeout(Duration::from_millis(config.timeout_ms))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_activity_log(mut self, log: ActivityLog) -> Self {
        self.activity = Some(log);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn get<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(Method::Get, path, None, true)?;
        decode(&body)
    }

    pub fn post<B, T>(&mut self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::Post, path, Some(encode(payload)?), true)?;
        decode(&body)
    }

    /// POST without the stored bearer token, for credential endpoints.
    ///
    /// A 401 here is an ordinary error and never expires the session.
    pub fn post_anonymous<B, T>(&mut self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::Post, path, Some(encode(payload)?), false)?;
        decode(&body)
    }

    pub fn patch<B, T>(&mut self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::Patch, path, Some(encode(payload)?), true)?;
        decode(&body)
    }

    /// Send one request and return the body of a 2xx response.
    fn execute(
        &mut self,
        method: Method,
        path: &str,
        body: Option<String>,
        with_bearer: bool,
    ) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let bearer = if with_bearer {
            self.auth.token().map(str::to_string)
        } else {
            None
        };

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = &bearer {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let request = HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: self.timeout,
        };

        let started = Instant::now();
        let result = self.transport.send(&request);
        let latency_ms = started.elapsed().as_millis() as u64;
        self.record(method, path, result.as_ref().ok().map(|r| r.status), latency_ms);

        let response = result?;
        match response.status {
            200..=299 => Ok(response.body),
            401 if bearer.is_some() => {
                self.expire_session();
                Err(ApiError::SessionExpired)
            }
            status => Err(ApiError::from_status(status, &response.body)),
        }
    }

    /// Clear the session and send the user back to the login entry point.
    fn expire_session(&mut self) {
        self.auth.logout();
        self.notifier.toast(ToastLevel::Warning, error::SESSION_EXPIRED);
        self.notifier.navigate(Route::Login);
    }

    fn record(&self, method: Method, path: &str, status: Option<u16>, latency_ms: u64) {
        if let Some(log) = &self.activity {
            log.append(&RequestLogEntry::now(method.as_str(), path, status, latency_ms));
        }
    }
}

fn encode<B: Serialize + ?Sized>(payload: &B) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    // Some endpoints answer 204 / empty bodies; treat those as JSON null.
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Append `?key=value&...` to a path, percent-encoding the values.
pub fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{k}={}", percent_encode(v)))
        .collect();
    format!("{path}?{}", query.join("&"))
}

/// Percent-encode a path segment or query value (RFC 3986 unreserved set).
pub fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::ui::RecordingNotifier;
    use std::cell::RefCell;

    /// Replies with a fixed response and remembers what it was sent.
    struct Canned {
        response: Result<HttpResponse, ApiError>,
        seen: Rc<RefCell<Vec<HttpRequest>>>,
    }

    impl Transport for Canned {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.clone());
            self.response.clone()
        }
    }

    fn client(
        response: Result<HttpResponse, ApiError>,
        signed_in: bool,
    ) -> (ApiClient, Rc<RecordingNotifier>, Rc<RefCell<Vec<HttpRequest>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let notifier = Rc::new(RecordingNotifier::new());
        let mut auth = AuthStore::in_memory();
        if signed_in {
            auth.login(User { id: "p1".into(), ..Default::default() }, "tok");
        }
        let transport = Canned {
            response,
            seen: Rc::clone(&seen),
        };
        let client = ApiClient::new("http://host/api/", Box::new(transport), auth, notifier.clone());
        (client, notifier, seen)
    }

    #[test]
    fn joins_base_url_and_injects_bearer() {
        let (mut c, _, seen) = client(Ok(HttpResponse::new(200, "{}")), true);
        let _: serde_json::Value = c.get("/auth/profile").unwrap();
        let req = &seen.borrow()[0];
        assert_eq!(req.url, "http://host/api/auth/profile");
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn no_authorization_header_without_session() {
        let (mut c, _, seen) = client(Ok(HttpResponse::new(200, "null")), false);
        let _: serde_json::Value = c.post("/auth/login", &serde_json::json!({})).unwrap();
        let req = &seen.borrow()[0];
        assert!(req.header("Authorization").is_none());
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn unauthorized_with_token_expires_session() {
        let (mut c, notifier, _) = client(Ok(HttpResponse::new(401, r#"{"detail":"bad token"}"#)), true);
        let err = c.get::<serde_json::Value>("/alerts/p1").unwrap_err();
        assert_eq!(err, ApiError::SessionExpired);
        assert!(!c.auth().is_authenticated());
        assert_eq!(notifier.routes(), [Route::Login]);
        assert_eq!(notifier.messages(ToastLevel::Warning), [error::SESSION_EXPIRED]);
    }

    #[test]
    fn unauthorized_without_token_is_a_plain_error() {
        let (mut c, notifier, _) = client(
            Ok(HttpResponse::new(401, r#"{"detail":"Incorrect email or password"}"#)),
            false,
        );
        let err = c.post::<_, serde_json::Value>("/auth/login", &()).unwrap_err();
        assert_eq!(err.user_message("x"), "Incorrect email or password");
        assert!(notifier.routes().is_empty());
    }

    #[test]
    fn transport_errors_pass_through() {
        let (mut c, _, _) = client(Err(ApiError::Transport("connection refused".into())), true);
        let err = c.get::<serde_json::Value>("/x").unwrap_err();
        assert_eq!(err, ApiError::Transport("connection refused".into()));
        assert!(c.auth().is_authenticated());
    }

    #[test]
    fn bad_json_is_a_decode_error() {
        let (mut c, _, _) = client(Ok(HttpResponse::new(200, "not json")), true);
        let err = c.get::<Vec<String>>("/x").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn query_values_are_encoded() {
        assert_eq!(with_query("/a", &[]), "/a");
        assert_eq!(
            with_query("/a", &[("student_id", "STU 1".into()), ("x", "a&b".into())]),
            "/a?student_id=STU%201&x=a%26b"
        );
    }
}
