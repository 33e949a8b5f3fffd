use thiserror::Error;

/// Fallback shown when nothing more specific is known.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Message shown when the session guard fires.
pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

/// Failure of an API call, or of the client-side checks that precede one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server rejected the bearer token. The session has been cleared.
    #[error("session expired")]
    SessionExpired,

    /// Non-success HTTP status, with whatever the body carried.
    #[error("request failed with status code {status}")]
    Status {
        status: u16,
        detail: Option<String>,
        message: Option<String>,
    },

    /// The request never produced an HTTP response.
    #[error("{0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Build a status error from a raw response body.
    ///
    /// Picks up the backend's `{"detail": ...}` envelope and a `message`
    /// field when present. Non-string details (validation lists) are kept
    /// as compact JSON.
    pub fn from_status(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let field = |name: &str| -> Option<String> {
            let value = parsed.as_ref()?.get(name)?;
            match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) if s.trim().is_empty() => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            }
        };
        Self::Status {
            status,
            detail: field("detail"),
            message: field("message"),
        }
    }

    /// The most specific human-readable message available.
    ///
    /// Precedence: server `detail` → server `message` → transport error →
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::SessionExpired => SESSION_EXPIRED.to_string(),
            Self::Status {
                detail, message, ..
            } => detail
                .clone()
                .or_else(|| message.clone())
                .unwrap_or_else(|| self.to_string()),
            Self::Transport(msg) if !msg.trim().is_empty() => msg.clone(),
            Self::Validation(msg) => msg.clone(),
            Self::Transport(_) | Self::Decode(_) => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
