/// Authentication store with file-backed persistence.
///
/// The session (user profile + bearer token) is persisted to
/// `~/.ptrack/session.json` so it survives across short-lived `ptrack`
/// invocations. All file I/O is best-effort: a missing or corrupt file
/// simply yields a signed-out session, and write failures are ignored.
use std::fs;
use std::path::PathBuf;

use crate::models::{AuthSession, User};

/// Mutations of the authentication session.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Login { user: User, token: String },
    RefreshToken(String),
    Logout,
}

/// Apply an action to a session.
pub fn reduce(state: AuthSession, action: AuthAction) -> AuthSession {
    match action {
        AuthAction::Login { user, token } => AuthSession {
            user: Some(user),
            token,
        },
        AuthAction::RefreshToken(token) => {
            if state.is_authenticated() {
                AuthSession { token, ..state }
            } else {
                state
            }
        }
        AuthAction::Logout => AuthSession::default(),
    }
}

/// Holds the current session and persists every change.
#[derive(Debug)]
pub struct AuthStore {
    session: AuthSession,
    path: Option<PathBuf>,
}

impl AuthStore {
    /// Load the session from `~/.ptrack/session.json`.
    pub fn load() -> Self {
        match session_path() {
            Some(path) => Self::load_from(path),
            None => Self::in_memory(),
        }
    }

    /// Load the session from an explicit file.
    pub fn load_from(path: PathBuf) -> Self {
        let session = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            session,
            path: Some(path),
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            session: AuthSession::default(),
            path: None,
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The bearer token, if signed in.
    pub fn token(&self) -> Option<&str> {
        if self.session.token.is_empty() {
            None
        } else {
            Some(&self.session.token)
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn dispatch(&mut self, action: AuthAction) {
        let current = std::mem::take(&mut self.session);
        self.session = reduce(current, action);
        let _ = self.save();
    }

    pub fn login(&mut self, user: User, token: impl Into<String>) {
        self.dispatch(AuthAction::Login {
            user,
            token: token.into(),
        });
    }

    pub fn logout(&mut self) {
        self.dispatch(AuthAction::Logout);
    }

    fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.session)?;
        fs::write(path, json)
    }
}

/// Path of the persisted session file.
pub fn session_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ptrack").join("session.json"))
}
