use serde::{Deserialize, Serialize};

/// Parent account profile as returned by `/auth/login` and `/auth/profile`.
///
/// Treated as opaque by the session logic; `id` and `student_id` are the
/// only fields other modules read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "parent".to_string()
}

/// Token envelope returned by login, signup and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
    pub user: User,
}

/// Client-held authentication state.
///
/// `token` is empty when signed out; [`is_authenticated`](Self::is_authenticated)
/// is derived from it and never stored separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: String,
}

impl AuthSession {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account registration for `POST /auth/signup`.
///
/// `confirm_password` is checked client-side and never sent.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub student_name: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_is_authenticated_only_with_token() {
        let mut session = AuthSession::default();
        assert!(!session.is_authenticated());
        session.token = "abc".to_string();
        assert!(session.is_authenticated());
    }

    #[test]
    fn token_response_deserializes() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 1800,
            "user": {"id": "u1", "email": "parent@example.com", "name": "John Smith",
                     "student_name": "Emily Smith", "student_id": "STU001",
                     "created_at": "2024-10-01T00:00:00", "updated_at": "2024-10-01T00:00:00"}
        }"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "jwt");
        assert_eq!(resp.user.student_id, "STU001");
        assert_eq!(resp.user.role, "parent");
    }

    #[test]
    fn signup_request_never_serializes_confirmation() {
        let req = SignupRequest {
            email: "a@b.co".into(),
            name: "A".into(),
            student_name: "B".into(),
            student_id: "STU9".into(),
            phone: None,
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("confirm_password"));
        assert!(!json.contains("phone"));
    }
}
