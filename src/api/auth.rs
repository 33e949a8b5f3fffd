//! `/auth` endpoints. Login and signup store the returned session.

use serde::Deserialize;

use crate::http::{ApiClient, ApiError};
use crate::models::session::{LoginRequest, SignupRequest};
use crate::models::{TokenResponse, User};
use crate::store::AuthAction;
use crate::validation;

use super::MessageResponse;

/// Sign in and keep the session. Returns the signed-in user.
pub fn login(client: &mut ApiClient, email: &str, password: &str) -> Result<User, ApiError> {
    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    validation::login(&request)?;

    let token: TokenResponse = client.post_anonymous("/auth/login", &request)?;
    Ok(store_session(client, token))
}

/// Create an account and keep the session.
pub fn signup(client: &mut ApiClient, request: &SignupRequest) -> Result<User, ApiError> {
    validation::signup(request)?;

    let token: TokenResponse = client.post_anonymous("/auth/signup", request)?;
    Ok(store_session(client, token))
}

fn store_session(client: &mut ApiClient, token: TokenResponse) -> User {
    client.auth_mut().login(token.user.clone(), token.access_token);
    token.user
}

/// Exchange the current token for a fresh one.
pub fn refresh(client: &mut ApiClient) -> Result<(), ApiError> {
    let token: TokenResponse = client.post("/auth/refresh", &serde_json::json!({}))?;
    client
        .auth_mut()
        .dispatch(AuthAction::RefreshToken(token.access_token));
    Ok(())
}

/// Sign out. The local session is cleared even if the server call fails.
pub fn logout(client: &mut ApiClient) -> Result<(), ApiError> {
    let result = if client.auth().is_authenticated() {
        client
            .post::<_, MessageResponse>("/auth/logout", &serde_json::json!({}))
            .map(|_| ())
    } else {
        Ok(())
    };
    client.auth_mut().logout();
    result
}

pub fn profile(client: &mut ApiClient) -> Result<User, ApiError> {
    client.get("/auth/profile")
}

#[derive(Debug, Clone, Deserialize)]
pub struct Verification {
    pub valid: bool,
    pub user: Option<User>,
}

/// Ask the server whether the stored token is still accepted.
pub fn verify(client: &mut ApiClient) -> Result<Verification, ApiError> {
    client.get("/auth/verify")
}
