//! Typed wrappers over the backend's REST endpoints.
//!
//! One module per backend router. Every function takes the shared
//! [`ApiClient`](crate::http::ApiClient), so bearer injection and the
//! session guard apply uniformly. Paths start at the router
//! (`/auth/login`); the `/api` mount point is part of the base URL.

pub mod alerts;
pub mod auth;
pub mod generator;
pub mod insights;
pub mod student;

use serde::Deserialize;

/// `{"message": "..."}` acknowledgement bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Percent-encode an id for use as a path segment.
fn segment(id: &str) -> String {
    crate::http::percent_encode(id)
}
