//! `/alerts` endpoints.

use serde::Serialize;

use crate::alerts::{AlertAcknowledger, AlertStats};
use crate::http::{ApiClient, ApiError, with_query};
use crate::models::{Alert, Category, Priority};

use super::{MessageResponse, segment};

/// Server-side narrowing of `GET /alerts/{parentId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertQuery {
    pub unread_only: bool,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub limit: Option<u32>,
}

impl AlertQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.unread_only {
            params.push(("unread_only", "true".to_string()));
        }
        if let Some(category) = self.category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

pub fn list(client: &mut ApiClient, parent_id: &str, query: &AlertQuery) -> Result<Vec<Alert>, ApiError> {
    let path = format!("/alerts/{}", segment(parent_id));
    client.get(&with_query(&path, &query.params()))
}

pub fn stats(client: &mut ApiClient, parent_id: &str) -> Result<AlertStats, ApiError> {
    client.get(&format!("/alerts/{}/stats", segment(parent_id)))
}

#[derive(Serialize)]
struct ReadBody {
    read: bool,
}

pub fn mark_read(client: &mut ApiClient, alert_id: &str) -> Result<(), ApiError> {
    let _: MessageResponse = client.patch(
        &format!("/alerts/{}/read", segment(alert_id)),
        &ReadBody { read: true },
    )?;
    Ok(())
}

impl AlertAcknowledger for ApiClient {
    fn acknowledge(&mut self, id: &str) -> Result<(), ApiError> {
        mark_read(self, id)
    }
}
