//! `/insights` endpoints.

use crate::http::{ApiClient, ApiError, with_query};
use crate::models::insight::{Insight, InsightQuery, InsightResponse};
use crate::validation;

use super::segment;

/// Stored insights, newest first.
pub fn list(client: &mut ApiClient, student_id: &str, limit: Option<u32>) -> Result<Vec<Insight>, ApiError> {
    let params: Vec<(&str, String)> = limit.map(|l| ("limit", l.to_string())).into_iter().collect();
    client.get(&with_query(&format!("/insights/{}", segment(student_id)), &params))
}

/// Ask a free-form question about the student.
pub fn generate(client: &mut ApiClient, student_id: &str, query: &str) -> Result<InsightResponse, ApiError> {
    validation::insight_query(query)?;
    let body = InsightQuery {
        query: query.trim().to_string(),
    };
    client.post(&format!("/insights/{}/generate", segment(student_id)), &body)
}
