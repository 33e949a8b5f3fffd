use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A stored AI insight about the student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub insight_type: String,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /insights/{student_id}/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct InsightQuery {
    pub query: String,
}

/// Answer returned by the insight generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    pub insight: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub data_used: Vec<String>,
}
