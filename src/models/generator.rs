use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alert::{Alert, AlertType, Category, Priority};
use super::timestamp;

/// Class participation level reported on the generator form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ParticipationLevel {
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Student metrics submitted to `POST /alert-generator/generate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentAlertRequest {
    pub name: String,
    pub roll_number: String,
    pub attendance_percentage: f64,
    /// GPA (0–4.0) or marks (0–100).
    pub academic_performance: f64,
    #[serde(default)]
    pub behavior_notes: String,
    #[serde(default)]
    pub participation_level: ParticipationLevel,
    #[serde(default)]
    pub additional_comments: String,
}

/// One alert proposed by the generator, with the model's reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAlert {
    pub alert_type: AlertType,
    pub priority: Priority,
    pub category: Category,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub action_required: bool,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize_option"
    )]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Response of `POST /alert-generator/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertGenerationResponse {
    pub student_name: String,
    pub student_roll_number: String,
    pub alerts: Vec<GeneratedAlert>,
    #[serde(default)]
    pub summary: BTreeMap<String, serde_json::Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize_option"
    )]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub ai_powered: bool,
}

/// Response of `POST /alert-generator/generate-and-save`.
///
/// The saved alerts come back in the regular [`Alert`] shape and can be
/// appended to the local collection directly.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateAndSaveResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub summary: BTreeMap<String, serde_json::Value>,
    #[serde(default = "default_true")]
    pub ai_powered: bool,
}

/// Response of `GET /alert-generator/test-connection`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorStatus {
    pub status: String,
    #[serde(default)]
    pub ai_available: bool,
    #[serde(default)]
    pub message: String,
}

fn default_true() -> bool {
    true
}
