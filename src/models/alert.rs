use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Visual type of an alert. Drives icon and border colour only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Warning,
    Error,
    Success,
    #[default]
    Info,
    #[serde(other)]
    Unknown,
}

impl AlertType {
    pub const ALL: [AlertType; 4] = [Self::Error, Self::Warning, Self::Success, Self::Info];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
            Self::Info => "info",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert priority. Ordinal: used as the primary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::High, Self::Medium, Self::Low];

    /// Sort rank: high=3, medium=2, low=1. Unrecognised values sort last.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unknown => 0,
        }
    }

    /// Parse a priority name (case-insensitive).
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert category. Used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Academic,
    Attendance,
    Engagement,
    General,
    #[serde(other)]
    Unknown,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Self::Academic,
        Self::Attendance,
        Self::Engagement,
        Self::General,
    ];

    /// Parse a category name (case-insensitive).
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "academic" => Some(Self::Academic),
            "attendance" => Some(Self::Attendance),
            "engagement" => Some(Self::Engagement),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Attendance => "attendance",
            Self::Engagement => "engagement",
            Self::General => "general",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// A notification about the student's academic, attendance or engagement
/// status.
///
/// `id` is unique within a collection. `date` is the creation timestamp and
/// never changes. `read` only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: AlertType,
    pub priority: Priority,
    pub category: Category,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "created_at", alias = "date", deserialize_with = "timestamp::deserialize")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default, alias = "actionRequired")]
    pub action_required: bool,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize_option"
    )]
    pub read_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// Build an unread alert with no suggestions.
    pub fn new(
        id: impl Into<String>,
        priority: Priority,
        category: Category,
        title: impl Into<String>,
        message: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: AlertType::Info,
            priority,
            category,
            title: title.into(),
            message: message.into(),
            date,
            read: false,
            action_required: false,
            suggestions: Vec::new(),
            student_id: None,
            parent_id: None,
            read_at: None,
        }
    }

    pub fn with_kind(mut self, kind: AlertType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    pub fn requiring_action(mut self) -> Self {
        self.action_required = true;
        self
    }
}
