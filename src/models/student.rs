use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Student record linked to the signed-in parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub class_section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
}

/// Headline numbers of `GET /student/data/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewSummary {
    #[serde(default)]
    pub overall_gpa: f64,
    #[serde(default)]
    pub attendance_rate: f64,
    #[serde(default)]
    pub engagement_score: f64,
}

/// Combined student overview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentOverview {
    pub student: StudentProfile,
    #[serde(default)]
    pub academic: Option<AcademicData>,
    #[serde(default)]
    pub attendance: Option<AttendanceData>,
    #[serde(default)]
    pub engagement: Option<EngagementData>,
    #[serde(default)]
    pub summary: OverviewSummary,
}

// ---------------------------------------------------------------------------
// Academic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    #[serde(other)]
    Stable,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Stable => "→",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    #[serde(default)]
    pub subject: String,
    pub score: f64,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    pub date: NaiveDate,
    #[serde(rename = "type", default)]
    pub kind: String,
}

fn default_max_score() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPerformance {
    pub subject: String,
    pub current_grade: String,
    pub percentage: f64,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicData {
    #[serde(default)]
    pub student_id: String,
    pub semester: String,
    pub year: i32,
    pub overall_gpa: f64,
    #[serde(default)]
    pub subjects: Vec<SubjectPerformance>,
}

impl AcademicData {
    /// Mean subject percentage, or `None` without subjects.
    pub fn average_percentage(&self) -> Option<f64> {
        if self.subjects.is_empty() {
            return None;
        }
        let total: f64 = self.subjects.iter().map(|s| s.percentage).sum();
        Some(total / self.subjects.len() as f64)
    }

    /// Highest-scoring subject.
    pub fn strongest_subject(&self) -> Option<&SubjectPerformance> {
        self.subjects
            .iter()
            .max_by(|a, b| a.percentage.total_cmp(&b.percentage))
    }

    /// Lowest-scoring subject.
    pub fn weakest_subject(&self) -> Option<&SubjectPerformance> {
        self.subjects
            .iter()
            .min_by(|a, b| a.percentage.total_cmp(&b.percentage))
    }
}

/// Letter grade for a percentage, using the school's bands.
pub fn letter_grade(percentage: f64) -> &'static str {
    const BANDS: [(f64, &str); 11] = [
        (97.0, "A+"),
        (93.0, "A"),
        (90.0, "A-"),
        (87.0, "B+"),
        (83.0, "B"),
        (80.0, "B-"),
        (77.0, "C+"),
        (73.0, "C"),
        (70.0, "C-"),
        (67.0, "D+"),
        (65.0, "D"),
    ];
    BANDS
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or("F")
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Excused,
}

impl AttendanceStatus {
    /// Late arrivals count as attended.
    pub fn attended(self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Late => "late",
            Self::Absent => "absent",
            Self::Excused => "excused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceData {
    #[serde(default)]
    pub student_id: String,
    pub month: u32,
    pub year: i32,
    pub overall_percentage: f64,
    #[serde(default)]
    pub total_days: u32,
    #[serde(default)]
    pub present_days: u32,
    #[serde(default)]
    pub absent_days: u32,
    #[serde(default)]
    pub late_days: u32,
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub date: NaiveDate,
    pub subject: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub activity_type: String,
    pub engagement_score: f64,
    #[serde(default)]
    pub focus_time_minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementData {
    #[serde(default)]
    pub student_id: String,
    pub week_start_date: NaiveDate,
    pub overall_engagement_score: f64,
    pub total_study_hours: f64,
    #[serde(default)]
    pub average_daily_hours: f64,
    #[serde(default)]
    pub participation_score: f64,
    #[serde(default)]
    pub focus_score: f64,
    #[serde(default)]
    pub study_sessions: Vec<StudySession>,
}

impl EngagementData {
    /// Total study minutes per subject, largest first.
    pub fn minutes_by_subject(&self) -> Vec<(String, u32)> {
        let mut totals: Vec<(String, u32)> = Vec::new();
        for session in &self.study_sessions {
            match totals.iter_mut().find(|(s, _)| *s == session.subject) {
                Some((_, minutes)) => *minutes += session.duration_minutes,
                None => totals.push((session.subject.clone(), session.duration_minutes)),
            }
        }
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
    }
}
