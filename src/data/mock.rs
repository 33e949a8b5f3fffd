//! Built-in sample data for demos and offline use.
//!
//! The alert list is the demo family's eight seed alerts. Academic and
//! engagement numbers are drawn from the same ranges the backend uses for
//! its generated datasets, and attendance is a simulated calendar month.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::alerts::AlertAcknowledger;
use crate::http::ApiError;
use crate::models::student::{
    AcademicData, Assignment, AttendanceData, EngagementData, OverviewSummary, StudentOverview,
    StudentProfile, StudySession, SubjectPerformance, Trend, letter_grade,
};
use crate::models::{Alert, AlertType, Category, Priority};

use super::StudentDataSource;
use super::calendar;

pub const SAMPLE_PARENT_ID: &str = "demo-parent";
pub const SAMPLE_STUDENT_ID: &str = "STU001";

const SUBJECTS: [&str; 5] = ["Mathematics", "Science", "English", "History", "Geography"];
const ASSIGNMENT_KINDS: [&str; 4] = ["quiz", "test", "homework", "project"];
const ACTIVITY_KINDS: [&str; 4] = ["reading", "problem_solving", "research", "discussion"];
const TRENDS: [Trend; 3] = [Trend::Up, Trend::Down, Trend::Stable];

pub struct MockSource {
    rng: StdRng,
    today: NaiveDate,
    alerts: Vec<Alert>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Sample data around today's date, with fresh randomness.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), Local::now().date_naive())
    }

    /// Reproducible sample data anchored at `today`.
    pub fn seeded(seed: u64, today: NaiveDate) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), today)
    }

    fn with_rng(rng: StdRng, today: NaiveDate) -> Self {
        Self {
            rng,
            today,
            alerts: sample_alerts(today),
        }
    }

    pub fn profile(&self) -> StudentProfile {
        StudentProfile {
            student_id: SAMPLE_STUDENT_ID.to_string(),
            name: "Emily Smith".to_string(),
            grade: "10th Grade".to_string(),
            class_section: "Section A".to_string(),
            school_name: Some("Lincoln High School".to_string()),
        }
    }

    fn generate_academic(&mut self, student_id: &str) -> AcademicData {
        let mut subjects = Vec::with_capacity(SUBJECTS.len());
        for subject in SUBJECTS {
            let assignments: Vec<Assignment> = (1..=3)
                .map(|i| Assignment {
                    name: format!("{subject} Assignment {i}"),
                    subject: subject.to_string(),
                    score: self.rng.gen_range(75.0..95.0),
                    max_score: 100.0,
                    date: days_before(self.today, self.rng.gen_range(0..30)),
                    kind: pick(&mut self.rng, &ASSIGNMENT_KINDS).to_string(),
                })
                .collect();
            let percentage = assignments.iter().map(|a| a.score).sum::<f64>() / assignments.len() as f64;
            subjects.push(SubjectPerformance {
                subject: subject.to_string(),
                current_grade: letter_grade(percentage).to_string(),
                percentage,
                trend: *pick(&mut self.rng, &TRENDS),
                teacher: None,
                assignments,
            });
        }

        AcademicData {
            student_id: student_id.to_string(),
            semester: format!("Fall {}", self.today.year()),
            year: self.today.year(),
            overall_gpa: self.rng.gen_range(3.2..3.9),
            subjects,
        }
    }

    fn generate_attendance(&mut self, student_id: &str) -> AttendanceData {
        let (year, month) = (self.today.year(), self.today.month());
        let days = calendar::generate_month(year, month, &mut self.rng);
        calendar::to_attendance_data(student_id, year, month, &days)
    }

    fn generate_engagement(&mut self, student_id: &str) -> EngagementData {
        let offset = u64::from(self.today.weekday().num_days_from_monday());
        let week_start = days_before(self.today, offset);

        let mut sessions = Vec::new();
        for day in week_start.iter_days().take(7) {
            for _ in 0..self.rng.gen_range(2..=4) {
                let duration: u32 = self.rng.gen_range(30..=120);
                let focus_share: f64 = self.rng.gen_range(0.6..0.9);
                sessions.push(StudySession {
                    date: day,
                    subject: pick(&mut self.rng, &SUBJECTS).to_string(),
                    duration_minutes: duration,
                    activity_type: pick(&mut self.rng, &ACTIVITY_KINDS).to_string(),
                    engagement_score: self.rng.gen_range(70.0..95.0),
                    focus_time_minutes: (f64::from(duration) * focus_share) as u32,
                });
            }
        }

        let total_minutes: u32 = sessions.iter().map(|s| s.duration_minutes).sum();
        let total_study_hours = f64::from(total_minutes) / 60.0;
        EngagementData {
            student_id: student_id.to_string(),
            week_start_date: week_start,
            overall_engagement_score: self.rng.gen_range(80.0..95.0),
            total_study_hours,
            average_daily_hours: total_study_hours / 7.0,
            participation_score: self.rng.gen_range(85.0..95.0),
            focus_score: self.rng.gen_range(75.0..90.0),
            study_sessions: sessions,
        }
    }
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(date)
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

impl AlertAcknowledger for MockSource {
    fn acknowledge(&mut self, id: &str) -> Result<(), ApiError> {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.read = true;
                Ok(())
            }
            None => Err(ApiError::Status {
                status: 404,
                detail: Some("Alert not found or access denied".to_string()),
                message: None,
            }),
        }
    }
}

impl StudentDataSource for MockSource {
    fn overview(&mut self, student_id: &str) -> Result<StudentOverview, ApiError> {
        let academic = self.generate_academic(student_id);
        let attendance = self.generate_attendance(student_id);
        let engagement = self.generate_engagement(student_id);
        Ok(StudentOverview {
            student: self.profile(),
            summary: OverviewSummary {
                overall_gpa: academic.overall_gpa,
                attendance_rate: attendance.overall_percentage,
                engagement_score: engagement.overall_engagement_score,
            },
            academic: Some(academic),
            attendance: Some(attendance),
            engagement: Some(engagement),
        })
    }

    fn academic(&mut self, student_id: &str) -> Result<AcademicData, ApiError> {
        Ok(self.generate_academic(student_id))
    }

    fn attendance(&mut self, student_id: &str) -> Result<AttendanceData, ApiError> {
        Ok(self.generate_attendance(student_id))
    }

    fn engagement(&mut self, student_id: &str) -> Result<EngagementData, ApiError> {
        Ok(self.generate_engagement(student_id))
    }

    fn alerts(&mut self, _parent_id: &str) -> Result<Vec<Alert>, ApiError> {
        Ok(self.alerts.clone())
    }

    fn label(&self) -> &'static str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// Seed alerts
// ---------------------------------------------------------------------------

/// The eight demo alerts, dated relative to `today`.
pub fn sample_alerts(today: NaiveDate) -> Vec<Alert> {
    let at = |days_ago: u64, hour: u32| -> DateTime<Utc> {
        let date = days_before(today, days_ago);
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
        date.and_time(time).and_utc()
    };

    let alerts = vec![
        Alert::new(
            "sample-1",
            Priority::High,
            Category::Academic,
            "Math Performance Decline",
            "Your child's math scores have dropped by 12% over the past two weeks. Recent quiz scores: 78%, 72%, 75%. This decline may indicate difficulty with current topics or need for additional support.",
            at(1, 9),
        )
        .with_kind(AlertType::Warning)
        .requiring_action()
        .with_suggestions([
            "Schedule a meeting with the math teacher",
            "Consider hiring a tutor for algebra concepts",
            "Review homework completion patterns",
            "Check if additional practice materials are needed",
        ]),
        Alert::new(
            "sample-2",
            Priority::Low,
            Category::Academic,
            "Excellent English Performance",
            "Outstanding work in English class! Your child scored 95% on the recent essay and has maintained consistent A grades throughout the semester. The teacher noted exceptional creativity and analytical skills.",
            at(2, 14),
        )
        .with_kind(AlertType::Success)
        .with_suggestions([
            "Celebrate this achievement with your child",
            "Consider advanced English literature courses",
            "Encourage participation in writing competitions",
        ]),
        Alert::new(
            "sample-3",
            Priority::Medium,
            Category::Attendance,
            "Attendance Alert",
            "Attendance has dropped to 89% this month, below the required 95% threshold. Consistent attendance is crucial for academic success.",
            at(3, 8),
        )
        .with_kind(AlertType::Warning)
        .requiring_action()
        .with_suggestions([
            "Contact school about missed days",
            "Ensure proper health management",
            "Set up morning routine reminders",
            "Discuss any concerns your child may have about school",
        ]),
        Alert::new(
            "sample-4",
            Priority::Medium,
            Category::Engagement,
            "Low Engagement in History",
            "Class participation in History has decreased significantly over the past three weeks. Teacher notes indicate minimal interaction during discussions and group activities. Engagement score dropped from 85% to 65%.",
            at(4, 11),
        )
        .with_kind(AlertType::Warning)
        .requiring_action()
        .with_suggestions([
            "Discuss interest in history topics with your child",
            "Meet with the history teacher to understand specific concerns",
            "Explore engaging history documentaries or books",
            "Consider connecting historical events to current events",
        ]),
        Alert::new(
            "sample-5",
            Priority::Low,
            Category::Attendance,
            "Perfect Week Attendance",
            "Congratulations! Your child maintained perfect attendance this week and arrived on time every day. This consistency shows great commitment to learning.",
            at(5, 16),
        )
        .with_kind(AlertType::Success)
        .with_suggestions([
            "Acknowledge this positive behavior",
            "Continue supporting good morning routines",
        ]),
        Alert::new(
            "sample-6",
            Priority::Low,
            Category::Academic,
            "Science Project Excellence",
            "Your child's science project on renewable energy received the highest grade in the class (98%). The teacher praised the thorough research and creative presentation approach.",
            at(6, 10),
        )
        .with_kind(AlertType::Success)
        .with_suggestions([
            "Celebrate this outstanding achievement",
            "Consider science fair participation",
            "Explore advanced science topics together",
        ]),
        Alert::new(
            "sample-7",
            Priority::Medium,
            Category::Engagement,
            "Study Time Increase Needed",
            "Weekly study time has decreased to 3.2 hours, below the recommended 5 hours for grade level. This may impact upcoming exam performance.",
            at(0, 7),
        )
        .with_kind(AlertType::Info)
        .requiring_action()
        .with_suggestions([
            "Create a structured study schedule",
            "Identify and eliminate distractions",
            "Set up a dedicated study space",
            "Break study sessions into manageable chunks",
        ]),
        Alert::new(
            "sample-8",
            Priority::High,
            Category::General,
            "Parent-Teacher Conference Reminder",
            "Your scheduled parent-teacher conference is tomorrow at 3:00 PM in Room 204. Please bring any questions about Emily's progress.",
            at(0, 12),
        )
        .with_kind(AlertType::Info)
        .requiring_action()
        .with_suggestions([
            "Prepare questions about academic progress",
            "Review recent report cards and assignments",
            "Discuss any concerns about social development",
            "Ask about extracurricular opportunities",
        ]),
    ];

    alerts
        .into_iter()
        .map(|mut a| {
            a.student_id = Some(SAMPLE_STUDENT_ID.to_string());
            a
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MockSource {
        MockSource::seeded(42, NaiveDate::from_ymd_opt(2024, 10, 17).unwrap())
    }

    #[test]
    fn eight_unread_sample_alerts() {
        let mut s = source();
        let alerts = s.alerts(SAMPLE_PARENT_ID).unwrap();
        assert_eq!(alerts.len(), 8);
        assert!(alerts.iter().all(|a| !a.read));
        assert_eq!(alerts.iter().filter(|a| a.priority == Priority::High).count(), 2);
    }

    #[test]
    fn acknowledge_flips_local_copy() {
        let mut s = source();
        s.acknowledge("sample-3").unwrap();
        let alerts = s.alerts(SAMPLE_PARENT_ID).unwrap();
        assert!(alerts.iter().find(|a| a.id == "sample-3").unwrap().read);
        assert_eq!(s.acknowledge("nope").unwrap_err().status(), Some(404));
    }

    #[test]
    fn datasets_stay_in_range() {
        let mut s = source();
        let academic = s.academic(SAMPLE_STUDENT_ID).unwrap();
        assert_eq!(academic.subjects.len(), 5);
        assert!((3.2..3.9).contains(&academic.overall_gpa));
        assert!(academic.subjects.iter().all(|sub| (75.0..95.0).contains(&sub.percentage)));

        let engagement = s.engagement(SAMPLE_STUDENT_ID).unwrap();
        assert_eq!(engagement.week_start_date, NaiveDate::from_ymd_opt(2024, 10, 14).unwrap());
        assert!(engagement.study_sessions.len() >= 14);

        let attendance = s.attendance(SAMPLE_STUDENT_ID).unwrap();
        assert_eq!((attendance.month, attendance.year), (10, 2024));
        assert_eq!(attendance.total_days, 23);
    }

    #[test]
    fn overview_summary_matches_datasets() {
        let overview = source().overview(SAMPLE_STUDENT_ID).unwrap();
        assert_eq!(overview.student.name, "Emily Smith");
        let academic = overview.academic.unwrap();
        assert_eq!(overview.summary.overall_gpa, academic.overall_gpa);
    }
}
