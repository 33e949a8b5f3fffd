//! Month-view attendance calendar with simulated entries.
//!
//! One entry per school day (Monday to Friday). Each day is exactly one of
//! present, late or absent: presence is drawn first, and lateness only for
//! days the student was present, so a late day always counts as attended.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use rand::Rng;
use serde::Serialize;

use crate::models::student::{AttendanceData, AttendanceRecord, AttendanceStatus};

/// Probability that the student attends on a given school day.
pub const PRESENT_PROBABILITY: f64 = 0.90;

/// Probability of arriving late, given the student attended.
pub const LATE_PROBABILITY: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Counters over a generated month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthSummary {
    pub school_days: u32,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
}

impl MonthSummary {
    /// Attended days (present or late) as a percentage of school days.
    pub fn attendance_rate(&self) -> f64 {
        if self.school_days == 0 {
            return 0.0;
        }
        f64::from(self.present + self.late) / f64::from(self.school_days) * 100.0
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every date of `month`, or empty for an invalid month.
fn days_of_month(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    first
        .into_iter()
        .flat_map(|d| d.iter_days())
        .take_while(move |d| d.month() == month)
}

/// Number of Monday–Friday dates in the month.
pub fn weekday_count(year: i32, month: u32) -> u32 {
    days_of_month(year, month).filter(|d| is_weekday(*d)).count() as u32
}

/// Simulate attendance for every school day of `month`.
pub fn generate_month(year: i32, month: u32, rng: &mut impl Rng) -> Vec<CalendarDay> {
    days_of_month(year, month)
        .filter(|d| is_weekday(*d))
        .map(|date| CalendarDay {
            date,
            status: draw_status(rng),
        })
        .collect()
}

fn draw_status(rng: &mut impl Rng) -> AttendanceStatus {
    if !rng.gen_bool(PRESENT_PROBABILITY) {
        AttendanceStatus::Absent
    } else if rng.gen_bool(LATE_PROBABILITY) {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Simulate the current local month with fresh entropy.
///
/// Every call draws a new month; nothing is cached between calls.
pub fn generate_current_month() -> Vec<CalendarDay> {
    let today = Local::now().date_naive();
    generate_month(today.year(), today.month(), &mut rand::thread_rng())
}

pub fn summarize(days: &[CalendarDay]) -> MonthSummary {
    let mut summary = MonthSummary {
        school_days: days.len() as u32,
        ..Default::default()
    };
    for day in days {
        match day.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Late => summary.late += 1,
            AttendanceStatus::Absent | AttendanceStatus::Excused => summary.absent += 1,
        }
    }
    summary
}

/// Package a generated month in the backend's attendance shape.
///
/// `present_days` includes late days, as the backend counts them.
pub fn to_attendance_data(student_id: &str, year: i32, month: u32, days: &[CalendarDay]) -> AttendanceData {
    let summary = summarize(days);
    AttendanceData {
        student_id: student_id.to_string(),
        month,
        year,
        overall_percentage: summary.attendance_rate(),
        total_days: summary.school_days,
        present_days: summary.present + summary.late,
        absent_days: summary.absent,
        late_days: summary.late,
        records: days
            .iter()
            .map(|d| AttendanceRecord {
                date: d.date,
                status: d.status,
                reason: None,
            })
            .collect(),
    }
}
