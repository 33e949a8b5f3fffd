use chrono::{Datelike, Weekday};
use progress_tracker::data::calendar::{self, weekday_count};
use progress_tracker::models::student::AttendanceStatus;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ---------------------------------------------------------------------------
// Month shape
// ---------------------------------------------------------------------------

#[test]
fn one_entry_per_school_day() {
    let mut rng = StdRng::seed_from_u64(11);
    for (year, month) in [(2024, 2), (2024, 10), (2025, 6), (2026, 12)] {
        let days = calendar::generate_month(year, month, &mut rng);
        assert_eq!(days.len() as u32, weekday_count(year, month));
        assert!(days.iter().all(|d| d.date.month() == month && d.date.year() == year));
        assert!(
            days.iter()
                .all(|d| !matches!(d.date.weekday(), Weekday::Sat | Weekday::Sun))
        );
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
    }
}

#[test]
fn leap_february_has_an_extra_day() {
    // 2024-02-29 is a Thursday.
    assert_eq!(weekday_count(2024, 2), 21);
    assert_eq!(weekday_count(2023, 2), 20);
}

#[test]
fn invalid_month_is_empty() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(calendar::generate_month(2024, 0, &mut rng).is_empty());
    assert!(calendar::generate_month(2024, 13, &mut rng).is_empty());
}

// ---------------------------------------------------------------------------
// Statuses and summaries
// ---------------------------------------------------------------------------

#[test]
fn only_present_late_or_absent_are_drawn() {
    let mut rng = StdRng::seed_from_u64(99);
    for month in 1..=12 {
        for day in calendar::generate_month(2025, month, &mut rng) {
            assert!(matches!(
                day.status,
                AttendanceStatus::Present | AttendanceStatus::Late | AttendanceStatus::Absent
            ));
        }
    }
}

#[test]
fn late_days_count_as_attended() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut days = Vec::new();
    for month in 1..=12 {
        days.extend(calendar::generate_month(2024, month, &mut rng));
    }
    let summary = calendar::summarize(&days);
    assert!(summary.late > 0, "a year of draws should include late days");
    assert_eq!(summary.present + summary.late + summary.absent, summary.school_days);

    let data = calendar::to_attendance_data("STU001", 2024, 0, &days);
    assert_eq!(data.present_days, summary.present + summary.late);
    assert_eq!(data.late_days, summary.late);
    assert_eq!(data.present_days + data.absent_days, data.total_days);
    let expected = f64::from(data.present_days) / f64::from(data.total_days) * 100.0;
    assert!((data.overall_percentage - expected).abs() < 1e-9);
}

#[test]
fn draws_follow_the_configured_rates() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut days = Vec::new();
    for year in 2000..2040 {
        for month in 1..=12 {
            days.extend(calendar::generate_month(year, month, &mut rng));
        }
    }
    let summary = calendar::summarize(&days);
    let attended = f64::from(summary.present + summary.late) / f64::from(summary.school_days);
    assert!((attended - calendar::PRESENT_PROBABILITY).abs() < 0.02);
    let late_share = f64::from(summary.late) / f64::from(summary.present + summary.late);
    assert!((late_share - calendar::LATE_PROBABILITY).abs() < 0.02);
}

#[test]
fn empty_month_has_zero_rate() {
    assert_eq!(calendar::summarize(&[]).attendance_rate(), 0.0);
}
