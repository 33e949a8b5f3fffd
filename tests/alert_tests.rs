/// Alerts page behaviour through the public API: filtering, ordering and
/// read-state reconciliation against a data source.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use progress_tracker::alerts::{self, AlertAcknowledger, AlertFilter, AlertStats, ReadOutcome};
use progress_tracker::data::{MockSource, SAMPLE_PARENT_ID, StudentDataSource};
use progress_tracker::http::ApiError;
use progress_tracker::models::{Alert, Category, Priority};
use progress_tracker::store::{StudentAction, StudentStore};
use progress_tracker::ui::{RecordingNotifier, ToastLevel};

fn oct(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, day, hour, 0, 0).unwrap()
}

fn collection() -> Vec<Alert> {
    let mut read = Alert::new(
        "hist",
        Priority::Low,
        Category::Academic,
        "History essay graded",
        "Great work on the essay.",
        oct(10, 9),
    );
    read.read = true;
    vec![
        Alert::new(
            "math",
            Priority::High,
            Category::Academic,
            "Math Performance Decline",
            "Recent quiz results dropped.",
            oct(14, 9),
        ),
        Alert::new(
            "att",
            Priority::High,
            Category::Attendance,
            "Late Arrivals",
            "Three late arrivals this week.",
            oct(16, 9),
        ),
        Alert::new(
            "sci",
            Priority::Medium,
            Category::Academic,
            "Science project due",
            "Also review math scores before the test.",
            oct(17, 9),
        ),
        read,
        Alert::new(
            "eng",
            Priority::Low,
            Category::Engagement,
            "Study streak",
            "Five days in a row.",
            oct(15, 9),
        ),
    ]
}

fn ids(view: &[&Alert]) -> Vec<String> {
    view.iter().map(|a| a.id.clone()).collect()
}

// ---------------------------------------------------------------------------
// Filtering and ordering
// ---------------------------------------------------------------------------

#[test]
fn priority_dominates_recency() {
    let alerts = vec![
        Alert::new("m17", Priority::Medium, Category::General, "m", "", oct(17, 9)),
        Alert::new("h14", Priority::High, Category::General, "h", "", oct(14, 9)),
        Alert::new("h16", Priority::High, Category::General, "h", "", oct(16, 9)),
    ];
    let view = alerts::apply(&alerts, &AlertFilter::default());
    assert_eq!(ids(&view), ["h16", "h14", "m17"]);
}

#[test]
fn view_is_a_subset_of_the_collection() {
    let all = collection();
    let filter = AlertFilter::from_selection(false, Some("academic"), None, None).unwrap();
    let view = alerts::apply(&all, &filter);
    assert!(!view.is_empty());
    for alert in &view {
        assert!(all.contains(alert));
        assert!(!alert.read);
        assert_eq!(alert.category, Category::Academic);
    }
}

#[test]
fn filtering_is_idempotent() {
    let all = collection();
    let filter = AlertFilter::from_selection(false, None, Some("high"), None).unwrap();
    let once: Vec<Alert> = alerts::apply(&all, &filter).into_iter().cloned().collect();
    let twice = alerts::apply(&once, &filter);
    assert_eq!(ids(&twice), once.iter().map(|a| a.id.clone()).collect::<Vec<_>>());
}

#[test]
fn equal_keys_keep_input_order() {
    let at = oct(12, 8);
    let alerts = vec![
        Alert::new("first", Priority::Medium, Category::General, "a", "", at),
        Alert::new("second", Priority::Medium, Category::General, "b", "", at),
        Alert::new("third", Priority::Medium, Category::General, "c", "", at),
    ];
    let view = alerts::apply(&alerts, &AlertFilter::default());
    assert_eq!(ids(&view), ["first", "second", "third"]);
}

#[test]
fn search_matches_title_or_message_case_insensitively() {
    let all = collection();
    let filter = AlertFilter::from_selection(true, None, None, Some("math")).unwrap();
    let view = alerts::apply(&all, &filter);
    let mut found = ids(&view);
    found.sort();
    assert_eq!(found, ["math", "sci"]);

    let filter = AlertFilter::from_selection(true, None, None, Some("MATH")).unwrap();
    assert_eq!(alerts::apply(&all, &filter).len(), 2);
}

#[test]
fn source_collection_is_untouched_by_filtering() {
    let all = collection();
    let before = all.clone();
    let filter = AlertFilter::from_selection(false, Some("attendance"), Some("high"), Some("late")).unwrap();
    let _ = alerts::apply(&all, &filter);
    assert_eq!(all, before);
}

// ---------------------------------------------------------------------------
// Read-state reconciliation
// ---------------------------------------------------------------------------

#[test]
fn mark_read_against_mock_source_is_monotonic() {
    let mut source = MockSource::seeded(7, NaiveDate::from_ymd_opt(2024, 10, 17).unwrap());
    let mut store = StudentStore::with_alerts(source.alerts(SAMPLE_PARENT_ID).unwrap());
    let notifier = RecordingNotifier::new();
    let id = store.alerts()[0].id.clone();

    assert_eq!(alerts::mark_read(&mut store, &mut source, &notifier, &id), ReadOutcome::Marked);
    assert_eq!(alerts::mark_read(&mut store, &mut source, &notifier, &id), ReadOutcome::AlreadyRead);
    assert!(store.state().find_alert(&id).unwrap().read);
    assert!(store.state().find_alert(&id).unwrap().read_at.is_some());

    // A fresh fetch from the same source reflects the acknowledgement.
    let refreshed = source.alerts(SAMPLE_PARENT_ID).unwrap();
    assert!(refreshed.iter().find(|a| a.id == id).unwrap().read);
}

#[test]
fn missing_id_sends_nothing_and_changes_nothing() {
    struct Counting(usize);
    impl AlertAcknowledger for Counting {
        fn acknowledge(&mut self, _id: &str) -> Result<(), ApiError> {
            self.0 += 1;
            Ok(())
        }
    }

    let mut store = StudentStore::with_alerts(collection());
    let before = store.alerts().to_vec();
    let mut ack = Counting(0);
    let notifier = RecordingNotifier::new();

    let outcome = alerts::mark_read(&mut store, &mut ack, &notifier, "does-not-exist");
    assert_eq!(outcome, ReadOutcome::NotFound);
    assert_eq!(ack.0, 0);
    assert_eq!(store.alerts(), before.as_slice());
}

#[test]
fn rejected_acknowledgement_keeps_alert_unread() {
    let mut source = MockSource::seeded(1, NaiveDate::from_ymd_opt(2024, 10, 17).unwrap());
    // An alert the server has never heard of.
    let mut store = StudentStore::with_alerts(collection());
    let notifier = RecordingNotifier::new();

    let outcome = alerts::mark_read(&mut store, &mut source, &notifier, "math");
    assert_eq!(outcome, ReadOutcome::Failed("Alert not found or access denied".into()));
    assert!(!store.state().find_alert("math").unwrap().read);
    assert_eq!(
        notifier.messages(ToastLevel::Error),
        ["Alert not found or access denied"]
    );
}

#[test]
fn mark_all_read_clears_unread_count() {
    let mut source = MockSource::seeded(3, NaiveDate::from_ymd_opt(2024, 10, 17).unwrap());
    let mut store = StudentStore::with_alerts(source.alerts(SAMPLE_PARENT_ID).unwrap());
    let notifier = RecordingNotifier::new();
    let unread = store.state().unread_count();

    let report = alerts::mark_all_read(&mut store, &mut source, &notifier);
    assert!(report.is_complete());
    assert_eq!(report.marked.len(), unread);
    assert_eq!(store.state().unread_count(), 0);
}

#[test]
fn stats_follow_read_state() {
    let mut store = StudentStore::with_alerts(collection());
    let stats = AlertStats::from_alerts(store.alerts());
    assert_eq!(stats.total_alerts, 5);
    assert_eq!(stats.unread_alerts, 4);
    assert_eq!(stats.high_priority_alerts, 2);

    store.dispatch(StudentAction::MarkRead {
        id: "math".into(),
        at: oct(18, 9),
    });
    let stats = AlertStats::from_alerts(store.alerts());
    assert_eq!(stats.unread_alerts, 3);
    assert_eq!(stats.total_alerts, 5);
}
