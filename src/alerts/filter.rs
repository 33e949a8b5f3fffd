//! Alert filtering and ordering for the alerts page.
//!
//! Filtering narrows the collection with four independent predicates
//! (read state, category, priority, text search) joined by logical AND.
//! The survivors are ordered by priority rank, then by recency. The sort is
//! stable: alerts with equal priority and equal date keep their input order.

use std::cmp::Ordering;

use crate::http::ApiError;
use crate::models::{Alert, Category, Priority};

/// Active filter criteria. The default constrains nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertFilter {
    /// When `false`, read alerts are excluded.
    pub show_read: bool,
    /// `None` means every category.
    pub category: Option<Category>,
    /// `None` means every priority.
    pub priority: Option<Priority>,
    /// Case-insensitive substring matched against title or message.
    pub search: String,
}

impl Default for AlertFilter {
    fn default() -> Self {
        Self {
            show_read: true,
            category: None,
            priority: None,
            search: String::new(),
        }
    }
}

impl AlertFilter {
    /// Build a filter from the raw strings the alerts page accepts.
    ///
    /// `"all"` (or an empty value) selects every category/priority. Any other
    /// unrecognised name is rejected before filtering runs.
    pub fn from_selection(
        show_read: bool,
        category: Option<&str>,
        priority: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, ApiError> {
        let category = match selection(category) {
            None => None,
            Some(name) => Some(
                Category::parse(name)
                    .ok_or_else(|| ApiError::Validation(format!("unknown category '{name}'")))?,
            ),
        };
        let priority = match selection(priority) {
            None => None,
            Some(name) => Some(
                Priority::parse(name)
                    .ok_or_else(|| ApiError::Validation(format!("unknown priority '{name}'")))?,
            ),
        };

        Ok(Self {
            show_read,
            category,
            priority,
            search: search.unwrap_or_default().to_string(),
        })
    }

    /// Whether a single alert passes every active predicate.
    pub fn matches(&self, alert: &Alert) -> bool {
        self.matches_read_state(alert)
            && self.matches_category(alert)
            && self.matches_priority(alert)
            && self.matches_search(alert)
    }

    /// True when no predicate is active.
    pub fn is_open(&self) -> bool {
        self.show_read && self.category.is_none() && self.priority.is_none() && self.search.is_empty()
    }

    fn matches_read_state(&self, alert: &Alert) -> bool {
        self.show_read || !alert.read
    }

    fn matches_category(&self, alert: &Alert) -> bool {
        self.category.is_none_or(|c| alert.category == c)
    }

    fn matches_priority(&self, alert: &Alert) -> bool {
        self.priority.is_none_or(|p| alert.priority == p)
    }

    fn matches_search(&self, alert: &Alert) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        alert.title.to_lowercase().contains(&needle) || alert.message.to_lowercase().contains(&needle)
    }
}

/// Treat `None`, `""` and `"all"` as "no constraint".
fn selection(raw: Option<&str>) -> Option<&str> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(raw)
    }
}

/// Display order: higher priority first, then most recent first.
pub fn display_order(a: &Alert, b: &Alert) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| b.date.cmp(&a.date))
}

/// Filter and order `alerts` for display. The input is left untouched.
pub fn apply<'a>(alerts: &'a [Alert], filter: &AlertFilter) -> Vec<&'a Alert> {
    let mut view: Vec<&Alert> = alerts.iter().filter(|a| filter.matches(a)).collect();
    // `sort_by` is stable, which keeps encounter order for equal keys.
    view.sort_by(|a, b| display_order(a, b));
    view
}
