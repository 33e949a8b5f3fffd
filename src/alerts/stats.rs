//! Alert counters for the dashboard and the generator result.
//!
//! [`AlertStats`] has the shape of `GET /alerts/{parentId}/stats`, so the
//! live source can take the server's numbers while the mock source derives
//! the same struct from its local list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Alert;
use crate::models::alert::{AlertType, Category, Priority};
use crate::models::generator::GeneratedAlert;

/// How many recent alerts the stats carry.
pub const RECENT_ALERTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertStats {
    pub total_alerts: usize,
    pub unread_alerts: usize,
    /// Unread alerts with high priority.
    pub high_priority_alerts: usize,
    #[serde(default)]
    pub action_required: usize,
    #[serde(default)]
    pub alerts_by_category: BTreeMap<String, usize>,
    #[serde(default)]
    pub alerts_by_type: BTreeMap<String, usize>,
    #[serde(default)]
    pub recent_alerts: Vec<Alert>,
}

impl AlertStats {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut stats = Self {
            total_alerts: alerts.len(),
            ..Default::default()
        };
        for alert in alerts {
            if !alert.read {
                stats.unread_alerts += 1;
                if alert.priority == Priority::High {
                    stats.high_priority_alerts += 1;
                }
            }
            if alert.action_required && !alert.read {
                stats.action_required += 1;
            }
            *stats
                .alerts_by_category
                .entry(alert.category.as_str().to_string())
                .or_default() += 1;
            *stats
                .alerts_by_type
                .entry(alert.kind.as_str().to_string())
                .or_default() += 1;
        }

        let mut recent: Vec<&Alert> = alerts.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        stats.recent_alerts = recent.into_iter().take(RECENT_ALERTS).cloned().collect();
        stats
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.alerts_by_category
            .get(category.as_str())
            .copied()
            .unwrap_or(0)
    }
}

/// Summary of one alert-generator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedSummary {
    pub total_alerts: usize,
    pub high_priority_count: usize,
    pub action_required_count: usize,
    pub categories: BTreeMap<String, usize>,
    pub types: BTreeMap<String, usize>,
    pub average_confidence: f64,
}

impl GeneratedSummary {
    pub fn from_generated(alerts: &[GeneratedAlert]) -> Self {
        let mut summary = Self {
            total_alerts: alerts.len(),
            ..Default::default()
        };
        for category in Category::ALL {
            summary.categories.insert(category.as_str().to_string(), 0);
        }
        for kind in AlertType::ALL {
            summary.types.insert(kind.as_str().to_string(), 0);
        }

        for alert in alerts {
            if alert.priority == Priority::High {
                summary.high_priority_count += 1;
            }
            if alert.action_required {
                summary.action_required_count += 1;
            }
            *summary
                .categories
                .entry(alert.category.as_str().to_string())
                .or_default() += 1;
            *summary
                .types
                .entry(alert.alert_type.as_str().to_string())
                .or_default() += 1;
        }

        if !alerts.is_empty() {
            let total: f64 = alerts.iter().map(|a| a.confidence_score).sum();
            summary.average_confidence = total / alerts.len() as f64;
        }
        summary
    }
}
