use chrono::{DateTime, Utc};

use crate::models::Alert;
use crate::models::student::{AcademicData, AttendanceData, EngagementData, StudentProfile};

use super::sequence::{RequestSequencer, Resource, Ticket};

/// Student datasets and the alert list.
#[derive(Debug, Clone, Default)]
pub struct StudentState {
    pub profile: Option<StudentProfile>,
    pub academic: Option<AcademicData>,
    pub attendance: Option<AttendanceData>,
    pub engagement: Option<EngagementData>,
    pub alerts: Vec<Alert>,
}

impl StudentState {
    pub fn find_alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.read).count()
    }
}

#[derive(Debug, Clone)]
pub enum StudentAction {
    SetProfile(StudentProfile),
    SetAcademic(AcademicData),
    SetAttendance(AttendanceData),
    SetEngagement(EngagementData),
    /// Replace the alert list with a freshly fetched one.
    SetAlerts(Vec<Alert>),
    /// Add alerts whose ids are not already present.
    AppendAlerts(Vec<Alert>),
    /// Flip `read` to true for one alert.
    MarkRead { id: String, at: DateTime<Utc> },
}

impl StudentAction {
    /// The resource an action overwrites, if it is a fetch result.
    fn resource(&self) -> Option<Resource> {
        match self {
            Self::SetProfile(_) => Some(Resource::Profile),
            Self::SetAcademic(_) => Some(Resource::Academic),
            Self::SetAttendance(_) => Some(Resource::Attendance),
            Self::SetEngagement(_) => Some(Resource::Engagement),
            Self::SetAlerts(_) => Some(Resource::Alerts),
            Self::AppendAlerts(_) | Self::MarkRead { .. } => None,
        }
    }
}

/// Apply an action to the student state.
pub fn reduce(mut state: StudentState, action: StudentAction) -> StudentState {
    match action {
        StudentAction::SetProfile(p) => state.profile = Some(p),
        StudentAction::SetAcademic(d) => state.academic = Some(d),
        StudentAction::SetAttendance(d) => state.attendance = Some(d),
        StudentAction::SetEngagement(d) => state.engagement = Some(d),
        StudentAction::SetAlerts(alerts) => state.alerts = dedup_by_id(alerts),
        StudentAction::AppendAlerts(incoming) => {
            for alert in incoming {
                if !state.alerts.iter().any(|a| a.id == alert.id) {
                    state.alerts.push(alert);
                }
            }
        }
        StudentAction::MarkRead { id, at } => {
            if let Some(alert) = state.alerts.iter_mut().find(|a| a.id == id)
                && !alert.read
            {
                alert.read = true;
                alert.read_at = Some(at);
            }
        }
    }
    state
}

/// Keep the first occurrence of every id.
fn dedup_by_id(alerts: Vec<Alert>) -> Vec<Alert> {
    let mut out: Vec<Alert> = Vec::with_capacity(alerts.len());
    for alert in alerts {
        if !out.iter().any(|a| a.id == alert.id) {
            out.push(alert);
        }
    }
    out
}

/// Student state plus request sequencing for fetched datasets.
#[derive(Debug, Default)]
pub struct StudentStore {
    state: StudentState,
    sequencer: RequestSequencer,
}

impl StudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alerts(alerts: Vec<Alert>) -> Self {
        let mut store = Self::new();
        store.dispatch(StudentAction::SetAlerts(alerts));
        store
    }

    pub fn state(&self) -> &StudentState {
        &self.state
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.state.alerts
    }

    pub fn dispatch(&mut self, action: StudentAction) {
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
    }

    /// Start a fetch for `resource`.
    pub fn begin(&mut self, resource: Resource) -> Ticket {
        self.sequencer.issue(resource)
    }

    /// Apply a fetch result if it is not stale. Returns whether it was applied.
    ///
    /// Actions that do not overwrite a fetched resource are always applied.
    pub fn apply(&mut self, ticket: Ticket, action: StudentAction) -> bool {
        if let Some(resource) = action.resource()
            && resource != ticket.resource()
        {
            return false;
        }
        if action.resource().is_some() && !self.sequencer.accept(ticket) {
            return false;
        }
        self.dispatch(action);
        true
    }
}
