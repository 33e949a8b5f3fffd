//! Where page data comes from.
//!
//! Pages talk to a [`StudentDataSource`] and never know whether the data is
//! live or simulated. [`LiveSource`] forwards to the backend; [`MockSource`]
//! serves built-in sample data without touching the network. Selection is
//! explicit through `data.source` in the config.

pub mod calendar;
mod live;
mod mock;

use crate::alerts::{AlertAcknowledger, AlertStats};
use crate::http::ApiError;
use crate::models::Alert;
use crate::models::student::{AcademicData, AttendanceData, EngagementData, StudentOverview};

pub use live::LiveSource;
pub use mock::{MockSource, SAMPLE_PARENT_ID, SAMPLE_STUDENT_ID};

/// Read access to one student's datasets and the parent's alerts, plus the
/// read acknowledgement for those alerts.
pub trait StudentDataSource: AlertAcknowledger {
    fn overview(&mut self, student_id: &str) -> Result<StudentOverview, ApiError>;
    fn academic(&mut self, student_id: &str) -> Result<AcademicData, ApiError>;
    fn attendance(&mut self, student_id: &str) -> Result<AttendanceData, ApiError>;
    fn engagement(&mut self, student_id: &str) -> Result<EngagementData, ApiError>;
    fn alerts(&mut self, parent_id: &str) -> Result<Vec<Alert>, ApiError>;

    /// Alert counters. Sources without a stats endpoint derive them.
    fn alert_stats(&mut self, parent_id: &str) -> Result<AlertStats, ApiError> {
        let alerts = self.alerts(parent_id)?;
        Ok(AlertStats::from_alerts(&alerts))
    }

    /// Short label for status lines.
    fn label(&self) -> &'static str;
}
