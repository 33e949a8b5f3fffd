use crate::alerts::{AlertAcknowledger, AlertStats};
use crate::api::{self, alerts::AlertQuery};
use crate::http::{ApiClient, ApiError};
use crate::models::Alert;
use crate::models::student::{AcademicData, AttendanceData, EngagementData, StudentOverview};

use super::StudentDataSource;

/// Backend-backed data source.
pub struct LiveSource<'a> {
    client: &'a mut ApiClient,
}

impl<'a> LiveSource<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        Self { client }
    }
}

impl AlertAcknowledger for LiveSource<'_> {
    fn acknowledge(&mut self, id: &str) -> Result<(), ApiError> {
        api::alerts::mark_read(self.client, id)
    }
}

impl StudentDataSource for LiveSource<'_> {
    fn overview(&mut self, student_id: &str) -> Result<StudentOverview, ApiError> {
        api::student::overview(self.client, student_id)
    }

    fn academic(&mut self, student_id: &str) -> Result<AcademicData, ApiError> {
        api::student::academic(self.client, student_id)
    }

    fn attendance(&mut self, student_id: &str) -> Result<AttendanceData, ApiError> {
        api::student::attendance(self.client, student_id)
    }

    fn engagement(&mut self, student_id: &str) -> Result<EngagementData, ApiError> {
        api::student::engagement(self.client, student_id)
    }

    fn alerts(&mut self, parent_id: &str) -> Result<Vec<Alert>, ApiError> {
        api::alerts::list(self.client, parent_id, &AlertQuery::default())
    }

    fn alert_stats(&mut self, parent_id: &str) -> Result<AlertStats, ApiError> {
        api::alerts::stats(self.client, parent_id)
    }

    fn label(&self) -> &'static str {
        "live"
    }
}
