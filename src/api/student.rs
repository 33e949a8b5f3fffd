//! `/student` endpoints.

use crate::http::{ApiClient, ApiError};
use crate::models::student::{AcademicData, AttendanceData, EngagementData, StudentOverview};

use super::segment;

/// Profile, datasets and headline summary in one call.
pub fn overview(client: &mut ApiClient, student_id: &str) -> Result<StudentOverview, ApiError> {
    client.get(&format!("/student/data/{}", segment(student_id)))
}

pub fn academic(client: &mut ApiClient, student_id: &str) -> Result<AcademicData, ApiError> {
    client.get(&format!("/student/{}/academic", segment(student_id)))
}

/// Attendance for the current month.
pub fn attendance(client: &mut ApiClient, student_id: &str) -> Result<AttendanceData, ApiError> {
    client.get(&format!("/student/{}/attendance", segment(student_id)))
}

/// Engagement for the current week.
pub fn engagement(client: &mut ApiClient, student_id: &str) -> Result<EngagementData, ApiError> {
    client.get(&format!("/student/{}/engagement", segment(student_id)))
}
