//! Client-side form validation.
//!
//! Every form is checked before its request is built. A failure is an
//! [`ApiError::Validation`] carrying the message shown next to the form; no
//! network round-trip happens.

use std::sync::LazyLock;

use regex::Regex;

use crate::http::ApiError;
use crate::models::generator::{ParticipationLevel, StudentAlertRequest};
use crate::models::session::{LoginRequest, SignupRequest};

/// Loose `local@domain.tld` shape. The backend performs the real check.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile")
});

const NAME_MAX: usize = 100;
const ROLL_NUMBER_MAX: usize = 50;
const NOTES_MAX: usize = 500;
const QUERY_MAX: usize = 500;

fn invalid(message: impl Into<String>) -> ApiError {
    ApiError::Validation(message.into())
}

fn required(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    Ok(())
}

fn max_chars(value: &str, max: usize, field: &str) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(invalid(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

fn within(value: f64, min: f64, max: f64, field: &str) -> Result<(), ApiError> {
    if !value.is_finite() || value < min || value > max {
        return Err(invalid(format!("{field} must be between {min} and {max}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Auth forms
// ---------------------------------------------------------------------------

pub fn login(req: &LoginRequest) -> Result<(), ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(invalid("Please fill in all fields"));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ApiError> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(())
}

pub fn signup(req: &SignupRequest) -> Result<(), ApiError> {
    required(&req.name, "Name")?;
    required(&req.email, "Email")?;
    email(&req.email)?;
    required(&req.student_name, "Student name")?;
    required(&req.student_id, "Student ID")?;
    required(&req.password, "Password")?;
    if req.password != req.confirm_password {
        return Err(invalid("Passwords do not match"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Alert generator form
// ---------------------------------------------------------------------------

pub fn generator_form(req: &StudentAlertRequest) -> Result<(), ApiError> {
    required(&req.name, "Student name")?;
    max_chars(&req.name, NAME_MAX, "Student name")?;
    required(&req.roll_number, "Roll number")?;
    max_chars(&req.roll_number, ROLL_NUMBER_MAX, "Roll number")?;
    within(req.attendance_percentage, 0.0, 100.0, "Attendance percentage")?;
    within(req.academic_performance, 0.0, 100.0, "Academic performance")?;
    max_chars(&req.behavior_notes, NOTES_MAX, "Behavior notes")?;
    max_chars(&req.additional_comments, NOTES_MAX, "Additional comments")?;
    Ok(())
}

/// Parse the participation selector (`low`, `medium`, `high`).
pub fn participation(raw: &str) -> Result<ParticipationLevel, ApiError> {
    ParticipationLevel::parse(raw)
        .ok_or_else(|| invalid(format!("Participation level must be low, medium or high, got '{raw}'")))
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

pub fn insight_query(query: &str) -> Result<(), ApiError> {
    required(query, "Question")?;
    max_chars(query, QUERY_MAX, "Question")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> StudentAlertRequest {
        StudentAlertRequest {
            name: "John Doe".into(),
            roll_number: "STU12345".into(),
            attendance_percentage: 78.5,
            academic_performance: 3.2,
            ..Default::default()
        }
    }

    fn signup_req() -> SignupRequest {
        SignupRequest {
            email: "parent@example.com".into(),
            name: "John Smith".into(),
            student_name: "Emily Smith".into(),
            student_id: "STU001".into(),
            phone: None,
            password: "password123".into(),
            confirm_password: "password123".into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let ok = LoginRequest {
            email: "a@b.co".into(),
            password: "x".into(),
        };
        assert!(login(&ok).is_ok());
        let missing = LoginRequest {
            email: "  ".into(),
            password: "x".into(),
        };
        assert_eq!(login(&missing), Err(invalid("Please fill in all fields")));
    }

    #[test]
    fn email_shape() {
        assert!(email("parent@example.com").is_ok());
        assert!(email("parent@example").is_err());
        assert!(email("no at sign.com").is_err());
    }

    #[test]
    fn signup_checks_confirmation() {
        assert!(signup(&signup_req()).is_ok());
        let mut req = signup_req();
        req.confirm_password = "password124".into();
        assert_eq!(signup(&req), Err(invalid("Passwords do not match")));
        let mut req = signup_req();
        req.student_id.clear();
        assert!(signup(&req).unwrap_err().to_string().contains("Student ID"));
    }

    #[test]
    fn generator_form_ranges() {
        assert!(generator_form(&form()).is_ok());

        let mut f = form();
        f.attendance_percentage = 100.5;
        assert!(generator_form(&f).is_err());

        let mut f = form();
        f.academic_performance = -1.0;
        assert!(generator_form(&f).is_err());

        let mut f = form();
        f.name = "x".repeat(101);
        assert!(generator_form(&f).is_err());

        let mut f = form();
        f.roll_number = "r".repeat(50);
        f.behavior_notes = "n".repeat(500);
        assert!(generator_form(&f).is_ok());
        f.additional_comments = "c".repeat(501);
        assert!(generator_form(&f).is_err());
    }

    #[test]
    fn participation_names() {
        assert_eq!(participation("HIGH"), Ok(ParticipationLevel::High));
        assert!(participation("extreme").is_err());
    }

    #[test]
    fn insight_query_length() {
        assert!(insight_query("How is math going?").is_ok());
        assert!(insight_query("").is_err());
        assert!(insight_query(&"q".repeat(501)).is_err());
    }
}
