//! Typed data model shared by the stores, the API wrappers and the pages.
//!
//! Wire names follow the backend's JSON (snake_case, `created_at`, `type`).
//! Enumerations carry an `Unknown` variant so a single unexpected value
//! never fails deserialization of a whole list.

pub mod alert;
pub mod generator;
pub mod insight;
pub mod session;
pub mod student;

pub use alert::{Alert, AlertType, Category, Priority};
pub use session::{AuthSession, TokenResponse, User};

/// Timestamp (de)serialization that tolerates naive datetimes.
///
/// The backend emits `datetime.utcnow()` values without an offset
/// (`2024-10-17T10:30:00.123456`). Those are read as UTC; RFC 3339 values
/// with an explicit offset are converted to UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parse a timestamp string, accepting RFC 3339, naive datetimes and
    /// bare dates (midnight UTC).
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, Timelike};

        #[test]
        fn parses_rfc3339_with_offset() {
            let dt = parse("2024-10-17T12:30:00+02:00").unwrap();
            assert_eq!(dt.hour(), 10);
        }

        #[test]
        fn parses_naive_backend_timestamps_as_utc() {
            let dt = parse("2024-10-17T10:30:00.123456").unwrap();
            assert_eq!(dt.day(), 17);
            assert_eq!(dt.hour(), 10);
        }

        #[test]
        fn parses_bare_dates() {
            let dt = parse("2024-10-14").unwrap();
            assert_eq!(dt.month(), 10);
            assert_eq!(dt.hour(), 0);
        }

        #[test]
        fn rejects_garbage() {
            assert!(parse("yesterday").is_none());
        }
    }
}
