//! Request activity log (`~/.ptrack/activity.jsonl`).
//!
//! One JSON line per HTTP request sent by the client: method, path, status
//! and latency. Writing is best-effort; a failing log must never fail the
//! request it describes. `ptrack activity` reads the tail back.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single request entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub timestamp: String,
    pub method: String,
    pub path: String,
    /// HTTP status; absent when the request never got a response.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<u16>,
    pub latency_ms: u64,
    /// `"ok"`, `"error"` or `"unreachable"`.
    pub outcome: String,
}

impl RequestLogEntry {
    pub fn now(method: &str, path: &str, status: Option<u16>, latency_ms: u64) -> Self {
        let outcome = match status {
            Some(s) if (200..300).contains(&s) => "ok",
            Some(_) => "error",
            None => "unreachable",
        };
        Self {
            timestamp: Utc::now().to_rfc3339(),
            method: method.to_string(),
            // Query strings can carry ids; the route is enough for the log.
            path: path.split('?').next().unwrap_or(path).to_string(),
            status,
            latency_ms,
            outcome: outcome.to_string(),
        }
    }
}

/// Append-only JSONL activity log.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry. Failures are silently ignored.
    pub fn append(&self, entry: &RequestLogEntry) {
        let _ = self.try_append(entry);
    }

    fn try_append(&self, entry: &RequestLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;
        Ok(())
    }

    /// Read every entry, skipping malformed lines.
    pub fn read_all(&self) -> Vec<RequestLogEntry> {
        let Ok(file) = fs::File::open(&self.path) else {
            return Vec::new();
        };
        BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str::<RequestLogEntry>(&line).ok())
            .collect()
    }

    /// The last `n` entries, oldest first.
    pub fn read_recent(&self, n: usize) -> Vec<RequestLogEntry> {
        let mut entries = self.read_all();
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
        entries
    }
}

/// Return the path to the activity log file.
pub fn activity_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ptrack").join("activity.jsonl"))
}
