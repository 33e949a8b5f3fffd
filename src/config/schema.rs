/// Configuration schema and defaults for ptrack.
///
/// Sections: `[api]`, `[data]`, `[display]` and `[logging]`. Every field
/// has a built-in default; config files only need the keys they change.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level ptrack configuration.
///
/// Maps directly to `~/.ptrack/config.toml` and `.ptrack.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub api: ApiConfig,
    pub data: DataConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the `/api` mount point. Endpoint paths are
    /// appended as-is (`/auth/login`, `/alerts/{id}`, ...).
    pub base_url: String,
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Where page data comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSourceKind {
    /// Fetch from the backend.
    #[default]
    Live,
    /// Built-in sample data; no network.
    Mock,
}

impl std::fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: DataSourceKind,
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

/// Terminal rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum rows printed by list pages.
    pub max_rows: usize,
    /// Coloured output. `NO_COLOR` in the environment also disables it.
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_rows: 50,
            color: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Request activity log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether requests are appended to the activity log.
    pub enabled: bool,
    /// Path to the activity log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.ptrack/activity.jsonl".to_string(),
        }
    }
}

impl LoggingConfig {
    /// The log path with a leading `~` expanded.
    pub fn resolved_path(&self) -> Option<std::path::PathBuf> {
        match self.path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None if self.path == "~" => dirs::home_dir(),
            None => Some(std::path::PathBuf::from(&self.path)),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl TrackerConfig {
    /// Generate the annotated default TOML config file content.
    pub fn default_toml() -> String {
        r#"# ptrack configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (PTRACK_*)
#   2. Project config (.ptrack.toml in current directory)
#   3. User global config (~/.ptrack/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://localhost:8000/api"   # includes the /api mount point
timeout_ms = 30000

[data]
source = "live"        # live | mock

[display]
max_rows = 50
color = true

[logging]
enabled = true
path = "~/.ptrack/activity.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let config: TrackerConfig = toml::from_str(&TrackerConfig::default_toml()).unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: TrackerConfig = toml::from_str("[data]\nsource = \"mock\"\n").unwrap();
        assert_eq!(config.data.source, DataSourceKind::Mock);
        assert_eq!(config.api.timeout_ms, 30_000);
        assert!(config.logging.enabled);
    }

    #[test]
    fn logging_path_expands_home() {
        let cfg = LoggingConfig {
            enabled: true,
            path: "/tmp/ptrack.jsonl".into(),
        };
        assert_eq!(cfg.resolved_path().unwrap(), std::path::PathBuf::from("/tmp/ptrack.jsonl"));

        if let Some(home) = dirs::home_dir() {
            let cfg = LoggingConfig::default();
            assert_eq!(cfg.resolved_path().unwrap(), home.join(".ptrack/activity.jsonl"));
        }
    }

    #[test]
    fn data_source_display() {
        assert_eq!(DataSourceKind::Live.to_string(), "live");
        assert_eq!(DataSourceKind::Mock.to_string(), "mock");
    }
}
