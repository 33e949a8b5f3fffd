//! CLI command implementations for ptrack.
//!
//! Provides subcommand handlers for:
//! - `ptrack login | signup | logout | whoami`: session management
//! - `ptrack dashboard | academic | attendance | engagement`: student pages
//! - `ptrack alerts list | read | read-all`: the alerts page
//! - `ptrack generate` / `ptrack insights`: AI alert generator and insights
//! - `ptrack health`: backend, session and config checks
//! - `ptrack activity`: recent requests from the activity log
//! - `ptrack config show|init|set|reset`: configuration management

mod account;
mod alerts;
mod assistant;
mod pages;

use std::rc::Rc;

use anyhow::Result;
use colored::Colorize;

use crate::activity::ActivityLog;
use crate::api;
use crate::config::{self, TrackerConfig};
use crate::config::schema::DataSourceKind;
use crate::data::{LiveSource, MockSource, SAMPLE_PARENT_ID, SAMPLE_STUDENT_ID, StudentDataSource};
use crate::http::{ApiClient, ApiError};
use crate::store::AuthStore;
use crate::ui::Notifier;

pub use account::{run_login, run_logout, run_signup, run_whoami, SignupArgs};
pub use alerts::{run_alerts_list, run_alerts_read, run_alerts_read_all, AlertListArgs};
pub use assistant::{run_generate, run_insights_ask, run_insights_list, GenerateArgs};
pub use pages::{run_academic, run_attendance, run_dashboard, run_engagement};

/// Output format for list commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// A failure the user has already been told about (toast or session
/// guard). The binary exits non-zero without printing anything else.
#[derive(Debug, thiserror::Error)]
#[error("already reported")]
pub struct Reported;

// ---------------------------------------------------------------------------
// Command context
// ---------------------------------------------------------------------------

/// Everything a command needs: resolved config, the notifier and a client
/// carrying the persisted session.
pub struct Context {
    pub config: TrackerConfig,
    pub notifier: Rc<dyn Notifier>,
    pub client: ApiClient,
}

impl Context {
    pub fn new(config: TrackerConfig, auth: AuthStore, notifier: Rc<dyn Notifier>) -> Self {
        let mut client = ApiClient::from_config(&config.api, auth, Rc::clone(&notifier));
        if config.logging.enabled
            && let Some(path) = config.logging.resolved_path()
        {
            client = client.with_activity_log(ActivityLog::at(path));
        }
        Self {
            config,
            notifier,
            client,
        }
    }

    /// `(parent_id, student_id)` of the signed-in parent.
    ///
    /// The mock source falls back to the demo family, so it works signed out.
    pub fn identity(&self) -> Result<(String, String), ApiError> {
        if let Some(user) = self.client.auth().user()
            && self.client.auth().is_authenticated()
        {
            return Ok((user.id.clone(), user.student_id.clone()));
        }
        match self.config.data.source {
            DataSourceKind::Mock => Ok((SAMPLE_PARENT_ID.to_string(), SAMPLE_STUDENT_ID.to_string())),
            DataSourceKind::Live => Err(ApiError::Validation(
                "Not signed in. Run `ptrack login` first.".to_string(),
            )),
        }
    }

    /// Run `f` against the configured data source.
    pub fn with_source<T>(
        &mut self,
        f: impl FnOnce(&mut dyn StudentDataSource) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        match self.config.data.source {
            DataSourceKind::Mock => f(&mut MockSource::new()),
            DataSourceKind::Live => f(&mut LiveSource::new(&mut self.client)),
        }
    }

    pub fn max_rows(&self) -> usize {
        self.config.display.max_rows.max(1)
    }
}

// ---------------------------------------------------------------------------
// ptrack health
// ---------------------------------------------------------------------------

/// Check backend reachability, the stored session and local files.
pub fn run_health(ctx: &mut Context) -> Result<()> {
    println!("{}", "ptrack Health Check".bold().cyan());
    println!("{}", "=".repeat(50));

    // 1. Config
    let global = config::global_config_file();
    let global_exists = global.as_ref().map(|p| p.exists()).unwrap_or(false);
    print_health_item(
        "Config file",
        true,
        &if global_exists {
            "~/.ptrack/config.toml".to_string()
        } else {
            "using defaults (run `ptrack config init`)".to_string()
        },
    );
    print_health_item("Data source", true, &ctx.config.data.source.to_string());
    print_health_item("API base URL", true, ctx.client.base_url());

    // 2. Session + backend
    if ctx.client.auth().is_authenticated() {
        match api::auth::verify(&mut ctx.client) {
            Ok(v) if v.valid => {
                let who = v.user.map(|u| u.email).unwrap_or_default();
                print_health_item("Session", true, &format!("valid ({who})"));
            }
            Ok(_) => print_health_item("Session", false, "rejected by server"),
            Err(ApiError::SessionExpired) => print_health_item("Session", false, "expired"),
            Err(err) => print_health_item("Backend", false, &err.user_message("not reachable")),
        }

        if ctx.client.auth().is_authenticated() {
            match api::generator::test_connection(&mut ctx.client) {
                Ok(status) => {
                    let mode = if status.ai_available { "AI" } else { "rule-based" };
                    print_health_item("Alert generator", true, &format!("{} ({mode})", status.status));
                }
                Err(err) => print_health_item("Alert generator", false, &err.user_message("unavailable")),
            }
        }
    } else {
        print_health_item("Session", false, "not signed in");
    }

    // 3. Activity log
    let log = ctx
        .config
        .logging
        .resolved_path()
        .map(ActivityLog::at);
    let log_exists = log.as_ref().map(|l| l.path().exists()).unwrap_or(false);
    let log_ok = ctx.config.logging.enabled && log_exists;
    print_health_item(
        "Activity log",
        log_ok,
        &match (&log, ctx.config.logging.enabled) {
            (_, false) => "disabled".to_string(),
            (Some(log), true) if log_exists => format!("{} entries", log.read_all().len()),
            _ => "no log file yet".to_string(),
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// ptrack activity
// ---------------------------------------------------------------------------

/// Show the most recent requests from the activity log.
pub fn run_activity(ctx: &Context, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    let Some(path) = ctx.config.logging.resolved_path() else {
        anyhow::bail!("could not determine activity log location");
    };
    let entries = ActivityLog::at(path).read_recent(limit.unwrap_or_else(|| ctx.max_rows()));

    if entries.is_empty() {
        println!("{}", "No requests logged yet.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Csv => {
            println!("timestamp,method,path,status,latency_ms,outcome");
            for e in &entries {
                println!(
                    "{},{},{},{},{},{}",
                    e.timestamp,
                    e.method,
                    e.path,
                    e.status.map(|s| s.to_string()).unwrap_or_default(),
                    e.latency_ms,
                    e.outcome
                );
            }
        }
        OutputFormat::Table => {
            println!("{}", "Recent Requests".bold().cyan());
            println!(
                "  {:<20} {:<6} {:<36} {:>6} {:>8}",
                "Time", "Method", "Path", "Status", "Latency"
            );
            println!("  {}", "-".repeat(80));
            for (i, e) in entries.iter().enumerate() {
                let status = e.status.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
                let line = format!(
                    "  {:<20} {:<6} {:<36} {:>6} {:>6}ms",
                    truncate(&e.timestamp.replace('T', " "), 19),
                    e.method,
                    truncate(&e.path, 36),
                    status,
                    format_number(e.latency_ms as usize),
                );
                match e.outcome.as_str() {
                    "ok" if i % 2 == 0 => println!("{line}"),
                    "ok" => println!("{}", line.dimmed()),
                    _ => println!("{}", line.red()),
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ptrack config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective ptrack Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.ptrack/config.toml", global_exists);
    print_source(".ptrack.toml", project_exists);
    println!("  {} {}", "·".dimmed(), "PTRACK_* environment variables".dimmed());

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.ptrack/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    println!("  {}", "Edit the file to point ptrack at your backend.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!("{} Config reset to defaults at {}", "✓".green().bold(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// A 20-cell bar for a 0–100 value.
fn bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * 20.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}

/// Colour a percentage by the dashboard's thresholds.
fn colorize_pct(percentage: f64) -> colored::ColoredString {
    let text = format!("{percentage:.1}%");
    if percentage >= 90.0 {
        text.green()
    } else if percentage >= 75.0 {
        text.yellow()
    } else {
        text.red()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
