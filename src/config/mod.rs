/// Configuration system for ptrack.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::TrackerConfig::default()`]
/// 2. **User global config**: `~/.ptrack/config.toml`
/// 3. **Project local config**: `.ptrack.toml` in the current directory
/// 4. **Environment variables**: `PTRACK_*` overrides (highest precedence)
///
/// File layers are merged key by key on the TOML tree, so a file that only
/// sets `[api] base_url` leaves every other value from the layer below
/// intact. Malformed files are skipped.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::TrackerConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
pub fn load() -> TrackerConfig {
    let mut config = load_files(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Merge the given TOML files (later wins) over the defaults.
///
/// A layer that would leave the merged tree ill-typed is dropped on its
/// own; the layers before and after it still apply.
fn load_files(paths: &[Option<PathBuf>]) -> TrackerConfig {
    let mut config = TrackerConfig::default();
    let Ok(mut tree) = toml::Value::try_from(&config) else {
        return config;
    };

    for path in paths.iter().flatten() {
        let Some(layer) = load_toml_value(path) else {
            continue;
        };
        let mut candidate = tree.clone();
        merge_values(&mut candidate, layer);
        if let Ok(merged) = candidate.clone().try_into::<TrackerConfig>() {
            tree = candidate;
            config = merged;
        }
    }

    config
}

/// Read a TOML file into a value tree. `None` if missing or malformed.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`. Tables merge key by key; any
/// other value replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.ptrack/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ptrack").join("config.toml"))
}

/// Path to the project local config: `.ptrack.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".ptrack.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `PTRACK_API_URL`: backend base URL (including `/api`)
/// - `PTRACK_TIMEOUT_MS`: request timeout
/// - `PTRACK_DATA_SOURCE`: `live` or `mock`
/// - `PTRACK_LOG`: activity log on/off (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut TrackerConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("PTRACK_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Some(val) = var("PTRACK_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Some(val) = var("PTRACK_DATA_SOURCE")
        && let Some(source) = parse_data_source(&val)
    {
        config.data.source = source;
    }
    if let Some(val) = var("PTRACK_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if var("NO_COLOR").is_some() {
        config.display.color = false;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a data source name.
fn parse_data_source(val: &str) -> Option<schema::DataSourceKind> {
    match val.to_ascii_lowercase().as_str() {
        "live" | "api" => Some(schema::DataSourceKind::Live),
        "mock" | "demo" => Some(schema::DataSourceKind::Mock),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.ptrack/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.ptrack/ directory")?;
    }

    fs::write(&path, TrackerConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key (dotted, e.g. `api.base_url`) in the global file.
///
/// The file is created from defaults when missing. The updated tree must
/// still deserialize into [`TrackerConfig`], so `set` cannot write a value
/// of the wrong type or an unknown enum name.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&TrackerConfig::default())
            .context("failed to serialize default config")?
    };

    let mut tree: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut tree, key, value)?;

    let _: TrackerConfig = tree
        .clone()
        .try_into()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    let output = toml::to_string_pretty(&tree).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value takes the type of the value it replaces.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("empty config key segment in '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
