//! Settings file handling and database path resolution.
//!
//! The settings file is `~/.config/libris/settings.toml`:
//!
//! ```toml
//! [database]
//! path = "/home/me/library.db"
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable overriding the saved database path.
pub(crate) const DB_ENV: &str = "LIBRIS_DB";

/// Canonical path to the settings file.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("libris").join("settings.toml")
}

/// Database used when nothing else is configured.
pub(crate) fn default_db_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("libris").join("library.db")
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    database: Option<DatabaseSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSettings {
    path: Option<PathBuf>,
}

/// Where the database path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbPathSource {
    Flag,
    EnvVar(&'static str),
    SettingsFile,
    Default,
}

impl fmt::Display for DbPathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "--db flag"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::SettingsFile => write!(f, "settings file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Resolve the database path using a priority chain:
///
/// 1. `--db` flag (if `Some`)
/// 2. `$LIBRIS_DB`
/// 3. `database.path` in `settings.toml`
/// 4. [`default_db_path`]
pub(crate) fn resolve_db_path(cli_override: Option<PathBuf>) -> (PathBuf, DbPathSource) {
    let settings = std::fs::read_to_string(settings_path()).ok();
    resolve_from(
        cli_override,
        std::env::var(DB_ENV).ok(),
        settings.as_deref(),
        default_db_path(),
    )
}

fn resolve_from(
    cli_override: Option<PathBuf>,
    env_value: Option<String>,
    settings: Option<&str>,
    default: PathBuf,
) -> (PathBuf, DbPathSource) {
    if let Some(p) = cli_override {
        return (p, DbPathSource::Flag);
    }
    if let Some(v) = env_value.filter(|v| !v.trim().is_empty()) {
        return (PathBuf::from(v), DbPathSource::EnvVar(DB_ENV));
    }
    if let Some(p) = settings.and_then(saved_db_path) {
        return (p, DbPathSource::SettingsFile);
    }
    (default, DbPathSource::Default)
}

/// `database.path` from settings contents. A malformed file counts as unset.
fn saved_db_path(contents: &str) -> Option<PathBuf> {
    let parsed: SettingsFile = match toml::from_str(contents) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Ignoring unreadable settings file: {e}");
            return None;
        }
    };
    parsed
        .database?
        .path
        .filter(|p| !p.as_os_str().is_empty())
}

/// Save (or clear) the database path in `settings.toml`.
///
/// Uses `toml::Value` for a surgical update so unrelated settings survive.
pub(crate) fn save_db_path(path: Option<&Path>) -> io::Result<PathBuf> {
    let settings = settings_path();
    let existing = std::fs::read_to_string(&settings).ok();
    let updated = with_db_path(existing.as_deref(), path)?;

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, updated)?;
    std::fs::rename(&tmp, &settings)?;

    Ok(settings)
}

fn with_db_path(existing: Option<&str>, path: Option<&Path>) -> io::Result<String> {
    let mut doc: toml::Value = existing
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(|| toml::Value::Table(Default::default()));

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let database = table
        .entry("database")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let db_table = database
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[database] is not a table"))?;

    match path {
        Some(p) => {
            db_table.insert(
                "path".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            db_table.remove("path");
        }
    }

    toml::to_string_pretty(&doc).map_err(io::Error::other)
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub(crate) fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
