use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{load_settings_string, resolve_db_path, save_db_path, settings_path};

/// Show the resolved database path and the settings file.
pub(crate) fn run_config_show(db_override: Option<PathBuf>) {
    let (db_path, source) = resolve_db_path(db_override);
    let path = settings_path();

    log::info!(
        "{}",
        "Libris Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!(
        "  Database:      {} {}",
        db_path.display(),
        format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
    );

    if let Some(contents) = load_settings_string() {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("  {}", line);
        }
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

/// Save or clear the default database path.
pub(crate) fn run_config_set_db(path: Option<PathBuf>, clear: bool) -> Result<(), CliError> {
    let target = if clear { None } else { path };
    let written = save_db_path(target.as_deref())
        .map_err(|e| CliError::config(format!("Failed to write settings: {}", e)))?;

    match target {
        Some(p) => log::info!(
            "Default database set to {} in {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            written.display(),
        ),
        None => log::info!("Default database cleared in {}", written.display()),
    }
    Ok(())
}
