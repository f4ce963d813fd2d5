pub(crate) mod books;
pub(crate) mod config;
pub(crate) mod lookup;
pub(crate) mod menu;
pub(crate) mod seed;
pub(crate) mod verify;

use std::path::PathBuf;

use libris_db::Connection;

use crate::CliError;
use crate::settings::resolve_db_path;

/// Open (creating if needed) the library database.
pub(crate) fn open_catalog(db_override: Option<PathBuf>) -> Result<Connection, CliError> {
    let (db_path, source) = resolve_db_path(db_override);
    log::debug!("Using database {} ({})", db_path.display(), source);

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    libris_db::open_database(&db_path).map_err(|e| {
        CliError::database(format!(
            "Failed to open library database {}: {}",
            db_path.display(),
            e
        ))
    })
}

/// Treat blank flag values as "not given".
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
