use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use libris_db::Connection;

use crate::CliError;

/// Entry point for `seed`.
pub(crate) fn run_seed(conn: &Connection, path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::invalid_input(format!(
            "seed path {} does not exist",
            path.display()
        )));
    }

    log::info!(
        "{}",
        format!("Importing {}", path.display()).if_supports_color(Stdout, |t| t.bold()),
    );
    let stats = libris_db::seed_from_file(conn, path)?;

    log::info!("  Users:                 {:>6}", stats.users);
    log::info!("  Books:                 {:>6}", stats.books);
    log::info!("  Reservations created:  {:>6}", stats.reservations_created);
    log::info!("  Reservations updated:  {:>6}", stats.reservations_updated);
    Ok(())
}
