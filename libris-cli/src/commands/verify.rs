use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use libris_db::Connection;

use crate::CliError;

/// Entry point for `verify`: audit every book against its reservation rows.
pub(crate) fn run_verify(conn: &Connection) -> Result<(), CliError> {
    let stats = libris_db::catalog_stats(conn)?;
    let violations = libris_db::audit_consistency(conn)?;

    log::info!(
        "{}",
        "Catalog consistency".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Books:         {:>6}", stats.books);
    log::info!("  Reserved:      {:>6}", stats.reserved);
    log::info!("  Users:         {:>6}", stats.users);
    log::info!("  Reservations:  {:>6}", stats.reservations);
    crate::log_blank();

    if violations.is_empty() {
        log::info!("{}", "No problems found.".if_supports_color(Stdout, |t| t.green()));
        return Ok(());
    }

    for v in &violations {
        log::warn!("{}", v);
    }
    Err(CliError::Inconsistent(violations.len()))
}
