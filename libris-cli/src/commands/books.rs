use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use libris_catalog::{Book, BookUpdate};
use libris_db::Connection;

use crate::CliError;
use crate::cli_types::{AddArgs, UpdateArgs};

use super::non_blank;

fn required(field: &str, value: String) -> Result<String, CliError> {
    non_blank(Some(value)).ok_or_else(|| CliError::invalid_input(format!("{field} must not be blank")))
}

/// Entry point for `add`.
pub(crate) fn run_add(conn: &Connection, args: AddArgs) -> Result<(), CliError> {
    let book = Book {
        id: required("Book ID", args.id)?,
        title: required("Title", args.title)?,
        author: required("Author", args.author)?,
        isbn: required("ISBN", args.isbn)?,
        status: args.status,
    };
    add_book(conn, &book)
}

pub(crate) fn add_book(conn: &Connection, book: &Book) -> Result<(), CliError> {
    libris_db::insert_book(conn, book)?;
    log::info!(
        "{} {}",
        "Book added successfully.".if_supports_color(Stdout, |t| t.green()),
        book.id.if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}

/// Entry point for `update`.
pub(crate) fn run_update(conn: &Connection, args: UpdateArgs) -> Result<(), CliError> {
    let update = BookUpdate {
        title: non_blank(args.title),
        author: non_blank(args.author),
        isbn: non_blank(args.isbn),
        status: args.status,
    };
    let id = required("Book ID", args.id)?;
    update_book(conn, &id, &update)
}

pub(crate) fn update_book(
    conn: &Connection,
    book_id: &str,
    update: &BookUpdate,
) -> Result<(), CliError> {
    if update.is_empty() {
        // Unknown ids are still reported.
        if !libris_db::book_exists(conn, book_id)? {
            log::info!("Book not found.");
        } else {
            log::info!("Nothing to update.");
        }
        return Ok(());
    }

    match libris_db::update_book(conn, book_id, update) {
        Ok(summary) => {
            log::info!(
                "{}",
                "Book details updated successfully.".if_supports_color(Stdout, |t| t.green()),
            );
            log::debug!(
                "{} field(s) changed, {} reservation(s) redated",
                summary.fields_changed,
                summary.reservations_redated,
            );
            Ok(())
        }
        Err(libris_db::OperationError::NotFound { .. }) => {
            log::info!("Book not found.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Entry point for `delete`.
pub(crate) fn run_delete(conn: &Connection, book_id: &str) -> Result<(), CliError> {
    match libris_db::delete_book(conn, book_id.trim()) {
        Ok(summary) => {
            log::info!(
                "{}",
                "Book deleted successfully.".if_supports_color(Stdout, |t| t.green()),
            );
            if summary.reservations_removed > 0 {
                log::info!(
                    "  Removed {} reservation(s)",
                    summary.reservations_removed
                );
            }
            Ok(())
        }
        Err(libris_db::OperationError::NotFound { .. }) => {
            log::info!("Book not found.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
