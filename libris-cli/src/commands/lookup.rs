use libris_catalog::{LookupOutcome, LookupTarget};
use libris_db::Connection;

use crate::CliError;
use crate::display::{not_found_message, print_book_detail, print_listing, print_lookup};
use crate::query::{QueryError, parse_query};

/// Entry point for `show`.
pub(crate) fn run_show(conn: &Connection, book_id: &str) -> Result<(), CliError> {
    match libris_db::book_detail(conn, book_id.trim())? {
        Some(detail) => print_book_detail(&detail),
        None => log::info!("{}", not_found_message(LookupTarget::Book)),
    }
    Ok(())
}

/// Entry point for `find`.
pub(crate) fn run_find(conn: &Connection, input: &str) -> Result<(), CliError> {
    print_lookup(&find(conn, input)?);
    Ok(())
}

/// Classify the input and run the matching lookup.
pub(crate) fn find(conn: &Connection, input: &str) -> Result<LookupOutcome, CliError> {
    if input.trim().is_empty() {
        return Err(CliError::invalid_input("lookup text must not be blank"));
    }
    match parse_query(input) {
        Ok(query) => Ok(libris_db::lookup(conn, &query)?),
        Err(QueryError::MalformedReservationId(text)) => {
            log::debug!("Malformed reservation id {:?}", text);
            Ok(LookupOutcome::NotFound(LookupTarget::Reservation))
        }
    }
}

/// Entry point for `list`.
pub(crate) fn run_list(conn: &Connection) -> Result<(), CliError> {
    print_listing(&libris_db::list_books(conn)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_catalog::{Book, BookStatus, User};

    fn catalog() -> Connection {
        let conn = libris_db::open_memory().unwrap();
        libris_db::upsert_user(
            &conn,
            &User {
                id: "LU001".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
        )
        .unwrap();
        libris_db::insert_book(
            &conn,
            &Book {
                id: "LB001".to_string(),
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                isbn: "9780441013593".to_string(),
                status: BookStatus::Available,
            },
        )
        .unwrap();
        conn
    }

    #[test]
    fn malformed_reservation_id_is_not_found() {
        let conn = catalog();
        assert_eq!(
            find(&conn, "LRx").unwrap(),
            LookupOutcome::NotFound(LookupTarget::Reservation)
        );
    }

    #[test]
    fn blank_input_is_rejected() {
        let conn = catalog();
        assert!(matches!(find(&conn, "  "), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn user_without_reservations() {
        let conn = catalog();
        assert_eq!(find(&conn, "LU001").unwrap(), LookupOutcome::NoReservations);
    }

    #[test]
    fn title_is_matched_exactly() {
        let conn = catalog();
        match find(&conn, " Dune ").unwrap() {
            LookupOutcome::TitleMatches(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].book_id, "LB001");
                assert_eq!(rows[0].reserved_by, None);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            find(&conn, "dune").unwrap(),
            LookupOutcome::NotFound(LookupTarget::Title)
        );
    }
}
