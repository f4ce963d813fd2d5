//! Read queries for the library database.
//!
//! [`lookup`] routes a [`LookupQuery`] to one of four join queries. The
//! detail and listing views use the same left join, unfiltered or by book.

use libris_catalog::*;
use rusqlite::{params, Connection, OptionalExtension, Params};

use crate::consistency::{check_row_count, InvariantViolation, ViolationKind};
use crate::operations::{row_to_book, status_column, OperationError};

/// Books left-joined with their reservation and its user, one result row per
/// (book, reservation) pair. Callers append the WHERE clause.
const BOOK_JOIN_SQL: &str = "
    SELECT b.BookID, b.Title, b.Author, b.ISBN, b.Status,
           r.ReservationID, r.UserID, r.ReservationDate, u.UserID, u.Name, u.Email
    FROM Books b
    LEFT JOIN Reservations r ON b.BookID = r.BookID
    LEFT JOIN Users u ON r.UserID = u.UserID";

const BOOK_JOIN_ORDER: &str = "ORDER BY b.rowid, r.ReservationID";

// ── Dispatcher ──────────────────────────────────────────────────────────────

/// Run a lookup request.
pub fn lookup(conn: &Connection, query: &LookupQuery) -> Result<LookupOutcome, OperationError> {
    log::debug!("Lookup {:?}", query);
    match query {
        LookupQuery::Book(book_id) => lookup_book_status(conn, book_id),
        LookupQuery::User(user_id) => lookup_user_reservations(conn, user_id),
        LookupQuery::Reservation(id) => lookup_reservation(conn, *id),
        LookupQuery::Title(title) => lookup_title(conn, title),
    }
}

/// Status of one book, with the reserving user when it is `Reserved`.
pub fn lookup_book_status(
    conn: &Connection,
    book_id: &str,
) -> Result<LookupOutcome, OperationError> {
    let sql = format!("{BOOK_JOIN_SQL} WHERE b.BookID = ?1 {BOOK_JOIN_ORDER}");
    let details = query_book_details(conn, &sql, params![book_id])?;
    Ok(match details.into_iter().next() {
        Some(detail) => LookupOutcome::BookStatus(status_row(detail)),
        None => LookupOutcome::NotFound(LookupTarget::Book),
    })
}

/// Title and status of every book reserved under a user.
pub fn lookup_user_reservations(
    conn: &Connection,
    user_id: &str,
) -> Result<LookupOutcome, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT b.Title, b.Status
         FROM Books b
         JOIN Reservations r ON b.BookID = r.BookID
         JOIN Users u ON r.UserID = u.UserID
         WHERE u.UserID = ?1
         ORDER BY r.ReservationID",
    )?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(UserReservationRow {
                title: row.get(0)?,
                status: status_column(row, 1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        Ok(LookupOutcome::NoReservations)
    } else {
        Ok(LookupOutcome::UserReservations(rows))
    }
}

/// The book and user behind one reservation.
pub fn lookup_reservation(
    conn: &Connection,
    reservation_id: i64,
) -> Result<LookupOutcome, OperationError> {
    let row = conn
        .query_row(
            "SELECT r.ReservationID, b.Title, b.Status, u.Name
             FROM Books b
             JOIN Reservations r ON b.BookID = r.BookID
             JOIN Users u ON r.UserID = u.UserID
             WHERE r.ReservationID = ?1",
            params![reservation_id],
            |row| {
                Ok(ReservationRow {
                    reservation_id: row.get(0)?,
                    title: row.get(1)?,
                    status: status_column(row, 2)?,
                    user_name: row.get(3)?,
                })
            },
        )
        .optional()?;

    Ok(match row {
        Some(row) => LookupOutcome::Reservation(row),
        None => LookupOutcome::NotFound(LookupTarget::Reservation),
    })
}

/// Every book with exactly this title. Titles are not unique, so each
/// match is reported on its own.
pub fn lookup_title(conn: &Connection, title: &str) -> Result<LookupOutcome, OperationError> {
    let sql = format!("{BOOK_JOIN_SQL} WHERE b.Title = ?1 {BOOK_JOIN_ORDER}");
    let details = query_book_details(conn, &sql, params![title])?;
    if details.is_empty() {
        return Ok(LookupOutcome::NotFound(LookupTarget::Title));
    }
    Ok(LookupOutcome::TitleMatches(
        details.into_iter().map(status_row).collect(),
    ))
}

// ── Detail and Listing ──────────────────────────────────────────────────────

/// Full record of one book, including its reservation when there is one.
pub fn book_detail(conn: &Connection, book_id: &str) -> Result<Option<BookDetail>, OperationError> {
    let sql = format!("{BOOK_JOIN_SQL} WHERE b.BookID = ?1 {BOOK_JOIN_ORDER}");
    Ok(query_book_details(conn, &sql, params![book_id])?
        .into_iter()
        .next())
}

/// Every book in insertion order, one row each.
pub fn list_books(conn: &Connection) -> Result<Vec<BookDetail>, OperationError> {
    let sql = format!("{BOOK_JOIN_SQL} {BOOK_JOIN_ORDER}");
    query_book_details(conn, &sql, params![])
}

/// Summary counts for the catalog.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub books: i64,
    pub reserved: i64,
    pub users: i64,
    pub reservations: i64,
}

pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let books: i64 = conn.query_row("SELECT COUNT(*) FROM Books", [], |r| r.get(0))?;
    let reserved: i64 = conn.query_row(
        "SELECT COUNT(*) FROM Books WHERE Status = 'Reserved'",
        [],
        |r| r.get(0),
    )?;
    let users: i64 = conn.query_row("SELECT COUNT(*) FROM Users", [], |r| r.get(0))?;
    let reservations: i64 =
        conn.query_row("SELECT COUNT(*) FROM Reservations", [], |r| r.get(0))?;

    Ok(CatalogStats {
        books,
        reserved,
        users,
        reservations,
    })
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

/// One raw row of [`BOOK_JOIN_SQL`].
struct JoinedRow {
    book: Book,
    reservation_id: Option<i64>,
    user_id: Option<String>,
    date: Option<String>,
    known_user: Option<String>,
    user_name: Option<String>,
    user_email: Option<String>,
}

fn row_to_joined(row: &rusqlite::Row<'_>) -> rusqlite::Result<JoinedRow> {
    Ok(JoinedRow {
        book: row_to_book(row)?,
        reservation_id: row.get(5)?,
        user_id: row.get(6)?,
        date: row.get(7)?,
        known_user: row.get(8)?,
        user_name: row.get(9)?,
        user_email: row.get(10)?,
    })
}

/// Run a book join and fold its rows into one [`BookDetail`] per book,
/// refusing books whose reservation rows break the one-reservation rule.
fn query_book_details(
    conn: &Connection,
    sql: &str,
    params: impl Params,
) -> Result<Vec<BookDetail>, OperationError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, row_to_joined)?
        .collect::<Result<Vec<_>, _>>()?;

    // Rows arrive grouped by book (ordered by rowid).
    let mut details: Vec<(BookDetail, usize)> = Vec::new();
    for row in rows {
        let has_row = usize::from(row.reservation_id.is_some());
        let reservation = reservation_detail(&row)?;
        match details.last_mut() {
            Some((detail, count)) if detail.book.id == row.book.id => {
                *count += has_row;
            }
            _ => {
                let count = has_row;
                details.push((
                    BookDetail {
                        book: row.book,
                        reservation,
                    },
                    count,
                ));
            }
        }
    }

    details
        .into_iter()
        .map(|(detail, count)| {
            check_row_count(&detail.book.id, detail.book.status, count)?;
            Ok(detail)
        })
        .collect()
}

fn reservation_detail(row: &JoinedRow) -> Result<Option<ReservationDetail>, InvariantViolation> {
    let Some(reservation_id) = row.reservation_id else {
        return Ok(None);
    };
    let unknown_user = || {
        InvariantViolation::new(
            &row.book.id,
            ViolationKind::UnknownUser(row.user_id.clone().unwrap_or_default()),
        )
    };
    let user_id = row.known_user.clone().ok_or_else(unknown_user)?;
    Ok(Some(ReservationDetail {
        reservation_id,
        user_id,
        user_name: row.user_name.clone().unwrap_or_default(),
        user_email: row.user_email.clone().unwrap_or_default(),
        date: row.date.clone().unwrap_or_default(),
    }))
}

fn status_row(detail: BookDetail) -> BookStatusRow {
    let reserved_by = match detail.book.status {
        BookStatus::Reserved => detail.reservation.map(|r| ReservedBy {
            name: r.user_name,
            email: r.user_email,
        }),
        BookStatus::Available => None,
    };
    BookStatusRow {
        book_id: detail.book.id,
        status: detail.book.status,
        reserved_by,
    }
}
