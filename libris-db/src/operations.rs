//! Book mutations that keep status and reservation rows consistent, plus the
//! plain row accessors they are built from.

use libris_catalog::{Book, BookStatus, BookUpdate, Reservation, User};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::consistency::{verify_book, InvariantViolation, ViolationKind};

/// Date written onto a book's reservation when it becomes `Reserved`.
/// The operator is never asked for a real date.
pub const PLACEHOLDER_RESERVATION_DATE: &str = "2023-10-02";

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{entity_type} not found: '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("{entity_type} '{id}' already exists")]
    DuplicateKey { entity_type: String, id: String },
    #[error("Invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),
    #[error("Seed error: {0}")]
    Seed(#[from] libris_catalog::SeedError),
}

impl OperationError {
    fn book_not_found(id: &str) -> Self {
        Self::NotFound {
            entity_type: "Book".to_string(),
            id: id.to_string(),
        }
    }
}

/// What an update changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub fields_changed: usize,
    /// Reservation rows whose date was rewritten by a status change.
    pub reservations_redated: usize,
}

/// What a delete removed besides the book itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSummary {
    pub reservations_removed: usize,
}

// ── Book Operations ─────────────────────────────────────────────────────────

/// Insert a new book.
///
/// A new book has no reservation row, so it cannot start out `Reserved`.
pub fn insert_book(conn: &Connection, book: &Book) -> Result<(), OperationError> {
    if book.status == BookStatus::Reserved {
        return Err(InvariantViolation::new(&book.id, ViolationKind::ReservedWithoutReservation).into());
    }

    let tx = conn.unchecked_transaction()?;
    if book_exists(&tx, &book.id)? {
        return Err(OperationError::DuplicateKey {
            entity_type: "Book".to_string(),
            id: book.id.clone(),
        });
    }
    tx.execute(
        "INSERT INTO Books (BookID, Title, Author, ISBN, Status) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![book.id, book.title, book.author, book.isbn, book.status.as_str()],
    )?;
    tx.commit()?;

    log::debug!("Inserted book {}", book.id);
    Ok(())
}

/// Apply a sparse update to an existing book.
///
/// A status change also rewrites the date of the book's reservation row:
/// cleared for `Available`, [`PLACEHOLDER_RESERVATION_DATE`] for `Reserved`.
/// No row is created when none exists; if that leaves a `Reserved` book
/// without its reservation the whole update is rolled back.
pub fn update_book(
    conn: &Connection,
    book_id: &str,
    update: &BookUpdate,
) -> Result<UpdateSummary, OperationError> {
    let tx = conn.unchecked_transaction()?;
    if !book_exists(&tx, book_id)? {
        return Err(OperationError::book_not_found(book_id));
    }

    let mut summary = UpdateSummary::default();
    let columns = [
        ("UPDATE Books SET Title = ?1 WHERE BookID = ?2", update.title.as_deref()),
        ("UPDATE Books SET Author = ?1 WHERE BookID = ?2", update.author.as_deref()),
        ("UPDATE Books SET ISBN = ?1 WHERE BookID = ?2", update.isbn.as_deref()),
        (
            "UPDATE Books SET Status = ?1 WHERE BookID = ?2",
            update.status.as_ref().map(BookStatus::as_str),
        ),
    ];
    for (sql, value) in columns {
        if let Some(value) = value {
            tx.execute(sql, params![value, book_id])?;
            summary.fields_changed += 1;
        }
    }

    if let Some(status) = update.status {
        let date = match status {
            BookStatus::Available => "",
            BookStatus::Reserved => PLACEHOLDER_RESERVATION_DATE,
        };
        summary.reservations_redated = tx.execute(
            "UPDATE Reservations SET ReservationDate = ?1 WHERE BookID = ?2",
            params![date, book_id],
        )?;
        log::debug!(
            "Book {} -> {}: {} reservation row(s) redated",
            book_id,
            status,
            summary.reservations_redated,
        );
        verify_book(&tx, book_id)?;
    }

    tx.commit()?;
    Ok(summary)
}

/// Delete a book together with every reservation row that references it.
pub fn delete_book(conn: &Connection, book_id: &str) -> Result<DeleteSummary, OperationError> {
    let tx = conn.unchecked_transaction()?;
    let book = get_book(&tx, book_id)?.ok_or_else(|| OperationError::book_not_found(book_id))?;

    let linked: i64 = tx.query_row(
        "SELECT COUNT(*) FROM Reservations WHERE BookID = ?1",
        params![book_id],
        |row| row.get(0),
    )?;

    let mut summary = DeleteSummary::default();
    if linked > 0 {
        if book.status == BookStatus::Available {
            log::debug!("Book {book_id} is Available but still has {linked} reservation row(s)");
        }
        summary.reservations_removed = tx.execute(
            "DELETE FROM Reservations WHERE BookID = ?1",
            params![book_id],
        )?;
    }
    tx.execute("DELETE FROM Books WHERE BookID = ?1", params![book_id])?;
    tx.commit()?;

    log::debug!(
        "Deleted book {} ({} reservation row(s))",
        book_id,
        summary.reservations_removed,
    );
    Ok(summary)
}

/// Fetch a single book by identifier.
pub fn get_book(conn: &Connection, book_id: &str) -> Result<Option<Book>, OperationError> {
    conn.query_row(
        "SELECT BookID, Title, Author, ISBN, Status FROM Books WHERE BookID = ?1",
        params![book_id],
        row_to_book,
    )
    .optional()
    .map_err(Into::into)
}

pub fn book_exists(conn: &Connection, book_id: &str) -> Result<bool, OperationError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM Books WHERE BookID = ?1)",
        params![book_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

// ── User Operations ─────────────────────────────────────────────────────────

/// Insert or update a user. Users are owned by whoever supplies them; the
/// book operations above only read them.
pub fn upsert_user(conn: &Connection, user: &User) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO Users (UserID, Name, Email) VALUES (?1, ?2, ?3)
         ON CONFLICT(UserID) DO UPDATE SET
             Name = excluded.Name,
             Email = excluded.Email",
        params![user.id, user.name, user.email],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, user_id: &str) -> Result<Option<User>, OperationError> {
    conn.query_row(
        "SELECT UserID, Name, Email FROM Users WHERE UserID = ?1",
        params![user_id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

// ── Reservation Rows ────────────────────────────────────────────────────────

/// Insert a raw reservation row. Returns the generated ID.
///
/// This does not touch the book's status; callers that link users to books
/// (the seed import) re-check consistency afterwards.
pub fn insert_reservation(
    conn: &Connection,
    book_id: &str,
    user_id: &str,
    date: &str,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO Reservations (BookID, UserID, ReservationDate) VALUES (?1, ?2, ?3)",
        params![book_id, user_id, date],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All reservation rows for a book, oldest first.
pub fn reservations_for_book(
    conn: &Connection,
    book_id: &str,
) -> Result<Vec<Reservation>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT ReservationID, BookID, COALESCE(UserID, ''), COALESCE(ReservationDate, '')
         FROM Reservations WHERE BookID = ?1 ORDER BY ReservationID",
    )?;
    let rows = stmt.query_map(params![book_id], |row| {
        Ok(Reservation {
            id: row.get(0)?,
            book_id: row.get(1)?,
            user_id: row.get(2)?,
            date: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Read a `Status` column, rejecting text outside the two known values.
pub(crate) fn status_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<BookStatus> {
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn row_to_book(row: &rusqlite::Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        isbn: row.get(3)?,
        status: status_column(row, 4)?,
    })
}
