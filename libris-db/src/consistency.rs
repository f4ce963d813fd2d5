//! Book/reservation invariants and the whole-database audit.
//!
//! A book has at most one reservation row. `Reserved` books have exactly one,
//! with a non-empty date; `Available` books may keep a row only once its date
//! has been cleared.

use std::fmt;

use libris_catalog::BookStatus;
use rusqlite::{params, Connection};

use crate::operations::{status_column, OperationError};

/// The ways a book and its reservation rows can disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    ReservedWithoutReservation,
    ReservedWithEmptyDate,
    AvailableWithDatedReservation,
    MultipleReservations(usize),
    /// Reservation row whose book no longer exists.
    OrphanReservation(i64),
    /// Reservation row naming a user that does not exist. Empty when the
    /// row names no user at all.
    UnknownUser(String),
}

/// A detected mismatch between a book's status and its reservation rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub book_id: String,
    pub kind: ViolationKind,
}

impl InvariantViolation {
    pub(crate) fn new(book_id: &str, kind: ViolationKind) -> Self {
        Self {
            book_id: book_id.to_string(),
            kind,
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.book_id;
        match &self.kind {
            ViolationKind::ReservedWithoutReservation => {
                write!(f, "book '{id}' is Reserved but has no reservation")
            }
            ViolationKind::ReservedWithEmptyDate => {
                write!(f, "book '{id}' is Reserved but its reservation has no date")
            }
            ViolationKind::AvailableWithDatedReservation => {
                write!(f, "book '{id}' is Available but still has a dated reservation")
            }
            ViolationKind::MultipleReservations(n) => {
                write!(f, "book '{id}' has {n} reservations (at most one allowed)")
            }
            ViolationKind::OrphanReservation(rid) => {
                write!(f, "reservation LR{rid} points at missing book '{id}'")
            }
            ViolationKind::UnknownUser(user) if user.is_empty() => {
                write!(f, "reservation on book '{id}' names no user")
            }
            ViolationKind::UnknownUser(user) => {
                write!(f, "reservation on book '{id}' names unknown user '{user}'")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Check the number of reservation rows joined onto a book.
pub(crate) fn check_row_count(
    book_id: &str,
    status: BookStatus,
    rows: usize,
) -> Result<(), InvariantViolation> {
    if rows > 1 {
        return Err(InvariantViolation::new(
            book_id,
            ViolationKind::MultipleReservations(rows),
        ));
    }
    if status == BookStatus::Reserved && rows == 0 {
        return Err(InvariantViolation::new(
            book_id,
            ViolationKind::ReservedWithoutReservation,
        ));
    }
    Ok(())
}

/// Full check of one book given the dates of its reservation rows.
pub(crate) fn check_book(
    book_id: &str,
    status: BookStatus,
    dates: &[String],
) -> Result<(), InvariantViolation> {
    check_row_count(book_id, status, dates.len())?;
    let dated = dates.iter().any(|d| !d.is_empty());
    match status {
        BookStatus::Reserved if !dated => Err(InvariantViolation::new(
            book_id,
            ViolationKind::ReservedWithEmptyDate,
        )),
        BookStatus::Available if dated => Err(InvariantViolation::new(
            book_id,
            ViolationKind::AvailableWithDatedReservation,
        )),
        _ => Ok(()),
    }
}

/// Re-check a single stored book. Used after writes, inside the writer's
/// transaction.
pub(crate) fn verify_book(conn: &Connection, book_id: &str) -> Result<(), OperationError> {
    let status = conn.query_row(
        "SELECT Status FROM Books WHERE BookID = ?1",
        params![book_id],
        |row| status_column(row, 0),
    )?;
    let mut stmt = conn.prepare(
        "SELECT COALESCE(ReservationDate, '') FROM Reservations
         WHERE BookID = ?1 ORDER BY ReservationID",
    )?;
    let dates = stmt
        .query_map(params![book_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    check_book(book_id, status, &dates)?;
    Ok(())
}

/// Scan the whole database and report every invariant breach, ordered by
/// book insertion.
pub fn audit_consistency(conn: &Connection) -> Result<Vec<InvariantViolation>, OperationError> {
    let mut violations = Vec::new();

    // Rows count by id. Older tables allow NULL dates and users.
    let mut stmt = conn.prepare(
        "SELECT b.BookID, b.Status, r.ReservationID, COALESCE(r.ReservationDate, ''),
                r.UserID, u.UserID
         FROM Books b
         LEFT JOIN Reservations r ON b.BookID = r.BookID
         LEFT JOIN Users u ON r.UserID = u.UserID
         ORDER BY b.rowid, r.ReservationID",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                status_column(row, 1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut current: Option<(String, BookStatus, Vec<String>)> = None;
    for (book_id, status, reservation_id, date, reservation_user, known_user) in rows {
        let same_book = current.as_ref().is_some_and(|(id, _, _)| *id == book_id);
        if !same_book {
            if let Some((id, st, dates)) = current.take() {
                violations.extend(check_book(&id, st, &dates).err());
            }
            current = Some((book_id.clone(), status, Vec::new()));
        }
        if reservation_id.is_none() {
            continue;
        }

        if known_user.is_none() {
            violations.push(InvariantViolation::new(
                &book_id,
                ViolationKind::UnknownUser(reservation_user.unwrap_or_default()),
            ));
        }
        if let Some((_, _, dates)) = current.as_mut() {
            dates.push(date);
        }
    }
    if let Some((id, st, dates)) = current {
        violations.extend(check_book(&id, st, &dates).err());
    }

    let mut stmt = conn.prepare(
        "SELECT r.ReservationID, COALESCE(r.BookID, '') FROM Reservations r
         WHERE NOT EXISTS (SELECT 1 FROM Books b WHERE b.BookID = r.BookID)
         ORDER BY r.ReservationID",
    )?;
    let orphans = stmt.query_map([], |row| {
        Ok(InvariantViolation {
            book_id: row.get(1)?,
            kind: ViolationKind::OrphanReservation(row.get(0)?),
        })
    })?;
    for orphan in orphans {
        violations.push(orphan?);
    }

    Ok(violations)
}
