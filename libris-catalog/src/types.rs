//! Data model types for the library catalog.
//!
//! These types represent the persistent catalog schema (books, users,
//! reservations) and the denormalized rows the lookups hand back for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Book ────────────────────────────────────────────────────────────────────

/// Availability of a book. Stored as the literal text of the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookStatus {
    Available,
    Reserved,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status text that is neither `Available` nor `Reserved`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid book status '{0}' (expected Available or Reserved)")]
pub struct StatusParseError(pub String);

impl FromStr for BookStatus {
    type Err = StatusParseError;

    /// Exact match only. Stored data and operator input use the same spelling,
    /// so anything else is rejected rather than guessed at.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Self::Available),
            "Reserved" => Ok(Self::Reserved),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub status: BookStatus,
}

/// Sparse set of column changes for an existing book.
///
/// `None` means "leave as is"; there is no way to clear a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub status: Option<BookStatus>,
}

impl BookUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.isbn.is_none() && self.status.is_none()
    }
}

// ── User ────────────────────────────────────────────────────────────────────

/// A person who may hold reservations. Managed outside the catalog engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

// ── Reservation ─────────────────────────────────────────────────────────────

/// Link between one book and one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: i64,
    pub book_id: String,
    pub user_id: String,
    /// Empty when the reservation carries no active date.
    pub date: String,
}

/// Display form of a reservation identifier (`LR<n>`).
pub fn reservation_label(id: i64) -> String {
    format!("LR{id}")
}

// ── Lookups ─────────────────────────────────────────────────────────────────

/// A lookup request. Which relation a query string identifies is decided
/// by the caller before the request reaches the database layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    Book(String),
    User(String),
    Reservation(i64),
    Title(String),
}

/// Name and email of the user holding a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedBy {
    pub name: String,
    pub email: String,
}

/// Result row for a lookup by book identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookStatusRow {
    pub book_id: String,
    pub status: BookStatus,
    /// Only present when `status` is `Reserved`.
    pub reserved_by: Option<ReservedBy>,
}

/// Result row for a lookup by user identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReservationRow {
    pub title: String,
    pub status: BookStatus,
}

/// Result row for a lookup by reservation identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRow {
    pub reservation_id: i64,
    pub title: String,
    pub status: BookStatus,
    pub user_name: String,
}

/// What a lookup could not find, so the caller can word the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTarget {
    Book,
    Reservation,
    Title,
}

/// Outcome of a dispatched lookup. Empty results are ordinary outcomes,
/// not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    BookStatus(BookStatusRow),
    UserReservations(Vec<UserReservationRow>),
    Reservation(ReservationRow),
    /// One row per book sharing the title, in insertion order.
    TitleMatches(Vec<BookStatusRow>),
    NotFound(LookupTarget),
    /// No reservation row references the user id.
    NoReservations,
}

/// Reservation details joined onto a book in the detail and listing views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDetail {
    pub reservation_id: i64,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub date: String,
}

/// Denormalized book row: core fields plus the reservation, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetail {
    pub book: Book,
    pub reservation: Option<ReservationDetail>,
}
