//! Import of externally supplied users, books and reservation links.

use libris_catalog::SeedData;
use rusqlite::{params, Connection, OptionalExtension};

use crate::consistency::audit_consistency;
use crate::operations::{book_exists, get_user, insert_reservation, upsert_user, OperationError};

/// Statistics from a seed import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedStats {
    pub users: usize,
    pub books: usize,
    pub reservations_created: usize,
    pub reservations_updated: usize,
}

/// Load seed YAML (a file or a directory of files) into the database.
pub fn seed_from_file(
    conn: &Connection,
    path: &std::path::Path,
) -> Result<SeedStats, OperationError> {
    let data = libris_catalog::load_seed(path)?;
    apply_seed(conn, &data)
}

/// Apply seed data in a single transaction.
///
/// Users and books are upserted. A reservation link that already exists for
/// the same book and user has its date replaced; otherwise a row is added.
/// Links must name a known user and book. The result must pass
/// [`audit_consistency`], or nothing is written.
pub fn apply_seed(conn: &Connection, data: &SeedData) -> Result<SeedStats, OperationError> {
    if data.is_empty() {
        log::warn!("Seed data holds no users, books or reservations");
        return Ok(SeedStats::default());
    }

    let tx = conn.unchecked_transaction()?;
    let mut stats = SeedStats::default();

    for user in &data.users {
        upsert_user(&tx, user)?;
        stats.users += 1;
    }

    for book in &data.books {
        tx.execute(
            "INSERT INTO Books (BookID, Title, Author, ISBN, Status)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(BookID) DO UPDATE SET
                 Title = excluded.Title,
                 Author = excluded.Author,
                 ISBN = excluded.ISBN,
                 Status = excluded.Status",
            params![book.id, book.title, book.author, book.isbn, book.status.as_str()],
        )?;
        stats.books += 1;
    }

    for link in &data.reservations {
        if get_user(&tx, &link.user_id)?.is_none() {
            return Err(OperationError::NotFound {
                entity_type: "User".to_string(),
                id: link.user_id.clone(),
            });
        }
        if !book_exists(&tx, &link.book_id)? {
            return Err(OperationError::NotFound {
                entity_type: "Book".to_string(),
                id: link.book_id.clone(),
            });
        }
        let existing: Option<i64> = tx
            .query_row(
                "SELECT ReservationID FROM Reservations WHERE BookID = ?1 AND UserID = ?2
                 ORDER BY ReservationID LIMIT 1",
                params![link.book_id, link.user_id],
                |row| row.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE Reservations SET ReservationDate = ?2 WHERE ReservationID = ?1",
                    params![id, link.date],
                )?;
                stats.reservations_updated += 1;
            }
            None => {
                insert_reservation(&tx, &link.book_id, &link.user_id, &link.date)?;
                stats.reservations_created += 1;
            }
        }
    }

    let violations = audit_consistency(&tx)?;
    if let Some(first) = violations.first() {
        for v in &violations {
            log::warn!("Seed rejected: {}", v);
        }
        return Err(first.clone().into());
    }

    tx.commit()?;
    log::debug!("Seed applied: {:?}", stats);
    Ok(stats)
}
