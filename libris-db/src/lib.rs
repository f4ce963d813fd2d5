//! SQLite persistence layer for the library catalog.
//!
//! Provides schema creation, the book operations that keep status and
//! reservations consistent, the lookup dispatcher, and seed import,
//! backed by SQLite (via rusqlite with bundled feature).

pub mod consistency;
pub mod operations;
pub mod queries;
pub mod schema;
pub mod seed;

pub use consistency::{audit_consistency, InvariantViolation, ViolationKind};
pub use operations::{
    book_exists, delete_book, get_book, get_user, insert_book, insert_reservation,
    reservations_for_book, update_book, upsert_user, DeleteSummary, OperationError,
    UpdateSummary, PLACEHOLDER_RESERVATION_DATE,
};
pub use queries::{
    book_detail, catalog_stats, list_books, lookup, lookup_book_status, lookup_reservation,
    lookup_title, lookup_user_reservations, CatalogStats,
};
pub use rusqlite::Connection;
pub use schema::{open_database, open_memory, SchemaError};
pub use seed::{apply_seed, seed_from_file, SeedStats};
