//! Library catalog data model and seed-file loading.
//!
//! This crate defines books, users, reservations and the lookup rows without
//! any database dependencies. `libris-db` persists and queries them.

pub mod seed;
pub mod types;

pub use seed::{load_seed, parse_seed, SeedData, SeedError, SeedReservation};
pub use types::*;
