//! YAML loading for externally supplied catalog data.
//!
//! Users and the reservations linking them to books are maintained outside
//! the catalog engine. They arrive as seed files, optionally alongside books.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Book, User};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
}

/// A reservation link as written in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReservation {
    pub book_id: String,
    pub user_id: String,
    #[serde(default)]
    pub date: String,
}

/// Contents of one or more seed files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub reservations: Vec<SeedReservation>,
}

impl SeedData {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.books.is_empty() && self.reservations.is_empty()
    }

    fn extend(&mut self, other: SeedData) {
        self.users.extend(other.users);
        self.books.extend(other.books);
        self.reservations.extend(other.reservations);
    }
}

/// Parse seed data from a YAML string.
pub fn parse_seed(contents: &str, origin: &str) -> Result<SeedData, SeedError> {
    // An empty document deserializes to unit, not to a mapping.
    if contents.trim().is_empty() {
        return Ok(SeedData::default());
    }
    serde_yml::from_str(contents).map_err(|e| SeedError::Parse {
        path: origin.to_string(),
        source: e,
    })
}

/// Load seed data from a file, or from every `.yaml`/`.yml` file in a
/// directory (merged in file-name order).
pub fn load_seed(path: &Path) -> Result<SeedData, SeedError> {
    if !path.is_dir() {
        return load_seed_file(path);
    }

    let mut entries: Vec<_> = std::fs::read_dir(path)
        .map_err(|e| SeedError::Io {
            path: path.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut data = SeedData::default();
    for entry in entries {
        data.extend(load_seed_file(&entry.path())?);
    }
    Ok(data)
}

fn load_seed_file(path: &Path) -> Result<SeedData, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SeedError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed(&contents, &path.display().to_string())
}
