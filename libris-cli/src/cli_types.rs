//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use libris_catalog::BookStatus;

#[derive(Parser)]
#[command(name = "libris")]
#[command(about = "Track library books, their reservations and the users holding them", long_about = None)]
pub(crate) struct Cli {
    /// Path to the library database (default: resolved from $LIBRIS_DB, settings, or the data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Clone)]
pub(crate) struct AddArgs {
    /// Book identifier (e.g., LB001)
    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    #[arg(long)]
    pub isbn: String,

    /// Initial status (Available or Reserved)
    #[arg(long, default_value = "Available")]
    pub status: BookStatus,
}

/// Fields to change on an existing book. Omitted or blank values are left as they are.
#[derive(Args, Clone)]
pub(crate) struct UpdateArgs {
    /// Book identifier (e.g., LB001)
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub isbn: Option<String>,

    /// New status (Available or Reserved)
    #[arg(long)]
    pub status: Option<BookStatus>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Add a new book to the catalog
    Add(AddArgs),

    /// Show every detail of one book
    Show {
        /// Book identifier (e.g., LB001)
        id: String,
    },

    /// Find reservation status by book ID (LB…), user ID (LU…), reservation ID (LR…), or title
    Find {
        /// Identifier or exact title
        query: String,
    },

    /// List all books with their reservations
    List,

    /// Modify book details
    Update(UpdateArgs),

    /// Delete a book and its reservation
    Delete {
        /// Book identifier (e.g., LB001)
        id: String,
    },

    /// Import users, books and reservations from a YAML file or directory
    Seed {
        /// Seed file, or a directory of .yaml files
        path: PathBuf,
    },

    /// Check every book against its reservation rows
    Verify,

    /// Interactive numbered menu
    Menu,

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the resolved database path and where it came from
    Show,

    /// Print the settings file path
    Path,

    /// Save the default database path in the settings file
    SetDb {
        /// Database file to use by default
        #[arg(required_unless_present = "clear")]
        path: Option<PathBuf>,

        /// Remove the saved path instead
        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },
}
