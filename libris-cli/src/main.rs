//! libris CLI
//!
//! Command-line interface and interactive menu for the library catalog.

mod cli_types;
mod commands;
mod display;
mod error;
mod logging;
mod query;
mod settings;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use commands::books::{run_add, run_delete, run_update};
use commands::config::{run_config_path, run_config_set_db, run_config_show};
use commands::lookup::{run_find, run_list, run_show};
use commands::menu::run_menu;
use commands::open_catalog;
use commands::seed::run_seed;
use commands::verify::run_verify;

pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db = cli.db;
    let conn = || open_catalog(db.clone());

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Add(args) => run_add(&conn()?, args),
        Commands::Show { id } => run_show(&conn()?, &id),
        Commands::Find { query } => run_find(&conn()?, &query),
        Commands::List => run_list(&conn()?),
        Commands::Update(args) => run_update(&conn()?, args),
        Commands::Delete { id } => run_delete(&conn()?, &id),
        Commands::Seed { path } => run_seed(&conn()?, &path),
        Commands::Verify => run_verify(&conn()?),
        Commands::Menu => run_menu(&conn()?),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                run_config_show(db.clone());
                Ok(())
            }
            ConfigAction::Path => {
                run_config_path();
                Ok(())
            }
            ConfigAction::SetDb { path, clear } => run_config_set_db(path, clear),
        },
    }
}
