//! Logger setup. All user-facing output goes through the `log` macros so
//! `--quiet`, `--verbose` and `--logfile` apply to it uniformly.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::{Level, LevelFilter};

use crate::CliError;

/// Environment variable holding env_logger-style filter directives.
const LOG_ENV: &str = "LIBRIS_LOG";

/// Writes to stdout, and a copy without ANSI escapes to the log file.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger.
pub(crate) fn init_logging(
    quiet: bool,
    verbose: bool,
    logfile: Option<&Path>,
) -> Result<(), CliError> {
    let file = logfile.map(File::create).transpose()?;

    env_logger::Builder::new()
        .filter_level(level_for(quiet, verbose))
        .parse_env(env_logger::Env::new().filter(LOG_ENV))
        .format(move |buf, record| {
            if verbose {
                return writeln!(
                    buf,
                    "{} {:<5} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.args(),
                );
            }
            match record.level() {
                Level::Error => writeln!(buf, "error: {}", record.args()),
                Level::Warn => writeln!(buf, "warning: {}", record.args()),
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .try_init()
        .map_err(|e| CliError::config(format!("Failed to initialize logging: {e}")))
}

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
