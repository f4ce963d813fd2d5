use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Opening or creating the database failed
    #[error("Database error: {0}")]
    Database(String),

    /// A catalog operation was refused or failed
    #[error(transparent)]
    Operation(#[from] libris_db::OperationError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Operator input that cannot be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The consistency audit found problems
    #[error("{0} consistency problem(s) found")]
    Inconsistent(usize),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
