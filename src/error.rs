use thiserror::Error;

use crate::pieql::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("table name required")]
    TableNameRequired,

    #[error("invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("table already exists: {0}")]
    TableExists(String),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("row {row} of table {table} has {cells} cells, column {column} is at position {position}")]
    MalformedRow {
        table: String,
        row: usize,
        cells: usize,
        column: String,
        position: usize,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("database not open")]
    DatabaseNotOpen,

    #[error("CSV header required")]
    MissingHeader,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Coarse classification of an [`Error`], used by callers that only need
/// to decide who is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request names something that does not exist or cannot exist.
    Validation,
    /// The query text does not match the grammar.
    Syntax,
    /// Storage could not be read, written or decoded.
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TableNameRequired
            | Error::InvalidTableName(_)
            | Error::TableExists(_)
            | Error::TableNotFound(_)
            | Error::ColumnNotFound(_)
            | Error::MissingHeader => ErrorKind::Validation,
            Error::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ErrorKind::Io,
                _ => ErrorKind::Validation,
            },
            Error::Parse(_) => ErrorKind::Syntax,
            Error::MalformedRow { .. }
            | Error::DatabaseNotOpen
            | Error::Config(_)
            | Error::Io(_)
            | Error::Serialization(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
