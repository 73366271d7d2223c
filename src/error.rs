use std::path::PathBuf;

use thiserror::Error;

use crate::ingest::identifier::IdentifierKind;

/// Failure raised by a database connection while executing or fetching.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    DuckDb(#[from] duckdb::Error),

    #[error("could not prepare database location {path:?}: {source}")]
    Location {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised by non-DuckDB connections (and test doubles).
    #[error("{0}")]
    Execution(String),

    #[error("unexpected result from `{sql}`: {detail}")]
    UnexpectedResult { sql: String, detail: String },
}

/// Everything that can go wrong while ingesting one CSV file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("unsupported source path {}: {reason}", path.display())]
    UnsupportedPath { path: PathBuf, reason: &'static str },

    #[error("invalid {kind} identifier {value:?}: must match ^[A-Za-z_][A-Za-z0-9_]*$")]
    InvalidIdentifier { kind: IdentifierKind, value: String },

    #[error("{operation} failed for {schema}.{table}")]
    IngestionFailed {
        operation: Operation,
        schema: String,
        table: String,
        #[source]
        source: DbError,
    },
}

pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// The database step that was running when an `IngestionFailed` occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    CreateSchema,
    ExistenceCheck,
    Load,
    Drop,
    Count,
    Preview,
    Describe,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateSchema => "schema creation",
            Operation::ExistenceCheck => "existence check",
            Operation::Load => "bulk load",
            Operation::Drop => "drop table",
            Operation::Count => "row count",
            Operation::Preview => "preview",
            Operation::Describe => "describe",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
