//! Idempotent CSV ingestion into DuckDB for the bronze layer of a pipeline.
//!
//! An [`IngestionEngine`] is bound to one file and one `schema.table`. Calling
//! [`IngestionEngine::ingest`] validates the inputs, creates the schema if needed and loads
//! the file only when the table does not exist yet, so re-running a pipeline never
//! duplicates rows.

pub mod config;
pub mod connection;
pub mod duck;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod report;

pub use connection::{QueryResult, SqlConnection, Value};
pub use error::{DbError, IngestError, IngestResult, Operation};
pub use ingest::{ColumnInfo, IngestionEngine, IngestionSpec, PREVIEW_ROWS};
pub use report::{FailedJob, IngestOutcome, IngestReport, JobSummary};
