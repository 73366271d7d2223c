// src/ingest/mod.rs
pub mod identifier;
pub mod source;
pub mod sql;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::connection::{QueryResult, SqlConnection, Value};
use crate::error::{DbError, IngestError, IngestResult, Operation};
use crate::report::IngestOutcome;
use identifier::{check_identifier, IdentifierKind};

/// Number of rows `preview_rows` fetches.
pub const PREVIEW_ROWS: usize = 5;

/// Where one CSV file goes: `source_path` → `schema.table`.
///
/// Immutable once built; it never holds a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSpec {
    source_path: PathBuf,
    schema: String,
    table: String,
}

impl IngestionSpec {
    pub fn new(
        source_path: impl Into<PathBuf>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

/// A column of the destination table as reported by `DESCRIBE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// Loads a CSV file into a table exactly once.
#[derive(Debug, Clone)]
pub struct IngestionEngine {
    spec: IngestionSpec,
}

impl IngestionEngine {
    pub fn new(spec: IngestionSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &IngestionSpec {
        &self.spec
    }

    /// Create `schema.table` from the source file unless the table already exists.
    ///
    /// Validation runs before any statement is issued. At most two mutating statements
    /// follow: `CREATE SCHEMA IF NOT EXISTS` and the `CREATE TABLE ... AS` load. Once the
    /// load has succeeded the call succeeds; a failing row count only leaves `rows` empty.
    #[tracing::instrument(
        level = "info",
        skip(self, conn),
        fields(schema = %self.spec.schema, table = %self.spec.table, path = %self.spec.source_path.display())
    )]
    pub fn ingest<C: SqlConnection + ?Sized>(&self, conn: &C) -> IngestResult<IngestOutcome> {
        self.validate()?;
        let source = source::source_literal(&self.spec.source_path)?;

        self.execute(conn, Operation::CreateSchema, &sql::create_schema(&self.spec.schema))?;

        if self.table_exists(conn)? {
            info!("table already exists; skipping load");
            return Ok(IngestOutcome::Skipped);
        }

        self.execute(
            conn,
            Operation::Load,
            &sql::load_csv(&self.spec.schema, &self.spec.table, source),
        )?;

        let rows = match self.row_count(conn) {
            Ok(rows) => {
                info!(rows, "loaded table");
                Some(rows)
            }
            Err(e) => {
                warn!(error = %e, "loaded table, but could not count its rows");
                None
            }
        };
        Ok(IngestOutcome::Loaded { rows })
    }

    /// Drop and reload: the full-refresh counterpart of `ingest`.
    pub fn refresh<C: SqlConnection + ?Sized>(&self, conn: &C) -> IngestResult<IngestOutcome> {
        // nothing may be dropped if the reload is bound to fail validation
        self.validate()?;
        self.drop_table(conn)?;
        self.ingest(conn)
    }

    /// `DROP TABLE IF EXISTS schema.table`. Succeeds when the table is absent.
    pub fn drop_table<C: SqlConnection + ?Sized>(&self, conn: &C) -> IngestResult<()> {
        self.validate_identifiers()?;
        self.execute(
            conn,
            Operation::Drop,
            &sql::drop_table(&self.spec.schema, &self.spec.table),
        )?;
        info!(table = %self.spec.qualified_name(), "dropped table if present");
        Ok(())
    }

    /// Look the table up in `information_schema.tables`; the table itself is never read.
    pub fn table_exists<C: SqlConnection + ?Sized>(&self, conn: &C) -> IngestResult<bool> {
        let res = conn
            .query(
                sql::TABLE_EXISTS,
                &[self.spec.schema.as_str(), self.spec.table.as_str()],
            )
            .map_err(|e| self.failed(Operation::ExistenceCheck, e))?;
        let count = scalar_count(sql::TABLE_EXISTS, &res)
            .map_err(|e| self.failed(Operation::ExistenceCheck, e))?;
        debug!(count, "catalog entries for {}", self.spec.qualified_name());
        Ok(count > 0)
    }

    pub fn validate(&self) -> IngestResult<()> {
        self.validate_path()?;
        self.validate_identifiers()
    }

    /// The path is checked on every call, never cached. It must exist and must be read
    /// by DuckDB as exactly that one file.
    pub fn validate_path(&self) -> IngestResult<()> {
        if self.spec.source_path.exists() {
            source::source_literal(&self.spec.source_path)
                .map(|_| ())
                .map_err(|e| {
                    warn!(error = %e, "rejected source path");
                    e
                })
        } else {
            warn!(path = %self.spec.source_path.display(), "source file not found");
            Err(IngestError::SourceNotFound {
                path: self.spec.source_path.clone(),
            })
        }
    }

    pub fn validate_identifiers(&self) -> IngestResult<()> {
        check_identifier(IdentifierKind::Schema, &self.spec.schema)
            .and_then(|_| check_identifier(IdentifierKind::Table, &self.spec.table))
            .map_err(|e| {
                warn!(error = %e, "rejected identifier");
                e
            })
    }

    pub fn row_count<C: SqlConnection + ?Sized>(&self, conn: &C) -> IngestResult<u64> {
        self.validate_identifiers()?;
        let stmt = sql::count_rows(&self.spec.schema, &self.spec.table);
        let res = self.query(conn, Operation::Count, &stmt)?;
        scalar_count(&stmt, &res).map_err(|e| self.failed(Operation::Count, e))
    }

    /// First `PREVIEW_ROWS` rows of the destination table.
    pub fn preview_rows<C: SqlConnection + ?Sized>(&self, conn: &C) -> IngestResult<QueryResult> {
        self.preview_rows_limit(conn, PREVIEW_ROWS)
    }

    pub fn preview_rows_limit<C: SqlConnection + ?Sized>(
        &self,
        conn: &C,
        limit: usize,
    ) -> IngestResult<QueryResult> {
        self.validate_identifiers()?;
        self.query(
            conn,
            Operation::Preview,
            &sql::preview(&self.spec.schema, &self.spec.table, limit),
        )
    }

    /// Column names and types of the destination table, in table order.
    pub fn table_schema<C: SqlConnection + ?Sized>(&self, conn: &C) -> IngestResult<Vec<ColumnInfo>> {
        self.validate_identifiers()?;
        let res = self.query(
            conn,
            Operation::Describe,
            &sql::describe(&self.spec.schema, &self.spec.table),
        )?;

        let idx = |name: &str, fallback: usize| {
            res.columns
                .iter()
                .position(|c| c == name)
                .unwrap_or(fallback)
        };
        let (name_idx, type_idx, null_idx) =
            (idx("column_name", 0), idx("column_type", 1), idx("null", 2));

        let text = |row: &[Value], i: usize| {
            row.get(i)
                .map(|v| v.to_string())
                .unwrap_or_default()
        };
        Ok(res
            .rows
            .iter()
            .map(|row| ColumnInfo {
                name: text(row.as_slice(), name_idx),
                data_type: text(row.as_slice(), type_idx),
                nullable: !text(row.as_slice(), null_idx).eq_ignore_ascii_case("NO"),
            })
            .collect())
    }

    fn execute<C: SqlConnection + ?Sized>(
        &self,
        conn: &C,
        operation: Operation,
        stmt: &str,
    ) -> IngestResult<()> {
        debug!(%operation, sql = stmt, "issuing statement");
        conn.execute(stmt).map_err(|e| self.failed(operation, e))
    }

    fn query<C: SqlConnection + ?Sized>(
        &self,
        conn: &C,
        operation: Operation,
        stmt: &str,
    ) -> IngestResult<QueryResult> {
        debug!(%operation, sql = stmt, "issuing query");
        conn.query(stmt, &[]).map_err(|e| self.failed(operation, e))
    }

    fn failed(&self, operation: Operation, source: DbError) -> IngestError {
        IngestError::IngestionFailed {
            operation,
            schema: self.spec.schema.clone(),
            table: self.spec.table.clone(),
            source,
        }
    }
}

/// Read a `SELECT COUNT(*)` result.
fn scalar_count(stmt: &str, res: &QueryResult) -> Result<u64, DbError> {
    res.first_value()
        .and_then(Value::as_i64)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| DbError::UnexpectedResult {
            sql: stmt.to_string(),
            detail: format!("expected a single non-negative count, got {:?}", res.rows),
        })
}
