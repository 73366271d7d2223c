use duckdb::types::ValueRef;
use duckdb::{params_from_iter, Connection};
use std::{fs, path::Path};
use tracing::{debug, info};

use crate::connection::{QueryResult, SqlConnection, Value};
use crate::error::DbError;

/// A DuckDB connection exposing the `SqlConnection` capability.
///
/// Dropping it releases the database; `close` does the same but reports failures.
pub struct DuckConnection {
    conn: Connection,
}

/// Open a DuckDB database on disk at `path`, creating the file (and its parent
/// directories) if it doesn't exist.
pub fn open_disk_db<P: AsRef<Path>>(path: P) -> Result<DuckConnection, DbError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DbError::Location {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let conn = Connection::open(path)?;
    info!(path = %path.display(), "opened duckdb database");
    Ok(DuckConnection { conn })
}

/// Open a DuckDB in‐memory database
pub fn open_mem_db() -> Result<DuckConnection, DbError> {
    let conn = Connection::open_in_memory()?;
    Ok(DuckConnection { conn })
}

/// Open `<data_dir>/<file_name>`.
pub fn open_in_dir<P: AsRef<Path>>(data_dir: P, file_name: &str) -> Result<DuckConnection, DbError> {
    open_disk_db(data_dir.as_ref().join(file_name))
}

impl DuckConnection {
    /// Close the database, surfacing any error DuckDB reports while doing so.
    pub fn close(self) -> Result<(), DbError> {
        self.conn.close().map_err(|(_, e)| DbError::DuckDb(e))
    }
}

impl SqlConnection for DuckConnection {
    fn execute(&self, sql: &str) -> Result<(), DbError> {
        debug!(sql, "execute");
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query(&self, sql: &str, params: &[&str]) -> Result<QueryResult, DbError> {
        debug!(sql, ?params, "query");
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let columns = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();
        let width = columns.len();

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(to_value(row.get_ref(i)?));
            }
            out.push(values);
        }

        Ok(QueryResult { columns, rows: out })
    }
}

/// Map DuckDB's native cell types onto `Value`; anything exotic is rendered as text.
fn to_value(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Boolean(b),
        ValueRef::TinyInt(i) => Value::Integer(i.into()),
        ValueRef::SmallInt(i) => Value::Integer(i.into()),
        ValueRef::Int(i) => Value::Integer(i.into()),
        ValueRef::BigInt(i) => Value::Integer(i),
        ValueRef::UTinyInt(i) => Value::Integer(i.into()),
        ValueRef::USmallInt(i) => Value::Integer(i.into()),
        ValueRef::UInt(i) => Value::Integer(i.into()),
        ValueRef::UBigInt(i) => i64::try_from(i)
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        ValueRef::HugeInt(i) => i64::try_from(i)
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        ValueRef::Float(f) => Value::Double(f.into()),
        ValueRef::Double(f) => Value::Double(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        other => Value::Text(format!("{:?}", other)),
    }
}
