// src/connection.rs

use serde::Serialize;
use std::fmt;

use crate::error::DbError;

/// A single cell fetched from the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Rows fetched by a query, with the column names reported by the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column of the first row, if any (a `fetchone()[0]`).
    pub fn first_value(&self) -> Option<&Value> {
        self.rows.first().and_then(|r| r.first())
    }
}

/// The two capabilities ingestion needs from a database: run statements and fetch rows.
///
/// `params` are bound positionally to `?` placeholders as text values. Identifiers can
/// never go through `params`; callers validate them before formatting them into `sql`.
pub trait SqlConnection {
    /// Execute one or more `;`-separated statements, discarding any result.
    fn execute(&self, sql: &str) -> Result<(), DbError>;

    /// Run a single query and fetch all of its rows.
    fn query(&self, sql: &str, params: &[&str]) -> Result<QueryResult, DbError>;
}

impl<C: SqlConnection + ?Sized> SqlConnection for &C {
    fn execute(&self, sql: &str) -> Result<(), DbError> {
        (**self).execute(sql)
    }

    fn query(&self, sql: &str, params: &[&str]) -> Result<QueryResult, DbError> {
        (**self).query(sql, params)
    }
}
