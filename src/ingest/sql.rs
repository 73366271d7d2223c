//! Text of every statement the engine issues.
//!
//! Callers must have validated `schema` and `table` with
//! [`check_identifier`](super::identifier::check_identifier) first; these functions
//! interpolate them verbatim.

pub const TABLE_EXISTS: &str =
    "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?;";

pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {};", schema)
}

pub fn drop_table(schema: &str, table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}.{};", schema, table)
}

/// `path` must already have passed [`source_literal`](super::source::source_literal).
pub fn load_csv(schema: &str, table: &str, path: &str) -> String {
    format!(
        "CREATE TABLE {}.{} AS SELECT * FROM read_csv_auto('{}', header=true);",
        schema,
        table,
        quote_literal_body(path)
    )
}

pub fn count_rows(schema: &str, table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}.{};", schema, table)
}

pub fn preview(schema: &str, table: &str, limit: usize) -> String {
    format!("SELECT * FROM {}.{} LIMIT {};", schema, table, limit)
}

pub fn describe(schema: &str, table: &str) -> String {
    format!("DESCRIBE {}.{};", schema, table)
}

/// Double single quotes so `s` can sit inside a `'...'` literal.
fn quote_literal_body(s: &str) -> String {
    s.replace('\'', "''")
}
