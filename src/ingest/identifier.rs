use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{IngestError, IngestResult};

/// Schema and table names are formatted straight into DDL text, so this whitelist is
/// the only thing standing between a name and the SQL parser.
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierKind {
    Schema,
    Table,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Schema => "schema",
            IdentifierKind::Table => "table",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Reject `value` unless it is a plain ASCII identifier. Never rewrites the input.
pub fn check_identifier(kind: IdentifierKind, value: &str) -> IngestResult<()> {
    if is_valid_identifier(value) {
        Ok(())
    } else {
        Err(IngestError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        })
    }
}
