//! SQL statements issued against the `logs` table

use super::log_entry::LogEntry;

/// Idempotent schema-ensure statement run once per writer
pub const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS logs (
    timestamp DateTime64(9),
    level String,
    message String,
    fields String,
    resource_id String
) ENGINE = MergeTree()
ORDER BY timestamp";

/// Positional insert; parameters bind in column order
pub const INSERT_SQL: &str = "INSERT INTO logs (timestamp, level, message, fields, resource_id) \
VALUES (toDateTime64(?, 9, 'UTC'), ?, ?, ?, ?)";

/// What a statement does, so connections can tell schema work from row inserts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Schema,
    Insert,
}

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: &'static str,
    /// Positional values, bound in order as string literals
    pub params: Vec<String>,
}

impl Statement {
    pub fn create_table() -> Self {
        Self {
            kind: StatementKind::Schema,
            sql: CREATE_TABLE_SQL,
            params: Vec::new(),
        }
    }

    /// Insert for one entry: timestamp, level, message, fields, resource id
    pub fn insert(entry: &LogEntry) -> Self {
        Self {
            kind: StatementKind::Insert,
            sql: INSERT_SQL,
            params: vec![
                entry.formatted_timestamp(),
                entry.level.to_str().to_string(),
                entry.message.clone(),
                entry.fields.clone(),
                entry.resource_id.clone(),
            ],
        }
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}
