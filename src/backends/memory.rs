//! In-process connection that records statements instead of sending them
//!
//! Clones share one recording, so a caller can keep a handle while the writer
//! owns the boxed connection. Failures can be switched on to exercise the
//! error paths of writers and loggers.

use crate::core::{Connection, LoggerError, Result, Statement, StatementKind};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Recording {
    statements: Vec<Statement>,
    fail_schema: bool,
    fail_inserts: bool,
    closed: bool,
    close_calls: usize,
}

/// Connection that keeps every executed statement in memory
///
/// # Example
///
/// ```
/// use clickhouse_logger::backends::MemoryConnection;
/// use clickhouse_logger::Logger;
///
/// let conn = MemoryConnection::new();
/// let logger = Logger::with_connection(Box::new(conn.clone()), "svc").unwrap();
///
/// logger.info("started");
/// assert_eq!(conn.inserts()[0].param(2), Some("started"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    recording: Arc<Mutex<Recording>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the schema-ensure statement
    #[must_use]
    pub fn fail_schema(self, fail: bool) -> Self {
        self.recording.lock().fail_schema = fail;
        self
    }

    /// Reject every insert from now on (or stop rejecting)
    pub fn set_fail_inserts(&self, fail: bool) {
        self.recording.lock().fail_inserts = fail;
    }

    /// Every statement executed successfully, in order
    pub fn statements(&self) -> Vec<Statement> {
        self.recording.lock().statements.clone()
    }

    /// Successful inserts only
    pub fn inserts(&self) -> Vec<Statement> {
        self.recording
            .lock()
            .statements
            .iter()
            .filter(|s| s.kind == StatementKind::Insert)
            .cloned()
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.recording.lock().closed
    }

    pub fn close_calls(&self) -> usize {
        self.recording.lock().close_calls
    }
}

impl Connection for MemoryConnection {
    fn execute(&mut self, statement: &Statement) -> Result<()> {
        let mut recording = self.recording.lock();
        if recording.closed {
            return Err(LoggerError::other("memory connection closed"));
        }

        let rejected = match statement.kind {
            StatementKind::Schema => recording.fail_schema,
            StatementKind::Insert => recording.fail_inserts,
        };
        if rejected {
            return Err(LoggerError::other(format!(
                "memory connection rejected {:?} statement",
                statement.kind
            )));
        }

        recording.statements.push(statement.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut recording = self.recording.lock();
        recording.closed = true;
        recording.close_calls += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
