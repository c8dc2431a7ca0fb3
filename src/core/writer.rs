//! Writer: turns one log call into one insert

use super::{
    connection::Connection,
    error::{LoggerError, Result},
    fields::Fields,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::WriterMetrics,
    statement::Statement,
};
use parking_lot::Mutex;
use std::fmt;

#[cfg(feature = "clickhouse")]
use super::options::ConnectionOptions;

/// Owns the database connection and the resource identifier stamped on every row
///
/// Inserts are serialized through an internal mutex: loggers on different
/// threads sharing one writer never use the connection at the same time, and
/// rows land in the order the callers acquire it.
///
/// # Example
///
/// ```
/// use clickhouse_logger::backends::MemoryConnection;
/// use clickhouse_logger::{Fields, LogLevel, Writer};
///
/// let conn = MemoryConnection::new();
/// let writer = Writer::with_connection(Box::new(conn.clone()), "billing").unwrap();
///
/// writer.write(LogLevel::Info, "invoice sent", &Fields::new()).unwrap();
/// assert_eq!(conn.inserts().len(), 1);
/// ```
pub struct Writer {
    connection: Mutex<Option<Box<dyn Connection>>>,
    resource_id: String,
    metrics: WriterMetrics,
}

impl Writer {
    /// Parse `connection`, open a ClickHouse client and ensure the `logs` table exists
    ///
    /// # Errors
    ///
    /// `LoggerError::Connection` for a malformed string or an unreachable server,
    /// `LoggerError::Schema` when the table statement is rejected.
    #[cfg(feature = "clickhouse")]
    pub fn new(connection: &str, resource_id: impl Into<String>) -> Result<Self> {
        let options = ConnectionOptions::parse(connection)?;
        Self::with_options(&options, resource_id)
    }

    #[cfg(feature = "clickhouse")]
    pub fn with_options(options: &ConnectionOptions, resource_id: impl Into<String>) -> Result<Self> {
        let connection = crate::backends::ClickHouseConnection::open(options)?;
        Self::with_connection(Box::new(connection), resource_id)
    }

    /// Wrap an already open connection, running the schema-ensure statement first
    ///
    /// The connection is closed again if the statement fails.
    pub fn with_connection(
        mut connection: Box<dyn Connection>,
        resource_id: impl Into<String>,
    ) -> Result<Self> {
        if let Err(e) = connection.execute(&Statement::create_table()) {
            let _ = connection.close();
            return Err(e.into_schema());
        }

        Ok(Self {
            connection: Mutex::new(Some(connection)),
            resource_id: resource_id.into(),
            metrics: WriterMetrics::new(),
        })
    }

    /// Insert one row for this log call
    ///
    /// The timestamp is taken before waiting for the connection.
    pub fn write(&self, level: LogLevel, message: impl Into<String>, fields: &Fields) -> Result<()> {
        let entry = LogEntry::new(level, message, fields, self.resource_id.as_str());
        self.write_entry(&entry)
    }

    /// Insert a prepared entry as-is, including its resource id
    pub fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        let statement = Statement::insert(entry);

        let mut guard = self.connection.lock();
        let result = match guard.as_mut() {
            Some(connection) => connection.execute(&statement).map_err(LoggerError::into_write),
            None => Err(LoggerError::WriterClosed),
        };
        drop(guard);

        match result {
            Ok(()) => {
                self.metrics.record_written();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failed();
                Err(e)
            }
        }
    }

    /// Release the connection
    ///
    /// Later writes fail with `LoggerError::WriterClosed`. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let connection = self.connection.lock().take();
        match connection {
            Some(mut connection) => connection.close(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.connection.lock().is_none()
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn metrics(&self) -> &WriterMetrics {
        &self.metrics
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connection = self
            .connection
            .lock()
            .as_ref()
            .map(|c| c.name().to_string());
        f.debug_struct("Writer")
            .field("connection", &connection)
            .field("resource_id", &self.resource_id)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to close log writer connection: {}", e);
        }

        let failed = self.metrics.failed_writes();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Log writer for '{}' shutting down with {} failed writes (failure rate: {:.2}%)",
                self.resource_id,
                failed,
                self.metrics.failure_rate()
            );
        }
    }
}
