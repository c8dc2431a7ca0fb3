//! # ClickHouse Logger
//!
//! A structured logger that writes every log call as one row of a ClickHouse
//! `logs` table.
//!
//! ## Features
//!
//! - **One row per call**: synchronous insert, no buffering, no retry
//! - **Structured fields**: loggers carry key/value fields, derived loggers
//!   replace or extend them
//! - **Self-provisioning**: the `logs` table is created on first connect
//! - **Pluggable connection**: ClickHouse by default, any `Connection` impl otherwise
//!
//! ## Example
//!
//! ```
//! use clickhouse_logger::backends::MemoryConnection;
//! use clickhouse_logger::prelude::*;
//!
//! let conn = MemoryConnection::new();
//! let logger = Logger::with_connection(Box::new(conn.clone()), "inventory")?;
//!
//! let logger = logger.with_fields(Fields::new().with_field("env", "prod"));
//! logger.info("stock level refreshed");
//!
//! let row = &conn.inserts()[0];
//! assert_eq!(row.param(1), Some("info"));
//! assert_eq!(row.param(3), Some("env=prod\n"));
//! # Ok::<(), LoggerError>(())
//! ```

pub mod backends;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        ConnectionOptions, FieldLogger, FieldValue, Fields, LogLevel, Logger, LoggerBuilder,
        LoggerError, Result, Writer, WriterMetrics,
    };
}

pub use core::{
    join_args, merge_fields, stringify_fields, Connection, ConnectionOptions, FatalHook,
    FieldLogger, FieldValue, Fields, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError,
    Result, Statement, StatementKind, WriteErrorCallback, Writer, WriterMetrics,
    CREATE_TABLE_SQL, DEFAULT_DIAL_TIMEOUT, FATAL_EXIT_CODE, INSERT_SQL,
};
