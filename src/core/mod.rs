//! Core logger types and traits

pub mod connection;
pub mod error;
pub mod fields;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod statement;
pub mod writer;

pub use connection::Connection;
pub use error::{LoggerError, Result};
pub use fields::{merge_fields, stringify_fields, FieldValue, Fields};
pub use log_entry::{LogEntry, TIMESTAMP_FORMAT};
pub use log_level::LogLevel;
pub use logger::{
    join_args, FatalHook, FieldLogger, Logger, LoggerBuilder, WriteErrorCallback, FATAL_EXIT_CODE,
};
pub use metrics::WriterMetrics;
pub use options::{ConnectionOptions, DEFAULT_DIAL_TIMEOUT};
pub use statement::{Statement, StatementKind, CREATE_TABLE_SQL, INSERT_SQL};
pub use writer::Writer;
