//! Main logger implementation

use super::{
    connection::Connection,
    error::{LoggerError, Result},
    fields::{merge_fields, Fields},
    log_level::LogLevel,
    writer::Writer,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "clickhouse")]
use super::options::ConnectionOptions;

/// Callback invoked with every write error that `Logger::log` discards
pub type WriteErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Observer run with the message of a fatal log right before the process exits
pub type FatalHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Exit status used when a fatal log terminates the process
pub const FATAL_EXIT_CODE: i32 = 1;

/// The logging capability a `Logger` provides
///
/// Lets code depend on "something that logs with fields" without naming the
/// concrete logger.
pub trait FieldLogger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn with_fields(&self, fields: Fields) -> Self
    where
        Self: Sized;

    fn with_additional_fields(&self, fields: &Fields) -> Self
    where
        Self: Sized;

    fn logger(&self) -> Self
    where
        Self: Sized;
}

#[derive(Default)]
struct Hooks {
    on_write_error: Option<WriteErrorCallback>,
    on_fatal: Option<FatalHook>,
}

/// Structured logger writing one ClickHouse row per call
///
/// Loggers derived with [`with_fields`](Logger::with_fields),
/// [`with_additional_fields`](Logger::with_additional_fields) or
/// [`logger`](Logger::logger) share the same [`Writer`]; each owns its own
/// copy of the fields.
///
/// Write failures never reach the caller of [`log`](Logger::log). Fatal logs
/// exit the process and panic logs panic, whether or not the row was written.
///
/// # Example
///
/// ```no_run
/// use clickhouse_logger::prelude::*;
///
/// let logger = Logger::new("clickhouse://default@localhost:8123/default", "api-gateway")?;
///
/// let request_logger = logger.with_fields(Fields::new().with_field("request_id", "abc-123"));
/// request_logger.info("request accepted");
/// # Ok::<(), LoggerError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    writer: Arc<Writer>,
    fields: Fields,
    hooks: Arc<Hooks>,
}

impl Logger {
    /// Connect to ClickHouse and return a root logger with no fields
    #[cfg(feature = "clickhouse")]
    pub fn new(connection: &str, resource_id: impl Into<String>) -> Result<Self> {
        Self::builder(connection, resource_id).build()
    }

    /// Root logger over an already open connection
    pub fn with_connection(
        connection: Box<dyn Connection>,
        resource_id: impl Into<String>,
    ) -> Result<Self> {
        LoggerBuilder::with_connection(connection, resource_id).build()
    }

    /// Root logger over an existing writer
    pub fn from_writer(writer: Arc<Writer>) -> Self {
        Self {
            writer,
            fields: Fields::new(),
            hooks: Arc::new(Hooks::default()),
        }
    }

    /// Write one row, then exit or panic for fatal and panic levels
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();

        if let Err(e) = self.writer.write(level, message.as_str(), &self.fields) {
            if let Some(ref callback) = self.hooks.on_write_error {
                callback(&e);
            }
        }

        match level {
            LogLevel::Fatal => self.terminate(&message),
            LogLevel::Panic => panic!("{}", message),
            _ => {}
        }
    }

    /// Log a message made of `args` joined by single spaces
    pub fn log_args(&self, level: LogLevel, args: &[&dyn fmt::Display]) {
        self.log(level, join_args(args));
    }

    fn terminate(&self, message: &str) -> ! {
        if let Some(ref hook) = self.hooks.on_fatal {
            hook(message);
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// New logger on the same writer with exactly `fields`
    #[must_use]
    pub fn with_fields(&self, fields: Fields) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            fields,
            hooks: Arc::clone(&self.hooks),
        }
    }

    /// New logger whose fields are `fields` plus every current field whose
    /// key `fields` does not contain; `fields` itself is left untouched
    #[must_use]
    pub fn with_additional_fields(&self, fields: &Fields) -> Self {
        self.with_fields(merge_fields(fields, &self.fields))
    }

    /// Detached logger on the same writer, without fields
    #[must_use]
    pub fn logger(&self) -> Self {
        self.with_fields(Fields::new())
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn resource_id(&self) -> &str {
        self.writer.resource_id()
    }

    pub fn writer(&self) -> &Arc<Writer> {
        &self.writer
    }

    /// Close the shared writer
    ///
    /// Affects every logger derived from the same root; their later rows fail
    /// silently (visible through the error callback and writer metrics).
    pub fn shutdown(&self) -> Result<()> {
        self.writer.close()
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    #[inline]
    pub fn panic(&self, message: impl Into<String>) {
        self.log(LogLevel::Panic, message);
    }
}

impl FieldLogger for Logger {
    fn log(&self, level: LogLevel, message: &str) {
        Logger::log(self, level, message);
    }

    fn with_fields(&self, fields: Fields) -> Self {
        Logger::with_fields(self, fields)
    }

    fn with_additional_fields(&self, fields: &Fields) -> Self {
        Logger::with_additional_fields(self, fields)
    }

    fn logger(&self) -> Self {
        Logger::logger(self)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("resource_id", &self.resource_id())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Join display arguments with single spaces
pub fn join_args(args: &[&dyn fmt::Display]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

enum Target {
    #[cfg(feature = "clickhouse")]
    Url(String),
    Connection(Box<dyn Connection>),
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use clickhouse_logger::backends::MemoryConnection;
/// use clickhouse_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = LoggerBuilder::with_connection(Box::new(MemoryConnection::new()), "worker-3")
///     .fields(Fields::new().with_field("region", "eu-west-1"))
///     .on_write_error(Arc::new(|e: &LoggerError| eprintln!("log row lost: {}", e)))
///     .build()
///     .unwrap();
///
/// assert_eq!(logger.fields().len(), 1);
/// ```
pub struct LoggerBuilder {
    target: Target,
    resource_id: String,
    dial_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    fields: Fields,
    on_write_error: Option<WriteErrorCallback>,
    on_fatal: Option<FatalHook>,
}

impl LoggerBuilder {
    /// Builder that connects to the ClickHouse server named by `connection`
    #[cfg(feature = "clickhouse")]
    pub fn new(connection: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::for_target(Target::Url(connection.into()), resource_id.into())
    }

    /// Builder over an already open connection; timeouts are ignored
    pub fn with_connection(connection: Box<dyn Connection>, resource_id: impl Into<String>) -> Self {
        Self::for_target(Target::Connection(connection), resource_id.into())
    }

    fn for_target(target: Target, resource_id: String) -> Self {
        Self {
            target,
            resource_id,
            dial_timeout: None,
            write_timeout: None,
            fields: Fields::new(),
            on_write_error: None,
            on_fatal: None,
        }
    }

    /// Time allowed for the first round trip (default 5 seconds)
    #[must_use = "builder methods return a new value"]
    pub fn dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = Some(timeout);
        self
    }

    /// Deadline for every insert after the first round trip (default none)
    #[must_use = "builder methods return a new value"]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Fields of the root logger
    #[must_use = "builder methods return a new value"]
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Observe write errors that `Logger::log` would otherwise discard
    #[must_use = "builder methods return a new value"]
    pub fn on_write_error(mut self, callback: WriteErrorCallback) -> Self {
        self.on_write_error = Some(callback);
        self
    }

    /// Run `hook` after a fatal row is written and before the process exits
    #[must_use = "builder methods return a new value"]
    pub fn on_fatal(mut self, hook: FatalHook) -> Self {
        self.on_fatal = Some(hook);
        self
    }

    /// Open the writer and build the root logger
    ///
    /// # Errors
    ///
    /// `LoggerError::InvalidConfiguration` for a zero timeout, otherwise
    /// connection and schema errors from writer construction.
    pub fn build(self) -> Result<Logger> {
        let timeouts = [
            ("dial_timeout", self.dial_timeout),
            ("write_timeout", self.write_timeout),
        ];
        for (component, timeout) in timeouts {
            if timeout == Some(Duration::ZERO) {
                return Err(LoggerError::config(component, "timeout must be greater than zero"));
            }
        }

        let writer = match self.target {
            #[cfg(feature = "clickhouse")]
            Target::Url(connection) => {
                let mut options = ConnectionOptions::parse(&connection)?;
                if let Some(timeout) = self.dial_timeout {
                    options = options.with_dial_timeout(timeout);
                }
                if let Some(timeout) = self.write_timeout {
                    options = options.with_write_timeout(timeout);
                }
                Writer::with_options(&options, self.resource_id)?
            }
            Target::Connection(connection) => Writer::with_connection(connection, self.resource_id)?,
        };

        Ok(Logger {
            writer: Arc::new(writer),
            fields: self.fields,
            hooks: Arc::new(Hooks {
                on_write_error: self.on_write_error,
                on_fatal: self.on_fatal,
            }),
        })
    }
}

impl Logger {
    /// Create a builder connecting to `connection`
    ///
    /// # Example
    /// ```no_run
    /// use clickhouse_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder("clickhouse://writer:pw@ch-1:8123/observability", "payments")
    ///     .write_timeout(Duration::from_secs(2))
    ///     .build()?;
    /// # Ok::<(), LoggerError>(())
    /// ```
    #[cfg(feature = "clickhouse")]
    #[must_use]
    pub fn builder(connection: impl Into<String>, resource_id: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(connection, resource_id)
    }
}
