//! Error types for the ClickHouse logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed connection string or failure to open the database client
    #[error("Connection error for '{target}': {message}")]
    Connection { target: String, message: String },

    /// The schema-ensure statement failed; no writer was created
    #[error("Failed to ensure log table schema: {message}")]
    Schema { message: String },

    /// An insert for a single log call failed
    #[error("Failed to write log row: {message}")]
    Write { message: String },

    /// The writer was closed explicitly
    #[error("Log writer already closed")]
    WriterClosed,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a connection error for the given target (host or connection string)
    pub fn connection(target: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Connection {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        LoggerError::Schema {
            message: message.into(),
        }
    }

    /// Create a write error
    pub fn write(message: impl Into<String>) -> Self {
        LoggerError::Write {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Reclassify a statement failure as a schema error, keeping its message
    pub(crate) fn into_schema(self) -> Self {
        match self {
            LoggerError::Schema { .. } | LoggerError::Connection { .. } => self,
            other => LoggerError::schema(other.detail()),
        }
    }

    /// Reclassify a statement failure as a write error, keeping its message
    pub(crate) fn into_write(self) -> Self {
        match self {
            LoggerError::Write { .. } | LoggerError::WriterClosed => self,
            other => LoggerError::write(other.detail()),
        }
    }

    fn detail(&self) -> String {
        match self {
            LoggerError::Connection { message, .. }
            | LoggerError::Schema { message }
            | LoggerError::Write { message }
            | LoggerError::InvalidConfiguration { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
