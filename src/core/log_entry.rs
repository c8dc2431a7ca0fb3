//! Log entry structure

use super::fields::{stringify_fields, Fields};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// Layout of the timestamp parameter, parsed server-side as `DateTime64(9)` in UTC
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

/// One row of the `logs` table, built per log call and never retained
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Serialized `key=value\n` form of the logger's fields
    pub fields: String,
    pub resource_id: String,
}

impl LogEntry {
    /// Capture a new entry stamped with the current time
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        fields: &Fields,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields: stringify_fields(fields),
            resource_id: resource_id.into(),
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
