//! Connection implementations

#[cfg(feature = "clickhouse")]
pub mod clickhouse;
pub mod memory;

#[cfg(feature = "clickhouse")]
pub use self::clickhouse::ClickHouseConnection;
pub use memory::MemoryConnection;

pub use crate::core::Connection;
