//! ClickHouse connection
//!
//! Talks to a single ClickHouse server through the official client. The
//! client is async, so each connection owns a current-thread tokio runtime
//! and blocks on it for every statement; one call is one round trip.

use crate::core::{Connection, ConnectionOptions, LoggerError, Result, Statement};
use ::clickhouse::Client;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Blocking connection to one ClickHouse server
///
/// Statements block the calling thread on an internal runtime. Do not use it
/// (or a `Logger` built on it) from inside an async task of another tokio
/// runtime; tokio refuses to block a thread that is already driving one.
///
/// # Example
///
/// ```no_run
/// use clickhouse_logger::backends::ClickHouseConnection;
/// use clickhouse_logger::{ConnectionOptions, Writer};
///
/// let options = ConnectionOptions::parse("clickhouse://default@localhost:8123/default")?;
/// let conn = ClickHouseConnection::open(&options)?;
/// let writer = Writer::with_connection(Box::new(conn), "checkout-service")?;
/// # Ok::<(), clickhouse_logger::LoggerError>(())
/// ```
pub struct ClickHouseConnection {
    client: Client,
    runtime: Runtime,
    address: String,
    dial_timeout: Duration,
    write_timeout: Option<Duration>,
    /// Set after the first successful round trip
    established: bool,
}

impl ClickHouseConnection {
    /// Build the client for the host named in `options`
    ///
    /// No request is sent here; the first statement is bounded by the dial timeout.
    pub fn open(options: &ConnectionOptions) -> Result<Self> {
        let address = options.address();
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LoggerError::connection(&address, format!("failed to start runtime: {}", e)))?;

        let mut client = Client::default().with_url(options.endpoint());
        if !options.username.is_empty() {
            client = client.with_user(options.username.as_str());
        }
        if !options.password.is_empty() {
            client = client.with_password(options.password.as_str());
        }
        if !options.database.is_empty() {
            client = client.with_database(options.database.as_str());
        }

        Ok(Self {
            client,
            runtime,
            address,
            dial_timeout: options.dial_timeout,
            write_timeout: options.write_timeout,
            established: false,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn deadline(&self) -> Option<Duration> {
        if self.established {
            self.write_timeout
        } else {
            Some(self.dial_timeout)
        }
    }
}

impl Connection for ClickHouseConnection {
    fn execute(&mut self, statement: &Statement) -> Result<()> {
        let mut query = self.client.query(statement.sql);
        for param in &statement.params {
            query = query.bind(param.as_str());
        }

        let deadline = self.deadline();
        let outcome = self.runtime.block_on(async move {
            match deadline {
                Some(limit) => tokio::time::timeout(limit, query.execute()).await.ok(),
                None => Some(query.execute().await),
            }
        });

        match outcome {
            Some(Ok(())) => {
                self.established = true;
                Ok(())
            }
            Some(Err(::clickhouse::error::Error::Network(e))) => {
                Err(LoggerError::connection(&self.address, e.to_string()))
            }
            Some(Err(e)) => Err(LoggerError::other(e.to_string())),
            None => Err(LoggerError::connection(
                &self.address,
                format!("no response within {:?}", deadline.unwrap_or_default()),
            )),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.established = false;
        Ok(())
    }

    fn name(&self) -> &str {
        "clickhouse"
    }
}
