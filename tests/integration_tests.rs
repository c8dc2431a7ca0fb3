//! Integration tests for the ClickHouse logger
//!
//! These tests verify:
//! - One insert per log call with the expected column values
//! - Field replacement and merging across derived loggers
//! - Write failures are swallowed by loggers and surfaced by writers
//! - Fatal and panic escalation
//! - Construction errors and connection lifecycle

use clickhouse_logger::backends::{Connection, MemoryConnection};
use clickhouse_logger::prelude::*;
use clickhouse_logger::{Statement, StatementKind, CREATE_TABLE_SQL, FATAL_EXIT_CODE, INSERT_SQL};
use parking_lot::Mutex;
use std::process::{Command, Output};
use std::sync::Arc;

fn logger_with(resource_id: &str) -> (Logger, MemoryConnection) {
    let conn = MemoryConnection::new();
    let logger =
        Logger::with_connection(Box::new(conn.clone()), resource_id).expect("Failed to create logger");
    (logger, conn)
}

#[test]
fn test_single_insert_per_log_call() {
    let (logger, conn) = logger_with("orders");
    let logger = logger.with_fields(Fields::new().with_field("env", "prod"));

    logger.log(LogLevel::Info, "hello");

    let statements = conn.statements();
    assert_eq!(statements.len(), 2, "schema statement plus one insert");
    assert_eq!(statements[0].sql, CREATE_TABLE_SQL);

    let insert = &statements[1];
    assert_eq!(insert.kind, StatementKind::Insert);
    assert_eq!(insert.sql, INSERT_SQL);
    assert_eq!(insert.param(1), Some("info"));
    assert_eq!(insert.param(2), Some("hello"));
    assert_eq!(insert.param(3), Some("env=prod\n"));
    assert_eq!(insert.param(4), Some("orders"));
}

#[test]
fn test_every_level_maps_to_its_name() {
    let (logger, conn) = logger_with("levels");

    // Fatal exits and panic unwinds; both are covered separately
    for level in LogLevel::ALL.into_iter().filter(|l| !l.is_terminal()) {
        logger.log(level, "x");
    }

    let levels: Vec<String> = conn
        .inserts()
        .iter()
        .map(|s| s.param(1).unwrap().to_string())
        .collect();
    assert_eq!(levels, vec!["trace", "debug", "info", "warn", "error"]);
}

#[test]
fn test_timestamps_are_nanosecond_and_monotonic_per_thread() {
    let (logger, conn) = logger_with("clock");

    logger.info("first");
    logger.info("second");

    let stamps: Vec<String> = conn
        .inserts()
        .iter()
        .map(|s| s.param(0).unwrap().to_string())
        .collect();

    for stamp in &stamps {
        let fraction = stamp.rsplit('.').next().unwrap();
        assert_eq!(fraction.len(), 9, "timestamp {} lacks nanoseconds", stamp);
    }
    assert!(stamps[0] <= stamps[1]);
}

#[test]
fn test_derived_loggers_share_writer_and_resource() {
    let (root, conn) = logger_with("tenant-42");

    let a = root.with_fields(Fields::new().with_field("x", 1));
    let b = a.with_additional_fields(&Fields::new().with_field("y", 2));
    let c = b.logger();

    a.info("a");
    b.info("b");
    c.info("c");

    let inserts = conn.inserts();
    assert_eq!(inserts.len(), 3);
    assert_eq!(inserts[0].param(3), Some("x=1\n"));
    assert_eq!(inserts[1].param(3), Some("x=1\ny=2\n"));
    assert_eq!(inserts[2].param(3), Some(""));
    assert!(inserts.iter().all(|s| s.param(4) == Some("tenant-42")));
    assert!(Arc::ptr_eq(root.writer(), c.writer()));
}

#[test]
fn test_new_fields_override_old_on_collision() {
    let (root, _conn) = logger_with("r");

    let logger = root
        .with_fields(Fields::new().with_field("x", 1))
        .with_additional_fields(&Fields::new().with_field("x", 9));

    assert_eq!(logger.fields(), &Fields::new().with_field("x", 9));
}

#[test]
fn test_write_failure_does_not_reach_caller() {
    let (logger, conn) = logger_with("r");
    conn.set_fail_inserts(true);

    // Must return normally
    logger.error("cannot be stored");
    logger.info("neither can this");

    assert!(conn.inserts().is_empty());
    assert_eq!(logger.writer().metrics().failed_writes(), 2);

    conn.set_fail_inserts(false);
    logger.info("recovered");
    assert_eq!(conn.inserts().len(), 1);
    assert_eq!(logger.writer().metrics().total_written(), 1);
}

#[test]
fn test_writer_returns_write_error() {
    let conn = MemoryConnection::new();
    let writer = Writer::with_connection(Box::new(conn.clone()), "r").expect("Failed to create writer");
    conn.set_fail_inserts(true);

    let result = writer.write(LogLevel::Info, "x", &Fields::new());
    assert!(matches!(result, Err(LoggerError::Write { .. })));
}

#[test]
fn test_schema_failure_returns_no_logger() {
    let conn = MemoryConnection::new().fail_schema(true);
    let result = Logger::with_connection(Box::new(conn.clone()), "r");

    assert!(matches!(result, Err(LoggerError::Schema { .. })));
    assert!(conn.inserts().is_empty());
    assert!(conn.is_closed());
}

#[test]
fn test_error_observer_sees_each_failure() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let errors_clone = Arc::clone(&errors);
    let conn = MemoryConnection::new();

    let logger = LoggerBuilder::with_connection(Box::new(conn.clone()), "r")
        .on_write_error(Arc::new(move |e: &LoggerError| errors_clone.lock().push(e.to_string())))
        .build()
        .expect("Failed to create logger");

    logger.info("ok");
    conn.set_fail_inserts(true);
    logger.with_fields(Fields::new().with_field("k", "v")).warn("lost");

    let errors = errors.lock();
    assert_eq!(errors.len(), 1, "observer is shared by derived loggers");
}

// Fatal logs end the process, so each fatal test re-runs itself in a child
// process and checks how that child exited.
const FATAL_CHILD_ENV: &str = "CLICKHOUSE_LOGGER_FATAL_CHILD";

fn is_fatal_child(test_name: &str) -> bool {
    std::env::var(FATAL_CHILD_ENV).map_or(false, |name| name == test_name)
}

fn run_fatal_child(test_name: &str) -> Output {
    Command::new(std::env::current_exe().expect("Failed to locate test binary"))
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(FATAL_CHILD_ENV, test_name)
        .output()
        .expect("Failed to spawn child test process")
}

#[test]
fn test_fatal_exits_even_when_write_fails() {
    const NAME: &str = "test_fatal_exits_even_when_write_fails";

    if is_fatal_child(NAME) {
        let (logger, conn) = logger_with("r");
        conn.set_fail_inserts(true);

        logger.fatal("down");
        logger.info("still running after fatal");
        return;
    }

    let output = run_fatal_child(NAME);
    assert_eq!(
        output.status.code(),
        Some(FATAL_EXIT_CODE),
        "child stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_fatal_writes_row_and_runs_hook_before_exit() {
    const NAME: &str = "test_fatal_writes_row_and_runs_hook_before_exit";

    if is_fatal_child(NAME) {
        let conn = MemoryConnection::new();
        let recorded = conn.clone();
        let logger = LoggerBuilder::with_connection(Box::new(conn), "r")
            .on_fatal(Arc::new(move |msg: &str| {
                let levels: Vec<String> = recorded
                    .inserts()
                    .iter()
                    .map(|s| s.param(1).unwrap_or_default().to_string())
                    .collect();
                eprintln!("fatal hook: message={} levels={}", msg, levels.join(","));
            }))
            .build()
            .expect("Failed to create logger");

        logger.info("before");
        clickhouse_logger::fatal!(logger, "disk {}", "full");
        logger.info("still running after fatal");
        return;
    }

    let output = run_fatal_child(NAME);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE), "child stderr: {}", stderr);
    assert!(
        stderr.contains("fatal hook: message=disk full levels=info,fatal"),
        "child stderr: {}",
        stderr
    );
}

#[test]
#[should_panic(expected = "boom")]
fn test_panic_escalates_even_when_write_fails() {
    let (logger, conn) = logger_with("r");
    conn.set_fail_inserts(true);
    logger.log(LogLevel::Panic, "boom");
}

#[test]
fn test_shutdown_releases_connection_once() {
    let (logger, conn) = logger_with("r");
    let child = logger.with_fields(Fields::new().with_field("a", 1));

    logger.shutdown().expect("Failed to shut down");
    child.shutdown().expect("Second shutdown is a no-op");

    assert_eq!(conn.close_calls(), 1);
    assert!(matches!(
        child.writer().write(LogLevel::Info, "late", &Fields::new()),
        Err(LoggerError::WriterClosed)
    ));
}

#[test]
fn test_dropping_last_logger_closes_connection() {
    let (logger, conn) = logger_with("r");
    let child = logger.logger();

    drop(logger);
    assert!(!conn.is_closed(), "child still holds the writer");

    drop(child);
    assert!(conn.is_closed());
}

#[test]
fn test_custom_connection() {
    // A connection that only counts statements
    struct CountingConnection {
        executed: Arc<Mutex<usize>>,
    }

    impl Connection for CountingConnection {
        fn execute(&mut self, _statement: &Statement) -> clickhouse_logger::Result<()> {
            *self.executed.lock() += 1;
            Ok(())
        }

        fn close(&mut self) -> clickhouse_logger::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    let executed = Arc::new(Mutex::new(0));
    let logger = Logger::with_connection(
        Box::new(CountingConnection {
            executed: Arc::clone(&executed),
        }),
        "r",
    )
    .expect("Failed to create logger");

    logger.info("one");
    logger.info("two");

    assert_eq!(*executed.lock(), 3);
}

#[test]
fn test_connection_string_without_credentials() {
    let opts = ConnectionOptions::parse("clickhouse://logs.internal:8123/app").expect("valid");

    assert_eq!(opts.username, "");
    assert_eq!(opts.password, "");
    assert_eq!(opts.database, "app");
}

#[test]
fn test_malformed_connection_string_is_rejected() {
    for input in ["", "://", "no scheme at all", "clickhouse://"] {
        let result = ConnectionOptions::parse(input);
        assert!(
            matches!(result, Err(LoggerError::Connection { .. })),
            "{:?} should be rejected",
            input
        );
    }
}

#[cfg(feature = "clickhouse")]
#[test]
fn test_logger_new_rejects_malformed_string() {
    let result = Logger::new("definitely not a url", "r");
    assert!(matches!(result, Err(LoggerError::Connection { .. })));
}
