//! Connection trait for the database behind a writer

use super::{error::Result, statement::Statement};

/// A database connection able to run the logger's statements
///
/// A writer holds its connection behind a mutex, so implementations only need
/// to be `Send`.
pub trait Connection: Send {
    fn execute(&mut self, statement: &Statement) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
