//! Backend boundary traits.
//!
//! Everything this workspace needs from a database client library is
//! captured by three traits: [`Connector`] opens sessions, [`Session`] runs
//! statements, and [`RawResult`] gives indexed access to one server
//! response. The pool and the materializer are generic over them; the
//! optional [`crate::postgres`] module provides the real implementation.
//!
//! Closing a session and releasing a raw result are not trait methods:
//! both map to `Drop`, so neither can be forgotten or done twice.

use crate::error::Error;

/// Factory for database sessions.
pub trait Connector {
    /// The session type this connector produces.
    type Session: Session;

    /// Open one authenticated session to the server described by `conninfo`.
    fn connect(&self, conninfo: &str) -> Result<Self::Session, Error>;

    /// Check whether the server behind `conninfo` is reachable.
    fn ping(&self, conninfo: &str) -> bool;

    /// Whether the underlying client library is safe to use from multiple
    /// threads, one session per thread.
    fn is_thread_safe(&self) -> bool;
}

/// One live session with the database server.
///
/// A session is not reentrant; the `&mut self` receivers make concurrent use
/// of a single session unrepresentable. Dropping a session closes it.
pub trait Session: Send {
    /// The raw result type produced by this session's statements.
    ///
    /// Raw results own their response buffer independently of the session,
    /// so a result may outlive the session that produced it.
    type Raw: RawResult;

    /// Execute one SQL statement.
    ///
    /// `expect_rows` selects which completion counts as success: `true` for
    /// statements that return tuples, `false` for plain commands. A
    /// mismatch is a [`Error::Query`].
    fn execute(&mut self, sql: &str, expect_rows: bool) -> Result<Self::Raw, Error>;

    /// Execute one SQL statement with positional text parameters
    /// (`$1`, `$2`, ...).
    fn execute_params(
        &mut self,
        sql: &str,
        params: &[&str],
        expect_rows: bool,
    ) -> Result<Self::Raw, Error>;

    /// Prepare `sql` under `name` for repeated execution.
    fn prepare(&mut self, name: &str, sql: &str, param_count: usize) -> Result<(), Error>;

    /// Execute a statement previously registered with
    /// [`prepare`](Session::prepare).
    fn execute_prepared(
        &mut self,
        name: &str,
        params: &[&str],
        expect_rows: bool,
    ) -> Result<Self::Raw, Error>;

    /// Tear down and re-establish the server connection in place.
    ///
    /// This is the only recovery primitive offered for a session that went
    /// stale; nothing in this workspace calls it automatically.
    fn reset(&mut self) -> Result<(), Error>;
}

/// One server response, before any reshaping.
///
/// The implementor owns the response memory, including the text of every
/// field; accessors borrow from that buffer. Dropping the value releases it.
pub trait RawResult {
    /// Number of rows in the response.
    fn row_count(&self) -> usize;

    /// Number of columns in the response.
    fn column_count(&self) -> usize;

    /// Name of column `index`.
    ///
    /// `index` must be below [`column_count`](RawResult::column_count).
    fn column_name(&self, index: usize) -> &str;

    /// Text value of the cell at (`row`, `column`).
    ///
    /// Both indices must be in range. NULL is represented as the empty
    /// string, as libpq does.
    fn value(&self, row: usize, column: usize) -> &str;
}
