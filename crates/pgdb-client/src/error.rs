//! Client error types.

use thiserror::Error;

/// Errors surfaced by the backend boundary.
///
/// Statement failures and broken connections are indistinguishable at this
/// layer: both arrive as [`Error::Query`] from the backend, and no component
/// above takes corrective action on the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Opening a session failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server rejected a statement, or the session broke mid-statement.
    #[error("query error: {0}")]
    Query(String),

    /// Preparing a named statement failed.
    #[error("prepare error: {0}")]
    Prepare(String),
}
