//! Pool error types.

use thiserror::Error;

/// Errors that can occur while constructing a pool.
///
/// The pool surfaces no errors after construction: `acquire` only ever
/// blocks or returns a session, and the write path converts statement
/// failures into log entries.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A session could not be opened during the eager fill.
    ///
    /// The pool is only useful fully populated; sessions opened before the
    /// failing slot are dropped along with this error.
    #[error("failed to open session for slot {slot}: {source}")]
    Setup {
        /// Index of the slot whose connect attempt failed.
        slot: usize,
        /// The underlying connect failure.
        #[source]
        source: pgdb_client::Error,
    },

    /// Pool configuration error.
    #[error("pool configuration error: {0}")]
    Configuration(String),
}
