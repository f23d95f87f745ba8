//! # pgdb-client
//!
//! The boundary between the pg-dbpool workspace and the PostgreSQL client
//! collaborator, plus zero-copy materialization of query results.
//!
//! The wire protocol, authentication, and SQL semantics live entirely behind
//! the [`backend`] traits: anything that can open a session and run a
//! statement can sit on the other side. The crate itself contributes the
//! parts with real invariants:
//!
//! - [`Rows`]: a single-allocation, randomly-indexable view over a raw
//!   query result, borrowing every cell from the result's own buffer.
//! - [`oneshot`]: connect-run-close convenience helpers.
//!
//! ## Materializing a result
//!
//! ```rust,ignore
//! use pgdb_client::{Rows, Session};
//!
//! let raw = session.execute("SELECT id, name FROM users", true)?;
//! if let Some(rows) = Rows::materialize(&raw) {
//!     for row in rows.iter() {
//!         println!("{} -> {}", row[0], row[1]);
//!     }
//! }
//! // `rows` borrows `raw`; the borrow checker forces the view to be
//! // dropped before the raw result releases the server response.
//! ```
//!
//! ## Ownership contract
//!
//! A [`Rows`] view never copies cell bytes. It is tied to its originating
//! raw result by lifetime, so "release the handle, then free the structure,
//! never touch the structure again" is not a runtime rule here — code that
//! violates it does not compile.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backend;
pub mod error;
pub mod oneshot;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod rows;

pub use backend::{Connector, RawResult, Session};
pub use error::Error;
pub use oneshot::{exec_once, exec_once_no_rows, exec_params_once};
pub use rows::Rows;
