//! # pgdb-testing
//!
//! Test infrastructure for pg-dbpool development.
//!
//! Provides an in-memory backend implementing the `pgdb-client` boundary
//! traits, so pool and client behavior can be exercised without a server.
//! Responses are scripted per statement, and connect/statement failures can
//! be injected.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pgdb_testing::{MockConnector, MockRows};
//!
//! let connector = MockConnector::new()
//!     .with_response(
//!         "SELECT id, name FROM users",
//!         MockRows::new(&["id", "name"], &[&["1", "Alice"]]),
//!     )
//!     .fail_on("INSERT INTO broken VALUES (1)");
//!
//! let pool = pgdb_pool::Pool::new(&connector, "host=mock", config)?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod mock;

pub use mock::{MockConnector, MockRows, MockSession};
