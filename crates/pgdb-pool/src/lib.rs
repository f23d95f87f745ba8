//! # pgdb-pool
//!
//! A bounded pool of pre-established database sessions for concurrent
//! writers.
//!
//! The pool opens every session up front and never grows, shrinks, or
//! replaces one: capacity is fixed for the pool's lifetime, and a session
//! that goes stale stays in rotation and fails its next statement. What the
//! pool does guarantee is exclusivity and accounting — each session is held
//! by at most one caller at a time, and a checkout is always returned,
//! because the checkout is an RAII guard.
//!
//! ## Behavior
//!
//! - [`Pool::acquire`] blocks (no timeout, no cancellation) until a slot is
//!   free, waiting on a condition variable rather than polling.
//! - Slots are reused most-recently-released first (LIFO); waiters are not
//!   served in arrival order.
//! - [`Pool::write`] is the fire-and-forget path: failures are logged and
//!   swallowed, never surfaced to the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pgdb_pool::{Pool, PoolConfig};
//!
//! let pool = Pool::new(&connector, conninfo, PoolConfig::new().capacity(16))?;
//!
//! std::thread::scope(|scope| {
//!     for _ in 0..32 {
//!         scope.spawn(|| pool.write("INSERT INTO audit_log VALUES (now())"));
//!     }
//! });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod pool;

pub use config::PoolConfig;
pub use error::PoolError;
pub use pool::{Pool, PoolStatus, PooledSession};
