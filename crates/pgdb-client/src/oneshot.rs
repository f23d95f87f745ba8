//! One-shot statement helpers.
//!
//! Connect, run a single statement, disconnect. These are thin sequencing
//! over the [`Connector`]/[`Session`] boundary for callers that do not hold
//! a pooled session; the raw result owns its response buffer independently
//! of the session, so it survives the disconnect.

use crate::backend::{Connector, Session};
use crate::error::Error;

/// Execute one row-returning statement on a fresh session.
///
/// The session is closed before this returns; only the raw result survives.
/// A zero-row response is still `Ok` — materialization distinguishes it
/// from an error.
pub fn exec_once<C: Connector>(
    connector: &C,
    conninfo: &str,
    sql: &str,
) -> Result<<C::Session as Session>::Raw, Error> {
    let mut session = connector.connect(conninfo)?;
    session.execute(sql, true)
}

/// Execute one fire-and-forget command on a fresh session.
pub fn exec_once_no_rows<C: Connector>(
    connector: &C,
    conninfo: &str,
    sql: &str,
) -> Result<(), Error> {
    let mut session = connector.connect(conninfo)?;
    session.execute(sql, false).map(drop)
}

/// Execute one parameterized, row-returning statement on a fresh session.
pub fn exec_params_once<C: Connector>(
    connector: &C,
    conninfo: &str,
    sql: &str,
    params: &[&str],
) -> Result<<C::Session as Session>::Raw, Error> {
    let mut session = connector.connect(conninfo)?;
    session.execute_params(sql, params, true)
}
