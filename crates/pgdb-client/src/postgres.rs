//! Backend implementation over the blocking `postgres` crate.
//!
//! [`PgConnector`] plugs the real client library into the [`crate::backend`]
//! traits. Plain statements go through the simple-query protocol, which
//! returns every field as text — the same shape libpq hands back. The
//! parameterized and prepared paths use the extended protocol and decode
//! each cell as text; columns of non-text types must be `CAST` to text in
//! the SQL.

use std::collections::HashMap;

use ::postgres::types::ToSql;
use ::postgres::{Client, NoTls, Row, SimpleQueryMessage, Statement};

use crate::backend::{Connector, RawResult, Session};
use crate::error::Error;

/// Connector backed by the `postgres` crate, without TLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl PgConnector {
    /// Create a connector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Connector for PgConnector {
    type Session = PgSession;

    fn connect(&self, conninfo: &str) -> Result<PgSession, Error> {
        let client =
            Client::connect(conninfo, NoTls).map_err(|e| Error::Connection(e.to_string()))?;
        tracing::debug!("session established");
        Ok(PgSession {
            client,
            conninfo: conninfo.to_string(),
            statements: HashMap::new(),
        })
    }

    fn ping(&self, conninfo: &str) -> bool {
        Client::connect(conninfo, NoTls).is_ok()
    }

    fn is_thread_safe(&self) -> bool {
        // Each session owns its own socket and buffers.
        true
    }
}

/// One live connection to a PostgreSQL server.
pub struct PgSession {
    client: Client,
    conninfo: String,
    statements: HashMap<String, Statement>,
}

impl Session for PgSession {
    type Raw = PgRawResult;

    fn execute(&mut self, sql: &str, expect_rows: bool) -> Result<PgRawResult, Error> {
        let messages = self
            .client
            .simple_query(sql)
            .map_err(|e| Error::Query(e.to_string()))?;

        let mut columns: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(description) => {
                    columns = description.iter().map(|c| c.name().to_string()).collect();
                }
                SimpleQueryMessage::Row(row) => {
                    if columns.is_empty() {
                        columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                    }
                    let cells = (0..row.len())
                        .map(|i| row.get(i).unwrap_or_default().to_string())
                        .collect();
                    rows.push(cells);
                }
                SimpleQueryMessage::CommandComplete(_) => {}
                _ => {}
            }
        }

        // Mirror the tuples-vs-command completion check of the C client:
        // a caller expecting rows must get a result set and vice versa.
        if expect_rows && columns.is_empty() {
            return Err(Error::Query("statement returned no result set".into()));
        }
        if !expect_rows && !columns.is_empty() {
            return Err(Error::Query("statement unexpectedly returned a result set".into()));
        }

        Ok(PgRawResult { columns, rows })
    }

    fn execute_params(
        &mut self,
        sql: &str,
        params: &[&str],
        expect_rows: bool,
    ) -> Result<PgRawResult, Error> {
        let bound: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        if expect_rows {
            let rows = self
                .client
                .query(sql, &bound)
                .map_err(|e| Error::Query(e.to_string()))?;
            text_result(&rows)
        } else {
            self.client
                .execute(sql, &bound)
                .map_err(|e| Error::Query(e.to_string()))?;
            Ok(PgRawResult::empty())
        }
    }

    fn prepare(&mut self, name: &str, sql: &str, param_count: usize) -> Result<(), Error> {
        let statement = self
            .client
            .prepare(sql)
            .map_err(|e| Error::Prepare(e.to_string()))?;
        if statement.params().len() != param_count {
            return Err(Error::Prepare(format!(
                "statement \"{name}\" takes {} parameters, caller declared {param_count}",
                statement.params().len()
            )));
        }
        self.statements.insert(name.to_string(), statement);
        Ok(())
    }

    fn execute_prepared(
        &mut self,
        name: &str,
        params: &[&str],
        expect_rows: bool,
    ) -> Result<PgRawResult, Error> {
        let statement = self
            .statements
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Query(format!("no prepared statement named \"{name}\"")))?;
        let bound: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        if expect_rows {
            let rows = self
                .client
                .query(&statement, &bound)
                .map_err(|e| Error::Query(e.to_string()))?;
            text_result(&rows)
        } else {
            self.client
                .execute(&statement, &bound)
                .map_err(|e| Error::Query(e.to_string()))?;
            Ok(PgRawResult::empty())
        }
    }

    fn reset(&mut self) -> Result<(), Error> {
        // Prepared statements are server-side state; they do not survive
        // the new connection.
        self.statements.clear();
        self.client = Client::connect(&self.conninfo, NoTls)
            .map_err(|e| Error::Connection(e.to_string()))?;
        tracing::debug!("session re-established");
        Ok(())
    }
}

/// Decode extended-protocol rows into the owned text shape.
fn text_result(rows: &[Row]) -> Result<PgRawResult, Error> {
    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();
    let mut cells = Vec::with_capacity(rows.len());
    for row in rows {
        let mut values = Vec::with_capacity(row.len());
        for i in 0..row.len() {
            let value: Option<String> = row.try_get(i).map_err(|e| Error::Query(e.to_string()))?;
            values.push(value.unwrap_or_default());
        }
        cells.push(values);
    }
    Ok(PgRawResult {
        columns,
        rows: cells,
    })
}

/// One server response, held as owned text.
#[derive(Debug, Default)]
pub struct PgRawResult {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PgRawResult {
    fn empty() -> Self {
        Self::default()
    }
}

impl RawResult for PgRawResult {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, index: usize) -> &str {
        &self.columns[index]
    }

    fn value(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }
}
