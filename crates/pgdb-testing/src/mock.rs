//! Scripted in-memory backend.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use pgdb_client::backend::{Connector, RawResult, Session};
use pgdb_client::Error;

/// An owned result table implementing [`RawResult`].
#[derive(Debug, Clone, Default)]
pub struct MockRows {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MockRows {
    /// Build a table from column names and row-major cell values.
    #[must_use]
    pub fn new(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|v| (*v).to_string()).collect())
                .collect(),
        }
    }

    /// A result with no rows and no columns (a command completion).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl RawResult for MockRows {
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

#[derive(Default)]
struct Shared {
    responses: Mutex<HashMap<String, MockRows>>,
    failing: Mutex<HashSet<String>>,
    connect_failures: Mutex<usize>,
    connects: Mutex<usize>,
    executed: Mutex<Vec<String>>,
}

/// Scripted connector.
///
/// Sessions produced by one connector share its script and its statement
/// log, so a test can assert on everything its subject executed regardless
/// of which session ran it.
#[derive(Clone, Default)]
pub struct MockConnector {
    shared: Arc<Shared>,
}

impl MockConnector {
    /// Create a connector with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result returned for `sql`.
    ///
    /// Statements without a scripted response succeed with an empty result.
    #[must_use]
    pub fn with_response(self, sql: &str, rows: MockRows) -> Self {
        self.shared.responses.lock().insert(sql.to_string(), rows);
        self
    }

    /// Make every execution of `sql` fail.
    #[must_use]
    pub fn fail_on(self, sql: &str) -> Self {
        self.shared.failing.lock().insert(sql.to_string());
        self
    }

    /// Make the next `count` connect attempts fail.
    pub fn fail_next_connects(&self, count: usize) {
        *self.shared.connect_failures.lock() = count;
    }

    /// Number of sessions successfully opened so far.
    #[must_use]
    pub fn connections_opened(&self) -> usize {
        *self.shared.connects.lock()
    }

    /// Snapshot of every statement executed across all sessions, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.shared.executed.lock().clone()
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    fn connect(&self, _conninfo: &str) -> Result<MockSession, Error> {
        {
            let mut failures = self.shared.connect_failures.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::Connection("scripted connect failure".into()));
            }
        }
        *self.shared.connects.lock() += 1;
        Ok(MockSession {
            shared: Arc::clone(&self.shared),
            prepared: HashMap::new(),
        })
    }

    fn ping(&self, _conninfo: &str) -> bool {
        *self.shared.connect_failures.lock() == 0
    }

    fn is_thread_safe(&self) -> bool {
        true
    }
}

/// A session handed out by [`MockConnector`].
pub struct MockSession {
    shared: Arc<Shared>,
    prepared: HashMap<String, String>,
}

impl MockSession {
    fn run(&self, sql: &str, expect_rows: bool) -> Result<MockRows, Error> {
        self.shared.executed.lock().push(sql.to_string());
        if self.shared.failing.lock().contains(sql) {
            return Err(Error::Query(format!("scripted failure for: {sql}")));
        }
        if !expect_rows {
            return Ok(MockRows::empty());
        }
        Ok(self
            .shared
            .responses
            .lock()
            .get(sql)
            .cloned()
            .unwrap_or_default())
    }
}

impl Session for MockSession {
    type Raw = MockRows;

    fn execute(&mut self, sql: &str, expect_rows: bool) -> Result<MockRows, Error> {
        self.run(sql, expect_rows)
    }

    fn execute_params(
        &mut self,
        sql: &str,
        params: &[&str],
        expect_rows: bool,
    ) -> Result<MockRows, Error> {
        let result = self.run(sql, expect_rows);
        // Rewrite the tail of the log so assertions can see the bindings.
        if let Some(last) = self.shared.executed.lock().last_mut() {
            *last = format!("{sql} [{}]", params.join(", "));
        }
        result
    }

    fn prepare(&mut self, name: &str, sql: &str, _param_count: usize) -> Result<(), Error> {
        if self.shared.failing.lock().contains(sql) {
            return Err(Error::Prepare(format!("scripted failure for: {sql}")));
        }
        self.prepared.insert(name.to_string(), sql.to_string());
        Ok(())
    }

    fn execute_prepared(
        &mut self,
        name: &str,
        params: &[&str],
        expect_rows: bool,
    ) -> Result<MockRows, Error> {
        let sql = self
            .prepared
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Query(format!("no prepared statement named \"{name}\"")))?;
        self.execute_params(&sql, params, expect_rows)
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.prepared.clear();
        Ok(())
    }
}
