use std::fmt;
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection, Statement};
use tracing::debug;

use crate::backend::{ColumnDesc, PreparedHandle, RawCell, RawResult, StatementBackend};
use crate::error::ConnectorError;
use crate::types::SqlValue;

use super::config::SqliteOptions;
use super::params::Params;

/// `StatementBackend` over a single `rusqlite::Connection`.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open (or create) the database described by `opts` and apply its pragmas.
    ///
    /// # Errors
    /// Returns `ConnectorError::ConnectionError` if the file cannot be opened and
    /// `ConnectorError::SqliteError` if a pragma fails.
    pub fn open(opts: &SqliteOptions) -> Result<Self, ConnectorError> {
        let conn = Connection::open(&opts.db_path).map_err(|e| {
            ConnectorError::ConnectionError(format!(
                "failed to open SQLite database {}: {e}",
                opts.db_path
            ))
        })?;
        conn.busy_timeout(Duration::from_millis(opts.busy_timeout_ms))?;
        conn.execute_batch(&opts.pragma_script())?;
        debug!(path = %opts.db_path, encoding = ?opts.encoding, "opened SQLite database");
        Ok(Self { conn })
    }

    /// # Errors
    /// Same as [`SqliteBackend::open`].
    pub fn open_in_memory() -> Result<Self, ConnectorError> {
        Self::open(&SqliteOptions::in_memory())
    }

    /// Wrap an already configured connection.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Escape hatch for logic the connector does not cover.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("path", &self.conn.path())
            .field("autocommit", &self.conn.is_autocommit())
            .finish()
    }
}

impl StatementBackend for SqliteBackend {
    type Prepared<'c> = SqlitePrepared<'c>;

    /// Prepare exactly one statement.
    ///
    /// Text holding a second statement is rejected rather than truncated; scripts
    /// go through [`StatementBackend::execute_script`].
    fn prepare(&mut self, sql: &str) -> Result<Self::Prepared<'_>, ConnectorError> {
        let conn = &self.conn;
        let mut batch = Batch::new(conn, sql);
        let stmt = batch
            .next()
            .map_err(|e| ConnectorError::PrepareError(e.to_string()))?
            .ok_or_else(|| ConnectorError::PrepareError("no SQL statement in text".into()))?;
        if !matches!(batch.next(), Ok(None)) {
            return Err(ConnectorError::PrepareError(
                "text contains more than one statement; use execute_script for scripts".into(),
            ));
        }
        Ok(SqlitePrepared { conn, stmt })
    }

    fn execute_script(&mut self, sql: &str) -> Result<(), ConnectorError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| ConnectorError::ExecutionError(e.to_string()))
    }
}

/// A prepared `rusqlite` statement. Finalized on drop or on [`PreparedHandle::close`].
pub struct SqlitePrepared<'c> {
    conn: &'c Connection,
    stmt: Statement<'c>,
}

impl PreparedHandle for SqlitePrepared<'_> {
    fn parameter_count(&self) -> usize {
        self.stmt.parameter_count()
    }

    fn bind(&mut self, values: &[SqlValue]) -> Result<(), ConnectorError> {
        let expected = self.parameter_count();
        if values.len() != expected {
            return Err(ConnectorError::BuildError {
                expected,
                actual: values.len(),
            });
        }
        let params = Params::convert(values);
        for (idx, value) in params.as_values().iter().enumerate() {
            self.stmt.raw_bind_parameter(idx + 1, value).map_err(|e| {
                ConnectorError::ExecutionError(format!("failed to bind parameter {}: {e}", idx + 1))
            })?;
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<RawResult, ConnectorError> {
        let column_count = self.stmt.column_count();
        if column_count == 0 {
            // `changes()` keeps the last DML count across DDL; only trust it if this
            // step moved the connection's running total.
            let before = self.conn.total_changes();
            let affected = self
                .stmt
                .raw_execute()
                .map_err(|e| ConnectorError::ExecutionError(e.to_string()))?;
            let affected = if self.conn.total_changes() == before {
                0
            } else {
                affected
            };
            return Ok(RawResult::affected(affected));
        }

        let columns: Vec<ColumnDesc> = self
            .stmt
            .columns()
            .iter()
            .map(|c| ColumnDesc {
                name: c.name().to_string(),
                decl_type: c.decl_type().map(str::to_string),
            })
            .collect();

        let mut raw_rows = Vec::new();
        let mut rows = self.stmt.raw_query();
        while let Some(row) = rows
            .next()
            .map_err(|e| ConnectorError::ExecutionError(e.to_string()))?
        {
            let mut cells = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| ConnectorError::ExecutionError(e.to_string()))?;
                cells.push(raw_cell(value));
            }
            raw_rows.push(cells);
        }

        Ok(RawResult {
            columns,
            rows: raw_rows,
            rows_affected: 0,
        })
    }

    fn close(self) -> Result<(), ConnectorError> {
        self.stmt.finalize().map_err(ConnectorError::SqliteError)
    }
}

fn raw_cell(value: ValueRef<'_>) -> RawCell {
    match value {
        ValueRef::Null => RawCell::Null,
        ValueRef::Integer(i) => RawCell::Integer(i),
        ValueRef::Real(f) => RawCell::Real(f),
        ValueRef::Text(bytes) => RawCell::Text(bytes.to_vec()),
        ValueRef::Blob(bytes) => RawCell::Blob(bytes.to_vec()),
    }
}
