use crate::error::ConnectorError;
use crate::types::SqlValue;

/// Column metadata reported by the database for a row-producing statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDesc {
    pub name: String,
    /// Declared type of the source column, when the database knows it.
    pub decl_type: Option<String>,
}

/// A cell exactly as the database reported it, before decoding.
///
/// Text stays as raw bytes so decoding can reject invalid encodings instead of
/// guessing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Null,
    Integer(i64),
    Real(f64),
    Text(Vec<u8>),
    Blob(Vec<u8>),
}

/// Output of one execution of a prepared statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResult {
    /// Empty for statements that produce no rows.
    pub columns: Vec<ColumnDesc>,
    pub rows: Vec<Vec<RawCell>>,
    /// Rows changed by a non-row-producing statement.
    pub rows_affected: usize,
}

impl RawResult {
    #[must_use]
    pub fn affected(rows_affected: usize) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            rows_affected,
        }
    }

    #[must_use]
    pub fn produces_rows(&self) -> bool {
        !self.columns.is_empty()
    }
}

/// The connection layer the executor drives.
///
/// One prepared handle at a time: `prepare` borrows the backend mutably for as
/// long as the handle lives.
pub trait StatementBackend {
    type Prepared<'c>: PreparedHandle
    where
        Self: 'c;

    /// Prepare `sql` on the connection.
    ///
    /// # Errors
    /// Returns `ConnectorError::PrepareError` when the database rejects the text.
    fn prepare(&mut self, sql: &str) -> Result<Self::Prepared<'_>, ConnectorError>;

    /// Run a script of one or more statements with no parameters and no results.
    ///
    /// # Errors
    /// Returns `ConnectorError::ExecutionError` when any statement in the script fails.
    fn execute_script(&mut self, sql: &str) -> Result<(), ConnectorError>;
}

/// A server-held prepared statement.
///
/// Dropping a handle releases it; `close` does the same but reports failures.
pub trait PreparedHandle {
    /// Number of parameters the database expects.
    fn parameter_count(&self) -> usize;

    /// Bind `values` to parameters `1..=values.len()`, replacing earlier bindings.
    ///
    /// # Errors
    /// Returns `ConnectorError::BuildError` if `values.len()` differs from
    /// [`parameter_count`](Self::parameter_count), `ConnectorError::ExecutionError`
    /// if the database refuses a value.
    fn bind(&mut self, values: &[SqlValue]) -> Result<(), ConnectorError>;

    /// Execute with the current bindings and fetch every produced row.
    ///
    /// # Errors
    /// Returns `ConnectorError::ExecutionError` when the database rejects the execution.
    fn execute(&mut self) -> Result<RawResult, ConnectorError>;

    /// Release the handle.
    ///
    /// # Errors
    /// Returns the error the database reports while finalizing.
    fn close(self) -> Result<(), ConnectorError>;
}
