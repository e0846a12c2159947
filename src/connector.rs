use tracing::{debug, warn};

use crate::backend::StatementBackend;
use crate::error::ConnectorError;
use crate::executor::{Progress, execute_batch_tracked, execute_tracked};
use crate::outcome::{ExecutionOutcome, QueryResult, Stage};
use crate::statement::Statement;
use crate::types::ParameterSet;

#[cfg(feature = "sqlite")]
use crate::sqlite::{SqliteBackend, SqliteOptions};

/// User-facing entry points over one connection.
///
/// Every call takes `&mut self`, so a connection never has more than one statement
/// in flight. Each call starts from [`Stage::Built`] and either reaches
/// [`Stage::Returned`] or stops at the first failing stage.
/// ```rust,no_run
/// use sql_bindexec::prelude::*;
///
/// # fn demo() -> Result<(), ConnectorError> {
/// let mut conn = Connector::open(&SqliteOptions::in_memory())?;
/// conn.execute_script("CREATE TABLE fruit (a varchar(40), b integer)")?;
/// let outcome = conn.execute_raw_batch(
///     "insert into fruit values(?, ?)",
///     &[params!["apple", 10], params!["apricot", 3]],
/// );
/// assert!(outcome.success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Connector<B> {
    backend: B,
}

impl<B: StatementBackend> Connector<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Execute a statement that takes no parameters.
    pub fn execute(&mut self, statement: &Statement) -> ExecutionOutcome {
        debug!(sql = %statement.describe(), "execute");
        let mut progress = Progress::new();
        let result = execute_tracked(&mut self.backend, statement, None, &mut progress);
        finish(progress, result)
    }

    /// Execute a statement with one positional parameter set.
    pub fn execute_with(&mut self, statement: &Statement, params: &ParameterSet) -> ExecutionOutcome {
        debug!(sql = %statement.describe(), params = params.len(), "execute with parameters");
        let mut progress = Progress::new();
        let result = execute_tracked(&mut self.backend, statement, Some(params), &mut progress);
        finish(progress, result)
    }

    /// Execute a statement once per parameter set, in order.
    pub fn execute_batch(&mut self, statement: &Statement, batch: &[ParameterSet]) -> ExecutionOutcome {
        debug!(sql = %statement.describe(), sets = batch.len(), "execute batch");
        let mut progress = Progress::new();
        let result = execute_batch_tracked(&mut self.backend, statement, batch, &mut progress);
        finish(progress, result)
    }

    /// [`execute`](Self::execute) over raw SQL text.
    pub fn execute_raw(&mut self, sql: &str) -> ExecutionOutcome {
        self.execute(&Statement::parse(sql))
    }

    /// [`execute_with`](Self::execute_with) over raw SQL text.
    pub fn execute_raw_with(&mut self, sql: &str, params: &ParameterSet) -> ExecutionOutcome {
        self.execute_with(&Statement::parse(sql), params)
    }

    /// [`execute_batch`](Self::execute_batch) over raw SQL text.
    pub fn execute_raw_batch(&mut self, sql: &str, batch: &[ParameterSet]) -> ExecutionOutcome {
        self.execute_batch(&Statement::parse(sql), batch)
    }

    /// Run a multi-statement script (DDL, setup) with no parameters.
    ///
    /// # Errors
    /// Returns `ConnectorError::ExecutionError` if any statement in the script fails.
    pub fn execute_script(&mut self, sql: &str) -> Result<(), ConnectorError> {
        debug!(sql, "execute script");
        self.backend.execute_script(sql)
    }

    /// SQL text of `statement` for diagnostics; never touches the database.
    #[must_use]
    pub fn describe(&self, statement: &Statement) -> String {
        statement.describe()
    }
}

#[cfg(feature = "sqlite")]
impl Connector<SqliteBackend> {
    /// Open a `SQLite` connection.
    ///
    /// # Errors
    /// Returns `ConnectorError` if the database cannot be opened or configured.
    pub fn open(opts: &SqliteOptions) -> Result<Self, ConnectorError> {
        SqliteBackend::open(opts).map(Self::new)
    }
}

fn finish(mut progress: Progress, result: Result<QueryResult, ConnectorError>) -> ExecutionOutcome {
    match result {
        Ok(result) => {
            progress.advance(Stage::Returned);
            result.into()
        }
        Err(error) => {
            let stage = progress.stage();
            warn!(%stage, %error, "statement failed");
            ExecutionOutcome::Failed { stage, error }
        }
    }
}
