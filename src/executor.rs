use tracing::trace;

use crate::backend::{PreparedHandle, StatementBackend};
use crate::decode::decode;
use crate::error::ConnectorError;
use crate::outcome::{QueryResult, Stage};
use crate::resolve::{resolve, resolve_batch};
use crate::results::ResultSet;
use crate::statement::Statement;
use crate::types::ParameterSet;

/// Tracks how far a call got, for failure reporting.
#[derive(Debug)]
pub(crate) struct Progress {
    stage: Stage,
}

impl Progress {
    pub(crate) fn new() -> Self {
        Self {
            stage: Stage::Built,
        }
    }

    pub(crate) fn advance(&mut self, next: Stage) {
        trace!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }

    pub(crate) fn stage(&self) -> Stage {
        self.stage
    }
}

/// Execute a statement once, with or without a positional parameter set.
///
/// The prepared handle is released before this returns, on success and on every
/// error path.
///
/// # Errors
/// Returns the first `ConnectorError` from resolution, preparation, binding,
/// execution or decoding. Nothing is retried.
pub fn execute<B: StatementBackend>(
    backend: &mut B,
    statement: &Statement,
    params: Option<&ParameterSet>,
) -> Result<QueryResult, ConnectorError> {
    execute_tracked(backend, statement, params, &mut Progress::new())
}

/// Execute a statement once per parameter set, in order, on one prepared handle.
///
/// Every set is validated before the statement is prepared. The first row that
/// fails to bind or execute aborts the batch; rows applied before it stay applied.
/// An empty batch touches nothing and succeeds.
///
/// # Errors
/// Returns the first `ConnectorError`; execution failures name the failing row.
pub fn execute_batch<B: StatementBackend>(
    backend: &mut B,
    statement: &Statement,
    batch: &[ParameterSet],
) -> Result<QueryResult, ConnectorError> {
    execute_batch_tracked(backend, statement, batch, &mut Progress::new())
}

pub(crate) fn execute_tracked<B: StatementBackend>(
    backend: &mut B,
    statement: &Statement,
    params: Option<&ParameterSet>,
    progress: &mut Progress,
) -> Result<QueryResult, ConnectorError> {
    let resolved = resolve(statement, params)?;
    progress.advance(Stage::Resolved);

    let mut handle = backend.prepare(&resolved.sql)?;
    progress.advance(Stage::Prepared);

    handle.bind(&resolved.values)?;
    progress.advance(Stage::Bound);

    let raw = handle.execute()?;
    progress.advance(Stage::Executed);
    handle.close()?;

    let result = decode(raw)?;
    progress.advance(Stage::Decoded);
    Ok(result)
}

pub(crate) fn execute_batch_tracked<B: StatementBackend>(
    backend: &mut B,
    statement: &Statement,
    batch: &[ParameterSet],
    progress: &mut Progress,
) -> Result<QueryResult, ConnectorError> {
    let resolved = resolve_batch(statement, batch)?;
    progress.advance(Stage::Resolved);

    if resolved.sets.is_empty() {
        progress.advance(Stage::Decoded);
        return Ok(QueryResult::default());
    }

    let mut handle = backend.prepare(&resolved.sql)?;
    progress.advance(Stage::Prepared);

    let mut merged: Option<ResultSet> = None;
    let mut rows_affected = 0;
    for (row, values) in resolved.sets.iter().enumerate() {
        progress.advance(Stage::Prepared);
        handle.bind(values).map_err(|e| e.in_batch_row(row))?;
        progress.advance(Stage::Bound);

        let raw = handle.execute().map_err(|e| e.in_batch_row(row))?;
        progress.advance(Stage::Executed);

        let part = decode(raw)?;
        progress.advance(Stage::Decoded);
        rows_affected += part.rows_affected;
        if let Some(rs) = part.result_set {
            merged.get_or_insert_with(ResultSet::default).append(rs);
        }
    }
    handle.close()?;

    Ok(QueryResult {
        result_set: merged,
        rows_affected,
    })
}
