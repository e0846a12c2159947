use std::fmt;

use crate::error::ConnectorError;
use crate::results::{DbRow, ResultSet};

/// Stages a façade call moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Built,
    Resolved,
    Prepared,
    Bound,
    Executed,
    Decoded,
    Returned,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Built => "built",
            Stage::Resolved => "resolved",
            Stage::Prepared => "prepared",
            Stage::Bound => "bound",
            Stage::Executed => "executed",
            Stage::Decoded => "decoded",
            Stage::Returned => "returned",
        };
        f.write_str(name)
    }
}

/// Successful output of the executor.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Present only for statements that produce rows.
    pub result_set: Option<ResultSet>,
    pub rows_affected: usize,
}

/// What a façade call hands back.
///
/// Success and failure are separate variants, so a successful outcome never
/// carries an error and a failed one never carries rows.
#[derive(Debug)]
pub enum ExecutionOutcome {
    Success {
        result_set: Option<ResultSet>,
        rows_affected: usize,
    },
    Failed {
        /// Last stage the call reached before the error.
        stage: Stage,
        error: ConnectorError,
    },
}

impl ExecutionOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success { .. })
    }

    #[must_use]
    pub fn as_error(&self) -> Option<&ConnectorError> {
        match self {
            ExecutionOutcome::Failed { error, .. } => Some(error),
            ExecutionOutcome::Success { .. } => None,
        }
    }

    #[must_use]
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            ExecutionOutcome::Failed { stage, .. } => Some(*stage),
            ExecutionOutcome::Success { .. } => None,
        }
    }

    #[must_use]
    pub fn as_result_set(&self) -> Option<&ResultSet> {
        match self {
            ExecutionOutcome::Success { result_set, .. } => result_set.as_ref(),
            ExecutionOutcome::Failed { .. } => None,
        }
    }

    /// Decoded rows, if the statement produced any.
    #[must_use]
    pub fn rows(&self) -> Option<&[DbRow]> {
        self.as_result_set().map(|rs| rs.results.as_slice())
    }

    #[must_use]
    pub fn rows_affected(&self) -> usize {
        match self {
            ExecutionOutcome::Success { rows_affected, .. } => *rows_affected,
            ExecutionOutcome::Failed { .. } => 0,
        }
    }

    /// Convert into a `Result` for `?`-style callers.
    ///
    /// # Errors
    /// Returns the captured `ConnectorError` for a failed outcome.
    pub fn into_result(self) -> Result<QueryResult, ConnectorError> {
        match self {
            ExecutionOutcome::Success {
                result_set,
                rows_affected,
            } => Ok(QueryResult {
                result_set,
                rows_affected,
            }),
            ExecutionOutcome::Failed { error, .. } => Err(error),
        }
    }
}

impl From<QueryResult> for ExecutionOutcome {
    fn from(result: QueryResult) -> Self {
        ExecutionOutcome::Success {
            result_set: result.result_set,
            rows_affected: result.rows_affected,
        }
    }
}
