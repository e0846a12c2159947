use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Supplied parameter count does not match the statement's positional bind-sites.
    #[error("Parameter count mismatch: statement expects {expected}, got {actual}")]
    BuildError { expected: usize, actual: usize },

    /// Named bind-sites or named parameter maps reached a positional-only path.
    #[error("Unsupported binding: {0}")]
    UnsupportedBindingError(String),

    #[error("Prepare error: {0}")]
    PrepareError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Decode error in column {column}: {message}")]
    DecodeError { column: String, message: String },

    /// A value kind outside the supported scalar set.
    #[error("Unsupported value: {0}")]
    UnsupportedValueError(String),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl ConnectorError {
    /// Tag an execution failure with the zero-based batch row that produced it.
    #[must_use]
    pub fn in_batch_row(self, row: usize) -> Self {
        match self {
            ConnectorError::ExecutionError(message) => {
                ConnectorError::ExecutionError(format!("batch row {row}: {message}"))
            }
            other => other,
        }
    }

    #[must_use]
    pub fn is_build(&self) -> bool {
        matches!(self, ConnectorError::BuildError { .. })
    }

    #[must_use]
    pub fn is_unsupported_binding(&self) -> bool {
        matches!(self, ConnectorError::UnsupportedBindingError(_))
    }

    #[must_use]
    pub fn is_prepare(&self) -> bool {
        matches!(self, ConnectorError::PrepareError(_))
    }

    #[must_use]
    pub fn is_execution(&self) -> bool {
        matches!(self, ConnectorError::ExecutionError(_))
    }

    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, ConnectorError::DecodeError { .. })
    }
}
