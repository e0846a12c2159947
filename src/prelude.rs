//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::backend::{PreparedHandle, StatementBackend};
pub use crate::connector::Connector;
pub use crate::error::ConnectorError;
pub use crate::outcome::{ExecutionOutcome, QueryResult, Stage};
pub use crate::params;
pub use crate::results::{DbRow, ResultSet};
pub use crate::statement::{BindSite, Field, Segment, Statement, StatementBuilder};
pub use crate::types::{ParameterSet, SqlValue};
pub use crate::worker::AsyncConnector;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteBackend, SqliteOptions, SqliteOptionsBuilder, TextEncoding};
