//! Positional parameter binding and statement execution over a pluggable SQL backend.
//!
//! A [`Statement`] is SQL text interleaved with bind sites. Executing it resolves
//! the sites against a [`ParameterSet`], prepares the SQL, binds the values, runs
//! it and decodes the rows into a [`ResultSet`]. Every call yields an
//! [`ExecutionOutcome`] that is either a success or a failure tagged with the
//! stage it stopped at.
//!
//! Only anonymous positional parameters are supported. Named sites (`:name`,
//! `@name`, `$name`) and named parameter maps are rejected with
//! [`ConnectorError::UnsupportedBindingError`] before the database is touched.

pub mod backend;
pub mod connector;
pub mod decode;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod prelude;
pub mod resolve;
pub mod results;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod statement;
pub mod types;
pub mod worker;

pub use backend::{PreparedHandle, StatementBackend};
pub use connector::Connector;
pub use error::ConnectorError;
pub use outcome::{ExecutionOutcome, QueryResult, Stage};
pub use results::{DbRow, ResultSet};
pub use statement::{BindSite, Field, Segment, Statement, StatementBuilder};
pub use types::{ParameterSet, SqlValue};
pub use worker::AsyncConnector;
