// SQLite backend for the executor.
//
// - config: connection options and their builder
// - params: value coercion from connector values to rusqlite values
// - backend: `StatementBackend` implementation over `rusqlite::Connection`

pub mod backend;
pub mod config;
pub mod params;

pub use backend::{SqliteBackend, SqlitePrepared};
pub use config::{SqliteOptions, SqliteOptionsBuilder, TextEncoding};
pub use params::{Params, to_sqlite_value};
