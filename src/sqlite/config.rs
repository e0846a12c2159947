use clap::ValueEnum;
use serde::Deserialize;

use crate::error::ConnectorError;

/// Text encoding for newly created database files.
///
/// SQLite fixes the encoding when the database is created; on an existing file the
/// pragma is a no-op. Text always crosses the API as UTF-8 either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16le,
    Utf16be,
}

impl TextEncoding {
    #[must_use]
    pub fn pragma_value(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16le => "UTF-16le",
            TextEncoding::Utf16be => "UTF-16be",
        }
    }
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_foreign_keys() -> bool {
    true
}

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    #[serde(default)]
    pub encoding: TextEncoding,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            encoding: TextEncoding::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
            foreign_keys: default_foreign_keys(),
        }
    }

    /// Options for a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// Parse options from a JSON document such as
    /// `{"db_path": "app.db", "encoding": "utf16le"}`.
    ///
    /// # Errors
    /// Returns `ConnectorError::ConfigError` if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, ConnectorError> {
        serde_json::from_str(json)
            .map_err(|e| ConnectorError::ConfigError(format!("invalid SQLite options: {e}")))
    }

    /// PRAGMA statements applied right after opening.
    #[must_use]
    pub fn pragma_script(&self) -> String {
        format!(
            "PRAGMA encoding = '{}'; PRAGMA foreign_keys = {};",
            self.encoding.pragma_value(),
            if self.foreign_keys { "ON" } else { "OFF" }
        )
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.opts.encoding = encoding;
        self
    }

    #[must_use]
    pub fn busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.opts.busy_timeout_ms = busy_timeout_ms;
        self
    }

    #[must_use]
    pub fn foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.opts.foreign_keys = foreign_keys;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }
}

impl SqliteOptions {
    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }
}
