use rusqlite::types::Value;

use crate::types::SqlValue;

/// Convert a single `SqlValue` to the rusqlite value bound for it.
///
/// Chosen by the value's tag alone. Booleans bind as INTEGER 0/1, which is how
/// SQLite itself binds them; no other kind changes representation.
#[must_use]
pub fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
    }
}

/// Unified `SQLite` parameter container.
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert connector values into `SQLite` values, preserving order.
    #[must_use]
    pub fn convert(params: &[SqlValue]) -> Self {
        Params(params.iter().map(to_sqlite_value).collect())
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }
}
