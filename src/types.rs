use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::ConnectorError;

/// Scalar values bound as statement parameters and produced by decoded rows.
///
/// The set is closed: anything that cannot be expressed as one of these kinds is
/// rejected at conversion time rather than coerced.
/// ```rust
/// use sql_bindexec::prelude::*;
///
/// let params = vec![
///     SqlValue::Int(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value
    Null,
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Binary data
    Blob(Vec<u8>),
    /// Boolean value
    Bool(bool),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let SqlValue::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let SqlValue::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Name of the value kind, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Int(_) => "integer",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
            SqlValue::Blob(_) => "blob",
            SqlValue::Bool(_) => "boolean",
        }
    }

    /// Render the value as an inline SQL literal.
    ///
    /// Text is single-quoted with embedded quotes doubled, blobs use `X'..'` hex
    /// notation and booleans become `1`/`0`. Non-finite floats have no literal form:
    /// infinities use an overflowing exponent and NaN renders as `NULL`, which is
    /// what SQLite stores for NaN anyway.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Float(f) if f.is_nan() => "NULL".to_string(),
            SqlValue::Float(f) if f.is_infinite() => {
                if f.is_sign_positive() {
                    "9e999".to_string()
                } else {
                    "-9e999".to_string()
                }
            }
            SqlValue::Float(f) => format!("{f:?}"),
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            SqlValue::Blob(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 2 + 3);
                out.push_str("X'");
                for b in bytes {
                    out.push_str(&format!("{b:02X}"));
                }
                out.push('\'');
                out
            }
            SqlValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

impl_from_scalar! {
    i64 => |v| SqlValue::Int(v),
    i32 => |v| SqlValue::Int(i64::from(v)),
    i16 => |v| SqlValue::Int(i64::from(v)),
    u32 => |v| SqlValue::Int(i64::from(v)),
    f64 => |v| SqlValue::Float(v),
    f32 => |v| SqlValue::Float(f64::from(v)),
    bool => |v| SqlValue::Bool(v),
    String => |v| SqlValue::Text(v),
    &str => |v| SqlValue::Text(v.to_string()),
    Vec<u8> => |v| SqlValue::Blob(v),
    &[u8] => |v| SqlValue::Blob(v.to_vec()),
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

impl TryFrom<JsonValue> for SqlValue {
    type Error = ConnectorError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Null => Ok(SqlValue::Null),
            JsonValue::Bool(b) => Ok(SqlValue::Bool(b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(SqlValue::Int(i))
                } else if n.is_u64() {
                    Err(ConnectorError::UnsupportedValueError(format!(
                        "integer {n} does not fit in a signed 64-bit value"
                    )))
                } else {
                    n.as_f64().map(SqlValue::Float).ok_or_else(|| {
                        ConnectorError::UnsupportedValueError(format!("number {n}"))
                    })
                }
            }
            JsonValue::String(s) => Ok(SqlValue::Text(s)),
            JsonValue::Array(_) => Err(ConnectorError::UnsupportedValueError(
                "arrays cannot be bound as a single parameter".into(),
            )),
            JsonValue::Object(_) => Err(ConnectorError::UnsupportedValueError(
                "objects cannot be bound as a single parameter".into(),
            )),
        }
    }
}

/// One row's worth of values for a statement's bind-sites.
///
/// Only `Positional` sets can be executed; `Named` maps are accepted by the type
/// so callers get a typed [`ConnectorError::UnsupportedBindingError`] instead of a
/// silent substitution.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSet {
    Positional(Vec<SqlValue>),
    Named(BTreeMap<String, SqlValue>),
}

impl ParameterSet {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ParameterSet::Positional(values) => values.len(),
            ParameterSet::Named(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        matches!(self, ParameterSet::Named(_))
    }

    /// Build a named set from `(name, value)` pairs.
    pub fn named<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<SqlValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        ParameterSet::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<Vec<SqlValue>> for ParameterSet {
    fn from(values: Vec<SqlValue>) -> Self {
        ParameterSet::Positional(values)
    }
}

impl From<BTreeMap<String, SqlValue>> for ParameterSet {
    fn from(map: BTreeMap<String, SqlValue>) -> Self {
        ParameterSet::Named(map)
    }
}

impl TryFrom<JsonValue> for ParameterSet {
    type Error = ConnectorError;

    /// JSON arrays become positional sets, JSON objects become named sets.
    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Array(items) => items
                .into_iter()
                .map(SqlValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(ParameterSet::Positional),
            JsonValue::Object(map) => map
                .into_iter()
                .map(|(k, v)| SqlValue::try_from(v).map(|v| (k, v)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(ParameterSet::Named),
            other => Err(ConnectorError::UnsupportedValueError(format!(
                "parameter set must be a JSON array or object, got {other}"
            ))),
        }
    }
}

/// Build a positional [`ParameterSet`] from mixed scalar expressions.
///
/// ```rust
/// use sql_bindexec::params;
///
/// let set = params!["apple", 10, None::<i64>];
/// assert_eq!(set.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::types::ParameterSet::Positional(Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::types::ParameterSet::Positional(vec![$($crate::types::SqlValue::from($value)),+])
    };
}
