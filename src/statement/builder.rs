use crate::types::SqlValue;

use super::{BindSite, Segment, Statement};

/// Fluent builder producing a [`Statement`] segment by segment.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    segments: Vec<Segment>,
}

impl StatementBuilder {
    /// Append SQL text. Adjacent text is merged into one segment.
    #[must_use]
    pub fn sql(mut self, sql: impl AsRef<str>) -> Self {
        self.push_sql(sql.as_ref());
        self
    }

    /// Append a positional bind-site.
    #[must_use]
    pub fn param(mut self) -> Self {
        self.segments.push(Segment::Bind(BindSite::Positional));
        self
    }

    /// Append a named bind-site.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Bind(BindSite::Named(name.into())));
        self
    }

    /// Inline a value as a SQL literal.
    #[must_use]
    pub fn literal(mut self, value: impl Into<SqlValue>) -> Self {
        self.push_sql(&value.into().to_sql_literal());
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.push_field(field);
        self
    }

    #[must_use]
    pub fn build(self) -> Statement {
        Statement::from_segments(self.segments)
    }

    fn push_sql(&mut self, sql: &str) {
        if sql.is_empty() {
            return;
        }
        if let Some(Segment::Sql(last)) = self.segments.last_mut() {
            last.push_str(sql);
        } else {
            self.segments.push(Segment::Sql(sql.to_string()));
        }
    }

    fn push_field(&mut self, field: Field) {
        match field {
            Field::Value(value) => self.push_sql(&value.to_sql_literal()),
            Field::Bind(site) => self.segments.push(Segment::Bind(site)),
        }
    }
}

/// One cell of a row handed to [`Statement::insert`]: either a value written into
/// the SQL text or a bind-site filled at execution time.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Value(SqlValue),
    Bind(BindSite),
}

impl Field {
    /// Positional placeholder.
    #[must_use]
    pub fn param() -> Self {
        Field::Bind(BindSite::Positional)
    }

    /// Named placeholder.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Field::Bind(BindSite::Named(name.into()))
    }
}

impl From<BindSite> for Field {
    fn from(site: BindSite) -> Self {
        Field::Bind(site)
    }
}

impl From<SqlValue> for Field {
    fn from(value: SqlValue) -> Self {
        Field::Value(value)
    }
}

macro_rules! field_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(value: $ty) -> Self {
                    Field::Value(SqlValue::from(value))
                }
            }
        )*
    };
}

field_from_scalar!(i64, i32, f64, bool, String, &str, Vec<u8>);

pub(super) fn insert(table: &str, columns: &[&str], rows: Vec<Vec<Field>>) -> Statement {
    let mut builder = StatementBuilder::default().sql(format!("INSERT INTO {table}"));
    if !columns.is_empty() {
        builder = builder.sql(format!(" ({})", columns.join(", ")));
    }
    builder = builder.sql(" VALUES ");
    for (row_idx, row) in rows.into_iter().enumerate() {
        if row_idx > 0 {
            builder = builder.sql(", ");
        }
        builder = builder.sql("(");
        for (col_idx, field) in row.into_iter().enumerate() {
            if col_idx > 0 {
                builder = builder.sql(", ");
            }
            builder = builder.field(field);
        }
        builder = builder.sql(")");
    }
    builder.build()
}
