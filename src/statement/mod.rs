use std::fmt::Write;

mod builder;
mod raw;

pub use builder::{Field, StatementBuilder};

/// A placeholder position filled at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindSite {
    /// Anonymous site, resolved by its order among positional sites.
    Positional,
    /// Site carrying an identifier. Never bound by the executor.
    Named(String),
}

impl BindSite {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        BindSite::Named(name.into())
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        matches!(self, BindSite::Named(_))
    }
}

/// One piece of a [`Statement`].
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// SQL text passed through verbatim.
    Sql(String),
    Bind(BindSite),
}

/// An ordered sequence of SQL fragments and bind-sites.
///
/// Segment order is fixed at construction; resolution walks it left to right.
/// ```rust
/// use sql_bindexec::prelude::*;
///
/// let stmt = Statement::builder()
///     .sql("UPDATE fruit SET qty = ")
///     .param()
///     .sql(" WHERE name = ")
///     .literal("apple")
///     .build();
/// assert_eq!(stmt.describe(), "UPDATE fruit SET qty = ? WHERE name = 'apple'");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    segments: Vec<Segment>,
}

impl Statement {
    #[must_use]
    pub fn builder() -> StatementBuilder {
        StatementBuilder::default()
    }

    #[must_use]
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Split raw SQL text into literal fragments and bind-sites.
    ///
    /// `?` and `?NNN` become positional sites; `:name`, `@name` and `$name` become
    /// named sites. Markers inside string literals, quoted identifiers and comments
    /// are left alone, as are `::` casts.
    #[must_use]
    pub fn parse(sql: &str) -> Self {
        raw::split_bind_sites(sql)
    }

    /// Multi-row `INSERT INTO table (columns) VALUES (..), (..)`.
    ///
    /// Literal fields are inlined into the SQL text; bind fields become bind-sites,
    /// so a single execution binds only the placeholder positions of each row.
    #[must_use]
    pub fn insert(table: &str, columns: &[&str], rows: Vec<Vec<Field>>) -> Self {
        builder::insert(table, columns, rows)
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn bind_sites(&self) -> impl Iterator<Item = &BindSite> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Bind(site) => Some(site),
            Segment::Sql(_) => None,
        })
    }

    #[must_use]
    pub fn positional_count(&self) -> usize {
        self.bind_sites()
            .filter(|site| matches!(site, BindSite::Positional))
            .count()
    }

    /// Names of the named bind-sites, in statement order.
    #[must_use]
    pub fn named_sites(&self) -> Vec<&str> {
        self.bind_sites()
            .filter_map(|site| match site {
                BindSite::Named(name) => Some(name.as_str()),
                BindSite::Positional => None,
            })
            .collect()
    }

    #[must_use]
    pub fn has_bind_sites(&self) -> bool {
        self.bind_sites().next().is_some()
    }

    /// SQL text with every bind-site materialized as `?`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Sql(sql) => out.push_str(sql),
                Segment::Bind(_) => out.push('?'),
            }
        }
        out
    }

    /// Human-readable SQL text: positional sites as `?`, named sites as `@name`.
    ///
    /// Pure; calling it never touches a connection.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Sql(sql) => out.push_str(sql),
                Segment::Bind(BindSite::Positional) => out.push('?'),
                Segment::Bind(BindSite::Named(name)) => {
                    let _ = write!(out, "@{name}");
                }
            }
        }
        out
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Statement::parse(sql)
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}
