use std::collections::HashMap;
use std::sync::Arc;

use crate::types::SqlValue;

use super::row::DbRow;

/// A result set from a database query
///
/// This struct represents the rows a statement produced, in wire order,
/// together with the column names they share.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<DbRow>,
    /// The number of rows produced
    pub rows_affected: usize,
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns with room for `capacity` rows.
    #[must_use]
    pub fn with_columns(column_names: Vec<String>, capacity: usize) -> ResultSet {
        let mut column_index = HashMap::with_capacity(column_names.len());
        for (i, name) in column_names.iter().enumerate() {
            column_index.entry(name.clone()).or_insert(i);
        }
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: Arc::new(column_names),
            column_index: Arc::new(column_index),
        }
    }

    /// Get the column names for this result set
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Add a row to the result set
    pub fn add_row_values(&mut self, row_values: Vec<SqlValue>) {
        self.results.push(DbRow::with_index(
            Arc::clone(&self.column_names),
            Arc::clone(&self.column_index),
            row_values,
        ));
        self.rows_affected += 1;
    }

    /// Append the rows of `other`, keeping their order.
    ///
    /// Both sets come from the same prepared statement, so the column lists match.
    pub fn append(&mut self, other: ResultSet) {
        if self.column_names.is_empty() {
            self.column_names = other.column_names;
            self.column_index = other.column_index;
        }
        for row in other.results {
            self.add_row_values(row.values);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate the rows as plain value vectors.
    pub fn rows(&self) -> impl Iterator<Item = &[SqlValue]> {
        self.results.iter().map(|row| row.values.as_slice())
    }
}
