use crate::backend::{ColumnDesc, RawCell, RawResult};
use crate::error::ConnectorError;
use crate::outcome::QueryResult;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Decode a raw execution result into typed rows.
///
/// Each cell is decoded by the type the database reported for it. Columns
/// declared boolean turn integer 0/1 into `SqlValue::Bool`.
///
/// # Errors
/// Returns `ConnectorError::DecodeError` when text is not valid UTF-8 or a
/// boolean column holds something other than 0, 1 or NULL.
pub fn decode(raw: RawResult) -> Result<QueryResult, ConnectorError> {
    if !raw.produces_rows() {
        return Ok(QueryResult {
            result_set: None,
            rows_affected: raw.rows_affected,
        });
    }

    let bool_columns: Vec<bool> = raw.columns.iter().map(is_bool_column).collect();
    let column_names: Vec<String> = raw.columns.iter().map(|c| c.name.clone()).collect();
    let mut result_set = ResultSet::with_columns(column_names, raw.rows.len());

    for row in raw.rows {
        let mut values = Vec::with_capacity(row.len());
        for (cell, (column, as_bool)) in row.into_iter().zip(raw.columns.iter().zip(&bool_columns)) {
            values.push(decode_cell(cell, *as_bool, column)?);
        }
        result_set.add_row_values(values);
    }

    let rows_affected = result_set.rows_affected;
    Ok(QueryResult {
        result_set: Some(result_set),
        rows_affected,
    })
}

fn decode_cell(cell: RawCell, as_bool: bool, column: &ColumnDesc) -> Result<SqlValue, ConnectorError> {
    match cell {
        RawCell::Null => Ok(SqlValue::Null),
        RawCell::Integer(i) if as_bool => match i {
            0 => Ok(SqlValue::Bool(false)),
            1 => Ok(SqlValue::Bool(true)),
            other => Err(ConnectorError::DecodeError {
                column: column.name.clone(),
                message: format!("integer {other} is not a boolean"),
            }),
        },
        RawCell::Integer(i) => Ok(SqlValue::Int(i)),
        RawCell::Real(f) => Ok(SqlValue::Float(f)),
        RawCell::Text(bytes) => String::from_utf8(bytes)
            .map(SqlValue::Text)
            .map_err(|e| ConnectorError::DecodeError {
                column: column.name.clone(),
                message: format!("text is not valid UTF-8: {e}"),
            }),
        RawCell::Blob(bytes) => Ok(SqlValue::Blob(bytes)),
    }
}

fn is_bool_column(column: &ColumnDesc) -> bool {
    column.decl_type.as_deref().is_some_and(|decl| {
        let decl = decl.trim();
        decl.eq_ignore_ascii_case("bool") || decl.eq_ignore_ascii_case("boolean")
    })
}
