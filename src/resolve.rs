use crate::error::ConnectorError;
use crate::statement::Statement;
use crate::types::{ParameterSet, SqlValue};

/// SQL text ready to prepare plus the values to bind, in bind order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// SQL text ready to prepare plus one value list per batch row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBatch {
    pub sql: String,
    pub sets: Vec<Vec<SqlValue>>,
}

/// Resolve a statement against at most one parameter set.
///
/// Without a set the statement must have no bind-sites. Named sites and named sets
/// are rejected before counts are compared.
///
/// # Errors
/// Returns `ConnectorError::UnsupportedBindingError` for named sites or maps and
/// `ConnectorError::BuildError` when the value count differs from the number of
/// positional sites.
pub fn resolve(
    statement: &Statement,
    params: Option<&ParameterSet>,
) -> Result<ResolvedStatement, ConnectorError> {
    let expected = check_positional_only(statement)?;
    let values = match params {
        None => Vec::new(),
        Some(set) => positional_values(set)?.to_vec(),
    };
    check_count(expected, values.len())?;
    Ok(ResolvedStatement {
        sql: statement.render(),
        values,
    })
}

/// Resolve a statement against every set of a batch.
///
/// All sets are validated before anything is returned, so a malformed row is
/// reported before any row reaches the database.
///
/// # Errors
/// Same as [`resolve`], for the first offending set.
pub fn resolve_batch(
    statement: &Statement,
    batch: &[ParameterSet],
) -> Result<ResolvedBatch, ConnectorError> {
    let expected = check_positional_only(statement)?;
    let mut sets = Vec::with_capacity(batch.len());
    for set in batch {
        let values = positional_values(set)?;
        check_count(expected, values.len())?;
        sets.push(values.to_vec());
    }
    Ok(ResolvedBatch {
        sql: statement.render(),
        sets,
    })
}

fn check_positional_only(statement: &Statement) -> Result<usize, ConnectorError> {
    let named = statement.named_sites();
    if named.is_empty() {
        Ok(statement.positional_count())
    } else {
        Err(ConnectorError::UnsupportedBindingError(format!(
            "statement contains named bind-sites ({}); only positional parameters can be executed",
            named.join(", ")
        )))
    }
}

fn positional_values(set: &ParameterSet) -> Result<&[SqlValue], ConnectorError> {
    match set {
        ParameterSet::Positional(values) => Ok(values),
        ParameterSet::Named(map) => Err(ConnectorError::UnsupportedBindingError(format!(
            "named parameters ({}) are not supported; supply values positionally",
            map.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
        ))),
    }
}

fn check_count(expected: usize, actual: usize) -> Result<(), ConnectorError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ConnectorError::BuildError { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use crate::statement::{Field, Statement};

    fn mixed_insert() -> Statement {
        Statement::insert(
            "t",
            &["a", "b"],
            vec![
                vec![Field::param(), 10.into()],
                vec!["apricot".into(), Field::param()],
                vec![Field::param(), Field::param()],
            ],
        )
    }

    #[test]
    fn positional_values_keep_source_order() {
        let resolved = resolve(&mixed_insert(), Some(&params!["apple", 3, "banana", -8])).unwrap();
        assert_eq!(
            resolved.sql,
            "INSERT INTO t (a, b) VALUES (?, 10), ('apricot', ?), (?, ?)"
        );
        assert_eq!(
            resolved.values,
            vec![
                SqlValue::Text("apple".into()),
                SqlValue::Int(3),
                SqlValue::Text("banana".into()),
                SqlValue::Int(-8),
            ]
        );
    }

    #[test]
    fn count_mismatch_is_build_error() {
        let stmt = Statement::parse("insert into t values(?, ?)");
        for set in [params![], params![1], params![1, 2, 3]] {
            let err = resolve(&stmt, Some(&set)).unwrap_err();
            assert!(matches!(
                err,
                ConnectorError::BuildError { expected: 2, .. }
            ));
        }
        let err = resolve(&stmt, None).unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::BuildError {
                expected: 2,
                actual: 0
            }
        ));
    }

    #[test]
    fn no_params_and_no_sites_resolves_to_text() {
        let resolved = resolve(&Statement::parse("select 1"), None).unwrap();
        assert_eq!(resolved.sql, "select 1");
        assert!(resolved.values.is_empty());
    }

    #[test]
    fn named_sites_fail_for_any_set() {
        let stmt = Statement::insert(
            "t",
            &[],
            vec![
                vec![Field::named("p1"), 10.into()],
                vec!["apricot".into(), Field::named("p2")],
                vec![Field::named("p3"), Field::named("p4")],
            ],
        );
        let named = ParameterSet::named([
            ("p1", SqlValue::from("apple")),
            ("p2", SqlValue::from(3)),
            ("p3", SqlValue::from("banana")),
            ("p4", SqlValue::from(-8)),
        ]);
        assert!(resolve(&stmt, Some(&named)).unwrap_err().is_unsupported_binding());
        let positional = params!["apple", 3, "banana", -8];
        assert!(resolve(&stmt, Some(&positional)).unwrap_err().is_unsupported_binding());
        assert!(resolve(&stmt, None).unwrap_err().is_unsupported_binding());
    }

    #[test]
    fn named_map_fails_for_positional_statement() {
        let stmt = Statement::parse("select ?");
        let set = ParameterSet::named([("a", 1)]);
        assert!(resolve(&stmt, Some(&set)).unwrap_err().is_unsupported_binding());
    }

    #[test]
    fn batch_validates_every_set_first() {
        let stmt = Statement::parse("insert into t values(?, ?)");
        let batch = vec![params!["apple", 10], params!["apricot"], params!["banana", -8]];
        let err = resolve_batch(&stmt, &batch).unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::BuildError {
                expected: 2,
                actual: 1
            }
        ));

        let resolved = resolve_batch(&stmt, &[]).unwrap();
        assert!(resolved.sets.is_empty());
        assert_eq!(resolved.sql, "insert into t values(?, ?)");
    }
}
