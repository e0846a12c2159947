#![cfg(feature = "sqlite")]

use sql_bindexec::prelude::*;

fn fruit_table() -> Result<Connector<SqliteBackend>, Box<dyn std::error::Error>> {
    let mut conn = Connector::open(&SqliteOptions::in_memory())?;
    conn.execute_script(
        "CREATE TABLE fruit (a varchar(40), b integer);
         INSERT INTO fruit VALUES ('apple', 10);",
    )?;
    Ok(conn)
}

#[test]
fn zero_row_update_is_success() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;
    let outcome = conn.execute_raw_with(
        "UPDATE fruit SET b = ? WHERE a = ?",
        &params![1, "no such fruit"],
    );
    assert!(outcome.success());
    assert_eq!(outcome.rows_affected(), 0);
    assert_eq!(outcome.failed_stage(), None);
    Ok(())
}

#[test]
fn malformed_sql_is_prepare_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;
    let outcome = conn.execute_raw_with("UPDAT fruit SET b = ? WHERE a = ?", &params![1, "apple"]);
    assert!(!outcome.success());
    assert_eq!(outcome.failed_stage(), Some(Stage::Resolved));
    assert!(outcome.as_error().is_some_and(ConnectorError::is_prepare));
    assert!(outcome.as_result_set().is_none());
    Ok(())
}

#[test]
fn multi_statement_text_is_rejected_whole() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;

    let outcome =
        conn.execute_raw("INSERT INTO fruit VALUES ('a', 1); INSERT INTO fruit VALUES ('b', 2)");
    assert_eq!(outcome.failed_stage(), Some(Stage::Resolved));
    assert!(outcome.as_error().is_some_and(ConnectorError::is_prepare));

    let outcome = conn.execute_raw_with(
        "INSERT INTO fruit VALUES (?, 1); DELETE FROM fruit",
        &params!["c"],
    );
    assert!(outcome.as_error().is_some_and(ConnectorError::is_prepare));

    let outcome = conn.execute_raw_batch(
        "INSERT INTO fruit VALUES (?, 1); DELETE FROM fruit",
        &[params!["d"]],
    );
    assert!(outcome.as_error().is_some_and(ConnectorError::is_prepare));

    // Only the row from setup; neither half of any rejected text ran.
    let result = conn.execute_raw("SELECT a FROM fruit;").into_result()?;
    let rs = result.result_set.ok_or("no result set")?;
    assert_eq!(rs.len(), 1);
    assert_eq!(rs.results[0].get("a"), Some(&SqlValue::Text("apple".into())));
    Ok(())
}

#[test]
fn ddl_after_dml_reports_zero_rows_affected() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;
    let outcome = conn.execute_raw_with("INSERT INTO fruit VALUES (?, ?)", &params!["pear", 2]);
    assert_eq!(outcome.rows_affected(), 1);

    let outcome = conn.execute_raw("CREATE TABLE other (x int)");
    assert!(outcome.success(), "{:?}", outcome.as_error());
    assert_eq!(outcome.rows_affected(), 0);
    Ok(())
}

#[test]
fn parameter_count_mismatch_is_build_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;
    let stmt = Statement::parse("UPDATE fruit SET b = ? WHERE a = ?");

    for set in [params![], params![1], params![1, "apple", "extra"]] {
        let outcome = conn.execute_with(&stmt, &set);
        match outcome.as_error() {
            Some(ConnectorError::BuildError { expected, actual }) => {
                assert_eq!(*expected, 2);
                assert_eq!(*actual, set.len());
            }
            other => panic!("expected BuildError, got {other:?}"),
        }
    }

    let outcome = conn.execute(&stmt);
    assert!(outcome.as_error().is_some_and(ConnectorError::is_build));

    let result = conn.execute_raw("SELECT b FROM fruit").into_result()?;
    let rs = result.result_set.ok_or("no result set")?;
    assert_eq!(rs.results[0].get("b"), Some(&SqlValue::Int(10)));
    Ok(())
}

#[test]
fn placeholders_inside_literals_are_not_bind_sites() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;
    let outcome = conn.execute_raw_with(
        "INSERT INTO fruit VALUES ('what? :no @no', ?) -- trailing ?",
        &params![5],
    );
    assert!(outcome.success(), "{:?}", outcome.as_error());

    let outcome = conn.execute_raw("SELECT a FROM fruit WHERE b = 5");
    let rows = outcome.rows().ok_or("no rows")?;
    assert_eq!(rows[0].get("a"), Some(&SqlValue::Text("what? :no @no".into())));
    Ok(())
}

#[test]
fn describe_is_idempotent_and_never_executes() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;
    let stmt = Statement::builder()
        .sql("DELETE FROM fruit WHERE a = ")
        .param()
        .build();

    let first = conn.describe(&stmt);
    let second = conn.describe(&stmt);
    assert_eq!(first, second);
    assert_eq!(first, "DELETE FROM fruit WHERE a = ?");
    assert_eq!(stmt.to_string(), first);

    let result = conn.execute_raw("SELECT count(*) AS n FROM fruit").into_result()?;
    let rs = result.result_set.ok_or("no result set")?;
    assert_eq!(rs.results[0].get("n"), Some(&SqlValue::Int(1)));
    Ok(())
}

#[test]
fn script_failure_surfaces_as_execution_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;
    let err = conn
        .execute_script("CREATE TABLE fruit (a int)")
        .err()
        .ok_or("duplicate table was accepted")?;
    assert!(err.is_execution());
    Ok(())
}

#[test]
fn config_file_options_open_database() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.db");
    let json = format!(
        r#"{{"db_path": {}, "encoding": "utf16be", "busy_timeout_ms": 100}}"#,
        serde_json::to_string(&path.to_string_lossy())?
    );
    let opts = SqliteOptions::from_json_str(&json)?;
    let mut conn = Connector::open(&opts)?;
    conn.execute_script("CREATE TABLE t (a text)")?;

    let outcome = conn.execute_raw("PRAGMA encoding");
    let rows = outcome.rows().ok_or("no rows")?;
    assert_eq!(rows[0][0], SqlValue::Text("UTF-16be".into()));
    Ok(())
}
